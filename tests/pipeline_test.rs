//! End-to-end generation runs against target sources on disk.

use std::fs;
use std::path::Path;

use instgen::arm::{self, ArmGenerator};
use instgen::core::injector::locate;
use instgen::database::{Encoding, EncodingVariant, MemoryDatabase};
use instgen::pipeline::{self, GeneratorConfig, WriteMode};
use instgen::GenError;

const HEADER: &str = "\
struct ArmInst {
  ASMJIT_ENUM(Id) {
    // ${idData:Begin}
    kIdNone = 0,
    kIdStale,                            // [TA]
    _kIdCount
    // ${idData:End}
  };
};
";

const SOURCE: &str = "\
const ArmInst ArmInstDB::instData[] = {
  // ${instData:Begin}
  INST(None            , undefined              , undefined                 , 0   , 0  )
  // ${instData:End}
};

// ${commonData:Begin}
// ${commonData:End}

#if !defined(ASMJIT_DISABLE_TEXT)
// ${nameData:Begin}
const char ArmInstDB::nameData[] = \"\";
// ${nameData:End}
#endif
";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Write the two target files below a fresh root.
fn setup(header: &str, source: &str) -> tempfile::TempDir {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("src/asmjit/arm");
    fs::create_dir_all(&dir).unwrap();
    fs::write(root.path().join(arm::INST_HEADER), header).unwrap();
    fs::write(root.path().join(arm::INST_SOURCE), source).unwrap();
    root
}

fn read(root: &Path, file: &str) -> String {
    fs::read_to_string(root.join(file)).unwrap()
}

fn region<'a>(text: &'a str, marker: &str) -> &'a str {
    let range = locate(text, marker, "test").unwrap();
    &text[range]
}

fn database() -> MemoryDatabase {
    MemoryDatabase::new()
        .with_instruction("adc", &[Encoding::T16, Encoding::T32, Encoding::A32])
        .with_instruction("add", &[Encoding::T16, Encoding::A32, Encoding::A64])
        .with_variants(
            "ldr",
            vec![
                EncodingVariant::with_flags(Encoding::T32, &["Load"]),
                EncodingVariant::with_flags(Encoding::A32, &["Load", "Cond"]),
            ],
        )
        .with_instruction("qdadd", &[Encoding::A32])
        .with_instruction("udf", &[Encoding::T16, Encoding::A64])
        .with_name("yield")
}

#[test]
fn test_full_run_updates_regions() {
    init_logging();
    let root = setup(HEADER, SOURCE);

    let summary = pipeline::run_in(&ArmGenerator::new(), &database(), root.path()).unwrap();
    assert_eq!(summary.record_count, 7);
    assert_eq!(summary.written, 2);
    assert_eq!(summary.changed.len(), 2);
    assert_eq!(summary.diagnostics.warnings().len(), 1);

    let header = read(root.path(), arm::INST_HEADER);
    assert_eq!(
        region(&header, "idData"),
        format!(
            "    kIdNone = 0,\n\
             \x20   {:<37}// [TA]\n\
             \x20   {:<37}// [TA]\n\
             \x20   {:<37}// [TA]\n\
             \x20   {:<37}// [ A]\n\
             \x20   {:<37}// [T ]\n\
             \x20   kIdYield,\n\
             \x20   _kIdCount\n",
            "kIdAdc,", "kIdAdd,", "kIdLdr,", "kIdQdadd,", "kIdUdf,"
        )
    );
    assert!(header.starts_with("struct ArmInst {\n  ASMJIT_ENUM(Id) {\n    // ${idData:Begin}\n"));
    assert!(header.ends_with("    // ${idData:End}\n  };\n};\n"));

    let source = read(root.path(), arm::INST_SOURCE);
    let inst = region(&source, "instData");
    let rows: Vec<&str> = inst.lines().collect();
    assert_eq!(rows.len(), 7);
    assert!(rows[0].starts_with("  INST(None "));
    assert_eq!(rows[3], "  INST(Ldr  , kArchMaskArm32               , 5 , 1),");
    assert_eq!(rows[6], "  INST(Yield, 0                            , 19, 0)");

    let common = region(&source, "commonData");
    assert!(common.contains("  { 0 }, // #0 [ref=6x]\n  { F(Cond)|F(Load) }  // #1 [ref=1x]\n"));

    let names = region(&source, "nameData");
    assert!(names.contains("\"\\0\" \"adc\\0\" \"ldr\\0\" \"qdadd\\0\" \"udf\\0\" \"yield\";"));
    assert!(names.contains("  { ArmInst::kIdUdf  , ArmInst::kIdUdf   + 1 },"));

    // Text outside the regions is untouched.
    assert!(source.starts_with("const ArmInst ArmInstDB::instData[] = {\n  // ${instData:Begin}\n"));
    assert!(source.contains("  // ${instData:End}\n};\n\n// ${commonData:Begin}\n"));
    assert!(source.ends_with("// ${nameData:End}\n#endif\n"));
}

#[test]
fn test_second_run_is_identical() {
    init_logging();
    let root = setup(HEADER, SOURCE);
    let db = database();

    pipeline::run_in(&ArmGenerator::new(), &db, root.path()).unwrap();
    let header = read(root.path(), arm::INST_HEADER);
    let source = read(root.path(), arm::INST_SOURCE);

    let summary = pipeline::run_in(&ArmGenerator::new(), &db, root.path()).unwrap();
    assert_eq!(summary.written, 0);
    assert!(summary.changed.is_empty());
    assert_eq!(read(root.path(), arm::INST_HEADER), header);
    assert_eq!(read(root.path(), arm::INST_SOURCE), source);
}

#[test]
fn test_duplicate_names_abort_without_writing() {
    init_logging();
    let root = setup(HEADER, SOURCE);
    let db = MemoryDatabase::new()
        .with_instruction("add", &[Encoding::A32])
        .with_instruction("sub", &[Encoding::A32])
        .with_instruction("add", &[Encoding::T16]);

    let err = pipeline::run_in(&ArmGenerator::new(), &db, root.path()).unwrap_err();
    assert!(matches!(err, GenError::DuplicateName { ref name } if name == "add"));
    assert_eq!(read(root.path(), arm::INST_HEADER), HEADER);
    assert_eq!(read(root.path(), arm::INST_SOURCE), SOURCE);
}

#[test]
fn test_missing_marker_aborts_without_writing() {
    init_logging();
    let source = SOURCE.replace("// ${commonData:Begin}\n// ${commonData:End}\n", "");
    let root = setup(HEADER, &source);

    let err = pipeline::run_in(&ArmGenerator::new(), &database(), root.path()).unwrap_err();
    match err {
        GenError::MarkerNotFound { marker, file } => {
            assert_eq!(marker, "commonData");
            assert_eq!(file, arm::INST_SOURCE);
        }
        other => panic!("unexpected error: {other}"),
    }

    // The header's region was computed but nothing may be written.
    assert_eq!(read(root.path(), arm::INST_HEADER), HEADER);
    assert_eq!(read(root.path(), arm::INST_SOURCE), source);
}

#[test]
fn test_single_instruction() {
    init_logging();
    let root = setup(HEADER, SOURCE);
    let db = MemoryDatabase::new().with_instruction("mov", &[Encoding::A32]);

    let summary = pipeline::run_in(&ArmGenerator::new(), &db, root.path()).unwrap();
    assert!(summary.diagnostics.is_empty());

    let source = read(root.path(), arm::INST_SOURCE);
    assert_eq!(
        region(&source, "instData"),
        "  INST(None, 0             , 0, 0),\n  INST(Mov , kArchMaskArm32, 1, 0)\n"
    );

    let header = read(root.path(), arm::INST_HEADER);
    assert_eq!(
        region(&header, "idData"),
        format!("    kIdNone = 0,\n    {:<37}// [ A]\n    _kIdCount\n", "kIdMov,")
    );
}

#[test]
fn test_sentinel_first_in_every_table() {
    init_logging();
    let root = setup(HEADER, SOURCE);
    pipeline::run_in(&ArmGenerator::new(), &database(), root.path()).unwrap();

    let header = read(root.path(), arm::INST_HEADER);
    assert!(region(&header, "idData").starts_with("    kIdNone = 0,\n"));

    let source = read(root.path(), arm::INST_SOURCE);
    assert!(region(&source, "instData").starts_with("  INST(None "));
    assert!(region(&source, "commonData").contains("  { 0 }, // #0 "));
    assert!(region(&source, "nameData").contains("  \"\\0\" "));
}

#[test]
fn test_dry_run_and_check_write_nothing() {
    init_logging();
    let root = setup(HEADER, SOURCE);

    for mode in [WriteMode::DryRun, WriteMode::Check] {
        let config = GeneratorConfig::new(root.path()).with_mode(mode);
        let summary = pipeline::run(&ArmGenerator::new(), &database(), &config).unwrap();
        assert_eq!(summary.written, 0);
        assert_eq!(summary.changed.len(), 2);
        assert_eq!(read(root.path(), arm::INST_HEADER), HEADER);
        assert_eq!(read(root.path(), arm::INST_SOURCE), SOURCE);
    }
}

#[test]
fn test_size_report() {
    init_logging();
    let root = setup(HEADER, SOURCE);
    let summary = pipeline::run_in(&ArmGenerator::new(), &database(), root.path()).unwrap();

    let names: Vec<&str> = summary.report.entries().iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["idData", "nameData", "commonData", "instData"]);

    let sizes: Vec<usize> = summary.report.entries().iter().map(|(_, s)| *s).collect();
    // Name data: 25 bytes of names plus 26 four-byte ranges.
    assert_eq!(sizes, vec![0, 25 + 26 * 4, 2 * 4, 7 * 12]);
    assert!(summary.report.to_string().ends_with(&format!("Size of all tables      : {}", 129 + 8 + 84)));
}

#[test]
fn test_json_database_run() {
    init_logging();
    let root = setup(HEADER, SOURCE);
    let db_path = root.path().join("arm.json");
    fs::write(
        &db_path,
        r#"{ "instructions": [
            { "name": "bkpt", "variants": [ { "encoding": "T16" }, { "encoding": "A32" } ] },
            { "name": "hvc", "variants": [ { "encoding": "A32" } ] }
        ] }"#,
    )
    .unwrap();

    let db = MemoryDatabase::load(&db_path).unwrap();
    let summary = pipeline::run_in(&ArmGenerator::new(), &db, root.path()).unwrap();
    assert_eq!(summary.record_count, 3);

    let header = read(root.path(), arm::INST_HEADER);
    assert!(region(&header, "idData").contains("kIdBkpt,"));
    assert!(region(&header, "idData").contains("kIdHvc,"));
}
