// This module is the ARM flavour of the generator. Parsing builds the record set from the
// database's name list and classifies every instruction by the encodings of its group (T16,
// T32, A32, A64) plus the union of its variant flags; names without a group keep the default
// classification and are reported as EmptyGroup warnings. Name lookup binary-searches the
// per-letter ranges of the id enum, so names are expected in ascending order starting with a-z;
// anything else is reported as a warning. The table steps live in `tables`:
// the id enum and name data are independent, while common data and the per-instruction table
// must run last and in that order because the instruction table embeds the indices they
// resolve. The targets are the two assembler sources holding the generated regions.

//! ARM instruction tables.

pub mod tables;

use crate::core::{
    Diagnostics, GenResult, InstructionRecord, RecordBuilder, RecordSet, Step, TargetFile,
    Warning,
};
use crate::database::{Encoding, EncodingSet, InstructionDatabase};
use crate::pipeline::ArchGenerator;

/// Header holding the instruction id enum.
pub const INST_HEADER: &str = "src/asmjit/arm/arminst.h";
/// Source holding the data tables.
pub const INST_SOURCE: &str = "src/asmjit/arm/arminst.cpp";

/// Two-letter architecture tag of an instruction group.
///
/// The first letter is `T` when any Thumb encoding (T16 or T32) exists, the
/// second is `A` when an A32 encoding exists; absent letters are spaces.
/// A64 does not contribute to the tag.
pub fn arch_of(encodings: EncodingSet) -> String {
    let thumb = encodings.contains(Encoding::T16) || encodings.contains(Encoding::T32);
    let arm = encodings.contains(Encoding::A32);
    format!(
        "[{}{}]",
        if thumb { 'T' } else { ' ' },
        if arm { 'A' } else { ' ' }
    )
}

/// Comment shown next to the instruction id, empty when the group is unknown.
pub fn comment_of(record: &InstructionRecord) -> String {
    record.encodings.map(arch_of).unwrap_or_default()
}

/// `ArchMask` expression for the modes an instruction can be encoded in.
pub fn arch_mask(record: &InstructionRecord) -> String {
    let Some(encodings) = record.encodings else {
        return "0".to_string();
    };

    let mut masks = Vec::new();
    if [Encoding::T16, Encoding::T32, Encoding::A32]
        .into_iter()
        .any(|e| encodings.contains(e))
    {
        masks.push("kArchMaskArm32");
    }
    if encodings.contains(Encoding::A64) {
        masks.push("kArchMaskArm64");
    }

    if masks.is_empty() {
        "0".to_string()
    } else {
        masks.join("|")
    }
}

/// Report names that break the alphabetical lookup ranges.
fn check_name_order(records: &RecordSet, diagnostics: &mut Diagnostics) {
    let mut previous: Option<&str> = None;
    for record in records.instructions() {
        let name = record.name.as_str();
        if !name.starts_with(|c: char| c.is_ascii_lowercase()) {
            diagnostics.warn(Warning::NotIndexed {
                name: name.to_string(),
            });
            continue;
        }
        if let Some(prev) = previous.filter(|prev| name < *prev) {
            diagnostics.warn(Warning::UnsortedName {
                name: name.to_string(),
                previous: prev.to_string(),
            });
        }
        previous = Some(name);
    }
}

/// Generator for the ARM assembler tables.
#[derive(Debug)]
pub struct ArmGenerator {
    targets: Vec<TargetFile>,
}

impl ArmGenerator {
    pub fn new() -> Self {
        Self {
            targets: vec![
                TargetFile::new(INST_HEADER, &[tables::ID_DATA]),
                TargetFile::new(
                    INST_SOURCE,
                    &[tables::INST_DATA, tables::COMMON_DATA, tables::NAME_DATA],
                ),
            ],
        }
    }
}

impl Default for ArmGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchGenerator for ArmGenerator {
    fn name(&self) -> &'static str {
        "Arm"
    }

    fn parse(
        &self,
        db: &dyn InstructionDatabase,
        diagnostics: &mut Diagnostics,
    ) -> GenResult<RecordSet> {
        let names = db.instruction_names();
        let mut records = RecordBuilder::new().build(&names)?;

        for record in records.iter_mut().skip(1) {
            match db.group(&record.name).filter(|group| !group.is_empty()) {
                Some(group) => {
                    record.encodings = Some(EncodingSet::from_group(group));
                    let mut flags: Vec<String> =
                        group.iter().flat_map(|v| v.flags.iter().cloned()).collect();
                    flags.sort();
                    flags.dedup();
                    record.flags = flags;
                }
                None => diagnostics.warn(Warning::EmptyGroup {
                    name: record.name.clone(),
                }),
            }
        }

        check_name_order(&records, diagnostics);
        log::info!("Number of Instructions: {}", records.len());
        Ok(records)
    }

    fn steps(&self) -> Vec<Step> {
        tables::steps()
    }

    fn targets(&self) -> &[TargetFile] {
        &self.targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Family, GenError};
    use crate::database::{EncodingVariant, MemoryDatabase};

    #[test]
    fn test_arch_of() {
        let tag = |encodings: &[Encoding]| {
            let mut set = EncodingSet::default();
            encodings.iter().for_each(|e| set.insert(*e));
            arch_of(set)
        };
        assert_eq!(tag(&[Encoding::A32]), "[ A]");
        assert_eq!(tag(&[Encoding::T16]), "[T ]");
        assert_eq!(tag(&[Encoding::T32, Encoding::A32]), "[TA]");
        assert_eq!(tag(&[Encoding::A64]), "[  ]");
        assert_eq!(tag(&[]), "[  ]");
    }

    #[test]
    fn test_parse_single_a32_instruction() {
        let db = MemoryDatabase::new().with_instruction("mov", &[Encoding::A32]);
        let mut diagnostics = Diagnostics::new();
        let records = ArmGenerator::new().parse(&db, &mut diagnostics).unwrap();

        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["", "mov"]);

        let mov = records.find("mov").unwrap();
        assert_eq!(mov.symbol, "Mov");
        assert_eq!(mov.family, Family::None);
        assert_eq!(comment_of(mov), "[ A]");
        assert_eq!(arch_mask(mov), "kArchMaskArm32");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_parse_collects_flags() {
        let db = MemoryDatabase::new().with_variants(
            "ldr",
            vec![
                EncodingVariant::with_flags(Encoding::T32, &["Load", "Cond"]),
                EncodingVariant::with_flags(Encoding::A64, &["Load"]),
            ],
        );
        let records = ArmGenerator::new().parse(&db, &mut Diagnostics::new()).unwrap();
        let ldr = records.find("ldr").unwrap();
        assert_eq!(ldr.flags, vec!["Cond", "Load"]);
        assert_eq!(arch_mask(ldr), "kArchMaskArm32|kArchMaskArm64");
    }

    #[test]
    fn test_parse_missing_group_falls_back() {
        let db = MemoryDatabase::new()
            .with_instruction("adc", &[Encoding::T16, Encoding::A32])
            .with_name("yield");
        let mut diagnostics = Diagnostics::new();
        let records = ArmGenerator::new().parse(&db, &mut diagnostics).unwrap();

        let y = records.find("yield").unwrap();
        assert!(y.encodings.is_none());
        assert_eq!(comment_of(y), "");
        assert_eq!(arch_mask(y), "0");
        assert_eq!(
            diagnostics.warnings(),
            &[Warning::EmptyGroup { name: "yield".to_string() }]
        );
    }

    #[test]
    fn test_parse_rejects_duplicates() {
        let db = MemoryDatabase::new()
            .with_name("add")
            .with_name("sub")
            .with_name("add");
        let err = ArmGenerator::new().parse(&db, &mut Diagnostics::new()).unwrap_err();
        assert!(matches!(err, GenError::DuplicateName { .. }));
    }

    #[test]
    fn test_parse_reports_unsorted_names() {
        let db = MemoryDatabase::new()
            .with_instruction("sub", &[Encoding::A32])
            .with_instruction("add", &[Encoding::A32])
            .with_instruction("sbc", &[Encoding::A32]);
        let mut diagnostics = Diagnostics::new();
        ArmGenerator::new().parse(&db, &mut diagnostics).unwrap();
        assert_eq!(
            diagnostics.warnings(),
            &[Warning::UnsortedName {
                name: "add".to_string(),
                previous: "sub".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_reports_names_outside_lookup() {
        let db = MemoryDatabase::new()
            .with_instruction("add", &[Encoding::A32])
            .with_instruction("Mrs", &[Encoding::A32])
            .with_instruction("sub", &[Encoding::A32]);
        let mut diagnostics = Diagnostics::new();
        ArmGenerator::new().parse(&db, &mut diagnostics).unwrap();
        assert_eq!(
            diagnostics.warnings(),
            &[Warning::NotIndexed { name: "Mrs".to_string() }]
        );
    }

    #[test]
    fn test_targets_own_every_step_marker() {
        let arm = ArmGenerator::new();
        for step in arm.steps() {
            assert!(
                arm.targets().iter().any(|t| t.owns(step.name)),
                "no target for {}",
                step.name
            );
        }
    }
}
