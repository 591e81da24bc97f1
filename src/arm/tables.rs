//! ARM table steps.
//!
//! Each step is named after the marker region it fills.

use crate::core::format::{disclaimer, format_aligned, Columns};
use crate::core::{GenError, GenResult, GeneratedRegion, IndexedTable, NameTable, RecordSet, Step};

use super::{arch_mask, comment_of};

pub const ID_DATA: &str = "idData";
pub const NAME_DATA: &str = "nameData";
pub const COMMON_DATA: &str = "commonData";
pub const INST_DATA: &str = "instData";

/// Bytes per `ArmInst::CommonData` entry.
const COMMON_DATA_SIZE: usize = 4;
/// Bytes per `ArmInst` entry.
const INST_DATA_SIZE: usize = 12;
/// Bytes per `InstNameAZ` entry.
const NAME_AZ_SIZE: usize = 4;

/// Enumerators are padded so comments start at column 41.
const ID_NAME_WIDTH: usize = 37;
const NAME_DATA_WIDTH: usize = 80;

/// The ARM steps in execution order.
pub fn steps() -> Vec<Step> {
    vec![
        // Order doesn't matter here.
        Step::new(ID_DATA, id_data),
        Step::new(NAME_DATA, name_data),
        // These must be last, and order matters.
        Step::new(COMMON_DATA, common_data),
        Step::new(INST_DATA, inst_data).after(&[NAME_DATA, COMMON_DATA]),
    ]
}

/// Instruction id enum, `kIdNone = 0` first and `_kIdCount` last.
fn id_data(records: &mut RecordSet) -> GenResult<GeneratedRegion> {
    let mut rows = vec![vec!["kIdNone = 0,".to_string(), String::new()]];
    for record in records.instructions() {
        let comment = comment_of(record);
        let comment = if comment.is_empty() {
            comment
        } else {
            format!("// {comment}")
        };
        rows.push(vec![format!("kId{},", record.symbol), comment]);
    }

    let columns = Columns::measure(&rows).at_least(&[ID_NAME_WIDTH]);
    let mut lines: Vec<String> = rows
        .iter()
        .map(|row| format!("    {}", columns.align(row, "").trim_end()))
        .collect();
    lines.push("    _kIdCount".to_string());

    // Enumerators take no table storage.
    Ok(GeneratedRegion::new(ID_DATA, lines.join("\n") + "\n", 0))
}

/// NUL-separated name data plus the alphabetical lookup ranges.
///
/// Resolves every record's name index.
fn name_data(records: &mut RecordSet) -> GenResult<GeneratedRegion> {
    let table = NameTable::build(records.iter().map(|r| r.name.as_str()));
    for record in records.iter_mut() {
        if let Some(offset) = table.offset_of(&record.name) {
            record.set_name_index(offset);
        }
    }

    let max_length = records.iter().map(|r| r.name.len()).max().unwrap_or(0);

    // First and last id of every initial letter; unused letters map to None.
    let ranges: Vec<(String, String)> = ('a'..='z')
        .map(|letter| {
            let mut ids = records
                .instructions()
                .iter()
                .filter(|r| r.name.starts_with(letter))
                .map(|r| r.symbol.as_str());
            let first = ids.next();
            let last = ids.last().or(first);
            match (first, last) {
                (Some(first), Some(last)) => (first.to_string(), last.to_string()),
                _ => ("None".to_string(), "None".to_string()),
            }
        })
        .collect();
    let az = format_aligned(&ranges, "  ", false, ("{ ", " + 1 }"), |(first, last)| {
        Ok::<_, GenError>(vec![
            format!("ArmInst::kId{first}"),
            format!("ArmInst::kId{last}"),
        ])
    })?;

    let text = format!(
        "const char ArmInstDB::nameData[] =\n\
         {};\n\
         \n\
         enum {{\n  kArmInstMaxLength = {max_length}\n}};\n\
         \n\
         struct InstNameAZ {{\n  uint16_t start;\n  uint16_t end;\n}};\n\
         \n\
         static const InstNameAZ ArmInstNameAZ[26] = {{\n{az}\n}};",
        table.render("  ", NAME_DATA_WIDTH),
    );

    Ok(GeneratedRegion::new(
        NAME_DATA,
        disclaimer(&text),
        table.size() + ranges.len() * NAME_AZ_SIZE,
    ))
}

fn common_row(flags: &[String]) -> String {
    if flags.is_empty() {
        "{ 0 }".to_string()
    } else {
        let flags: Vec<String> = flags.iter().map(|f| format!("F({f})")).collect();
        format!("{{ {} }}", flags.join("|"))
    }
}

/// Deduplicated common data. Resolves every record's common index.
fn common_data(records: &mut RecordSet) -> GenResult<GeneratedRegion> {
    let mut table = IndexedTable::new();
    for record in records.iter_mut() {
        let index = table.append_or_reuse(common_row(&record.flags));
        record.set_common_index(index);
    }
    log::debug!(
        "Common data: {} unique rows for {} instructions",
        table.len(),
        records.len()
    );

    let text = format!(
        "const ArmInst::CommonData ArmInstDB::commonData[] = {{\n{}\n}};",
        table.render("  ", false)
    );
    Ok(GeneratedRegion::new(
        COMMON_DATA,
        disclaimer(&text),
        table.len() * COMMON_DATA_SIZE,
    ))
}

/// Per-instruction table embedding the name and common data indices.
fn inst_data(records: &mut RecordSet) -> GenResult<GeneratedRegion> {
    let text = format_aligned(records.as_slice(), "  ", false, ("INST(", ")"), |record| {
        Ok::<_, GenError>(vec![
            record.symbol.clone(),
            arch_mask(record),
            record.name_index(INST_DATA)?.to_string(),
            record.common_index(INST_DATA)?.to_string(),
        ])
    })?;
    Ok(GeneratedRegion::new(
        INST_DATA,
        text + "\n",
        records.len() * INST_DATA_SIZE,
    ))
}
