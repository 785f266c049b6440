use crate::error::Result;
use crate::filename::parse_filename;
use crate::models::{ConsolidatedRecord, FilenameMetadata};
use crate::reference::ReferenceCatalog;

/// Strips `~` noise and expands `^` back to the two spaces it stands for.
pub fn clean_body(body: &str) -> String {
    body.replace('~', "").replace('^', "  ")
}

/// Splits a cleaned body into rows of trimmed, non-empty fields.
///
/// Empty fields are dropped rather than kept as placeholders, so sparse rows
/// shift left. Downstream column positions rely on this.
pub fn split_rows(cleaned: &str) -> Vec<Vec<String>> {
    cleaned
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.split(',')
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .map(str::to_string)
                .collect()
        })
        .collect()
}

pub fn parse_records(
    file_name: &str,
    body: &str,
    catalog: &ReferenceCatalog,
) -> Result<Vec<ConsolidatedRecord>> {
    let meta = parse_filename(file_name)?;
    Ok(enrich_rows(&meta, body, catalog))
}

pub fn enrich_rows(
    meta: &FilenameMetadata,
    body: &str,
    catalog: &ReferenceCatalog,
) -> Vec<ConsolidatedRecord> {
    let branch = catalog.lookup(&meta.branch_code);
    split_rows(&clean_body(body))
        .into_iter()
        .map(|mut fields| {
            fields.push(meta.product_code.clone());
            fields.push(meta.branch_code.clone());
            fields.push(branch.name.clone());
            fields.push(branch.district.clone());
            fields.push(meta.date_display.clone());
            ConsolidatedRecord::new(fields)
        })
        .collect()
}
