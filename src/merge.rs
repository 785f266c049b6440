use crate::config::{EngineConfig, MERGED_BY_DATE_DIR, MERGED_BY_PRODUCT_DIR, MERGED_BY_RANGE_DIR};
use crate::error::{EngineError, Result};
use crate::filename::{product_code, transaction_date};
use crate::outcome::Warning;
use crate::scanner::{list_input_files_sorted, read_body};
use crate::util::sanitize_component;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

const ALL_PRODUCTS: &str = "ALL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeKind {
    Date,
    Product,
    DateRange,
}

impl MergeKind {
    pub fn label(&self) -> &'static str {
        match self {
            MergeKind::Date => "date",
            MergeKind::Product => "product",
            MergeKind::DateRange => "date range",
        }
    }
}

#[derive(Debug)]
pub struct MergeReport {
    pub kind: MergeKind,
    pub output_dir: PathBuf,
    pub outputs: Vec<PathBuf>,
    pub files_merged: usize,
    pub warnings: Vec<Warning>,
}

impl MergeReport {
    pub fn status_message(&self) -> String {
        format!(
            "Files merged by {} successfully: {} file(s) into {} output(s) in {}",
            self.kind.label(),
            self.files_merged,
            self.outputs.len(),
            self.output_dir.display()
        )
    }
}

/// Raw file bodies grouped by a key derived from the file name.
struct Groups<K> {
    bodies: BTreeMap<K, Vec<String>>,
    files: usize,
    warnings: Vec<Warning>,
}

/// Empty bodies are left out so they never become blank lines.
fn group_bodies<K, F>(
    directory: &Path,
    file_names: &[String],
    warnings: Vec<Warning>,
    key_of: F,
) -> Groups<K>
where
    K: Ord,
    F: Fn(&str) -> Result<Option<K>>,
{
    let mut groups = Groups {
        bodies: BTreeMap::new(),
        files: 0,
        warnings,
    };

    for file_name in file_names {
        let key = match key_of(file_name) {
            Ok(Some(key)) => key,
            Ok(None) => continue,
            Err(err) => {
                groups.warnings.push(Warning::for_file(file_name, err));
                continue;
            }
        };
        match read_body(directory, file_name) {
            Ok(body) if body.trim().is_empty() => {
                log::debug!("{}: empty body, nothing to merge", file_name);
            }
            Ok(body) => {
                groups
                    .bodies
                    .entry(key)
                    .or_default()
                    .push(body.trim().to_string());
                groups.files += 1;
            }
            Err(err) => groups.warnings.push(Warning::for_file(file_name, err)),
        }
    }

    groups
}

fn write_merged(output_dir: &Path, outputs: &[(String, Vec<String>)]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir).map_err(|err| EngineError::io(output_dir, err))?;
    let mut written = Vec::new();
    let mut used = HashSet::new();
    for (filename, bodies) in outputs {
        let path = output_dir.join(unique_file_name(filename, &mut used));
        std::fs::write(&path, bodies.join("\n")).map_err(|err| EngineError::io(&path, err))?;
        log::debug!("wrote {} ({} file(s))", path.display(), bodies.len());
        written.push(path);
    }
    Ok(written)
}

/// Distinct group keys can sanitise to the same name; later ones get a
/// numeric suffix so no group written in this run is overwritten.
fn unique_file_name(filename: &str, used: &mut HashSet<String>) -> String {
    if used.insert(filename.to_string()) {
        return filename.to_string();
    }
    let (stem, ext) = match filename.rsplit_once('.') {
        Some((stem, ext)) => (stem, format!(".{ext}")),
        None => (filename, String::new()),
    };
    let mut n = 2usize;
    loop {
        let candidate = format!("{stem}_{n}{ext}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// One merged file per calendar date; undecodable dates are left out.
pub fn merge_by_date(directory: &Path, config: &EngineConfig) -> Result<MergeReport> {
    let (file_names, warnings) = list_input_files_sorted(directory)?.into_parts();
    let groups = group_bodies(directory, &file_names, warnings, |name| {
        transaction_date(name).map(Some)
    });

    let outputs: Vec<(String, Vec<String>)> = groups
        .bodies
        .into_iter()
        .map(|(date, bodies)| (date_file_name(date), bodies))
        .collect();
    let output_dir = config.merge_dir(directory, MERGED_BY_DATE_DIR);
    let written = write_merged(&output_dir, &outputs)?;
    log::info!(
        "merged {} file(s) into {} date group(s)",
        groups.files,
        written.len()
    );

    Ok(MergeReport {
        kind: MergeKind::Date,
        output_dir,
        outputs: written,
        files_merged: groups.files,
        warnings: groups.warnings,
    })
}

/// One merged file per product code. Dates are never decoded here.
pub fn merge_by_product(directory: &Path, config: &EngineConfig) -> Result<MergeReport> {
    let (file_names, warnings) = list_input_files_sorted(directory)?.into_parts();
    let groups = group_bodies(directory, &file_names, warnings, |name| {
        product_code(name).map(Some)
    });

    let outputs: Vec<(String, Vec<String>)> = groups
        .bodies
        .into_iter()
        .map(|(product, bodies)| (product_file_name(&product), bodies))
        .collect();
    let output_dir = config.merge_dir(directory, MERGED_BY_PRODUCT_DIR);
    let written = write_merged(&output_dir, &outputs)?;
    log::info!(
        "merged {} file(s) into {} product group(s)",
        groups.files,
        written.len()
    );

    Ok(MergeReport {
        kind: MergeKind::Product,
        output_dir,
        outputs: written,
        files_merged: groups.files,
        warnings: groups.warnings,
    })
}

/// Every file dated within `[start, end]` flattened into a single output.
pub fn merge_by_date_range(
    directory: &Path,
    start: NaiveDate,
    end: NaiveDate,
    config: &EngineConfig,
) -> Result<MergeReport> {
    if start > end {
        return Err(EngineError::InvalidDateRange { start, end });
    }
    let (file_names, warnings) = list_input_files_sorted(directory)?.into_parts();
    let groups = group_bodies(directory, &file_names, warnings, |name| {
        let date = transaction_date(name)?;
        Ok((start..=end).contains(&date).then_some(()))
    });

    let bodies: Vec<String> = groups.bodies.into_values().flatten().collect();
    if bodies.is_empty() {
        return Err(EngineError::NoMatchesInRange { start, end });
    }

    let output_dir = config.merge_dir(directory, MERGED_BY_RANGE_DIR);
    let written = write_merged(&output_dir, &[(range_file_name(start, end), bodies)])?;
    log::info!(
        "merged {} file(s) dated {} to {}",
        groups.files,
        start,
        end
    );

    Ok(MergeReport {
        kind: MergeKind::DateRange,
        output_dir,
        outputs: written,
        files_merged: groups.files,
        warnings: groups.warnings,
    })
}

fn date_file_name(date: NaiveDate) -> String {
    format!("Merged_{}_{}.txt", ALL_PRODUCTS, date.format("%Y%m%d"))
}

fn product_file_name(product: &str) -> String {
    format!("Merged_{}.txt", sanitize_component(product))
}

fn range_file_name(start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "Merged_{}_{}_to_{}.txt",
        ALL_PRODUCTS,
        start.format("%Y%m%d"),
        end.format("%Y%m%d")
    )
}
