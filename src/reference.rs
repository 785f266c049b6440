use crate::error::{EngineError, Result};
use crate::models::{BranchRecord, UNKNOWN_DISTRICT};
use crate::outcome::{Outcome, Warning};
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

pub const BRANCHES_FILE: &str = "branches.json";
pub const DISTRICTS_FILE: &str = "districts.json";

/// Branch code to `{name, district}` lookup, built once per run.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCatalog {
    branches: HashMap<String, BranchRecord>,
}

impl ReferenceCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_tables(
        names: &BTreeMap<String, String>,
        districts: &BTreeMap<String, Vec<String>>,
    ) -> Self {
        let branches = names
            .iter()
            .map(|(code, name)| {
                let district = district_for(districts, code).unwrap_or(UNKNOWN_DISTRICT);
                let record = BranchRecord {
                    code: code.clone(),
                    name: name.clone(),
                    district: district.to_string(),
                };
                (code.clone(), record)
            })
            .collect();
        Self { branches }
    }

    /// Unknown codes resolve to the "Unknown" sentinel record.
    pub fn lookup(&self, code: &str) -> BranchRecord {
        self.branches
            .get(code)
            .cloned()
            .unwrap_or_else(|| BranchRecord::unknown(code))
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}

fn district_for<'a>(districts: &'a BTreeMap<String, Vec<String>>, code: &str) -> Option<&'a str> {
    districts
        .iter()
        .find(|(_, codes)| codes.iter().any(|member| member.trim() == code))
        .map(|(district, _)| district.as_str())
}

/// Loads both reference tables from `reference_dir`. Any failure leaves the
/// catalog empty and is reported as a `MissingReferenceData` warning.
pub fn load_catalog(reference_dir: &Path) -> Outcome<ReferenceCatalog> {
    let names = read_table::<BTreeMap<String, String>>(&reference_dir.join(BRANCHES_FILE));
    let districts =
        read_table::<BTreeMap<String, Vec<String>>>(&reference_dir.join(DISTRICTS_FILE));

    match (names, districts) {
        (Ok(names), Ok(districts)) => {
            let catalog = ReferenceCatalog::from_tables(&names, &districts);
            log::debug!(
                "loaded {} branch(es) across {} district(s) from {}",
                catalog.len(),
                districts.len(),
                reference_dir.display()
            );
            Outcome::clean(catalog)
        }
        (names, districts) => {
            let warnings = [names.err(), districts.err()]
                .into_iter()
                .flatten()
                .map(Warning::general)
                .collect();
            Outcome::with_warnings(ReferenceCatalog::empty(), warnings)
        }
    }
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let missing = |reason: String| EngineError::MissingReferenceData {
        path: path.to_path_buf(),
        reason,
    };
    let text = std::fs::read_to_string(path).map_err(|err| missing(err.to_string()))?;
    serde_json::from_str(&text).map_err(|err| missing(err.to_string()))
}
