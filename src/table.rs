//! Review view over a consolidated CSV: column projection, filtering,
//! sorting and export of the visible rows with a header.

use crate::error::{EngineError, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Stored columns shown in the review view, in display order.
pub const VIEW_COLUMNS: [usize; 10] = [0, 1, 2, 3, 7, 9, 10, 11, 12, 13];

pub const VIEW_HEADERS: [&str; 10] = [
    "Last 4digit + CVV",
    "PAN",
    "Expire Date",
    "Customer Name",
    "Encrypted PAN",
    "Product Type",
    "Branch Code",
    "Branch Name",
    "District",
    "Request Date",
];

const PRODUCT_COLUMN: usize = 5;
const BRANCH_NAME_COLUMN: usize = 7;
const DISTRICT_COLUMN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// `None` means "all" for the three selectors.
#[derive(Debug, Clone, Default)]
pub struct TableFilter {
    pub product: Option<String>,
    pub branch: Option<String>,
    pub district: Option<String>,
    pub search: Option<String>,
}

impl TableFilter {
    pub fn matches(&self, row: &[String]) -> bool {
        selector_matches(&self.product, cell(row, PRODUCT_COLUMN))
            && selector_matches(&self.branch, cell(row, BRANCH_NAME_COLUMN))
            && selector_matches(&self.district, cell(row, DISTRICT_COLUMN))
            && search_matches(self.search.as_deref(), row)
    }
}

fn cell(row: &[String], column: usize) -> &str {
    row.get(column).map(String::as_str).unwrap_or_default()
}

fn selector_matches(selected: &Option<String>, value: &str) -> bool {
    selected.as_deref().map_or(true, |wanted| wanted == value)
}

fn search_matches(query: Option<&str>, row: &[String]) -> bool {
    let query = match query {
        Some(query) if !query.is_empty() => query.to_lowercase(),
        _ => return true,
    };
    row.iter().any(|cell| cell.to_lowercase().contains(&query))
}

#[derive(Debug, Clone, Default)]
pub struct ConsolidatedTable {
    rows: Vec<Vec<String>>,
}

impl ConsolidatedTable {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(EngineError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "consolidated CSV not found"),
            ));
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|err| EngineError::csv(path, err))?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|err| EngineError::csv(path, err))?;
            rows.push(project(&record));
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn filtered(&self, filter: &TableFilter) -> Vec<&Vec<String>> {
        self.rows.iter().filter(|row| filter.matches(row)).collect()
    }

    pub fn sort_by(&mut self, column: usize, order: SortOrder) {
        if column >= VIEW_COLUMNS.len() {
            return;
        }
        self.rows.sort_by(|a, b| {
            let ord = cell(a, column).cmp(cell(b, column));
            match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
    }

    pub fn products(&self) -> Vec<String> {
        self.distinct(PRODUCT_COLUMN)
    }

    pub fn branches(&self) -> Vec<String> {
        self.distinct(BRANCH_NAME_COLUMN)
    }

    pub fn districts(&self) -> Vec<String> {
        self.distinct(DISTRICT_COLUMN)
    }

    fn distinct(&self, column: usize) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| cell(row, column))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn project(record: &csv::StringRecord) -> Vec<String> {
    VIEW_COLUMNS
        .iter()
        .map(|&index| record.get(index).unwrap_or_default().to_string())
        .collect()
}

/// Writes the header and `rows`; `.csv` is appended to `path` when missing.
pub fn export(path: &Path, rows: &[&Vec<String>]) -> Result<PathBuf> {
    let path = with_csv_extension(path);
    let mut writer = csv::Writer::from_path(&path).map_err(|err| EngineError::csv(&path, err))?;
    writer
        .write_record(VIEW_HEADERS)
        .map_err(|err| EngineError::csv(&path, err))?;
    for row in rows {
        writer
            .write_record(row.iter())
            .map_err(|err| EngineError::csv(&path, err))?;
    }
    writer.flush().map_err(|err| EngineError::io(&path, err))?;
    Ok(path)
}

fn with_csv_extension(path: &Path) -> PathBuf {
    let has_csv = path
        .to_str()
        .map(|text| text.ends_with(".csv"))
        .unwrap_or(false);
    if has_csv {
        path.to_path_buf()
    } else {
        let mut text = path.as_os_str().to_os_string();
        text.push(".csv");
        PathBuf::from(text)
    }
}
