use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const UNKNOWN_BRANCH: &str = "Unknown Branch";
pub const UNKNOWN_DISTRICT: &str = "Unknown District";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRecord {
    pub code: String,
    pub name: String,
    pub district: String,
}

impl BranchRecord {
    pub fn unknown(code: &str) -> Self {
        Self {
            code: code.to_string(),
            name: UNKNOWN_BRANCH.to_string(),
            district: UNKNOWN_DISTRICT.to_string(),
        }
    }
}

/// Metadata decoded from an input file name by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameMetadata {
    pub file_name: String,
    pub product_code: String,
    pub branch_code: String,
    pub date_token: String,
    /// `20YY/MM/DD`, built from the token even when it is not a real date.
    pub date_display: String,
    /// `None` when the token is not a valid YYMMDD date.
    pub transaction_date: Option<NaiveDate>,
}

/// One output row: cleaned body fields followed by product code, branch
/// code, branch name, district and date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidatedRecord(Vec<String>);

impl ConsolidatedRecord {
    pub fn new(fields: Vec<String>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }
}
