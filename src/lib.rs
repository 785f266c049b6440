//! Consolidation engine for embossing files.
//!
//! Discovers `PersoFile_*` inputs in a directory, decodes product, branch and
//! date from their names, enriches each body row with branch and district
//! reference data and writes one consolidated CSV. The merge operations
//! regroup raw file bodies by date, by product or over a date range.

pub mod config;
pub mod consolidate;
pub mod error;
pub mod filename;
pub mod logging;
pub mod merge;
pub mod models;
pub mod outcome;
pub mod records;
pub mod reference;
pub mod scanner;
pub mod table;
pub mod util;

pub use config::EngineConfig;
pub use consolidate::{consolidate, ConsolidationReport};
pub use error::{EngineError, ErrorClass, Result};
pub use filename::parse_filename;
pub use merge::{merge_by_date, merge_by_date_range, merge_by_product, MergeKind, MergeReport};
pub use models::{BranchRecord, ConsolidatedRecord, FilenameMetadata};
pub use outcome::{Outcome, Warning};
pub use records::parse_records;
pub use reference::{load_catalog, ReferenceCatalog};
pub use scanner::list_input_files;
