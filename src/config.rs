use std::path::{Path, PathBuf};

pub const DEFAULT_REFERENCE_DIR: &str = "data";
pub const DEFAULT_OUTPUT_CSV: &str = "./output.csv";

pub const MERGED_BY_DATE_DIR: &str = "merged_by_date";
pub const MERGED_BY_PRODUCT_DIR: &str = "merged_by_product";
pub const MERGED_BY_RANGE_DIR: &str = "merged_by_date_range";

/// Locations the engine reads reference data from and writes results to.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub reference_dir: PathBuf,
    pub output_csv: PathBuf,
    /// Parent of the merge subdirectories; the source directory when unset.
    pub merge_root: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reference_dir: PathBuf::from(DEFAULT_REFERENCE_DIR),
            output_csv: PathBuf::from(DEFAULT_OUTPUT_CSV),
            merge_root: None,
        }
    }
}

impl EngineConfig {
    pub fn merge_dir(&self, source: &Path, subdir: &str) -> PathBuf {
        self.merge_root
            .as_deref()
            .unwrap_or(source)
            .join(subdir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_dir_defaults_to_source() {
        let config = EngineConfig::default();
        assert_eq!(
            config.merge_dir(Path::new("in"), MERGED_BY_DATE_DIR),
            Path::new("in").join("merged_by_date")
        );

        let config = EngineConfig {
            merge_root: Some(PathBuf::from("out")),
            ..EngineConfig::default()
        };
        assert_eq!(
            config.merge_dir(Path::new("in"), MERGED_BY_PRODUCT_DIR),
            Path::new("out").join("merged_by_product")
        );
    }
}
