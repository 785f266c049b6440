use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::models::ConsolidatedRecord;
use crate::outcome::Warning;
use crate::records::parse_records;
use crate::reference::load_catalog;
use crate::scanner::{list_input_files_sorted, read_body};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct ConsolidationReport {
    pub output_path: PathBuf,
    pub files_scanned: usize,
    pub files_contributing: usize,
    pub records_written: usize,
    pub warnings: Vec<Warning>,
}

impl ConsolidationReport {
    pub fn status_message(&self) -> String {
        format!(
            "All data has been processed and saved to '{}'.",
            self.output_path.display()
        )
    }

    pub fn files_skipped(&self) -> usize {
        self.files_scanned - self.files_contributing
    }
}

/// Scans `directory`, parses every embossing file and writes one headerless
/// CSV to `config.output_csv`. Bad files are skipped and reported as warnings.
pub fn consolidate(directory: &Path, config: &EngineConfig) -> Result<ConsolidationReport> {
    let (file_names, mut warnings) = list_input_files_sorted(directory)?.into_parts();
    let mut report = consolidate_files(directory, &file_names, config)?;
    warnings.append(&mut report.warnings);
    report.warnings = warnings;
    Ok(report)
}

/// Consolidates the given names from `directory`. A name that cannot be
/// read contributes no rows and becomes an `Io` warning.
fn consolidate_files(
    directory: &Path,
    file_names: &[String],
    config: &EngineConfig,
) -> Result<ConsolidationReport> {
    let (catalog, mut warnings) = load_catalog(&config.reference_dir).into_parts();
    if catalog.is_empty() {
        log::debug!("reference catalog is empty; branches resolve to Unknown");
    }

    let mut records: Vec<ConsolidatedRecord> = Vec::new();
    let mut files_contributing = 0usize;
    for file_name in file_names {
        let parsed = read_body(directory, file_name)
            .and_then(|body| parse_records(file_name, &body, &catalog));
        match parsed {
            Ok(rows) => {
                log::debug!("{}: {} record(s)", file_name, rows.len());
                files_contributing += 1;
                records.extend(rows);
            }
            Err(err) => warnings.push(Warning::for_file(file_name, err)),
        }
    }

    write_records(&config.output_csv, &records)?;
    log::info!(
        "consolidated {} record(s) from {} of {} file(s) into {}",
        records.len(),
        files_contributing,
        file_names.len(),
        config.output_csv.display()
    );

    Ok(ConsolidationReport {
        output_path: config.output_csv.clone(),
        files_scanned: file_names.len(),
        files_contributing,
        records_written: records.len(),
        warnings,
    })
}

/// Rows differ in width, so the writer runs in flexible mode without headers.
pub fn write_records(path: &Path, records: &[ConsolidatedRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|err| EngineError::io(parent, err))?;
    }
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|err| EngineError::csv(path, err))?;
    for record in records {
        writer
            .write_record(record.fields())
            .map_err(|err| EngineError::csv(path, err))?;
    }
    writer.flush().map_err(|err| EngineError::io(path, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use crate::outcome::count_by_class;
    use crate::reference::{BRANCHES_FILE, DISTRICTS_FILE};
    use tempfile::tempdir;

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .unwrap();
        reader
            .records()
            .map(|row| row.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    fn setup() -> (tempfile::TempDir, PathBuf, EngineConfig) {
        let root = tempdir().unwrap();
        let source = root.path().join("source");
        let reference = root.path().join("data");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::create_dir_all(&reference).unwrap();
        std::fs::write(
            reference.join(BRANCHES_FILE),
            r#"{"BR01": "Main Branch", "BR02": "Airport"}"#,
        )
        .unwrap();
        std::fs::write(
            reference.join(DISTRICTS_FILE),
            r#"{"ADAMA DISTRICT": ["BR01"], "HEAD OFFICE": ["BR02"]}"#,
        )
        .unwrap();
        let config = EngineConfig {
            reference_dir: reference,
            output_csv: root.path().join("out").join("output.csv"),
            merge_root: None,
        };
        (root, source, config)
    }

    #[test]
    fn one_row_per_single_line_file() {
        let (_root, source, config) = setup();
        std::fs::write(source.join("PersoFile_A_GAMTA_BR01_240115.txt"), "1111,AAA\n").unwrap();
        std::fs::write(source.join("PersoFile_B_HAIFB_BR02_240116.txt"), "2222,BBB\n").unwrap();
        std::fs::write(source.join("PersoFile_C_GAMTA_BR09_240117.txt"), "3333,CCC\n").unwrap();

        let report = consolidate(&source, &config).unwrap();
        assert_eq!(report.files_scanned, 3);
        assert_eq!(report.files_contributing, 3);
        assert_eq!(report.records_written, 3);
        assert!(report.warnings.is_empty());

        let rows = read_rows(&config.output_csv);
        assert_eq!(
            rows[0],
            vec!["1111", "AAA", "GAMTA", "BR01", "Main Branch", "ADAMA DISTRICT", "2024/01/15"]
        );
        assert_eq!(
            rows[1],
            vec!["2222", "BBB", "HAIFB", "BR02", "Airport", "HEAD OFFICE", "2024/01/16"]
        );
        assert_eq!(rows[2][4], "Unknown Branch");
        assert_eq!(rows[2][5], "Unknown District");
    }

    #[test]
    fn malformed_names_are_skipped_without_changing_count() {
        let (_root, source, config) = setup();
        std::fs::write(source.join("PersoFile_A_GAMTA_BR01_240115.txt"), "1,2\n3,4\n").unwrap();
        std::fs::write(source.join("PersoFile_short.txt"), "5,6\n").unwrap();

        let report = consolidate(&source, &config).unwrap();
        assert_eq!(report.records_written, 2);
        assert_eq!(report.files_skipped(), 1);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].class(), ErrorClass::PerFile);
        assert_eq!(
            report.warnings[0].file_name.as_deref(),
            Some("PersoFile_short.txt")
        );
    }

    #[test]
    fn empty_catalog_still_consolidates() {
        let (_root, source, mut config) = setup();
        config.reference_dir = source.join("no-reference-here");
        std::fs::write(source.join("PersoFile_A_GAMTA_BR01_240115.txt"), "x\n").unwrap();

        let report = consolidate(&source, &config).unwrap();
        assert_eq!(report.records_written, 1);
        assert_eq!(report.warnings.len(), 2);
        assert!(report
            .warnings
            .iter()
            .all(|warning| warning.class() == ErrorClass::Reference));

        let rows = read_rows(&config.output_csv);
        assert_eq!(
            rows[0],
            vec!["x", "GAMTA", "BR01", "Unknown Branch", "Unknown District", "2024/01/15"]
        );
        assert!(report.status_message().contains("output.csv"));
    }

    #[test]
    fn unreadable_file_is_skipped_and_others_contribute() {
        let (_root, source, config) = setup();
        std::fs::write(source.join("PersoFile_A_GAMTA_BR01_240115.txt"), "1,2\n").unwrap();
        std::fs::write(source.join("PersoFile_C_GAMTA_BR02_240116.txt"), "3,4\n").unwrap();
        // listed by the scan but gone by the time it is read
        let names = vec![
            "PersoFile_A_GAMTA_BR01_240115.txt".to_string(),
            "PersoFile_B_GAMTA_BR01_240115.txt".to_string(),
            "PersoFile_C_GAMTA_BR02_240116.txt".to_string(),
        ];

        let report = consolidate_files(&source, &names, &config).unwrap();
        assert_eq!(report.files_scanned, 3);
        assert_eq!(report.files_contributing, 2);
        assert_eq!(report.records_written, 2);
        assert_eq!(count_by_class(&report.warnings, ErrorClass::Io), 1);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(
            report.warnings[0].file_name.as_deref(),
            Some("PersoFile_B_GAMTA_BR01_240115.txt")
        );
        assert_eq!(read_rows(&config.output_csv).len(), 2);
    }

    #[test]
    fn legacy_encoded_body_keeps_its_records() {
        let (_root, source, config) = setup();
        std::fs::write(
            source.join("PersoFile_A_GAMTA_BR01_240115.txt"),
            b"1111,ABEB\xc9 KEBEDE\n2222,OK\n",
        )
        .unwrap();

        let report = consolidate(&source, &config).unwrap();
        assert_eq!(report.records_written, 2);
        assert!(report.warnings.is_empty());
        let rows = read_rows(&config.output_csv);
        assert!(rows[0][1].starts_with("ABEB"));
        assert_eq!(rows[1][0], "2222");
    }

    #[test]
    fn directory_conditions_stop_early() {
        let (_root, source, config) = setup();
        let err = consolidate(&source.join("missing"), &config).unwrap_err();
        assert_eq!(err.class(), ErrorClass::DirectoryNotFound);

        let err = consolidate(&source, &config).unwrap_err();
        assert_eq!(err.class(), ErrorClass::EmptyOrNoMatches);
        assert!(!config.output_csv.exists());
    }

    #[test]
    fn output_write_failure_is_fatal() {
        let (_root, source, mut config) = setup();
        std::fs::write(source.join("PersoFile_A_GAMTA_BR01_240115.txt"), "x\n").unwrap();
        // a directory where the output file should go
        config.output_csv = source.clone();

        let err = consolidate(&source, &config).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Io);
    }
}
