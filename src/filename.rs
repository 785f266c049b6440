use crate::error::{EngineError, Result};
use crate::models::FilenameMetadata;
use crate::util::slice_chars;
use chrono::NaiveDate;

const MIN_SEGMENTS: usize = 5;

/// Decodes `PersoFile_<ignored>_<product>_<branch>_<YYMMDD...>.<ext>`.
///
/// Only the segment count is fatal here. A date token that is not a real
/// YYMMDD date still yields a display string; `transaction_date` is `None`.
pub fn parse_filename(file_name: &str) -> Result<FilenameMetadata> {
    let parts: Vec<&str> = file_name.split('_').collect();
    if parts.len() < MIN_SEGMENTS {
        return Err(EngineError::InvalidFilenameShape {
            file_name: file_name.to_string(),
            segments: parts.len(),
        });
    }

    let date_token = parts[4].split('.').next().unwrap_or_default().to_string();
    let date_display = format!(
        "20{}/{}/{}",
        slice_chars(&date_token, 0, Some(2)),
        slice_chars(&date_token, 2, Some(4)),
        slice_chars(&date_token, 4, None)
    );
    let transaction_date = parse_date_token(&date_token);

    Ok(FilenameMetadata {
        file_name: file_name.to_string(),
        product_code: parts[2].to_string(),
        branch_code: parts[3].to_string(),
        date_token,
        date_display,
        transaction_date,
    })
}

/// Product code only; used by the product merge, which never decodes dates.
pub fn product_code(file_name: &str) -> Result<String> {
    parse_filename(file_name).map(|meta| meta.product_code)
}

/// Calendar date for date-based grouping.
pub fn transaction_date(file_name: &str) -> Result<NaiveDate> {
    let meta = parse_filename(file_name)?;
    meta.transaction_date
        .ok_or_else(|| EngineError::InvalidDateToken {
            file_name: file_name.to_string(),
            token: meta.date_token,
        })
}

fn parse_date_token(token: &str) -> Option<NaiveDate> {
    if token.len() != 6 || !token.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    let year: i32 = token[0..2].parse().ok()?;
    let month: u32 = token[2..4].parse().ok()?;
    let day: u32 = token[4..6].parse().ok()?;
    NaiveDate::from_ymd_opt(2000 + year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;

    #[test]
    fn decodes_product_branch_and_date() {
        let meta = parse_filename("PersoFile_X_PROD_BR01_240115.ext").unwrap();
        assert_eq!(meta.product_code, "PROD");
        assert_eq!(meta.branch_code, "BR01");
        assert_eq!(meta.date_token, "240115");
        assert_eq!(meta.date_display, "2024/01/15");
        assert_eq!(
            meta.transaction_date,
            Some(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
    }

    #[test]
    fn extra_segments_are_ignored() {
        let meta = parse_filename("PersoFile_A_GAMTA_0042_231231_rerun.txt").unwrap();
        assert_eq!(meta.product_code, "GAMTA");
        assert_eq!(meta.branch_code, "0042");
        assert_eq!(meta.date_display, "2023/12/31");
    }

    #[test]
    fn too_few_segments_is_a_shape_error() {
        let err = parse_filename("PersoFile_X_PROD_BR01.txt").unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidFilenameShape { segments: 4, .. }
        ));
        assert_eq!(err.class(), ErrorClass::PerFile);
    }

    #[test]
    fn bad_date_keeps_display_but_no_calendar_date() {
        let meta = parse_filename("PersoFile_X_PROD_BR01_241345.txt").unwrap();
        assert_eq!(meta.date_display, "2024/13/45");
        assert_eq!(meta.transaction_date, None);

        let short = parse_filename("PersoFile_X_PROD_BR01_2401.txt").unwrap();
        assert_eq!(short.date_display, "2024/01/");
        assert_eq!(short.transaction_date, None);
    }

    #[test]
    fn transaction_date_reports_invalid_token() {
        let err = transaction_date("PersoFile_X_PROD_BR01_abcdef.txt").unwrap_err();
        match err {
            EngineError::InvalidDateToken { token, .. } => assert_eq!(token, "abcdef"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(
            transaction_date("PersoFile_X_PROD_BR01_240116").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()
        );
    }

    #[test]
    fn product_code_needs_five_segments() {
        assert_eq!(product_code("PersoFile_X_HAIFB_BR01_zz.txt").unwrap(), "HAIFB");
        assert!(product_code("PersoFile_X_HAIFB").is_err());
    }
}
