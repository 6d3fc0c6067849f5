//! Required-column gate, checked once against the declared header.

use tracing::{error, info};

use crate::config::ColumnConfig;
use crate::error::{ReportError, Result};

/// Confirms every required column is declared. Row values are never inspected.
///
/// Missing columns are reported in the order timestamp, elapsed, success,
/// response code.
///
/// ```
/// use report_core::config::ColumnConfig;
/// use report_core::schema::validate_columns;
///
/// let declared = vec!["timeStamp".to_string(), "elapsed".to_string()];
/// let err = validate_columns(&declared, &ColumnConfig::default()).unwrap_err();
/// assert_eq!(err.to_string(), "Missing required columns: success, responseCode");
/// ```
pub fn validate_columns(declared: &[String], columns: &ColumnConfig) -> Result<()> {
    let missing: Vec<String> = columns
        .required()
        .iter()
        .filter(|required| !declared.iter().any(|d| d == *required))
        .map(|required| required.to_string())
        .collect();

    if missing.is_empty() {
        info!("Schema check passed ({} columns declared)", declared.len());
        Ok(())
    } else {
        error!(?missing, "Input is missing required columns");
        Err(ReportError::SchemaViolation { missing })
    }
}
