//! Result of one import run, returned to the caller.

use crate::domain::error::StockgridError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_symbol_analysis: Option<String>,
}

impl ImportReport {
    pub fn success(message: impl Into<String>, single_symbol_analysis: Option<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            single_symbol_analysis,
        }
    }

    pub fn failure(err: &StockgridError) -> Self {
        let message = match err {
            StockgridError::Validation { .. } | StockgridError::CursorResolution { .. } => {
                format!("Import failed: {err}")
            }
            other => format!("Unexpected error while writing to the sheet: {other}"),
        };
        Self {
            success: false,
            message,
            single_symbol_analysis: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case_and_omits_missing_analysis() {
        let report = ImportReport::success("done", None);
        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            r#"{"success":true,"message":"done"}"#
        );

        let report = ImportReport::success("done", Some("Up 3%.".into()));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["singleSymbolAnalysis"], "Up 3%.");
    }

    #[test]
    fn failure_message_names_the_problem() {
        let report = ImportReport::failure(&StockgridError::validation("toDate"));
        assert!(!report.success);
        assert_eq!(report.message, "Import failed: missing required field: toDate");

        let report = ImportReport::failure(&StockgridError::grid("sheet is protected"));
        assert!(report.message.starts_with("Unexpected error"));
    }
}
