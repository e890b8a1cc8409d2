//! Import request types and request validation.

use crate::domain::error::StockgridError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Symbols as supplied by the caller: a list, or one comma-delimited string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SymbolInput {
    List(Vec<String>),
    Delimited(String),
}

impl Default for SymbolInput {
    fn default() -> Self {
        SymbolInput::List(Vec::new())
    }
}

impl SymbolInput {
    /// Split on commas, trim, drop empty tokens. Order and duplicates are kept.
    pub fn normalize(&self) -> Vec<String> {
        let tokens: Box<dyn Iterator<Item = &str>> = match self {
            SymbolInput::List(items) => Box::new(items.iter().flat_map(|s| s.split(','))),
            SymbolInput::Delimited(s) => Box::new(s.split(',')),
        };
        tokens
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl From<&str> for SymbolInput {
    fn from(s: &str) -> Self {
        SymbolInput::Delimited(s.to_string())
    }
}

impl From<Vec<&str>> for SymbolInput {
    fn from(items: Vec<&str>) -> Self {
        SymbolInput::List(items.into_iter().map(str::to_string).collect())
    }
}

/// Inclusive date range, passed to the data service as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub from: String,
    pub to: String,
}

impl DateRange {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.trim().to_string(),
            to: to.trim().to_string(),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.from, self.to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    Summary,
    Swot,
    Outlook,
    Custom,
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnalysisMode::Summary => "summary",
            AnalysisMode::Swot => "swot",
            AnalysisMode::Outlook => "outlook",
            AnalysisMode::Custom => "custom",
        };
        f.write_str(name)
    }
}

impl FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summary" => Ok(AnalysisMode::Summary),
            "swot" => Ok(AnalysisMode::Swot),
            "outlook" => Ok(AnalysisMode::Outlook),
            "custom" => Ok(AnalysisMode::Custom),
            other => Err(format!(
                "unknown analysis mode '{other}' (expected summary, swot, outlook or custom)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub mode: AnalysisMode,
    #[serde(default)]
    pub custom_question: Option<String>,
}

impl AnalysisRequest {
    pub fn new(mode: AnalysisMode) -> Self {
        Self {
            mode,
            custom_question: None,
        }
    }

    pub fn custom(question: &str) -> Self {
        Self {
            mode: AnalysisMode::Custom,
            custom_question: Some(question.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    #[serde(default)]
    pub symbols: SymbolInput,
    #[serde(default)]
    pub from_date: String,
    #[serde(default)]
    pub to_date: String,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub start_cell: Option<String>,
    #[serde(default)]
    pub analysis: Option<AnalysisRequest>,
}

impl ImportRequest {
    pub fn new(symbols: impl Into<SymbolInput>, from_date: &str, to_date: &str) -> Self {
        Self {
            symbols: symbols.into(),
            from_date: from_date.to_string(),
            to_date: to_date.to_string(),
            ..Self::default()
        }
    }

    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_start_cell(mut self, cell: &str) -> Self {
        self.start_cell = Some(cell.to_string());
        self
    }

    pub fn with_analysis(mut self, analysis: AnalysisRequest) -> Self {
        self.analysis = Some(analysis);
        self
    }

    pub fn date_range(&self) -> DateRange {
        DateRange::new(&self.from_date, &self.to_date)
    }

    /// Requested columns with blank entries removed.
    pub fn requested_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Check required fields and return the normalized symbol list.
    pub fn validate(&self) -> Result<Vec<String>, StockgridError> {
        let symbols = self.symbols.normalize();
        if symbols.is_empty() {
            return Err(StockgridError::validation("symbols"));
        }
        if self.from_date.trim().is_empty() {
            return Err(StockgridError::validation("fromDate"));
        }
        if self.to_date.trim().is_empty() {
            return Err(StockgridError::validation("toDate"));
        }
        if self.requested_columns().is_empty() {
            return Err(StockgridError::validation("columns"));
        }
        if let Some(analysis) = &self.analysis {
            let question_missing = analysis
                .custom_question
                .as_deref()
                .is_none_or(|q| q.trim().is_empty());
            if analysis.mode == AnalysisMode::Custom && question_missing {
                return Err(StockgridError::validation("analysis.customQuestion"));
            }
        }
        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ImportRequest {
        ImportRequest::new("AAA", "2025-01-01", "2025-01-05").with_columns(&["Open", "Close"])
    }

    #[test]
    fn delimited_symbols_are_split_trimmed_and_keep_duplicates() {
        let input = SymbolInput::from(" AAA, ,BBB,AAA ,");
        assert_eq!(input.normalize(), vec!["AAA", "BBB", "AAA"]);
    }

    #[test]
    fn list_symbols_drop_blank_entries() {
        let input = SymbolInput::from(vec!["AAA", "  ", "bbb"]);
        assert_eq!(input.normalize(), vec!["AAA", "bbb"]);
    }

    #[test]
    fn validate_returns_normalized_symbols() {
        let request = ImportRequest {
            symbols: SymbolInput::from("AAA,BBB"),
            ..valid()
        };
        assert_eq!(request.validate().unwrap(), vec!["AAA", "BBB"]);
    }

    #[test]
    fn validate_rejects_missing_fields() {
        let cases = [
            (
                ImportRequest {
                    symbols: SymbolInput::from(" , "),
                    ..valid()
                },
                "symbols",
            ),
            (
                ImportRequest {
                    from_date: " ".into(),
                    ..valid()
                },
                "fromDate",
            ),
            (
                ImportRequest {
                    to_date: String::new(),
                    ..valid()
                },
                "toDate",
            ),
            (
                ImportRequest {
                    columns: vec!["".into()],
                    ..valid()
                },
                "columns",
            ),
        ];
        for (request, field) in cases {
            match request.validate() {
                Err(StockgridError::Validation { field: f }) => assert_eq!(f, field),
                other => panic!("expected validation error for {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn custom_analysis_requires_question() {
        let request = valid().with_analysis(AnalysisRequest::new(AnalysisMode::Custom));
        assert!(matches!(
            request.validate(),
            Err(StockgridError::Validation { .. })
        ));

        let request = valid().with_analysis(AnalysisRequest::custom("Is it volatile?"));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn deserializes_camel_case_json_with_delimited_symbols() {
        let json = r#"{
            "symbols": "AAA, BBB",
            "fromDate": "2025-01-01",
            "toDate": "2025-01-05",
            "columns": ["Open", "Close"],
            "startCell": "B3",
            "analysis": {"mode": "swot"}
        }"#;
        let request: ImportRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.symbols.normalize(), vec!["AAA", "BBB"]);
        assert_eq!(request.start_cell.as_deref(), Some("B3"));
        assert_eq!(
            request.analysis,
            Some(AnalysisRequest::new(AnalysisMode::Swot))
        );
    }

    #[test]
    fn analysis_mode_parses_case_insensitively() {
        assert_eq!("Outlook".parse::<AnalysisMode>(), Ok(AnalysisMode::Outlook));
        assert!("forecast".parse::<AnalysisMode>().is_err());
    }
}
