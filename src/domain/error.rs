//! Domain error types.

/// Top-level error type for stockgrid.
#[derive(Debug, thiserror::Error)]
pub enum StockgridError {
    #[error("missing required field: {field}")]
    Validation { field: String },

    #[error("cannot resolve start cell {address:?}: {reason}")]
    CursorResolution { address: String, reason: String },

    #[error("fetch failed for {symbol}: {reason}")]
    Fetch { symbol: String, reason: String },

    #[error("analysis failed: {reason}")]
    Analysis { reason: String },

    #[error("sheet error: {reason}")]
    Grid { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StockgridError {
    pub fn validation(field: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
        }
    }

    pub fn grid(reason: impl Into<String>) -> Self {
        Self::Grid {
            reason: reason.into(),
        }
    }

    /// Underlying reason for in-sheet error text, without the prefix the
    /// surrounding cell text already carries.
    pub fn failure_text(&self) -> String {
        match self {
            Self::Fetch { reason, .. } | Self::Analysis { reason } => reason.clone(),
            other => other.to_string(),
        }
    }

    /// Errors that abort a whole import run rather than a single symbol.
    pub fn is_fatal_to_run(&self) -> bool {
        !matches!(self, Self::Fetch { .. } | Self::Analysis { .. })
    }
}

impl From<&StockgridError> for std::process::ExitCode {
    fn from(err: &StockgridError) -> Self {
        let code: u8 = match err {
            StockgridError::Io(_) | StockgridError::Grid { .. } => 1,
            StockgridError::ConfigParse { .. }
            | StockgridError::ConfigMissing { .. }
            | StockgridError::ConfigInvalid { .. } => 2,
            StockgridError::Validation { .. } | StockgridError::CursorResolution { .. } => 3,
            StockgridError::Fetch { .. } => 4,
            StockgridError::Analysis { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
