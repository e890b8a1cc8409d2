//! Remote AI text-generation port.

use crate::domain::error::StockgridError;

pub trait AiPort {
    /// Generate free text for `prompt`.
    ///
    /// Implementations return service-level error envelopes as `Ok` text;
    /// `Err` is reserved for transport and decoding failures.
    fn summarize(&self, prompt: &str) -> Result<String, StockgridError>;
}

/// Port used when no AI service is configured. Every call fails, which the
/// orchestrator turns into annotation text.
pub struct DisabledAi;

impl AiPort for DisabledAi {
    fn summarize(&self, _prompt: &str) -> Result<String, StockgridError> {
        Err(StockgridError::Analysis {
            reason: "AI service is not configured".into(),
        })
    }
}
