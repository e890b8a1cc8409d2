//! Prompt construction for the AI text service.

use crate::domain::record::SymbolRecord;
use crate::domain::request::{AnalysisMode, AnalysisRequest, DateRange};

fn instruction(analysis: &AnalysisRequest) -> String {
    match analysis.mode {
        AnalysisMode::Summary => {
            "Write a concise summary (3-4 sentences) of the price action and trading volume over this period.".to_string()
        }
        AnalysisMode::Swot => {
            "Based on this data, give a brief SWOT analysis (strengths, weaknesses, opportunities, threats) for the stock.".to_string()
        }
        AnalysisMode::Outlook => {
            "Based on this data, describe the short-term outlook for the stock in a few sentences. Note that this is not financial advice.".to_string()
        }
        AnalysisMode::Custom => format!(
            "Answer the following question using this data: {}",
            analysis.custom_question.as_deref().unwrap_or_default().trim()
        ),
    }
}

/// Render the prompt for one symbol's records.
pub fn build_prompt(
    symbol: &str,
    range: &DateRange,
    records: &[SymbolRecord],
    analysis: &AnalysisRequest,
) -> String {
    let data = serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string());
    format!(
        "You are a financial analyst. Below is stock data for {symbol} from {from} to {to}.\n\n\
         {data}\n\n\
         {instruction}\n\
         Reply in plain text without markdown.",
        from = range.from,
        to = range.to,
        instruction = instruction(analysis),
    )
}
