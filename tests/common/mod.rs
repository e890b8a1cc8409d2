#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use stockgrid::domain::error::StockgridError;
use stockgrid::domain::record::SymbolRecord;
use stockgrid::domain::request::{DateRange, ImportRequest};
use stockgrid::ports::ai_port::AiPort;
use stockgrid::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<SymbolRecord>>,
    pub errors: HashMap<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_records(mut self, symbol: &str, records: Vec<SymbolRecord>) -> Self {
        self.data.insert(symbol.to_string(), records);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(
        &self,
        symbol: &str,
        _range: &DateRange,
        _columns: &[String],
    ) -> Result<Vec<SymbolRecord>, StockgridError> {
        self.calls.lock().unwrap().push(symbol.to_string());
        if let Some(reason) = self.errors.get(symbol) {
            return Err(StockgridError::Fetch {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }
}

/// Answers every prompt with a fixed reply, or fails with a fixed reason.
pub struct MockAiPort {
    pub reply: Result<String, String>,
    pub prompts: Mutex<Vec<String>>,
}

impl MockAiPort {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            reply: Err(reason.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl AiPort for MockAiPort {
    fn summarize(&self, prompt: &str) -> Result<String, StockgridError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(|reason| StockgridError::Analysis { reason })
    }
}

pub fn make_record(date: &str, close: f64) -> SymbolRecord {
    SymbolRecord::new().with("Date", date).with("Close", close)
}

/// `count` consecutive daily records starting at 2025-01-02.
pub fn make_records(count: usize) -> Vec<SymbolRecord> {
    (0..count)
        .map(|i| make_record(&format!("2025-01-{:02}", i + 2), 100.0 + i as f64))
        .collect()
}

pub fn sample_request(symbols: &str) -> ImportRequest {
    ImportRequest::new(symbols, "2025-01-01", "2025-01-31").with_columns(&["Date", "Close"])
}
