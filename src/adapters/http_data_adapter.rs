//! HTTP adapter for the remote stock-data service.
//!
//! `GET {base}/stocks?symbol=..&from=..&to=..&columns=a,b` returning a JSON
//! array of objects. One attempt per call; the blocking client's timeout
//! bounds how long a symbol can hold up the run.

use crate::domain::error::StockgridError;
use crate::domain::record::SymbolRecord;
use crate::domain::request::DateRange;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

pub const API_KEY_ENV: &str = "STOCKGRID_API_KEY";

/// Build the request URL with every query value percent-encoded.
pub fn series_url(base_url: &str, symbol: &str, range: &DateRange, columns: &[String]) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("symbol", symbol)
        .append_pair("from", &range.from)
        .append_pair("to", &range.to)
        .append_pair("columns", &columns.join(","))
        .finish();
    format!("{}/stocks?{}", base_url.trim_end_matches('/'), query)
}

/// Decode a response body into records. Anything but an array of objects is
/// a parse failure.
pub fn parse_series(symbol: &str, body: &str) -> Result<Vec<SymbolRecord>, StockgridError> {
    let value: Value = serde_json::from_str(body).map_err(|e| StockgridError::Fetch {
        symbol: symbol.to_string(),
        reason: format!("invalid JSON response: {e}"),
    })?;
    let Value::Array(items) = value else {
        return Err(StockgridError::Fetch {
            symbol: symbol.to_string(),
            reason: "expected a JSON array of records".into(),
        });
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(object) => Ok(SymbolRecord::from_json_object(object)),
            _ => Err(StockgridError::Fetch {
                symbol: symbol.to_string(),
                reason: format!("record {i} is not a JSON object"),
            }),
        })
        .collect()
}

/// Turn a response into records: a non-2xx status is a failure carrying
/// the status code and body, otherwise the body is decoded.
pub fn check_response(
    symbol: &str,
    status: u16,
    body: &str,
) -> Result<Vec<SymbolRecord>, StockgridError> {
    if !(200..300).contains(&status) {
        return Err(StockgridError::Fetch {
            symbol: symbol.to_string(),
            reason: format!("HTTP {status}: {}", body.trim()),
        });
    }
    parse_series(symbol, body)
}

pub struct HttpDataAdapter {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpDataAdapter {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self, StockgridError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("stockgrid/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StockgridError::ConfigInvalid {
                section: "service".into(),
                key: "base_url".into(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim().to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, StockgridError> {
        let base_url = config
            .get_string("service", "base_url")
            .ok_or_else(|| StockgridError::ConfigMissing {
                section: "service".into(),
                key: "base_url".into(),
            })?;
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .or_else(|| config.get_string("service", "api_key"))
            .filter(|k| !k.trim().is_empty());
        let timeout = config.get_int("service", "timeout_secs", 30).max(1) as u64;
        Self::new(&base_url, api_key, Duration::from_secs(timeout))
    }
}

impl DataPort for HttpDataAdapter {
    fn fetch_series(
        &self,
        symbol: &str,
        range: &DateRange,
        columns: &[String],
    ) -> Result<Vec<SymbolRecord>, StockgridError> {
        let url = series_url(&self.base_url, symbol, range, columns);
        tracing::debug!(symbol, url = %url, "fetching series");

        let fetch_err = |reason: String| StockgridError::Fetch {
            symbol: symbol.to_string(),
            reason,
        };

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }
        let response = request.send().map_err(|e| fetch_err(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| fetch_err(e.to_string()))?;
        check_response(symbol, status, &body)
    }
}
