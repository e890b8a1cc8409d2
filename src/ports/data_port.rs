//! Remote time-series data port.

use crate::domain::error::StockgridError;
use crate::domain::record::SymbolRecord;
use crate::domain::request::DateRange;

pub trait DataPort {
    /// Fetch all records for one symbol. A single attempt; an empty vector
    /// means the service had no data for the range.
    fn fetch_series(
        &self,
        symbol: &str,
        range: &DateRange,
        columns: &[String],
    ) -> Result<Vec<SymbolRecord>, StockgridError>;
}
