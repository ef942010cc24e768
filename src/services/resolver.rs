//! Requested-date to feature-row resolution.

use crate::error::PredictionError;
use crate::types::{FeatureTable, ResolvedSelection};
use chrono::NaiveDate;
use tracing::debug;

/// Select the row to score for `requested`.
///
/// Uses the exact date when present, otherwise the latest date strictly
/// before it. Never looks past the requested date.
pub fn resolve(table: &FeatureTable, requested: NaiveDate) -> Result<ResolvedSelection, PredictionError> {
    if table.is_empty() {
        return Err(PredictionError::EmptyFeatureTable);
    }

    if let Some(row) = table.get(requested) {
        return Ok(ResolvedSelection {
            requested_date: requested,
            effective_date: requested,
            row: *row,
        });
    }

    let row = table
        .last_before(requested)
        .ok_or(PredictionError::NoDataBeforeDate(requested))?;

    debug!("No row for {}, using previous trading day {}", requested, row.date);

    Ok(ResolvedSelection {
        requested_date: requested,
        effective_date: row.date,
        row: *row,
    })
}
