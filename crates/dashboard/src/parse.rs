//! Interpretation of textual requests into typed ones.

use crate::error::{DashboardError, Result};
use data_loader::{Dimension, NumericColumn};
use pipeline::{GroupBy, Metric};

pub fn parse_column(text: &str) -> Result<NumericColumn> {
    text.parse()
        .map_err(|_| DashboardError::UnknownColumn(text.to_string()))
}

pub fn parse_dimension(text: &str) -> Result<Dimension> {
    text.parse()
        .map_err(|_| DashboardError::UnknownDimension(text.to_string()))
}

pub fn parse_group_by(text: &str) -> Result<GroupBy> {
    text.parse()
        .map_err(|_| DashboardError::UnknownGrouping(text.to_string()))
}

pub fn parse_metric(text: &str) -> Result<Metric> {
    text.parse()
        .map_err(|_| DashboardError::UnknownMetric(text.to_string()))
}

/// Split `"A, B,C"` into trimmed non-empty keys.
///
/// Fails when nothing is left, since a combination of no keys is
/// meaningless.
pub fn parse_combination(dimension: Dimension, text: &str) -> Result<Vec<String>> {
    let keys: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();
    if keys.is_empty() {
        return Err(DashboardError::EmptyCombination {
            dimension: dimension.to_string(),
        });
    }
    Ok(keys)
}
