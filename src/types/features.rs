use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Number of model input columns.
pub const FEATURE_COUNT: usize = 8;

/// Model input column, in the order every scorer expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureName {
    Close,
    Ma10,
    Ma50,
    Ma100,
    DailyReturn,
    Volatility10,
    Rsi14,
    Macd,
}

impl FeatureName {
    /// All columns in model order.
    pub const ALL: [FeatureName; FEATURE_COUNT] = [
        FeatureName::Close,
        FeatureName::Ma10,
        FeatureName::Ma50,
        FeatureName::Ma100,
        FeatureName::DailyReturn,
        FeatureName::Volatility10,
        FeatureName::Rsi14,
        FeatureName::Macd,
    ];

    /// Column position in a feature vector.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureName::Close => "close",
            FeatureName::Ma10 => "ma10",
            FeatureName::Ma50 => "ma50",
            FeatureName::Ma100 => "ma100",
            FeatureName::DailyReturn => "daily_return",
            FeatureName::Volatility10 => "volatility10",
            FeatureName::Rsi14 => "rsi14",
            FeatureName::Macd => "macd",
        }
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered model input vector.
pub type FeatureVector = [f64; FEATURE_COUNT];

/// Fully populated feature values for one trading day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow {
    pub date: NaiveDate,
    values: FeatureVector,
}

impl FeatureRow {
    /// Returns `None` unless every value is finite.
    pub fn new(date: NaiveDate, values: FeatureVector) -> Option<Self> {
        values
            .iter()
            .all(|v| v.is_finite())
            .then_some(Self { date, values })
    }

    pub fn get(&self, name: FeatureName) -> f64 {
        self.values[name.index()]
    }

    pub fn close(&self) -> f64 {
        self.get(FeatureName::Close)
    }

    pub fn values(&self) -> &FeatureVector {
        &self.values
    }

    /// Named view of the values, serialized as a map in column order.
    pub fn snapshot(&self) -> FeatureSnapshot {
        FeatureSnapshot(self.values)
    }
}

/// Feature values keyed by column name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSnapshot(FeatureVector);

impl FeatureSnapshot {
    pub fn get(&self, name: FeatureName) -> f64 {
        self.0[name.index()]
    }
}

impl Serialize for FeatureSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for name in FeatureName::ALL {
            map.serialize_entry(name.as_str(), &self.0[name.index()])?;
        }
        map.end()
    }
}

/// Feature rows keyed by date, ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    rows: BTreeMap<NaiveDate, FeatureRow>,
}

impl FeatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row, replacing any row already stored for its date.
    pub fn insert(&mut self, row: FeatureRow) {
        self.rows.insert(row.date, row);
    }

    pub fn get(&self, date: NaiveDate) -> Option<&FeatureRow> {
        self.rows.get(&date)
    }

    /// Latest row dated strictly before `date`.
    pub fn last_before(&self, date: NaiveDate) -> Option<&FeatureRow> {
        self.rows.range(..date).next_back().map(|(_, row)| row)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&FeatureRow> {
        self.rows.values().next()
    }

    pub fn last(&self) -> Option<&FeatureRow> {
        self.rows.values().next_back()
    }

    /// Rows in ascending date order.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &FeatureRow> + '_ {
        self.rows.values()
    }
}

impl FromIterator<FeatureRow> for FeatureTable {
    fn from_iter<I: IntoIterator<Item = FeatureRow>>(iter: I) -> Self {
        let mut table = FeatureTable::new();
        for row in iter {
            table.insert(row);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn row(d: u32, close: f64) -> FeatureRow {
        let mut values = [1.0; FEATURE_COUNT];
        values[FeatureName::Close.index()] = close;
        FeatureRow::new(day(d), values).unwrap()
    }

    #[test]
    fn test_feature_order_is_fixed() {
        let names: Vec<_> = FeatureName::ALL.iter().map(|n| n.as_str()).collect();
        assert_eq!(
            names,
            ["close", "ma10", "ma50", "ma100", "daily_return", "volatility10", "rsi14", "macd"]
        );
        for (i, name) in FeatureName::ALL.iter().enumerate() {
            assert_eq!(name.index(), i);
        }
    }

    #[test]
    fn test_row_rejects_non_finite() {
        let mut values = [1.0; FEATURE_COUNT];
        values[3] = f64::NAN;
        assert!(FeatureRow::new(day(1), values).is_none());
        values[3] = f64::INFINITY;
        assert!(FeatureRow::new(day(1), values).is_none());
    }

    #[test]
    fn test_snapshot_serializes_in_column_order() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let row = FeatureRow::new(day(1), values).unwrap();
        let json = serde_json::to_string(&row.snapshot()).unwrap();
        assert_eq!(
            json,
            r#"{"close":1.0,"ma10":2.0,"ma50":3.0,"ma100":4.0,"daily_return":5.0,"volatility10":6.0,"rsi14":7.0,"macd":8.0}"#
        );
    }

    #[test]
    fn test_table_is_date_ordered() {
        let table: FeatureTable = vec![row(5, 5.0), row(1, 1.0), row(3, 3.0)].into_iter().collect();
        let dates: Vec<_> = table.rows().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(1), day(3), day(5)]);
        assert_eq!(table.first().unwrap().date, day(1));
        assert_eq!(table.last().unwrap().date, day(5));
    }

    #[test]
    fn test_last_before_is_strict() {
        let table: FeatureTable = vec![row(1, 1.0), row(3, 3.0)].into_iter().collect();
        assert_eq!(table.last_before(day(3)).unwrap().date, day(1));
        assert_eq!(table.last_before(day(4)).unwrap().date, day(3));
        assert!(table.last_before(day(1)).is_none());
    }
}
