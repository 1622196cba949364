use serde::{Serialize, Serializer};
use std::fmt;

use crate::models::Month;
use crate::utils::constants::OTHER_BUCKET;

/// Month-indexed table: always twelve rows, Jan..Dec, one value per column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTable<C, V> {
    columns: Vec<C>,
    rows: Vec<MonthRow<V>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthRow<V> {
    pub month: Month,
    pub values: Vec<V>,
}

impl<C: PartialEq, V> MonthTable<C, V> {
    /// Build from a 12 x columns grid indexed by `Month::index()`
    pub(crate) fn from_grid(columns: Vec<C>, grid: Vec<Vec<V>>) -> Self {
        debug_assert_eq!(grid.len(), 12);
        let rows = Month::ALL
            .into_iter()
            .zip(grid)
            .map(|(month, values)| MonthRow { month, values })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[C] {
        &self.columns
    }

    pub fn rows(&self) -> &[MonthRow<V>] {
        &self.rows
    }

    /// Month axis, always Jan..Dec
    pub fn months(&self) -> impl Iterator<Item = Month> + '_ {
        self.rows.iter().map(|r| r.month)
    }

    pub fn row(&self, month: Month) -> &MonthRow<V> {
        &self.rows[month.index()]
    }

    pub fn get(&self, month: Month, column: &C) -> Option<&V> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows[month.index()].values.get(col)
    }

    /// One column across all months, e.g. a single line of a line chart
    pub fn column(&self, column: &C) -> Option<Vec<&V>> {
        let col = self.columns.iter().position(|c| c == column)?;
        Some(self.rows.iter().map(|r| &r.values[col]).collect())
    }

    /// Keep only the columns matching `keep`, preserving their order
    pub fn retain_columns(self, mut keep: impl FnMut(&C) -> bool) -> Self {
        let mask: Vec<bool> = self.columns.iter().map(&mut keep).collect();

        let columns = self
            .columns
            .into_iter()
            .zip(&mask)
            .filter_map(|(c, &k)| k.then_some(c))
            .collect();

        let rows = self
            .rows
            .into_iter()
            .map(|row| MonthRow {
                month: row.month,
                values: row
                    .values
                    .into_iter()
                    .zip(&mask)
                    .filter_map(|(v, &k)| k.then_some(v))
                    .collect(),
            })
            .collect();

        Self { columns, rows }
    }
}

/// Column of the weather-count table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WeatherBucket {
    Category(String),
    /// Labels outside the caller's vocabulary
    Other,
}

impl WeatherBucket {
    pub fn category(label: impl Into<String>) -> Self {
        WeatherBucket::Category(label.into())
    }

    pub fn label(&self) -> &str {
        match self {
            WeatherBucket::Category(label) => label,
            WeatherBucket::Other => OTHER_BUCKET,
        }
    }
}

impl fmt::Display for WeatherBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for WeatherBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
