use crate::analyzers::{Aggregator, MonthTable, WeatherBucket};

impl Aggregator<'_> {
    /// Mean `temp_max` per month (rows) and year (columns).
    ///
    /// A month/year slice without records is `None`, never `0.0`.
    pub fn monthly_mean_temp(&self) -> MonthTable<i32, Option<f64>> {
        let years = self.set().years();
        let mut sums = vec![vec![0.0f64; years.len()]; 12];
        let mut counts = vec![vec![0usize; years.len()]; 12];

        for obs in self.set() {
            if let Ok(col) = years.binary_search(&obs.year) {
                sums[obs.month.index()][col] += obs.temp_max;
                counts[obs.month.index()][col] += 1;
            }
        }

        let grid = sums
            .into_iter()
            .zip(counts)
            .map(|(sum_row, count_row)| {
                sum_row
                    .into_iter()
                    .zip(count_row)
                    .map(|(sum, count)| (count > 0).then(|| sum / count as f64))
                    .collect()
            })
            .collect();

        MonthTable::from_grid(years, grid)
    }

    /// Total precipitation per month (rows) and year (columns).
    ///
    /// A sum over no records is `0.0`.
    pub fn monthly_precip_by_year(&self) -> MonthTable<i32, f64> {
        let years = self.set().years();
        let mut grid = vec![vec![0.0f64; years.len()]; 12];

        for obs in self.set() {
            if let Ok(col) = years.binary_search(&obs.year) {
                grid[obs.month.index()][col] += obs.precipitation;
            }
        }

        MonthTable::from_grid(years, grid)
    }

    /// Days per month (rows) and weather category (columns).
    ///
    /// Columns are `categories` in the given order followed by
    /// [`WeatherBucket::Other`], which counts every label outside the list.
    pub fn monthly_weather_counts<S: AsRef<str>>(
        &self,
        categories: &[S],
    ) -> MonthTable<WeatherBucket, u32> {
        let mut columns: Vec<WeatherBucket> = categories
            .iter()
            .map(|c| WeatherBucket::category(c.as_ref()))
            .collect();
        let other = columns.len();
        columns.push(WeatherBucket::Other);

        let mut grid = vec![vec![0u32; columns.len()]; 12];

        for obs in self.set() {
            let col = categories
                .iter()
                .position(|c| c.as_ref() == obs.weather)
                .unwrap_or(other);
            grid[obs.month.index()][col] += 1;
        }

        MonthTable::from_grid(columns, grid)
    }
}
