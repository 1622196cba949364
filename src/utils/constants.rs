/// Dashboard defaults
pub const DEFAULT_YEAR: i32 = 2012;
pub const DEFAULT_COMPARE_YEARS: [i32; 4] = [2012, 2013, 2014, 2015];

/// Month-day labels sampled for the wind comparison
pub const DEFAULT_CHECKPOINTS: [&str; 6] = ["Jan 01", "Mar 01", "May 01", "Jul 01", "Sep 01", "Nov 01"];

/// Weather categories broken out per month
pub const DEFAULT_CATEGORIES: [&str; 5] = ["drizzle", "fog", "rain", "snow", "sun"];

/// Label of the bucket collecting categories outside the vocabulary
pub const OTHER_BUCKET: &str = "other";

/// Expected CSV header of the record store
pub const CSV_COLUMNS: [&str; 6] = ["date", "precipitation", "temp_max", "temp_min", "wind", "weather"];

/// Accepted date layouts (date-times keep only their date part)
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Plausibility limits used by the integrity checker
pub const MIN_PLAUSIBLE_TEMP: f64 = -50.0;
pub const MAX_PLAUSIBLE_TEMP: f64 = 50.0;
pub const MAX_PLAUSIBLE_PRECIP: f64 = 500.0;
pub const MAX_PLAUSIBLE_WIND: f64 = 100.0;
pub const TEMP_JUMP_THRESHOLD: f64 = 20.0;

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_PREVIEW_ROWS: usize = 20;
pub const ENV_PREFIX: &str = "WXDASH";

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
