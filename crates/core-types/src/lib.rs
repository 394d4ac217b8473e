pub mod enums;
pub mod error;
pub mod record;
pub mod series;

// Re-export the core types to provide a clean public API.
pub use enums::{PairStatus, ReferenceRate, WindowType};
pub use error::CoreError;
pub use record::{GrowthRecord, RecordOutcome, ResultTable, StatisticsRecord, StatsBundle};
pub use series::{ReturnSeries, TimeSeries};
