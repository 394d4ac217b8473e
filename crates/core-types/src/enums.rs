use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Where the measurement window sits relative to the event date.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WindowType {
    Pre,
    Post,
    Straddling,
}

impl WindowType {
    /// All window types, in the order the batch enumerates them.
    pub const ALL: [WindowType; 3] = [WindowType::Pre, WindowType::Post, WindowType::Straddling];

    /// The human-readable label used in exported tables.
    ///
    /// These labels are part of the output schema and must not change:
    /// downstream consumers filter rows by them.
    pub fn label(&self) -> &'static str {
        match self {
            WindowType::Pre => "Pre-election",
            WindowType::Post => "Post-election",
            WindowType::Straddling => "During election",
        }
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WindowType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pre" | "Pre-election" => Ok(WindowType::Pre),
            "post" | "Post-election" => Ok(WindowType::Post),
            "straddling" | "During election" => Ok(WindowType::Straddling),
            other => Err(CoreError::InvalidInput(
                "window type".to_string(),
                other.to_string(),
            )),
        }
    }
}

/// The reference series used to form excess returns.
///
/// This is an explicit tagged choice: the provider to query is part of the
/// type, never inferred by sniffing the symbol string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReferenceRate {
    /// A lower-frequency (typically monthly) rate series from the macro
    /// data provider, quoted as a periodic percentage (e.g. a 3-month
    /// interbank rate).
    MacroSeries { series_id: String },
    /// A second tradable instrument from the market data provider; its own
    /// daily returns serve as the reference.
    Instrument { symbol: String },
}

/// Whether a growth delta was formed from a complete pre/post pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairStatus {
    Complete,
    MissingPre,
    MissingPost,
}

impl PairStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PairStatus::Complete => "complete",
            PairStatus::MissingPre => "missing_pre",
            PairStatus::MissingPost => "missing_post",
        }
    }
}

impl fmt::Display for PairStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_type_round_trips_through_labels() {
        for wt in WindowType::ALL {
            assert_eq!(wt.label().parse::<WindowType>().unwrap(), wt);
        }
    }

    #[test]
    fn unknown_window_type_is_rejected() {
        assert!("sideways".parse::<WindowType>().is_err());
    }
}
