pub mod aggregator;
pub mod series;

pub use aggregator::{AggregationEvent, SampleAggregator};
pub use series::BoundedSeries;

/// Which history the dashboard graph draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphSource {
    /// One bar per sampling period, color bands every minute
    #[default]
    Recent,
    /// One bar per aggregation window, color bands every hour
    LongTerm,
}

impl GraphSource {
    /// Get a short label for logs and the simulator title
    pub const fn label(self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::LongTerm => "long-term",
        }
    }

    /// The other source
    pub const fn toggled(self) -> Self {
        match self {
            Self::Recent => Self::LongTerm,
            Self::LongTerm => Self::Recent,
        }
    }
}
