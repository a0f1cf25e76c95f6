//! Fixed electric-range and price buckets.
//!
//! Both bucket sets are closed below: the first bucket also takes values under its nominal lower
//! bound (negative ranges or prices), so every record lands in exactly one bucket.

use std::fmt;

use serde::Serialize;

/// Electric range bucket. Upper bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RangeBucket {
    /// `<= 50` miles.
    #[serde(rename = "0-50")]
    UpTo50,
    /// `51..=100` miles.
    #[serde(rename = "51-100")]
    UpTo100,
    /// `101..=200` miles.
    #[serde(rename = "101-200")]
    UpTo200,
    /// `201..=300` miles.
    #[serde(rename = "201-300")]
    UpTo300,
    /// `> 300` miles.
    #[serde(rename = "300+")]
    Over300,
}

impl RangeBucket {
    /// All buckets in display order.
    pub const ALL: [Self; 5] = [
        Self::UpTo50,
        Self::UpTo100,
        Self::UpTo200,
        Self::UpTo300,
        Self::Over300,
    ];

    /// Bucket for an electric range in miles.
    pub fn for_range(electric_range: i64) -> Self {
        match electric_range {
            ..=50 => Self::UpTo50,
            51..=100 => Self::UpTo100,
            101..=200 => Self::UpTo200,
            201..=300 => Self::UpTo300,
            _ => Self::Over300,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::UpTo50 => "0-50",
            Self::UpTo100 => "51-100",
            Self::UpTo200 => "101-200",
            Self::UpTo300 => "201-300",
            Self::Over300 => "300+",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RangeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Base MSRP bucket. Intervals are half-open `[lo, hi)`; the last is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PriceBucket {
    #[serde(rename = "Under $30k")]
    Under30k,
    #[serde(rename = "$30k-$50k")]
    From30kTo50k,
    #[serde(rename = "$50k-$70k")]
    From50kTo70k,
    #[serde(rename = "$70k-$100k")]
    From70kTo100k,
    #[serde(rename = "$100k+")]
    From100k,
}

impl PriceBucket {
    /// All buckets in display order.
    pub const ALL: [Self; 5] = [
        Self::Under30k,
        Self::From30kTo50k,
        Self::From50kTo70k,
        Self::From70kTo100k,
        Self::From100k,
    ];

    /// Bucket for a base MSRP.
    pub fn for_price(base_msrp: i64) -> Self {
        match base_msrp {
            ..30_000 => Self::Under30k,
            30_000..50_000 => Self::From30kTo50k,
            50_000..70_000 => Self::From50kTo70k,
            70_000..100_000 => Self::From70kTo100k,
            _ => Self::From100k,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Under30k => "Under $30k",
            Self::From30kTo50k => "$30k-$50k",
            Self::From50kTo70k => "$50k-$70k",
            Self::From70kTo100k => "$70k-$100k",
            Self::From100k => "$100k+",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PriceBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
