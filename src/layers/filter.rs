//! Age presets exposed as the legend panel's filter buttons.

use crate::core::constants::SECONDS_PER_DAY;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeFilter {
    /// Everything heard within a year, which in practice is all markers
    OneYear,
    ThirtyDays,
    TenDays,
    SevenDays,
    TwoDays,
    OneDay,
}

impl AgeFilter {
    pub const ALL: [AgeFilter; 6] = [
        AgeFilter::OneYear,
        AgeFilter::ThirtyDays,
        AgeFilter::TenDays,
        AgeFilter::SevenDays,
        AgeFilter::TwoDays,
        AgeFilter::OneDay,
    ];

    pub fn days(&self) -> i64 {
        match self {
            AgeFilter::OneYear => 365,
            AgeFilter::ThirtyDays => 30,
            AgeFilter::TenDays => 10,
            AgeFilter::SevenDays => 7,
            AgeFilter::TwoDays => 2,
            AgeFilter::OneDay => 1,
        }
    }

    pub fn threshold_secs(&self) -> i64 {
        self.days() * SECONDS_PER_DAY
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeFilter::OneYear => "All",
            AgeFilter::ThirtyDays => "30 days",
            AgeFilter::TenDays => "10 days",
            AgeFilter::SevenDays => "7 days",
            AgeFilter::TwoDays => "2 days",
            AgeFilter::OneDay => "1 day",
        }
    }
}

/// Markers younger than the threshold stay visible
pub fn is_visible(age_secs: i64, threshold_secs: i64) -> bool {
    age_secs < threshold_secs
}
