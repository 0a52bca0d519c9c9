//! AQI normalization.
//!
//! OpenWeather reports air quality as a 1..=5 category. Two independent scales
//! are derived from it:
//! - the category table ([`normalize`]), used by the current-city panel;
//! - the threshold scales ([`ScaleTier`], [`HealthLevel`]) over a numeric
//!   index, used by the city map and the pollutant panel.
//!
//! The two are not required to agree beyond their sample points.

use serde::{Deserialize, Serialize};

use crate::error::InvalidAqiCategory;

/// A valid vendor AQI category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
}

impl AqiCategory {
    pub const fn all() -> &'static [AqiCategory] {
        &[
            AqiCategory::Good,
            AqiCategory::Fair,
            AqiCategory::Moderate,
            AqiCategory::Poor,
            AqiCategory::VeryPoor,
        ]
    }

    pub fn vendor_value(self) -> i64 {
        match self {
            AqiCategory::Good => 1,
            AqiCategory::Fair => 2,
            AqiCategory::Moderate => 3,
            AqiCategory::Poor => 4,
            AqiCategory::VeryPoor => 5,
        }
    }

    /// Representative index on the 0..=500 scale.
    pub fn index(self) -> u16 {
        match self {
            AqiCategory::Good => 40,
            AqiCategory::Fair => 90,
            AqiCategory::Moderate => 125,
            AqiCategory::Poor => 175,
            AqiCategory::VeryPoor => 250,
        }
    }

    /// Upper bound of the category's band, used to place cities on the map.
    pub fn map_index(self) -> u16 {
        match self {
            AqiCategory::Good => 50,
            AqiCategory::Fair => 100,
            AqiCategory::Moderate => 150,
            AqiCategory::Poor => 200,
            AqiCategory::VeryPoor => 300,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AqiCategory::Good => "Good 😊",
            AqiCategory::Fair => "Fair 🙂",
            AqiCategory::Moderate => "Moderate 😐",
            AqiCategory::Poor => "Poor 😷",
            AqiCategory::VeryPoor => "Very Poor 🤢",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            AqiCategory::Good => "bg-green-500",
            AqiCategory::Fair => "bg-yellow-400",
            AqiCategory::Moderate => "bg-orange-400",
            AqiCategory::Poor => "bg-red-500",
            AqiCategory::VeryPoor => "bg-purple-700",
        }
    }
}

impl TryFrom<i64> for AqiCategory {
    type Error = InvalidAqiCategory;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(AqiCategory::Good),
            2 => Ok(AqiCategory::Fair),
            3 => Ok(AqiCategory::Moderate),
            4 => Ok(AqiCategory::Poor),
            5 => Ok(AqiCategory::VeryPoor),
            other => Err(InvalidAqiCategory(other)),
        }
    }
}

/// Display-ready AQI derived from a vendor category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedAqi {
    pub category: Option<AqiCategory>,
    pub index: u16,
    pub label: &'static str,
    pub color: &'static str,
}

impl NormalizedAqi {
    /// Placeholder for a reading that is missing or outside 1..=5.
    pub const UNKNOWN: NormalizedAqi = NormalizedAqi {
        category: None,
        index: 0,
        label: "Loading…",
        color: "bg-gray-400",
    };

    pub fn is_known(&self) -> bool {
        self.category.is_some()
    }
}

impl From<AqiCategory> for NormalizedAqi {
    fn from(category: AqiCategory) -> Self {
        Self {
            category: Some(category),
            index: category.index(),
            label: category.label(),
            color: category.color(),
        }
    }
}

/// Map a raw vendor category onto the category table.
pub fn normalize(vendor_category: i64) -> NormalizedAqi {
    AqiCategory::try_from(vendor_category)
        .map(NormalizedAqi::from)
        .unwrap_or(NormalizedAqi::UNKNOWN)
}

/// Same as [`normalize`] for a reading that may not have arrived yet.
pub fn normalize_opt(vendor_category: Option<i64>) -> NormalizedAqi {
    vendor_category.map_or(NormalizedAqi::UNKNOWN, normalize)
}

/// Five-band threshold scale plus Hazardous, keyed on a numeric index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScaleTier {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
    Hazardous,
}

impl ScaleTier {
    /// Upper bounds are inclusive: 50 is Good, 51 is Fair.
    pub fn from_index(index: u32) -> Self {
        match index {
            0..=50 => ScaleTier::Good,
            51..=100 => ScaleTier::Fair,
            101..=150 => ScaleTier::Moderate,
            151..=200 => ScaleTier::Poor,
            201..=300 => ScaleTier::VeryPoor,
            _ => ScaleTier::Hazardous,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScaleTier::Good => "Good",
            ScaleTier::Fair => "Fair",
            ScaleTier::Moderate => "Moderate",
            ScaleTier::Poor => "Poor",
            ScaleTier::VeryPoor => "Very Poor",
            ScaleTier::Hazardous => "Hazardous",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ScaleTier::Good => "green",
            ScaleTier::Fair => "yellow",
            ScaleTier::Moderate => "orange",
            ScaleTier::Poor => "red",
            ScaleTier::VeryPoor => "purple",
            ScaleTier::Hazardous => "maroon",
        }
    }
}

/// EPA-style health advisory shown next to the pollutant breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthLevel {
    Good,
    Moderate,
    SensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl HealthLevel {
    pub fn from_index(index: u32) -> Self {
        match index {
            0..=50 => HealthLevel::Good,
            51..=100 => HealthLevel::Moderate,
            101..=150 => HealthLevel::SensitiveGroups,
            151..=200 => HealthLevel::Unhealthy,
            201..=300 => HealthLevel::VeryUnhealthy,
            _ => HealthLevel::Hazardous,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HealthLevel::Good => "Good",
            HealthLevel::Moderate => "Moderate",
            HealthLevel::SensitiveGroups => "Unhealthy for Sensitive Groups",
            HealthLevel::Unhealthy => "Unhealthy",
            HealthLevel::VeryUnhealthy => "Very Unhealthy",
            HealthLevel::Hazardous => "Hazardous",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            HealthLevel::Good => "bg-green-500",
            HealthLevel::Moderate => "bg-yellow-400",
            HealthLevel::SensitiveGroups => "bg-orange-400",
            HealthLevel::Unhealthy => "bg-red-500",
            HealthLevel::VeryUnhealthy => "bg-purple-600",
            HealthLevel::Hazardous => "bg-maroon-700",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            HealthLevel::Good => "Air quality is satisfactory.",
            HealthLevel::Moderate => "Air quality is acceptable.",
            HealthLevel::SensitiveGroups => "May affect sensitive individuals.",
            HealthLevel::Unhealthy => "Everyone may experience health effects.",
            HealthLevel::VeryUnhealthy => "Health warnings of emergency conditions.",
            HealthLevel::Hazardous => "Health alert: everyone may be affected.",
        }
    }
}
