//! The form inputs for one design request, and the prompt built from them.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_ROOM_COUNT, MIN_ROOM_COUNT};

/// Who the design is for.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub enum Scenario {
    /// Real Estate Development
    #[default]
    #[serde(rename = "Real Estate Development")]
    RealEstateDevelopment,
    /// Home Renovation Services
    #[serde(rename = "Home Renovation Services")]
    HomeRenovationServices,
    /// Architectural Firm
    #[serde(rename = "Architectural Firm")]
    ArchitecturalFirm,
}

impl Scenario {
    /// Every scenario, in the order the form lists them.
    pub const ALL: [Scenario; 3] = [
        Self::RealEstateDevelopment,
        Self::HomeRenovationServices,
        Self::ArchitecturalFirm,
    ];

    /// Label shown in the form and used in the prompt.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RealEstateDevelopment => "Real Estate Development",
            Self::HomeRenovationServices => "Home Renovation Services",
            Self::ArchitecturalFirm => "Architectural Firm",
        }
    }
}

impl Display for Scenario {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Architectural style, also the keyword for the reference image search.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub enum Style {
    /// Modern
    #[default]
    Modern,
    /// Traditional
    Traditional,
    /// Contemporary
    Contemporary,
    /// Minimalist
    Minimalist,
    /// Colonial
    Colonial,
}

impl Style {
    /// Every style, in the order the form lists them.
    pub const ALL: [Style; 5] = [
        Self::Modern,
        Self::Traditional,
        Self::Contemporary,
        Self::Minimalist,
        Self::Colonial,
    ];

    /// Label shown in the form and used in the prompt.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Modern => "Modern",
            Self::Traditional => "Traditional",
            Self::Contemporary => "Contemporary",
            Self::Minimalist => "Minimalist",
            Self::Colonial => "Colonial",
        }
    }
}

impl Display for Style {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bedroom or bathroom count, always within `[MIN_ROOM_COUNT, MAX_ROOM_COUNT]`.
///
/// The only ways in are [`RoomCount::clamped`] and deserialization, which
/// clamps too, so an out-of-range count cannot be built.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Deserialize, Serialize)]
#[serde(from = "i64", into = "u8")]
pub struct RoomCount(u8);

impl RoomCount {
    /// Pins `value` into the allowed range.
    pub fn clamped(value: i64) -> Self {
        let value = value.clamp(i64::from(MIN_ROOM_COUNT), i64::from(MAX_ROOM_COUNT));
        Self(u8::try_from(value).unwrap_or(MIN_ROOM_COUNT))
    }

    /// The count.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl From<i64> for RoomCount {
    fn from(value: i64) -> Self {
        Self::clamped(value)
    }
}

impl From<RoomCount> for u8 {
    fn from(value: RoomCount) -> Self {
        value.0
    }
}

impl Display for RoomCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything the visitor picked for one design request.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Preferences {
    /// Selected scenario.
    pub scenario: Scenario,
    /// Number of bedrooms.
    pub bedrooms: RoomCount,
    /// Number of bathrooms.
    pub bathrooms: RoomCount,
    /// Architectural style.
    pub style: Style,
    /// Free-form feature list, possibly empty.
    #[serde(default)]
    pub features: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            scenario: Scenario::default(),
            bedrooms: RoomCount::clamped(3),
            bathrooms: RoomCount::clamped(2),
            style: Style::default(),
            features: String::new(),
        }
    }
}

impl Preferences {
    /// Builds the instruction sent to the text model. Features go in verbatim.
    pub fn prompt(&self) -> String {
        format!(
            "Scenario: {}. Design a home with {} bedrooms, {} bathrooms, style: {}, features: {}.",
            self.scenario, self.bedrooms, self.bathrooms, self.style, self.features
        )
    }
}
