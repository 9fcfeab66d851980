use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

pub const MAX_SPICY_LEVEL: u8 = 10;
pub const DEFAULT_SPICY_LEVEL: u8 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("spicy level {0} is out of range (0..=10)")]
    SpicyLevelOutOfRange(u8),
}

/// Spice tolerance on the 0 (none at all) to 10 (anything goes) slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SpicyLevel(u8);

impl SpicyLevel {
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for SpicyLevel {
    type Error = PreferenceError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        if level > MAX_SPICY_LEVEL {
            return Err(PreferenceError::SpicyLevelOutOfRange(level));
        }
        Ok(Self(level))
    }
}

impl From<SpicyLevel> for u8 {
    fn from(level: SpicyLevel) -> Self {
        level.0
    }
}

impl Default for SpicyLevel {
    fn default() -> Self {
        Self(DEFAULT_SPICY_LEVEL)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum Cuisine {
    #[default]
    #[serde(rename = "한식")]
    #[strum(serialize = "한식")]
    Korean,
    #[serde(rename = "중식")]
    #[strum(serialize = "중식")]
    Chinese,
    #[serde(rename = "일식")]
    #[strum(serialize = "일식")]
    Japanese,
    #[serde(rename = "양식")]
    #[strum(serialize = "양식")]
    Western,
    #[serde(rename = "동남아 음식")]
    #[strum(serialize = "동남아 음식")]
    SoutheastAsian,
    #[serde(rename = "인도 음식")]
    #[strum(serialize = "인도 음식")]
    Indian,
}

/// The selections currently being edited on the profile screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    pub spicy_level: SpicyLevel,
    pub cuisine: Cuisine,
}

/// Partial edit of [`Preferences`]; absent fields keep their current value.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PreferencesUpdate {
    pub spicy_level: Option<SpicyLevel>,
    pub cuisine: Option<Cuisine>,
}

impl Preferences {
    pub fn apply(&mut self, update: PreferencesUpdate) {
        if let Some(level) = update.spicy_level {
            self.spicy_level = level;
        }
        if let Some(cuisine) = update.cuisine {
            self.cuisine = cuisine;
        }
    }
}

/// A named, finalized snapshot of preferences, already rendered to text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub title: String,
    pub preferences: String,
}
