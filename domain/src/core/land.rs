//! Land classification taxonomy
//!
//! The closed set of land classes that agents vote on. Keeping this a
//! closed enum (rather than free-form strings) lets the tally and the
//! probability distributions use exact keys.

use serde::{Deserialize, Serialize};

/// A land-use classification for a parcel
///
/// # Example
///
/// ```
/// use swarm_domain::LandClass;
///
/// let class: LandClass = "agricultural".parse().unwrap();
/// assert_eq!(class, LandClass::Agricultural);
/// assert_eq!(class.to_string(), "agricultural");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandClass {
    Agricultural,
    Residential,
    Commercial,
    Industrial,
    Forest,
    Water,
    Barren,
}

impl LandClass {
    /// All known land classes, in canonical order
    pub fn all() -> &'static [LandClass] {
        &[
            LandClass::Agricultural,
            LandClass::Residential,
            LandClass::Commercial,
            LandClass::Industrial,
            LandClass::Forest,
            LandClass::Water,
            LandClass::Barren,
        ]
    }

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            LandClass::Agricultural => "agricultural",
            LandClass::Residential => "residential",
            LandClass::Commercial => "commercial",
            LandClass::Industrial => "industrial",
            LandClass::Forest => "forest",
            LandClass::Water => "water",
            LandClass::Barren => "barren",
        }
    }
}

impl std::fmt::Display for LandClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LandClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "agricultural" | "agriculture" => Ok(LandClass::Agricultural),
            "residential" => Ok(LandClass::Residential),
            "commercial" => Ok(LandClass::Commercial),
            "industrial" => Ok(LandClass::Industrial),
            "forest" => Ok(LandClass::Forest),
            "water" => Ok(LandClass::Water),
            "barren" => Ok(LandClass::Barren),
            _ => Err(format!(
                "Unknown land class: {}. Valid: agricultural, residential, commercial, \
                 industrial, forest, water, barren",
                s
            )),
        }
    }
}
