//! Named shape-style presets accepted from the HTTP layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Front-to-back separation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ThicknessPreset {
    Thin,
    #[default]
    Medium,
    Thick,
}

impl ThicknessPreset {
    pub const ALL: [ThicknessPreset; 3] = [
        ThicknessPreset::Thin,
        ThicknessPreset::Medium,
        ThicknessPreset::Thick,
    ];

    /// Front-to-back separation.
    pub fn thickness(&self) -> f32 {
        match self {
            ThicknessPreset::Thin => 0.04,
            ThicknessPreset::Medium => 0.06,
            ThicknessPreset::Thick => 0.10,
        }
    }

    /// Outward bulge of the seam ribbon.
    pub fn border_width(&self) -> f32 {
        match self {
            ThicknessPreset::Thin => 0.015,
            ThicknessPreset::Medium => 0.02,
            ThicknessPreset::Thick => 0.03,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThicknessPreset::Thin => "thin",
            ThicknessPreset::Medium => "medium",
            ThicknessPreset::Thick => "thick",
        }
    }

    /// Parse a preset name, falling back to [`ThicknessPreset::Medium`]
    /// for anything unrecognised.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            log::warn!("unknown thickness preset {:?}, using {}", s, Self::default());
            Self::default()
        })
    }
}

impl fmt::Display for ThicknessPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ThicknessPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "thin" => Ok(ThicknessPreset::Thin),
            "medium" => Ok(ThicknessPreset::Medium),
            "thick" => Ok(ThicknessPreset::Thick),
            other => Err(format!("unknown thickness preset: {}", other)),
        }
    }
}

/// Dome height style. `Flat` selects the die-cut plaque look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum PuffinessPreset {
    Flat,
    #[default]
    Medium,
    Puffy,
}

impl PuffinessPreset {
    pub const ALL: [PuffinessPreset; 3] = [
        PuffinessPreset::Flat,
        PuffinessPreset::Medium,
        PuffinessPreset::Puffy,
    ];

    /// Dome height of the front cap.
    pub fn front_puffiness(&self) -> f32 {
        match self {
            PuffinessPreset::Flat => 0.0,
            PuffinessPreset::Medium => 0.06,
            PuffinessPreset::Puffy => 0.10,
        }
    }

    /// Back dome height: half the front.
    pub fn back_puffiness(&self) -> f32 {
        self.front_puffiness() * 0.5
    }

    /// Seam subdivisions; the flat rim needs fewer rings than a rounded cushion edge.
    pub fn seam_subdivisions(&self) -> u32 {
        match self {
            PuffinessPreset::Flat => 3,
            PuffinessPreset::Medium => 4,
            PuffinessPreset::Puffy => 6,
        }
    }

    /// Contour simplification tolerance as a fraction of the perimeter.
    pub fn simplify_tolerance(&self) -> f64 {
        match self {
            PuffinessPreset::Flat => 0.008,
            PuffinessPreset::Medium => 0.004,
            PuffinessPreset::Puffy => 0.002,
        }
    }

    pub fn is_flat(&self) -> bool {
        matches!(self, PuffinessPreset::Flat)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PuffinessPreset::Flat => "flat",
            PuffinessPreset::Medium => "medium",
            PuffinessPreset::Puffy => "puffy",
        }
    }

    /// Parse a preset name, falling back to [`PuffinessPreset::Medium`]
    /// for anything unrecognised.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            log::warn!("unknown puffiness preset {:?}, using {}", s, Self::default());
            Self::default()
        })
    }
}

impl fmt::Display for PuffinessPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PuffinessPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flat" => Ok(PuffinessPreset::Flat),
            "medium" => Ok(PuffinessPreset::Medium),
            "puffy" => Ok(PuffinessPreset::Puffy),
            other => Err(format!("unknown puffiness preset: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        assert_eq!("thin".parse::<ThicknessPreset>(), Ok(ThicknessPreset::Thin));
        assert_eq!(" Thick ".parse::<ThicknessPreset>(), Ok(ThicknessPreset::Thick));
        assert_eq!("PUFFY".parse::<PuffinessPreset>(), Ok(PuffinessPreset::Puffy));
    }

    #[test]
    fn test_unknown_names_fall_back_to_medium() {
        assert_eq!(ThicknessPreset::parse_or_default("chunky"), ThicknessPreset::Medium);
        assert_eq!(PuffinessPreset::parse_or_default(""), PuffinessPreset::Medium);
        assert!("chunky".parse::<ThicknessPreset>().is_err());
    }

    #[test]
    fn test_names_round_trip() {
        for t in ThicknessPreset::ALL {
            assert_eq!(t.name().parse::<ThicknessPreset>(), Ok(t));
        }
        for p in PuffinessPreset::ALL {
            assert_eq!(p.to_string().parse::<PuffinessPreset>(), Ok(p));
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&PuffinessPreset::Flat).unwrap();
        assert_eq!(json, "\"flat\"");
        let t: ThicknessPreset = serde_json::from_str("\"thick\"").unwrap();
        assert_eq!(t, ThicknessPreset::Thick);
    }

    #[test]
    fn test_table_is_ordered() {
        assert!(ThicknessPreset::Thin.thickness() < ThicknessPreset::Medium.thickness());
        assert!(ThicknessPreset::Medium.thickness() < ThicknessPreset::Thick.thickness());
        for p in PuffinessPreset::ALL {
            assert!(p.back_puffiness() <= p.front_puffiness());
        }
        assert!(PuffinessPreset::Flat.is_flat());
    }
}
