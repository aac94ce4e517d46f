//! Shape configuration.

use crate::error::{MesherError, Result};
use crate::types::{PuffinessPreset, ThicknessPreset};
use serde::{Deserialize, Serialize};

/// Geometric parameters of the pillow, in model units (image height = 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeConfig {
    /// Front-to-back separation at the rim.
    pub thickness: f32,
    /// Dome height of the front cap at the centroid.
    pub front_puffiness: f32,
    /// Dome height of the back cap. Must not exceed `front_puffiness`.
    pub back_puffiness: f32,
    /// Maximum outward bulge of the seam ribbon.
    pub border_width: f32,
    /// Rings between the front and back rim (at least 1).
    pub seam_subdivisions: u32,
    /// Outline simplification tolerance as a fraction of its perimeter.
    pub simplify_tolerance: f64,
    /// Die-cut plaque style: both caps stay flat.
    pub flat: bool,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self::from_presets(ThicknessPreset::default(), PuffinessPreset::default())
    }
}

impl ShapeConfig {
    /// Build a config from the preset lookup tables.
    pub fn from_presets(thickness: ThicknessPreset, puffiness: PuffinessPreset) -> Self {
        let separation = thickness.thickness();
        Self {
            thickness: separation,
            front_puffiness: puffiness.front_puffiness(),
            back_puffiness: puffiness.back_puffiness().min(separation * 0.5),
            border_width: thickness.border_width(),
            seam_subdivisions: puffiness.seam_subdivisions(),
            simplify_tolerance: puffiness.simplify_tolerance(),
            flat: puffiness.is_flat(),
        }
    }

    /// Resolve free-form preset names, falling back to `medium` for unknown ones.
    pub fn from_preset_names(thickness: &str, puffiness: &str) -> Self {
        Self::from_presets(
            ThicknessPreset::parse_or_default(thickness),
            PuffinessPreset::parse_or_default(puffiness),
        )
    }

    pub fn with_seam_subdivisions(mut self, subdivisions: u32) -> Self {
        self.seam_subdivisions = subdivisions;
        self
    }

    pub fn with_simplify_tolerance(mut self, tolerance: f64) -> Self {
        self.simplify_tolerance = tolerance;
        self
    }

    pub fn with_flat(mut self, flat: bool) -> Self {
        self.flat = flat;
        self
    }

    /// Front dome height actually used for geometry.
    pub fn effective_front_puffiness(&self) -> f32 {
        if self.flat {
            0.0
        } else {
            self.front_puffiness
        }
    }

    /// Back dome height actually used for geometry.
    pub fn effective_back_puffiness(&self) -> f32 {
        if self.flat {
            0.0
        } else {
            self.back_puffiness
        }
    }

    /// Check every field against sane bounds.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("thickness", self.thickness),
            ("front_puffiness", self.front_puffiness),
            ("back_puffiness", self.back_puffiness),
            ("border_width", self.border_width),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(invalid(format!("{} must be finite, got {}", name, value)));
            }
        }

        if self.thickness <= 0.0 || self.thickness > 1.0 {
            return Err(invalid(format!(
                "thickness must be in (0, 1], got {}",
                self.thickness
            )));
        }
        if self.seam_subdivisions == 0 || self.seam_subdivisions > 64 {
            return Err(invalid(format!(
                "seam_subdivisions must be in 1..=64, got {}",
                self.seam_subdivisions
            )));
        }
        if !(self.simplify_tolerance > 0.0 && self.simplify_tolerance <= 0.05) {
            return Err(invalid(format!(
                "simplify_tolerance must be in (0, 0.05], got {}",
                self.simplify_tolerance
            )));
        }
        if self.border_width < 0.0 || self.border_width > 0.5 {
            return Err(invalid(format!(
                "border_width must be in [0, 0.5], got {}",
                self.border_width
            )));
        }

        if self.flat {
            return Ok(());
        }
        if self.front_puffiness < 0.0 || self.front_puffiness > 1.0 {
            return Err(invalid(format!(
                "front_puffiness must be in [0, 1], got {}",
                self.front_puffiness
            )));
        }
        if self.back_puffiness < 0.0 || self.back_puffiness > self.front_puffiness {
            return Err(invalid(format!(
                "back_puffiness must be in [0, front_puffiness = {}], got {}",
                self.front_puffiness, self.back_puffiness
            )));
        }
        if self.back_puffiness >= self.thickness {
            return Err(invalid(format!(
                "back_puffiness {} must stay below thickness {}",
                self.back_puffiness, self.thickness
            )));
        }
        Ok(())
    }
}

fn invalid(message: String) -> MesherError {
    MesherError::InvalidConfig(message)
}
