//! # Configuration
//!
//! JSON-facing settings for a mesh gradient. Everything here is plain data;
//! [`MeshGradientConfig::to_animator_config`] turns it into the closures and
//! ranges the animator runs on.
//!
//! ```json
//! {
//!   "frames_per_second": 60,
//!   "animation_speed_range": [2.0, 5.0],
//!   "subdivisions": 18,
//!   "seed": 7,
//!   "randomizer": {
//!     "location": { "kind": "except_top_and_bottom" },
//!     "turbulency": { "kind": "except_edges", "range": [-0.25, 0.25] },
//!     "color": { "kind": "palette", "colors": ["#ff0080", "#2040ff"] }
//!   }
//! }
//! ```

use crate::animator::{AnimatorConfig, DEFAULT_ANIMATION_SPEED_RANGE, DEFAULT_FRAMES_PER_SECOND};
use crate::control_point::Color;
use crate::errors::MeshError;
use crate::randomizer::{self, MeshRandomizer, DEFAULT_PALETTE_SIZE, DEFAULT_TURBULENCY};
use crate::render::DEFAULT_SUBDIVISIONS;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How control point locations are perturbed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationPolicy {
    /// `y` only, `±1.2 / height`, top and bottom rows fixed.
    #[default]
    ExceptTopAndBottom,
    ExceptEdges { range: [f32; 2] },
    Unconstrained { range: [f32; 2] },
    None,
}

/// How tangents are perturbed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TangentPolicy {
    ExceptEdges { range: [f32; 2] },
    Unconstrained { range: [f32; 2] },
    None,
}

impl Default for TangentPolicy {
    fn default() -> Self {
        TangentPolicy::ExceptEdges {
            range: [-DEFAULT_TURBULENCY, DEFAULT_TURBULENCY],
        }
    }
}

/// How the next color of a control point is chosen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColorPolicy {
    /// A palette of `count` random colors, drawn once.
    Random { count: usize },
    /// A fixed palette of `#rrggbb` colors.
    Palette { colors: Vec<String> },
    None,
}

impl Default for ColorPolicy {
    fn default() -> Self {
        ColorPolicy::Random {
            count: DEFAULT_PALETTE_SIZE,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomizerConfig {
    pub location: LocationPolicy,
    pub turbulency: TangentPolicy,
    pub color: ColorPolicy,
}

// The span must be finite as well, or sampling the range overflows.
fn check_range([min, max]: [f32; 2]) -> Result<(), MeshError> {
    if min <= max && (max - min).is_finite() {
        Ok(())
    } else {
        Err(MeshError::InvalidPolicyRange { min, max })
    }
}

impl RandomizerConfig {
    pub fn validate(&self) -> Result<(), MeshError> {
        match &self.location {
            LocationPolicy::ExceptEdges { range } | LocationPolicy::Unconstrained { range } => {
                check_range(*range)?
            }
            LocationPolicy::ExceptTopAndBottom | LocationPolicy::None => {}
        }
        match &self.turbulency {
            TangentPolicy::ExceptEdges { range } | TangentPolicy::Unconstrained { range } => {
                check_range(*range)?
            }
            TangentPolicy::None => {}
        }
        match &self.color {
            ColorPolicy::Random { count: 0 } => return Err(MeshError::EmptyPalette),
            ColorPolicy::Palette { colors } if colors.is_empty() => {
                return Err(MeshError::EmptyPalette)
            }
            ColorPolicy::Palette { colors } => {
                for color in colors {
                    parse_hex_color(color)?;
                }
            }
            ColorPolicy::Random { .. } | ColorPolicy::None => {}
        }
        Ok(())
    }

    /// Builds the policy closures. Random palettes are drawn from `rng`.
    pub fn build(&self, rng: &mut impl Rng) -> Result<MeshRandomizer, MeshError> {
        self.validate()?;

        let location = match &self.location {
            LocationPolicy::ExceptTopAndBottom => randomizer::location_y_except_top_and_bottom(),
            LocationPolicy::ExceptEdges { range: [min, max] } => {
                randomizer::location_except_edges(*min..=*max)
            }
            LocationPolicy::Unconstrained { range: [min, max] } => {
                randomizer::location_unconstrained(*min..=*max)
            }
            LocationPolicy::None => randomizer::keep_location(),
        };
        let turbulency = match &self.turbulency {
            TangentPolicy::ExceptEdges { range: [min, max] } => {
                randomizer::turbulency_except_edges(*min..=*max)
            }
            TangentPolicy::Unconstrained { range: [min, max] } => {
                randomizer::turbulency_unconstrained(*min..=*max)
            }
            TangentPolicy::None => randomizer::keep_turbulency(),
        };
        let color = match &self.color {
            ColorPolicy::Random { count } => {
                randomizer::palette((0..*count).map(|_| randomizer::random_color(rng)).collect())
            }
            ColorPolicy::Palette { colors } => randomizer::palette(
                colors
                    .iter()
                    .map(|c| parse_hex_color(c))
                    .collect::<Result<_, _>>()?,
            ),
            ColorPolicy::None => randomizer::keep_color(),
        };

        Ok(MeshRandomizer::new(location, turbulency, color))
    }
}

/// Everything needed to run a mesh gradient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshGradientConfig {
    pub frames_per_second: u32,
    /// `[min, max]` transition duration in seconds.
    pub animation_speed_range: [f64; 2],
    pub subdivisions: u32,
    pub seed: Option<u64>,
    /// Render the initial grid without animating it.
    #[serde(rename = "static")]
    pub is_static: bool,
    pub randomizer: RandomizerConfig,
}

impl Default for MeshGradientConfig {
    fn default() -> Self {
        Self {
            frames_per_second: DEFAULT_FRAMES_PER_SECOND,
            animation_speed_range: [
                *DEFAULT_ANIMATION_SPEED_RANGE.start(),
                *DEFAULT_ANIMATION_SPEED_RANGE.end(),
            ],
            subdivisions: DEFAULT_SUBDIVISIONS,
            seed: None,
            is_static: false,
            randomizer: RandomizerConfig::default(),
        }
    }
}

impl MeshGradientConfig {
    pub fn from_json_str(json: &str) -> Result<Self, MeshError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MeshError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        if self.subdivisions == 0 {
            return Err(MeshError::InvalidSubdivisions);
        }
        self.randomizer.validate()?;
        self.to_animator_config_unchecked(MeshRandomizer::identity())
            .validate()
    }

    fn to_animator_config_unchecked(&self, mesh_randomizer: MeshRandomizer) -> AnimatorConfig {
        let [min, max] = self.animation_speed_range;
        AnimatorConfig {
            frames_per_second: self.frames_per_second,
            animation_speed_range: min..=max,
            mesh_randomizer,
            seed: self.seed,
        }
    }

    /// Resolves the randomizer policies and returns a validated animator
    /// configuration. A configured seed also fixes the random palette.
    pub fn to_animator_config(&self) -> Result<AnimatorConfig, MeshError> {
        self.validate()?;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mesh_randomizer = self.randomizer.build(&mut rng)?;
        Ok(self.to_animator_config_unchecked(mesh_randomizer))
    }
}

/// Parses `#rrggbb` (the `#` is optional) into a linear `0..=1` color.
pub fn parse_hex_color(text: &str) -> Result<Color, MeshError> {
    let hex = text.trim().trim_start_matches('#');
    let invalid = || MeshError::InvalidColor(text.to_string());
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map(|v| v as f32 / 255.0)
            .map_err(|_| invalid())
    };
    Ok(Color::new(channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = MeshGradientConfig::from_json_str("{}").unwrap();
        assert_eq!(config, MeshGradientConfig::default());
        assert_eq!(config.subdivisions, 18);
        assert_eq!(config.frames_per_second, 60);
        assert_eq!(config.animation_speed_range, [2.0, 5.0]);
    }

    #[test]
    fn test_policies_parse() {
        let json = r##"{
            "seed": 7,
            "static": true,
            "randomizer": {
                "location": { "kind": "except_edges", "range": [-0.1, 0.1] },
                "turbulency": { "kind": "none" },
                "color": { "kind": "palette", "colors": ["#ff0000", "00ff00"] }
            }
        }"##;
        let config = MeshGradientConfig::from_json_str(json).unwrap();
        assert!(config.is_static);
        assert_eq!(
            config.randomizer.location,
            LocationPolicy::ExceptEdges { range: [-0.1, 0.1] }
        );
        assert_eq!(config.randomizer.turbulency, TangentPolicy::None);

        let animator = config.to_animator_config().unwrap();
        assert_eq!(animator.seed, Some(7));
        assert_eq!(animator.animation_speed_range, 2.0..=5.0);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        assert!(matches!(
            MeshGradientConfig::from_json_str(r#"{ "subdivisions": 0 }"#),
            Err(MeshError::InvalidSubdivisions)
        ));
        assert!(matches!(
            MeshGradientConfig::from_json_str(r#"{ "frames_per_second": 0 }"#),
            Err(MeshError::InvalidFramesPerSecond)
        ));
        assert!(matches!(
            MeshGradientConfig::from_json_str(r#"{ "animation_speed_range": [4.0, 1.0] }"#),
            Err(MeshError::InvalidSpeedRange { .. })
        ));
        assert!(matches!(
            MeshGradientConfig::from_json_str(
                r#"{ "randomizer": { "color": { "kind": "palette", "colors": [] } } }"#
            ),
            Err(MeshError::EmptyPalette)
        ));
        assert!(matches!(
            MeshGradientConfig::from_json_str(
                r#"{ "randomizer": { "turbulency": { "kind": "unconstrained", "range": [1.0, -1.0] } } }"#
            ),
            Err(MeshError::InvalidPolicyRange { .. })
        ));
        assert!(matches!(
            MeshGradientConfig::from_json_str("{ not json"),
            Err(MeshError::JsonError(_))
        ));
    }

    #[test]
    fn test_overflowing_range_is_rejected() {
        let json = r#"{ "randomizer": { "location": { "kind": "unconstrained", "range": [-3e38, 3e38] } } }"#;
        assert!(matches!(
            MeshGradientConfig::from_json_str(json),
            Err(MeshError::InvalidPolicyRange { .. })
        ));

        let mut config = MeshGradientConfig::default();
        config.randomizer.turbulency = TangentPolicy::ExceptEdges {
            range: [-3e38, 3e38],
        };
        assert!(config.to_animator_config().is_err());

        assert!(check_range([f32::MIN, f32::MIN]).is_ok());
        assert!(check_range([-1e38, 1e38]).is_ok());
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(parse_hex_color("#ffffff").unwrap(), Color::ONE);
        assert_eq!(parse_hex_color("000000").unwrap(), Color::ZERO);
        assert_eq!(parse_hex_color("#ff0000").unwrap(), Color::X);
        assert!(parse_hex_color("#fff").is_err());
        assert!(parse_hex_color("#gg0000").is_err());
    }
}
