//! # Mesh Randomizer
//!
//! Policies that decide where an animated control point heads next.
//!
//! ## Responsibilities
//! - **Location**: nudges a node's position.
//! - **Turbulency**: nudges the `u` and `v` tangents (applied to each separately).
//! - **Color**: picks the node's next color.
//!
//! Every policy mutates its value in place and receives the cell coordinate,
//! the grid size and the random source. Any of the three can be swapped
//! independently of the others.

use crate::control_point::Color;
use glam::Vec2;
use rand::{Rng, RngCore};
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

/// `(location, x, y, grid_width, grid_height, rng)`
pub type LocationRandomizer =
    Arc<dyn Fn(&mut Vec2, usize, usize, usize, usize, &mut dyn RngCore) + Send + Sync>;

/// `(tangent, x, y, grid_width, grid_height, rng)`
pub type TangentRandomizer =
    Arc<dyn Fn(&mut Vec2, usize, usize, usize, usize, &mut dyn RngCore) + Send + Sync>;

/// `(color, base_color, x, y, grid_width, grid_height, rng)`
pub type ColorRandomizer =
    Arc<dyn Fn(&mut Color, Color, usize, usize, usize, usize, &mut dyn RngCore) + Send + Sync>;

/// Number of colors in the palette of [`MeshRandomizer::default`].
pub const DEFAULT_PALETTE_SIZE: usize = 16;

/// Default symmetric bound for tangent perturbation.
pub const DEFAULT_TURBULENCY: f32 = 0.25;

/// Bundle of the three randomization policies.
#[derive(Clone)]
pub struct MeshRandomizer {
    pub location_randomizer: LocationRandomizer,
    pub turbulency_randomizer: TangentRandomizer,
    pub color_randomizer: ColorRandomizer,
}

impl MeshRandomizer {
    pub fn new(
        location_randomizer: LocationRandomizer,
        turbulency_randomizer: TangentRandomizer,
        color_randomizer: ColorRandomizer,
    ) -> Self {
        Self {
            location_randomizer,
            turbulency_randomizer,
            color_randomizer,
        }
    }

    /// The default policies, with the palette drawn from `rng`.
    pub fn with_rng(rng: &mut impl Rng) -> Self {
        let colors = (0..DEFAULT_PALETTE_SIZE).map(|_| random_color(rng)).collect();
        Self::new(
            location_y_except_top_and_bottom(),
            turbulency_except_edges(-DEFAULT_TURBULENCY..=DEFAULT_TURBULENCY),
            palette(colors),
        )
    }

    /// Policies that leave every value untouched.
    pub fn identity() -> Self {
        Self::new(keep_location(), keep_turbulency(), keep_color())
    }

    pub fn with_location(mut self, location_randomizer: LocationRandomizer) -> Self {
        self.location_randomizer = location_randomizer;
        self
    }

    pub fn with_turbulency(mut self, turbulency_randomizer: TangentRandomizer) -> Self {
        self.turbulency_randomizer = turbulency_randomizer;
        self
    }

    pub fn with_color(mut self, color_randomizer: ColorRandomizer) -> Self {
        self.color_randomizer = color_randomizer;
        self
    }
}

impl Default for MeshRandomizer {
    fn default() -> Self {
        Self::with_rng(&mut rand::thread_rng())
    }
}

impl fmt::Debug for MeshRandomizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeshRandomizer").finish_non_exhaustive()
    }
}

/// A color with every channel uniform in `0.0..=1.0`.
pub fn random_color(rng: &mut (impl Rng + ?Sized)) -> Color {
    Color::new(
        rng.gen_range(0.0..=1.0),
        rng.gen_range(0.0..=1.0),
        rng.gen_range(0.0..=1.0),
    )
}

/// Wraps a closure as a location policy.
pub fn location_fn(
    f: impl Fn(&mut Vec2, usize, usize, usize, usize, &mut dyn RngCore) + Send + Sync + 'static,
) -> LocationRandomizer {
    Arc::new(f)
}

/// Wraps a closure as a tangent policy.
pub fn tangent_fn(
    f: impl Fn(&mut Vec2, usize, usize, usize, usize, &mut dyn RngCore) + Send + Sync + 'static,
) -> TangentRandomizer {
    Arc::new(f)
}

/// Wraps a closure as a color policy.
pub fn color_fn(
    f: impl Fn(&mut Color, Color, usize, usize, usize, usize, &mut dyn RngCore)
        + Send
        + Sync
        + 'static,
) -> ColorRandomizer {
    Arc::new(f)
}

#[inline]
fn is_inner(i: usize, len: usize) -> bool {
    i != 0 && i + 1 != len
}

/// Picks uniformly from `colors`, ignoring the current value.
///
/// # Panics
/// If `colors` is empty.
pub fn palette(colors: Vec<Color>) -> ColorRandomizer {
    assert!(!colors.is_empty(), "palette can not be empty");
    color_fn(move |color, _, _, _, _, _, rng| {
        *color = colors[rng.gen_range(0..colors.len())];
    })
}

/// Shifts `y` by up to `±1.2 / height`, skipping the top and bottom rows.
///
/// `x` is left alone: rows are rasterized top to bottom and horizontal
/// movement shows up as tearing.
pub fn location_y_except_top_and_bottom() -> LocationRandomizer {
    location_fn(|location, _x, y, _width, height, rng| {
        let variation = 1.2 / height as f32;
        if is_inner(y, height) {
            location.y += rng.gen_range(-variation..=variation);
        }
    })
}

/// Shifts both coordinates within `range`, skipping boundary rows for `y`
/// and boundary columns for `x`.
pub fn location_except_edges(range: RangeInclusive<f32>) -> LocationRandomizer {
    location_fn(move |location, x, y, width, height, rng| {
        if is_inner(x, width) {
            location.x += rng.gen_range(range.clone());
        }
        if is_inner(y, height) {
            location.y += rng.gen_range(range.clone());
        }
    })
}

/// Shifts both coordinates of every node within `range`. Edges move too.
pub fn location_unconstrained(range: RangeInclusive<f32>) -> LocationRandomizer {
    location_fn(move |location, _, _, _, _, rng| {
        location.x += rng.gen_range(range.clone());
        location.y += rng.gen_range(range.clone());
    })
}

/// Shifts both tangent components within `range`, interior cells only.
pub fn turbulency_except_edges(range: RangeInclusive<f32>) -> TangentRandomizer {
    tangent_fn(move |tangent, x, y, width, height, rng| {
        if is_inner(x, width) && is_inner(y, height) {
            tangent.x += rng.gen_range(range.clone());
            tangent.y += rng.gen_range(range.clone());
        }
    })
}

/// Shifts both tangent components of every node within `range`.
pub fn turbulency_unconstrained(range: RangeInclusive<f32>) -> TangentRandomizer {
    tangent_fn(move |tangent, _, _, _, _, rng| {
        tangent.x += rng.gen_range(range.clone());
        tangent.y += rng.gen_range(range.clone());
    })
}

pub fn keep_location() -> LocationRandomizer {
    location_fn(|_, _, _, _, _, _| {})
}

pub fn keep_turbulency() -> TangentRandomizer {
    tangent_fn(|_, _, _, _, _, _| {})
}

pub fn keep_color() -> ColorRandomizer {
    color_fn(|_, _, _, _, _, _, _| {})
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const W: usize = 5;
    const H: usize = 4;

    #[test]
    fn test_default_location_keeps_x_and_edge_rows() {
        let mut rng = StdRng::seed_from_u64(7);
        let randomize = location_y_except_top_and_bottom();
        let bound = 1.2 / H as f32;

        for _ in 0..50 {
            for y in 0..H {
                for x in 0..W {
                    let base = Vec2::new(x as f32, y as f32);
                    let mut location = base;
                    randomize(&mut location, x, y, W, H, &mut rng);

                    assert_eq!(location.x, base.x);
                    if y == 0 || y == H - 1 {
                        assert_eq!(location.y, base.y);
                    } else {
                        assert!((location.y - base.y).abs() <= bound + f32::EPSILON);
                    }
                }
            }
        }
    }

    #[test]
    fn test_default_turbulency_keeps_boundary_cells() {
        let mut rng = StdRng::seed_from_u64(11);
        let randomize = turbulency_except_edges(-0.25..=0.25);
        let mut moved = false;

        for _ in 0..50 {
            for y in 0..H {
                for x in 0..W {
                    let base = Vec2::new(0.5, 0.0);
                    let mut tangent = base;
                    randomize(&mut tangent, x, y, W, H, &mut rng);

                    let boundary = x == 0 || y == 0 || x == W - 1 || y == H - 1;
                    if boundary {
                        assert_eq!(tangent, base);
                    } else {
                        assert!((tangent - base).abs().max_element() <= 0.25 + f32::EPSILON);
                        moved |= tangent != base;
                    }
                }
            }
        }
        assert!(moved, "interior tangents never changed");
    }

    #[test]
    fn test_except_edges_location_respects_columns() {
        let mut rng = StdRng::seed_from_u64(3);
        let randomize = location_except_edges(-0.1..=0.1);
        let mut location = Vec2::ZERO;
        randomize(&mut location, 0, 0, W, H, &mut rng);
        assert_eq!(location, Vec2::ZERO);

        let mut location = Vec2::ZERO;
        randomize(&mut location, W - 1, 2, W, H, &mut rng);
        assert_eq!(location.x, 0.0);
        assert!(location.y.abs() <= 0.1 + f32::EPSILON);
    }

    #[test]
    fn test_unconstrained_moves_edges() {
        let mut rng = StdRng::seed_from_u64(5);
        let randomize = turbulency_unconstrained(1.0..=2.0);
        let mut tangent = Vec2::ZERO;
        randomize(&mut tangent, 0, 0, W, H, &mut rng);
        assert!(tangent.x >= 1.0 && tangent.y >= 1.0);
    }

    #[test]
    fn test_palette_only_yields_palette_colors() {
        let mut rng = StdRng::seed_from_u64(1);
        let colors = vec![Color::X, Color::Y, Color::Z];
        let randomize = palette(colors.clone());

        for _ in 0..100 {
            let mut color = Color::splat(0.5);
            randomize(&mut color, Color::splat(0.5), 1, 1, W, H, &mut rng);
            assert!(colors.contains(&color));
        }
    }

    #[test]
    #[should_panic(expected = "palette can not be empty")]
    fn test_empty_palette_panics() {
        let _ = palette(Vec::new());
    }

    #[test]
    fn test_default_palette_has_sixteen_colors() {
        let mut source = StdRng::seed_from_u64(3);
        let expected: Vec<Color> = (0..DEFAULT_PALETTE_SIZE)
            .map(|_| random_color(&mut source))
            .collect();
        assert_eq!(expected.len(), 16);

        let randomizer = MeshRandomizer::with_rng(&mut StdRng::seed_from_u64(3));
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen: Vec<Color> = Vec::new();
        for _ in 0..1000 {
            let mut color = Color::ZERO;
            (randomizer.color_randomizer)(&mut color, Color::ZERO, 1, 1, W, H, &mut rng);
            assert!(expected.contains(&color), "{:?} is not in the palette", color);
            if !seen.contains(&color) {
                seen.push(color);
            }
        }
        assert_eq!(seen.len(), DEFAULT_PALETTE_SIZE);
    }

    #[test]
    fn test_seeded_default_policies_are_reproducible() {
        let a = MeshRandomizer::with_rng(&mut StdRng::seed_from_u64(42));
        let b = MeshRandomizer::with_rng(&mut StdRng::seed_from_u64(42));

        let mut color_a = Color::ZERO;
        let mut color_b = Color::ZERO;
        (a.color_randomizer)(&mut color_a, Color::ZERO, 0, 0, W, H, &mut StdRng::seed_from_u64(9));
        (b.color_randomizer)(&mut color_b, Color::ZERO, 0, 0, W, H, &mut StdRng::seed_from_u64(9));
        assert_eq!(color_a, color_b);
    }
}
