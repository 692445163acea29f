//! # Mesh Generator
//!
//! Turns a coarse color distribution into a uniformly spaced control grid.

use crate::control_point::{Color, ControlPoint};
use crate::grid::Grid;
use glam::Vec2;
use tracing::instrument;

/// Builds initial control grids.
pub struct MeshGenerator;

#[inline]
fn lerp(f: f32, min: f32, max: f32) -> f32 {
    min + f * (max - min)
}

impl MeshGenerator {
    /// Places one control point per color, spread evenly over `[-1, 1]²`.
    ///
    /// Tangents are sized to the grid spacing so neighbouring patches meet
    /// with a continuous derivative.
    ///
    /// # Panics
    /// If the distribution is narrower or shorter than 2 cells.
    #[instrument(level = "debug", skip(color_distribution), fields(width = color_distribution.width(), height = color_distribution.height()))]
    pub fn generate(color_distribution: &Grid<Color>) -> Grid<ControlPoint> {
        let width = color_distribution.width();
        let height = color_distribution.height();
        assert!(
            width >= 2 && height >= 2,
            "color distribution must be at least 2x2, got {width}x{height}"
        );

        let last_x = (width - 1) as f32;
        let last_y = (height - 1) as f32;
        let u_tangent = Vec2::new(2.0 / last_x, 0.0);
        let v_tangent = Vec2::new(0.0, 2.0 / last_y);

        Grid::from_fn(width, height, |x, y| ControlPoint {
            color: color_distribution[(x, y)],
            location: Vec2::new(
                lerp(x as f32 / last_x, -1.0, 1.0),
                lerp(y as f32 / last_y, -1.0, 1.0),
            ),
            u_tangent,
            v_tangent,
        })
    }

    /// Shorthand for a grid where every cell has the same color.
    pub fn uniform(width: usize, height: usize, color: Color) -> Grid<ControlPoint> {
        Self::generate(&Grid::new(width, height, color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_corners_are_normalized() {
        for (w, h) in [(2, 2), (3, 5), (6, 4)] {
            let grid = MeshGenerator::uniform(w, h, Vec3::ONE);
            assert_eq!(grid[(0, 0)].location, Vec2::new(-1.0, -1.0));
            assert_eq!(grid[(w - 1, 0)].location, Vec2::new(1.0, -1.0));
            assert_eq!(grid[(0, h - 1)].location, Vec2::new(-1.0, 1.0));
            assert_eq!(grid[(w - 1, h - 1)].location, Vec2::new(1.0, 1.0));
        }
    }

    #[test]
    fn test_tangents_match_spacing() {
        let grid = MeshGenerator::uniform(5, 3, Vec3::ZERO);
        for (_, _, point) in grid.iter_cells() {
            assert_eq!(point.u_tangent, Vec2::new(0.5, 0.0));
            assert_eq!(point.v_tangent, Vec2::new(0.0, 1.0));
        }
        assert_eq!(grid[(2, 1)].location, Vec2::ZERO);
    }

    #[test]
    fn test_colors_are_copied() {
        let colors = Grid::from_fn(3, 2, |x, y| Vec3::new(x as f32, y as f32, 0.5));
        let grid = MeshGenerator::generate(&colors);
        for (x, y, point) in grid.iter_cells() {
            assert_eq!(point.color, colors[(x, y)]);
        }
    }

    #[test]
    #[should_panic(expected = "at least 2x2")]
    fn test_single_row_is_rejected() {
        let _ = MeshGenerator::uniform(4, 1, Vec3::ONE);
    }
}
