//! # Hermite Tessellator
//!
//! Turns a sparse control grid into a dense, flat triangle list.
//!
//! ## Stages
//! 1. **Packing**: each control point becomes a [`PackedControlPoint`], the
//!    layout the patch math (and a GPU upload) expects.
//! 2. **Patch evaluation**: every quad of four neighbouring points is a bicubic
//!    Hermite patch, sampled on an `s x s` lattice. Position and color share
//!    the same basis weights.
//! 3. **Triangulation**: every unit quad of the dense grid becomes two
//!    triangles with a fixed winding.
//!
//! The whole pipeline is a pure function of `(grid, subdivisions)`. Patches
//! and output vertices are evaluated in parallel with rayon and collected in
//! order, so the output never depends on scheduling.

use crate::control_point::ControlPoint;
use crate::grid::Grid;
use glam::{Mat4, Vec2, Vec4};
use rayon::prelude::*;
use serde::Serialize;
use tracing::instrument;

/// One output vertex.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct MeshVertex {
    pub position: Vec2,
    /// RGBA, alpha is always 1.
    pub color: Vec4,
}

/// A control point flattened for patch math.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PackedControlPoint {
    pub location: Vec2,
    pub u_tangent: Vec2,
    pub v_tangent: Vec2,
    pub color: Vec4,
}

impl From<&ControlPoint> for PackedControlPoint {
    fn from(point: &ControlPoint) -> Self {
        Self {
            location: point.location,
            u_tangent: point.u_tangent,
            v_tangent: point.v_tangent,
            color: point.color.extend(1.0),
        }
    }
}

/// Cubic Hermite basis at `t`, ordered `(h00, h01, h10, h11)` to line up
/// with the rows of a [`HermitePatch`] coefficient matrix.
#[inline]
pub fn hermite_basis(t: f32) -> Vec4 {
    let t2 = t * t;
    let t3 = t2 * t;
    Vec4::new(
        2.0 * t3 - 3.0 * t2 + 1.0,
        -2.0 * t3 + 3.0 * t2,
        t3 - 2.0 * t2 + t,
        t3 - t2,
    )
}

/// Coefficient matrices of one bicubic patch, one per scalar channel.
///
/// Row `i` pairs with the `i`-th `u` basis function and column `j` with the
/// `j`-th `v` basis function:
///
/// ```text
/// | P(0,0)  P(0,1)  Pv(0,0) Pv(0,1) |
/// | P(1,0)  P(1,1)  Pv(1,0) Pv(1,1) |
/// | Pu(0,0) Pu(0,1) 0       0       |
/// | Pu(1,0) Pu(1,1) 0       0       |
/// ```
///
/// Colors carry no tangents, so their derivative entries stay zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HermitePatch {
    x: Mat4,
    y: Mat4,
    r: Mat4,
    g: Mat4,
    b: Mat4,
}

impl HermitePatch {
    /// Builds the patch whose corners are `corners[a][b]` = point at
    /// `(column + a, row + b)`.
    pub fn new(corners: [[PackedControlPoint; 2]; 2]) -> Self {
        let [[p00, p01], [p10, p11]] = corners;

        let geometry = |axis: usize| {
            let value = |p: &PackedControlPoint| p.location[axis];
            let du = |p: &PackedControlPoint| p.u_tangent[axis];
            let dv = |p: &PackedControlPoint| p.v_tangent[axis];
            Mat4::from_cols(
                Vec4::new(value(&p00), value(&p10), du(&p00), du(&p10)),
                Vec4::new(value(&p01), value(&p11), du(&p01), du(&p11)),
                Vec4::new(dv(&p00), dv(&p10), 0.0, 0.0),
                Vec4::new(dv(&p01), dv(&p11), 0.0, 0.0),
            )
        };
        let color = |channel: usize| {
            Mat4::from_cols(
                Vec4::new(p00.color[channel], p10.color[channel], 0.0, 0.0),
                Vec4::new(p01.color[channel], p11.color[channel], 0.0, 0.0),
                Vec4::ZERO,
                Vec4::ZERO,
            )
        };

        Self {
            x: geometry(0),
            y: geometry(1),
            r: color(0),
            g: color(1),
            b: color(2),
        }
    }

    /// Evaluates the patch at `(u, v)` in `[0, 1]²`.
    pub fn evaluate(&self, u: f32, v: f32) -> MeshVertex {
        let hu = hermite_basis(u);
        let hv = hermite_basis(v);
        // Blend the four columns along u first, then the result along v.
        let blend = |m: &Mat4| m.transpose().mul_vec4(hu).dot(hv);

        MeshVertex {
            position: Vec2::new(blend(&self.x), blend(&self.y)),
            color: Vec4::new(blend(&self.r), blend(&self.g), blend(&self.b), 1.0),
        }
    }
}

/// Flat triangle list ready for a rasterizer.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TriangleMesh {
    /// Three vertices per triangle, not indexed.
    pub vertices: Vec<MeshVertex>,
    /// Width of the dense vertex grid the triangles were cut from.
    pub width: usize,
    /// Height of the dense vertex grid the triangles were cut from.
    pub height: usize,
}

impl TriangleMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Iterates over the triangles in emission order.
    pub fn triangles(&self) -> impl Iterator<Item = [MeshVertex; 3]> + '_ {
        self.vertices
            .chunks_exact(3)
            .map(|triangle| [triangle[0], triangle[1], triangle[2]])
    }
}

/// Bicubic Hermite tessellation at a fixed subdivision factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HermiteTessellator {
    subdivisions: u32,
}

impl HermiteTessellator {
    /// # Panics
    /// If `subdivisions` is zero.
    pub fn new(subdivisions: u32) -> Self {
        assert!(subdivisions >= 1, "subdivisions must be at least 1");
        Self { subdivisions }
    }

    pub fn subdivisions(&self) -> u32 {
        self.subdivisions
    }

    /// Parametric coordinate of lattice sample `i`. Samples span the closed
    /// unit interval, so neighbouring patches share their seam.
    #[inline]
    fn parameter(&self, i: usize) -> f32 {
        if self.subdivisions == 1 {
            0.0
        } else {
            i as f32 / (self.subdivisions - 1) as f32
        }
    }

    /// Size of the dense vertex grid produced for a control grid.
    pub fn dense_size(&self, grid: &Grid<ControlPoint>) -> (usize, usize) {
        let s = self.subdivisions as usize;
        (
            grid.width().saturating_sub(1) * s,
            grid.height().saturating_sub(1) * s,
        )
    }

    /// Stage 1 and 2: one patch per quad, sampled into a dense vertex grid of
    /// `((m - 1) * s) x ((n - 1) * s)`.
    ///
    /// # Panics
    /// If the control grid is narrower or shorter than 2.
    pub fn dense_vertices(&self, grid: &Grid<ControlPoint>) -> Grid<MeshVertex> {
        assert!(
            grid.width() >= 2 && grid.height() >= 2,
            "control grid must be at least 2x2 to form a patch, got {}x{}",
            grid.width(),
            grid.height()
        );

        let packed = grid.map(|point| PackedControlPoint::from(point));
        let patches_wide = grid.width() - 1;
        let patches_high = grid.height() - 1;

        let patches: Vec<HermitePatch> = (0..patches_wide * patches_high)
            .into_par_iter()
            .map(|i| {
                let (x, y) = (i % patches_wide, i / patches_wide);
                HermitePatch::new([
                    [packed[(x, y)], packed[(x, y + 1)]],
                    [packed[(x + 1, y)], packed[(x + 1, y + 1)]],
                ])
            })
            .collect();

        let s = self.subdivisions as usize;
        let (width, height) = self.dense_size(grid);
        let vertices: Vec<MeshVertex> = (0..width * height)
            .into_par_iter()
            .map(|i| {
                let (dx, dy) = (i % width, i / width);
                let patch = &patches[dx / s + (dy / s) * patches_wide];
                patch.evaluate(self.parameter(dx % s), self.parameter(dy % s))
            })
            .collect();

        Grid::from_vec(width, vertices)
    }

    /// Full pipeline: dense evaluation followed by triangulation.
    #[instrument(level = "debug", skip(self, grid), fields(width = grid.width(), height = grid.height(), subdivisions = self.subdivisions))]
    pub fn tessellate(&self, grid: &Grid<ControlPoint>) -> TriangleMesh {
        let dense = self.dense_vertices(grid);
        TriangleMesh {
            vertices: triangulate(&dense),
            width: dense.width(),
            height: dense.height(),
        }
    }
}

/// Stage 3: splits each unit quad of `dense` into
/// `(i,j) (i+1,j) (i,j+1)` and `(i+1,j) (i+1,j+1) (i,j+1)`.
///
/// Produces `(W - 1) * (H - 1) * 6` vertices.
pub fn triangulate(dense: &Grid<MeshVertex>) -> Vec<MeshVertex> {
    let width = dense.width();
    let height = dense.height();
    if width < 2 || height < 2 {
        return Vec::new();
    }

    (0..height - 1)
        .into_par_iter()
        .flat_map_iter(|j| {
            (0..width - 1).flat_map(move |i| {
                let top_left = dense[(i, j)];
                let top_right = dense[(i + 1, j)];
                let bottom_left = dense[(i, j + 1)];
                let bottom_right = dense[(i + 1, j + 1)];
                [
                    top_left,
                    top_right,
                    bottom_left,
                    top_right,
                    bottom_right,
                    bottom_left,
                ]
            })
        })
        .collect()
}

/// Tessellates `grid` with `subdivisions` samples per patch axis.
///
/// # Panics
/// If `subdivisions` is zero or the grid is smaller than 2x2.
pub fn tessellate(grid: &Grid<ControlPoint>, subdivisions: u32) -> TriangleMesh {
    HermiteTessellator::new(subdivisions).tessellate(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::MeshGenerator;
    use glam::Vec3;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_basis_partitions_unity() {
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            let h = hermite_basis(t);
            assert!(approx(h.x + h.y, 1.0), "h00 + h01 != 1 at {}", t);
        }
        assert_eq!(hermite_basis(0.0), Vec4::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(hermite_basis(1.0), Vec4::new(0.0, 1.0, 0.0, 0.0));
    }

    #[test]
    fn test_patch_hits_its_corners() {
        let grid = MeshGenerator::uniform(2, 2, Vec3::ONE);
        let packed = grid.map(|point| PackedControlPoint::from(point));
        let patch = HermitePatch::new([
            [packed[(0, 0)], packed[(0, 1)]],
            [packed[(1, 0)], packed[(1, 1)]],
        ]);

        assert_eq!(patch.evaluate(0.0, 0.0).position, Vec2::new(-1.0, -1.0));
        assert_eq!(patch.evaluate(1.0, 0.0).position, Vec2::new(1.0, -1.0));
        assert_eq!(patch.evaluate(0.0, 1.0).position, Vec2::new(-1.0, 1.0));
        assert_eq!(patch.evaluate(1.0, 1.0).position, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_uniform_tangents_reproduce_a_flat_lattice() {
        let grid = MeshGenerator::uniform(3, 3, Vec3::ZERO);
        let dense = HermiteTessellator::new(5).dense_vertices(&grid);
        assert_eq!((dense.width(), dense.height()), (10, 10));

        // First patch spans [-1, 0] on both axes in 5 evenly spaced samples.
        for i in 0..5 {
            let expected = -1.0 + i as f32 * 0.25;
            assert!(approx(dense[(i, 0)].position.x, expected));
            assert!(approx(dense[(0, i)].position.y, expected));
        }
        // Second patch starts on the shared seam.
        assert!(approx(dense[(5, 0)].position.x, 0.0));
        assert!(approx(dense[(9, 9)].position.x, 1.0));
        assert!(approx(dense[(9, 9)].position.y, 1.0));
    }

    #[test]
    fn test_colors_follow_corners() {
        let mut colors = Grid::new(2, 2, Vec3::ZERO);
        colors.set(1, 0, Vec3::X);
        colors.set(1, 1, Vec3::X);
        let grid = MeshGenerator::generate(&colors);
        let dense = HermiteTessellator::new(3).dense_vertices(&grid);

        assert_eq!(dense[(0, 0)].color, Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(dense[(2, 2)].color, Vec4::new(1.0, 0.0, 0.0, 1.0));
        // Smoothstep-shaped blend, exactly half way in the middle.
        assert!(approx(dense[(1, 1)].color.x, 0.5));
    }

    #[test]
    fn test_winding_order() {
        let dense = Grid::from_fn(2, 2, |x, y| MeshVertex {
            position: Vec2::new(x as f32, y as f32),
            color: Vec4::ONE,
        });
        let positions: Vec<Vec2> = triangulate(&dense).iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ]
        );

        let mesh = TriangleMesh {
            vertices: triangulate(&dense),
            width: 2,
            height: 2,
        };
        let triangles: Vec<[Vec2; 3]> = mesh
            .triangles()
            .map(|[a, b, c]| [a.position, b.position, c.position])
            .collect();
        assert_eq!(triangles.len(), mesh.triangle_count());
        assert_eq!(
            triangles,
            vec![
                [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
                [Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0)],
            ]
        );
    }

    #[test]
    fn test_single_subdivision_degenerates_cleanly() {
        let grid = MeshGenerator::uniform(2, 2, Vec3::ONE);
        let mesh = tessellate(&grid, 1);
        assert_eq!((mesh.width, mesh.height), (1, 1));
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    #[should_panic(expected = "subdivisions must be at least 1")]
    fn test_zero_subdivisions_panics() {
        let _ = HermiteTessellator::new(0);
    }

    #[test]
    #[should_panic(expected = "at least 2x2")]
    fn test_degenerate_grid_panics() {
        let grid = Grid::new(1, 4, ControlPoint::default());
        let _ = tessellate(&grid, 4);
    }
}
