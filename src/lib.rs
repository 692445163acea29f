//! # Mesh Gradient
//!
//! `mesh-gradient` builds smoothly varying, animatable colored surfaces from a
//! sparse grid of control points and tessellates them into triangle lists.
//!
//! Each control point carries a color, a position and two tangents. Every quad
//! of neighbouring points defines a bicubic Hermite patch; sampling all patches
//! gives a dense vertex grid that is cut into triangles for a rasterizer.
//!
//! ## Core Features
//!
//! *   **Generation**: [`MeshGenerator`] spreads a coarse color grid over `[-1, 1]²`.
//! *   **Tessellation**: [`HermiteTessellator`] evaluates patches in parallel and emits a flat triangle list.
//! *   **Animation**: [`MeshAnimator`] keeps every point gliding towards randomized targets with smoothstep easing.
//! *   **Policies**: [`MeshRandomizer`] bundles swappable location, tangent and color randomizers.
//!
//! ## Usage
//!
//! ```rust
//! use mesh_gradient::{AnimatorConfig, Grid, MeshGenerator, MeshGradient, MeshRandomizer};
//! use glam::Vec3;
//!
//! let colors = Grid::from_vec(2, vec![Vec3::X, Vec3::Y, Vec3::Z, Vec3::ONE]);
//! let grid = MeshGenerator::generate(&colors);
//!
//! let config = AnimatorConfig::new(MeshRandomizer::default()).with_seed(7);
//! let mut gradient = MeshGradient::animated(grid, config)?.with_subdivisions(8)?;
//!
//! let frame = gradient.next_frame();
//! assert_eq!(frame.vertex_count(), 7 * 7 * 6);
//! # Ok::<(), mesh_gradient::MeshError>(())
//! ```

/// Row-major 2D container shared by every stage.
pub mod grid;

/// Element-wise vector arithmetic used for easing whole control points.
pub mod vector;

/// The per-node color, position and tangent record.
pub mod control_point;

/// Easing curve and tweening for control points.
pub mod animation;

/// Initial control grids from color distributions.
pub mod generator;

/// Swappable randomization policies.
pub mod randomizer;

/// Bicubic Hermite patch evaluation and triangulation.
pub mod tessellator;

/// The provider capability and its static implementation.
pub mod provider;

/// Frame-stepped animation of control grids.
pub mod animator;

/// Provider plus tessellator, one triangle list per frame.
pub mod render;

/// JSON configuration.
pub mod config;

pub mod errors;

pub use animation::{smoothstep, Smoothstep};
pub use animator::{AnimatorConfig, MeshAnimator};
pub use config::MeshGradientConfig;
pub use control_point::{Color, ControlPoint};
pub use errors::MeshError;
pub use generator::MeshGenerator;
pub use grid::Grid;
pub use provider::{MeshDataProvider, StaticMeshDataProvider};
pub use randomizer::MeshRandomizer;
pub use render::{MeshGradient, MeshSource, DEFAULT_SUBDIVISIONS};
pub use tessellator::{tessellate, HermiteTessellator, MeshVertex, TriangleMesh};
pub use vector::VectorArithmetic;
