//! # Render Façade
//!
//! Pairs a [`MeshDataProvider`] with a tessellator: one call per displayed
//! frame yields the triangle list a rasterizer draws.
//!
//! GPU submission, noise textures and presentation live outside this crate;
//! they only ever see the [`TriangleMesh`] produced here.

use crate::animator::{AnimatorConfig, MeshAnimator};
use crate::config::MeshGradientConfig;
use crate::control_point::ControlPoint;
use crate::errors::MeshError;
use crate::grid::Grid;
use crate::provider::{MeshDataProvider, StaticMeshDataProvider};
use crate::tessellator::{HermiteTessellator, TriangleMesh};
use tracing::debug;

/// Samples per patch axis when nothing else is configured.
pub const DEFAULT_SUBDIVISIONS: u32 = 18;

/// Where a [`MeshGradient`] gets its control grid from.
pub enum MeshSource {
    Static(StaticMeshDataProvider),
    Animated(MeshAnimator),
}

impl MeshDataProvider for MeshSource {
    fn advance_frame(&mut self) -> Grid<ControlPoint> {
        match self {
            MeshSource::Static(provider) => provider.advance_frame(),
            MeshSource::Animated(animator) => animator.advance_frame(),
        }
    }
}

fn check_grid(grid: &Grid<ControlPoint>) -> Result<(), MeshError> {
    if grid.width() < 2 || grid.height() < 2 {
        return Err(MeshError::GridTooSmall {
            width: grid.width(),
            height: grid.height(),
        });
    }
    Ok(())
}

/// A static or animated mesh gradient, ready to be pulled frame by frame.
pub struct MeshGradient {
    source: MeshSource,
    tessellator: HermiteTessellator,
}

impl MeshGradient {
    /// A gradient that always shows `grid`.
    pub fn fixed(grid: Grid<ControlPoint>) -> Result<Self, MeshError> {
        check_grid(&grid)?;
        Ok(Self {
            source: MeshSource::Static(StaticMeshDataProvider::new(grid)),
            tessellator: HermiteTessellator::new(DEFAULT_SUBDIVISIONS),
        })
    }

    /// A gradient that animates away from `grid` according to `config`.
    pub fn animated(grid: Grid<ControlPoint>, config: AnimatorConfig) -> Result<Self, MeshError> {
        check_grid(&grid)?;
        Ok(Self {
            source: MeshSource::Animated(MeshAnimator::try_new(grid, config)?),
            tessellator: HermiteTessellator::new(DEFAULT_SUBDIVISIONS),
        })
    }

    /// Builds a static or animated gradient as described by `config`.
    pub fn from_config(
        grid: Grid<ControlPoint>,
        config: &MeshGradientConfig,
    ) -> Result<Self, MeshError> {
        config.validate()?;
        let gradient = if config.is_static {
            Self::fixed(grid)?
        } else {
            Self::animated(grid, config.to_animator_config()?)?
        };
        gradient.with_subdivisions(config.subdivisions)
    }

    pub fn with_subdivisions(mut self, subdivisions: u32) -> Result<Self, MeshError> {
        self.set_subdivisions(subdivisions)?;
        Ok(self)
    }

    pub fn subdivisions(&self) -> u32 {
        self.tessellator.subdivisions()
    }

    pub fn set_subdivisions(&mut self, subdivisions: u32) -> Result<(), MeshError> {
        if subdivisions == 0 {
            return Err(MeshError::InvalidSubdivisions);
        }
        debug!(subdivisions, "mesh gradient subdivisions changed");
        self.tessellator = HermiteTessellator::new(subdivisions);
        Ok(())
    }

    pub fn source(&self) -> &MeshSource {
        &self.source
    }

    /// Access to the provider, e.g. to edit a static grid or reconfigure the
    /// animator between frames.
    pub fn source_mut(&mut self) -> &mut MeshSource {
        &mut self.source
    }

    pub fn is_animated(&self) -> bool {
        matches!(self.source, MeshSource::Animated(_))
    }

    /// Advances the source once and tessellates the result.
    pub fn next_frame(&mut self) -> TriangleMesh {
        let grid = self.source.advance_frame();
        self.tessellator.tessellate(&grid)
    }
}
