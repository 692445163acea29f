//! # Mesh Animator
//!
//! Drives every control point from its current state towards a randomized
//! target, one frame per call.
//!
//! ## Lifecycle of a cell
//! - Each frame, `progress` grows by `step_size` and the emitted point is the
//!   smoothstep-eased blend between `origin` and `target`.
//! - Once `progress` reaches 1 the cell emits `target` exactly and is
//!   retargeted in the same frame: the emitted point becomes the new origin, a
//!   new duration is drawn, and the new target is a freshly randomized copy of
//!   the cell's *construction-time* point, never of the live one, so
//!   randomization does not compound from one transition to the next.
//!
//! There is no wall clock. The animation advances exactly once per
//! [`MeshAnimator::advance_frame`] call, so `frames_per_second` only sets how
//! many calls a transition lasts.

use crate::animation::smoothstep;
use crate::control_point::ControlPoint;
use crate::errors::MeshError;
use crate::grid::Grid;
use crate::provider::MeshDataProvider;
use crate::randomizer::MeshRandomizer;
use keyframe::CanTween;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::ops::RangeInclusive;
use tracing::{debug, trace};

pub const DEFAULT_FRAMES_PER_SECOND: u32 = 60;
pub const DEFAULT_ANIMATION_SPEED_RANGE: RangeInclusive<f64> = 2.0..=5.0;

/// Animation settings.
#[derive(Clone, Debug)]
pub struct AnimatorConfig {
    /// Expected frame rate of whoever calls [`MeshAnimator::advance_frame`].
    pub frames_per_second: u32,
    /// Bounds, in seconds, for the duration of a single transition.
    /// Lower means faster.
    pub animation_speed_range: RangeInclusive<f64>,
    pub mesh_randomizer: MeshRandomizer,
    /// Seeds the animator's random source. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl AnimatorConfig {
    pub fn new(mesh_randomizer: MeshRandomizer) -> Self {
        Self {
            frames_per_second: DEFAULT_FRAMES_PER_SECOND,
            animation_speed_range: DEFAULT_ANIMATION_SPEED_RANGE,
            mesh_randomizer,
            seed: None,
        }
    }

    pub fn with_frames_per_second(mut self, frames_per_second: u32) -> Self {
        self.frames_per_second = frames_per_second;
        self
    }

    pub fn with_speed_range(mut self, animation_speed_range: RangeInclusive<f64>) -> Self {
        self.animation_speed_range = animation_speed_range;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        if self.frames_per_second == 0 {
            return Err(MeshError::InvalidFramesPerSecond);
        }
        let (min, max) = (
            *self.animation_speed_range.start(),
            *self.animation_speed_range.end(),
        );
        // Written so that NaN bounds fail too.
        if !(min > 0.0 && min <= max && max.is_finite()) {
            return Err(MeshError::InvalidSpeedRange { min, max });
        }
        Ok(())
    }
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self::new(MeshRandomizer::default())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct AnimationState {
    target: ControlPoint,
    origin: ControlPoint,
    progress: f64,
    step_size: f64,
}

impl AnimationState {
    fn advance(&mut self) -> ControlPoint {
        self.progress += self.step_size;
        if self.progress >= 1.0 {
            return self.target;
        }
        ControlPoint::ease(self.origin, self.target, smoothstep(self.progress))
    }
}

/// Builds the next transition of cell `(x, y)`, starting at `origin`.
fn next_transition(
    config: &AnimatorConfig,
    base: &Grid<ControlPoint>,
    rng: &mut StdRng,
    x: usize,
    y: usize,
    origin: ControlPoint,
) -> AnimationState {
    let duration = rng.gen_range(config.animation_speed_range.clone());
    let step_size = (1.0 / config.frames_per_second as f64) / duration;

    let rng: &mut dyn RngCore = rng;
    let (width, height) = (base.width(), base.height());
    let randomizer = &config.mesh_randomizer;
    let mut target = base[(x, y)];

    (randomizer.location_randomizer)(&mut target.location, x, y, width, height, rng);
    (randomizer.turbulency_randomizer)(&mut target.u_tangent, x, y, width, height, rng);
    (randomizer.turbulency_randomizer)(&mut target.v_tangent, x, y, width, height, rng);
    let base_color = target.color;
    (randomizer.color_randomizer)(&mut target.color, base_color, x, y, width, height, rng);

    AnimationState {
        target,
        origin,
        progress: 0.0,
        step_size,
    }
}

/// A [`MeshDataProvider`] that keeps every control point in motion.
///
/// Not thread-safe by itself: drive it from a single render loop.
pub struct MeshAnimator {
    initial_grid: Grid<ControlPoint>,
    config: AnimatorConfig,
    states: Grid<AnimationState>,
    rng: StdRng,
}

impl MeshAnimator {
    /// # Panics
    /// If `config` fails [`AnimatorConfig::validate`].
    pub fn new(grid: Grid<ControlPoint>, config: AnimatorConfig) -> Self {
        match Self::try_new(grid, config) {
            Ok(animator) => animator,
            Err(e) => panic!("invalid animator configuration: {e}"),
        }
    }

    /// Validates `config`, then schedules a first transition for every cell so
    /// the very first frame is already in motion.
    pub fn try_new(grid: Grid<ControlPoint>, config: AnimatorConfig) -> Result<Self, MeshError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let states = Grid::from_fn(grid.width(), grid.height(), |x, y| {
            next_transition(&config, &grid, &mut rng, x, y, grid[(x, y)])
        });

        debug!(
            width = grid.width(),
            height = grid.height(),
            fps = config.frames_per_second,
            "mesh animator ready"
        );

        Ok(Self {
            initial_grid: grid,
            config,
            states,
            rng,
        })
    }

    /// Steps every cell by one frame and returns the resulting grid.
    pub fn advance_frame(&mut self) -> Grid<ControlPoint> {
        Grid::from_fn(self.states.width(), self.states.height(), |x, y| {
            let state = &mut self.states[(x, y)];
            let point = state.advance();
            if state.progress >= 1.0 {
                *state = next_transition(
                    &self.config,
                    &self.initial_grid,
                    &mut self.rng,
                    x,
                    y,
                    point,
                );
                trace!(x, y, step_size = state.step_size, "retargeted control point");
            }
            point
        })
    }

    /// The grid the animator was built from. Targets are always derived from it.
    pub fn initial_grid(&self) -> &Grid<ControlPoint> {
        &self.initial_grid
    }

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    /// Replaces the configuration. Running transitions keep their step size;
    /// the new settings apply from each cell's next retarget. A `Some` seed
    /// restarts the random source from that seed.
    pub fn set_config(&mut self, config: AnimatorConfig) -> Result<(), MeshError> {
        config.validate()?;
        if let Some(seed) = config.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        debug!(
            fps = config.frames_per_second,
            seed = ?config.seed,
            "mesh animator reconfigured"
        );
        self.config = config;
        Ok(())
    }

    /// Caps the frame rate at what the display actually delivers.
    pub fn clamp_frames_per_second(&mut self, display_fps: u32) {
        self.config.frames_per_second = self.config.frames_per_second.min(display_fps.max(1));
    }
}

impl MeshDataProvider for MeshAnimator {
    fn advance_frame(&mut self) -> Grid<ControlPoint> {
        MeshAnimator::advance_frame(self)
    }
}
