use crate::control_point::ControlPoint;
use crate::grid::Grid;

/// Something a renderer can pull a control grid from once per frame.
pub trait MeshDataProvider {
    /// Advances by one frame and returns the grid to draw.
    ///
    /// Static providers return the same grid every time; animated ones step
    /// their state, so call this exactly once per rendered frame.
    fn advance_frame(&mut self) -> Grid<ControlPoint>;
}

/// A provider whose grid only changes when the caller edits it.
#[derive(Clone, Debug, PartialEq)]
pub struct StaticMeshDataProvider {
    pub grid: Grid<ControlPoint>,
}

impl StaticMeshDataProvider {
    pub fn new(grid: Grid<ControlPoint>) -> Self {
        Self { grid }
    }
}

impl MeshDataProvider for StaticMeshDataProvider {
    fn advance_frame(&mut self) -> Grid<ControlPoint> {
        self.grid.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::MeshGenerator;
    use glam::{Vec2, Vec3};

    #[test]
    fn test_static_provider_has_no_side_effects() {
        let grid = MeshGenerator::uniform(3, 3, Vec3::ONE);
        let mut provider = StaticMeshDataProvider::new(grid.clone());
        assert_eq!(provider.advance_frame(), grid);
        assert_eq!(provider.advance_frame(), grid);

        provider.grid[(1, 1)].location = Vec2::new(0.2, 0.1);
        assert_eq!(provider.advance_frame()[(1, 1)].location, Vec2::new(0.2, 0.1));
    }
}
