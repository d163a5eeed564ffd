//! Lighting capability: makes a placed block a point-light emitter.

use cgmath::Point3;

use crate::engine_state::lighting::PointLight;

use super::Placeable;

/// Binds a [`PointLight`] to the grid cell of its owner.
///
/// The light's own position is kept as given; the cell records where the emitter
/// sits in the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct LightingCapability {
    light: PointLight,
    cell: Option<Point3<i32>>,
}

impl LightingCapability {
    /// Wraps `light`; the cell is bound when the capability is attached.
    pub fn new(light: PointLight) -> Self {
        Self { light, cell: None }
    }

    pub(super) fn bind(&mut self, owner: &dyn Placeable) {
        self.cell = Some(owner.location());
    }

    /// The emitted light.
    pub fn light(&self) -> &PointLight {
        &self.light
    }

    /// Grid cell of the owner, `None` before attach.
    pub fn cell(&self) -> Option<Point3<i32>> {
        self.cell
    }
}
