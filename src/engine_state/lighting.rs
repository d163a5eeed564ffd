//! # Point Light Model
//!
//! CPU-side point light parameters and the fixed 64-byte layout they are packed
//! into for the shading stage's structured light buffer.

use bytemuck::{Pod, Zeroable};
use cgmath::{Point3, Vector3};

/// A point light emitted by a block.
///
/// Every field is mandatory; there is no partially specified light.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointLight {
    /// World-space position of the light
    pub position: Point3<f32>,
    /// Constant attenuation term
    pub constant: f32,
    /// Linear attenuation term
    pub linear: f32,
    /// Quadratic attenuation term
    pub quadratic: f32,
    /// Ambient color contribution
    pub ambient: Vector3<f32>,
    /// Diffuse color contribution, also used as the emitter's own color
    pub diffuse: Vector3<f32>,
    /// Specular color contribution
    pub specular: Vector3<f32>,
}

impl PointLight {
    /// Packs the light into its GPU layout.
    ///
    /// # Returns
    /// The light as a [`PackedPointLight`]; identical inputs always give identical bytes.
    pub fn pack(&self) -> PackedPointLight {
        PackedPointLight {
            position: self.position.into(),
            _padding: 0.0,
            ambient: self.ambient.into(),
            constant: self.constant,
            diffuse: self.diffuse.into(),
            linear: self.linear,
            specular: self.specular.into(),
            quadratic: self.quadratic,
        }
    }
}

/// GPU representation of a [`PointLight`].
///
/// # Memory Layout
/// 16 sequential `f32`s, each vec3 padded to a 16-byte row by the scalar after it:
///
/// | floats | contents             |
/// |--------|----------------------|
/// | 0..4   | position, padding    |
/// | 4..8   | ambient, constant    |
/// | 8..12  | diffuse, linear      |
/// | 12..16 | specular, quadratic  |
///
/// Total size: 64 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PackedPointLight {
    position: [f32; 3],
    _padding: f32,
    ambient: [f32; 3],
    constant: f32,
    diffuse: [f32; 3],
    linear: f32,
    specular: [f32; 3],
    quadratic: f32,
}

const _: () = assert!(std::mem::size_of::<PackedPointLight>() == 64);

impl PackedPointLight {
    /// Byte stride of one light in the structured buffer.
    pub const STRIDE: usize = std::mem::size_of::<PackedPointLight>();

    /// The 16 floats in buffer order.
    pub fn as_floats(&self) -> [f32; 16] {
        bytemuck::cast(*self)
    }

    /// Packed position.
    pub fn position(&self) -> [f32; 3] {
        self.position
    }

    /// Packed diffuse color.
    pub fn diffuse(&self) -> [f32; 3] {
        self.diffuse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_light() -> PointLight {
        PointLight {
            position: Point3::new(5.0, 2.0, 5.0),
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
            ambient: Vector3::new(0.8, 0.0, 0.0),
            diffuse: Vector3::new(1.0, 0.0, 0.0),
            specular: Vector3::new(0.4, 0.0, 0.0),
        }
    }

    #[test]
    fn pack_emits_sixteen_floats_in_documented_order() {
        let floats = sample_light().pack().as_floats();
        assert_eq!(
            floats,
            [
                5.0, 2.0, 5.0, 0.0, //
                0.8, 0.0, 0.0, 1.0, //
                1.0, 0.0, 0.0, 0.09, //
                0.4, 0.0, 0.0, 0.032,
            ]
        );
    }

    #[test]
    fn pack_is_deterministic_bytewise() {
        let light = sample_light();
        let a = light.pack();
        let b = light.pack();
        assert_eq!(bytemuck::bytes_of(&a), bytemuck::bytes_of(&b));
        assert_eq!(bytemuck::bytes_of(&a).len(), PackedPointLight::STRIDE);
    }

    #[test]
    fn stride_is_sixty_four_bytes() {
        assert_eq!(PackedPointLight::STRIDE, 64);
        let lights = [sample_light().pack(), sample_light().pack()];
        assert_eq!(bytemuck::cast_slice::<_, u8>(&lights).len(), 128);
    }
}
