//! Axis-aligned world regions.
//!
//! World regions are boxes centered on the origin, described by their
//! half-size (`half`).  Only the x/z extents matter for ground agents; `y`
//! is carried so the same value can describe a 3-D region.

use crate::Vec3;

/// An origin-centered, axis-aligned box given by its half-size.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extents {
    pub half: Vec3,
}

impl Extents {
    pub const fn new(half_x: f32, half_y: f32, half_z: f32) -> Self {
        Self { half: Vec3::new(half_x, half_y, half_z) }
    }

    /// Minimum corner.
    #[inline]
    pub fn min(self) -> Vec3 {
        -self.half
    }

    /// Maximum corner.
    #[inline]
    pub fn max(self) -> Vec3 {
        self.half
    }

    /// `true` if `p` lies strictly inside the box on the ground plane.
    #[inline]
    pub fn contains_xz(self, p: Vec3) -> bool {
        p.x > -self.half.x && p.x < self.half.x && p.z > -self.half.z && p.z < self.half.z
    }

    /// `true` if every half-size of `self` is at least as large as `inner`'s.
    pub fn encloses(self, inner: Extents) -> bool {
        self.half.x >= inner.half.x && self.half.z >= inner.half.z
    }
}
