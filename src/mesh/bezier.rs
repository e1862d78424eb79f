//! Quadratic Bezier curves for river banks

use glam::Vec3;

/// Curve with one control point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezier {
    pub start: Vec3,
    pub control: Vec3,
    pub end: Vec3,
}

impl QuadraticBezier {
    pub fn new(start: Vec3, control: Vec3, end: Vec3) -> Self {
        Self {
            start,
            control,
            end,
        }
    }

    /// Point at parameter `t` in `[0, 1]`
    #[inline]
    pub fn point(&self, t: f32) -> Vec3 {
        self.start
            .lerp(self.control, t)
            .lerp(self.control.lerp(self.end, t), t)
    }

    /// Fill `out` with evenly spaced samples from start to end
    ///
    /// Both endpoints are included exactly.
    pub fn sample_into(&self, out: &mut [Vec3]) {
        match out.len() {
            0 => {}
            1 => out[0] = self.start,
            n => {
                let last = (n - 1) as f32;
                for (j, slot) in out.iter_mut().enumerate() {
                    *slot = self.point(j as f32 / last);
                }
            }
        }
    }
}
