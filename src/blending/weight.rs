//! Quintic blend weight `α(s) = 6s⁵ − 15s⁴ + 10s³`
//!
//! Value, slope and curvature vanish at both ends of the window, so blending two rest-to-rest
//! segments with this weight keeps position, velocity and acceleration continuous.

/// Blend weight and its derivatives with respect to the normalized time `s`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeight {
    pub value: f64,
    pub first: f64,
    pub second: f64,
}

impl BlendWeight {
    /// Evaluate the weight at `s`, clamped to `[0, 1]`
    pub fn at(s: f64) -> Self {
        let s = s.clamp(0.0, 1.0);
        let s2 = s * s;
        let s3 = s2 * s;
        BlendWeight {
            value: s3 * (10.0 + s * (6.0 * s - 15.0)),
            first: 30.0 * s2 * (s - 1.0) * (s - 1.0),
            second: 60.0 * s * (s - 1.0) * (2.0 * s - 1.0),
        }
    }
}
