//! Luma weights using ITU-R BT.601 coefficients.
//!
//! Shared by grayscale conversion, the YUV transform and the tone enhancers
//! so that every "brightness-only" path agrees on the same weighting.

/// BT.601 coefficient for the red channel.
pub const LUMA_R: f32 = 0.299;

/// BT.601 coefficient for the green channel.
pub const LUMA_G: f32 = 0.587;

/// BT.601 coefficient for the blue channel.
pub const LUMA_B: f32 = 0.114;

/// Luma of channel values in any consistent scale (0-1 or 0-255).
#[inline]
pub fn luma(r: f32, g: f32, b: f32) -> f32 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}

/// Luma of 8-bit channel values, rounded to the nearest level.
#[inline]
pub fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    luma(r as f32, g as f32, b as f32).clamp(0.0, 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficients_sum_to_one() {
        let sum = LUMA_R + LUMA_G + LUMA_B;
        assert!((sum - 1.0).abs() < 1e-6, "Coefficients should sum to 1.0");
    }

    #[test]
    fn test_gray_preserves_value() {
        for v in [0u8, 1, 64, 128, 192, 254, 255] {
            assert_eq!(luma_u8(v, v, v), v, "Gray {} should map to itself", v);
        }
    }

    #[test]
    fn test_primaries() {
        // 0.299 * 255 = 76.2, 0.587 * 255 = 149.7, 0.114 * 255 = 29.1
        assert_eq!(luma_u8(255, 0, 0), 76);
        assert_eq!(luma_u8(0, 255, 0), 150);
        assert_eq!(luma_u8(0, 0, 255), 29);
    }
}
