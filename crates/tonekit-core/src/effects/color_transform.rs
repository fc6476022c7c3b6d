//! Hue rotation with value and saturation scaling in HSV.
//!
//! Hue moves by `round(30 * brightness)` half-degree units, so the neutral
//! setting still rotates hue by 60 degrees. Value scales by `contrast` and
//! saturation by `saturation`, both clamped to `[0, 255]`.

use super::EffectParams;
use crate::buffer::ImageBuffer;
use crate::color::hsv::HUE_RANGE;
use crate::color::{hsv_to_rgb, rgb_to_hsv, HsvImage};

/// Hue units added per unit of brightness.
const HUE_SHIFT_PER_UNIT: f32 = 30.0;

pub fn apply(image: &ImageBuffer, params: &EffectParams) -> ImageBuffer {
    hsv_to_rgb(&shift_hsv(&rgb_to_hsv(image), params))
}

/// Apply the hue shift and value/saturation gains to HSV pixels.
pub fn shift_hsv(image: &HsvImage, params: &EffectParams) -> HsvImage {
    let shift = (HUE_SHIFT_PER_UNIT * params.brightness).round();
    let pixels = image
        .pixels
        .iter()
        .map(|px| {
            let mut px = *px;
            px.h = (px.h + shift).rem_euclid(HUE_RANGE);
            px.v = (px.v * params.contrast).clamp(0.0, 255.0);
            px.s = (px.s * params.saturation).clamp(0.0, 255.0);
            px
        })
        .collect();
    HsvImage {
        width: image.width,
        height: image.height,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Hsv;

    #[test]
    fn test_gray_gets_hue_but_stays_gray() {
        let img = ImageBuffer::filled(4, 4, [128, 128, 128]);
        let hsv = shift_hsv(&rgb_to_hsv(&img), &EffectParams::default());
        assert!(hsv.pixels.iter().all(|px| *px == Hsv { h: 30.0, s: 0.0, v: 128.0 }));
        assert_eq!(apply(&img, &EffectParams::default()), img);
    }

    #[test]
    fn test_hue_wraps() {
        let hsv = HsvImage {
            width: 1,
            height: 1,
            pixels: vec![Hsv { h: 170.0, s: 255.0, v: 255.0 }],
        };
        let out = shift_hsv(&hsv, &EffectParams::new(1.0, 1.0, 1.0));
        assert_eq!(out.pixels[0].h, 20.0);
    }

    #[test]
    fn test_red_rotates_to_yellow() {
        // 30 units = 60 degrees
        let img = ImageBuffer::filled(1, 1, [255, 0, 0]);
        assert_eq!(apply(&img, &EffectParams::default()).data(), &[255, 255, 0]);
    }

    #[test]
    fn test_value_and_saturation_clamp() {
        let hsv = HsvImage {
            width: 1,
            height: 1,
            pixels: vec![Hsv { h: 0.0, s: 200.0, v: 200.0 }],
        };
        let out = shift_hsv(&hsv, &EffectParams::new(0.01, 3.0, 0.0));
        assert_eq!(out.pixels[0].v, 255.0);
        assert_eq!(out.pixels[0].s, 0.0);
    }

    #[test]
    fn test_zero_saturation_is_gray() {
        let img = ImageBuffer::filled(2, 2, [200, 40, 90]);
        let out = apply(&img, &EffectParams::new(1.0, 1.0, 0.0));
        let px = out.pixel(0, 0);
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
        assert_eq!(px[0], 200);
    }
}
