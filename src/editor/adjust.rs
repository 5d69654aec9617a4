//! Global brightness/contrast adjustment of the working photo.
//!
//! Parameters accumulate in fixed 0.1 steps and are re-applied from the
//! unadjusted source each time, so equal numbers of up and down taps land
//! back exactly on the starting value. The parameters are deliberately
//! unclamped; only the output pixels are.

use image::RgbaImage;

/// Per-tap step for both parameters.
pub const STEP: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Adjustments {
    /// Contrast multiplier about mid-gray; 1.0 is neutral.
    pub contrast: f32,
    /// Brightness offset; 0.0 is neutral.
    pub brightness: f32,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            contrast: 1.0,
            brightness: 0.0,
        }
    }
}

impl Adjustments {
    pub fn contrast_up(&mut self) {
        self.contrast += STEP;
    }

    pub fn contrast_down(&mut self) {
        self.contrast -= STEP;
    }

    pub fn brightness_up(&mut self) {
        self.brightness += STEP;
    }

    pub fn brightness_down(&mut self) {
        self.brightness -= STEP;
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }
}

/// Applies the adjustments to every pixel: `(c - 0.5) * contrast + 0.5 +
/// brightness` per channel, output clamped to the displayable range. Alpha
/// is untouched.
pub fn apply(img: &RgbaImage, adj: Adjustments) -> RgbaImage {
    if adj.is_neutral() {
        return img.clone();
    }
    let mut out = img.clone();
    for px in out.pixels_mut() {
        for i in 0..3 {
            let c = px.0[i] as f32 / 255.0;
            let c = (c - 0.5) * adj.contrast + 0.5 + adj.brightness;
            px.0[i] = (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn neutral_adjustments_are_identity() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([10, 120, 250, 255]));
        let out = apply(&img, Adjustments::default());
        assert_eq!(out, img);
    }

    #[test]
    fn contrast_pivots_around_mid_gray() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([128, 128, 128, 255]));
        let mut adj = Adjustments::default();
        adj.contrast_up();
        adj.contrast_up();
        let out = apply(&img, adj);
        // 128/255 is barely above the pivot; it must stay put (within rounding).
        let px = out.get_pixel(0, 0).0;
        assert!(px[0].abs_diff(128) <= 1, "got {px:?}");
    }

    #[test]
    fn brightness_shifts_and_clamps() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([200, 200, 200, 255]));
        let adj = Adjustments {
            contrast: 1.0,
            brightness: 0.5,
        };
        assert_eq!(apply(&img, adj).get_pixel(0, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn steps_are_symmetric_and_unclamped() {
        let mut adj = Adjustments::default();
        for _ in 0..15 {
            adj.contrast_down();
        }
        // Well below zero: no clamp on the parameter itself.
        assert!(adj.contrast < 0.0);
        for _ in 0..15 {
            adj.contrast_up();
        }
        assert!((adj.contrast - 1.0).abs() < 1e-5);
    }

    #[test]
    fn alpha_is_preserved() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([100, 100, 100, 42]));
        let adj = Adjustments {
            contrast: 1.3,
            brightness: -0.2,
        };
        assert_eq!(apply(&img, adj).get_pixel(0, 0).0[3], 42);
    }
}
