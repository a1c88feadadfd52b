//! Crop region geometry.
//!
//! Regions come in two unit systems, both relative to the image as it is
//! *rendered on screen*:
//!
//! - `Percent`: coordinates are percentages of the rendered dimensions.
//!   Resolution-independent, so this is what the drag overlay emits.
//! - `Pixel`: coordinates are rendered-pixel values, as an integration might
//!   feed in. Converting to natural pixels scales by natural/rendered.

/// Unit system of a [`CropRegion`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropUnit {
    Percent,
    Pixel,
}

/// A rectangular crop selection over the rendered image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRegion {
    pub unit: CropUnit,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A crop rectangle resolved to natural (full-resolution) pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn percent(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            unit: CropUnit::Percent,
            x,
            y,
            width,
            height,
        }
    }

    pub fn pixels(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            unit: CropUnit::Pixel,
            x,
            y,
            width,
            height,
        }
    }

    /// Default selection for a freshly loaded image: centered, covering 80%
    /// of whichever dimension constrains the locked `aspect` (width/height).
    ///
    /// Recompute this whenever a new image is loaded or the aspect changes.
    pub fn centered_default(natural_width: u32, natural_height: u32, aspect: f32) -> Self {
        let media_aspect = natural_width as f32 / natural_height.max(1) as f32;

        // Start from 80% of the width; derive the height that keeps the
        // on-screen selection at `aspect`, then flip the constraint if it
        // does not fit vertically.
        let mut width = 80.0;
        let mut height = width * media_aspect / aspect;
        if height > 100.0 {
            height = 100.0;
            width = (height * aspect / media_aspect).min(100.0);
        }

        Self::percent((100.0 - width) / 2.0, (100.0 - height) / 2.0, width, height)
    }

    /// Resolve this region to natural pixels.
    ///
    /// `natural` are the image's full-resolution dimensions; `rendered` are
    /// the on-screen dimensions the region was expressed against. Returns
    /// `None` when the region is degenerate or entirely out of bounds.
    pub fn to_natural(&self, natural: (u32, u32), rendered: (f32, f32)) -> Option<PixelRect> {
        let (natural_w, natural_h) = (natural.0 as f32, natural.1 as f32);
        if natural_w < 1.0 || natural_h < 1.0 {
            return None;
        }

        let (x, y, w, h) = match self.unit {
            // Percentages are resolution-independent: apply them to the
            // natural dimensions directly
            CropUnit::Percent => (
                self.x / 100.0 * natural_w,
                self.y / 100.0 * natural_h,
                self.width / 100.0 * natural_w,
                self.height / 100.0 * natural_h,
            ),
            CropUnit::Pixel => {
                let scale_x = natural_w / rendered.0.max(1.0);
                let scale_y = natural_h / rendered.1.max(1.0);
                (
                    self.x * scale_x,
                    self.y * scale_y,
                    self.width * scale_x,
                    self.height * scale_y,
                )
            }
        };

        // Clamp into the image, keeping the far edge where it was
        let x0 = x.max(0.0);
        let y0 = y.max(0.0);
        let x1 = (x + w).min(natural_w);
        let y1 = (y + h).min(natural_h);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        let x = x0.round() as u32;
        let y = y0.round() as u32;
        let width = (x1.round() as u32).saturating_sub(x);
        let height = (y1.round() as u32).saturating_sub(y);
        if width == 0 || height == 0 {
            return None;
        }

        Some(PixelRect {
            x,
            y,
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_crop_square_aspect_on_square_image() {
        let crop = CropRegion::centered_default(1000, 1000, 1.0);
        assert_eq!(crop.unit, CropUnit::Percent);
        assert_eq!(crop.width, 80.0);
        assert_eq!(crop.height, 80.0);
        assert_eq!(crop.x, 10.0);
        assert_eq!(crop.y, 10.0);
    }

    #[test]
    fn test_default_crop_flips_constraint_on_wide_image() {
        // 2:1 image, square selection: height constrains
        let crop = CropRegion::centered_default(2000, 1000, 1.0);
        assert_eq!(crop.height, 100.0);
        assert!((crop.width - 50.0).abs() < 0.001);
        assert_eq!(crop.y, 0.0);
        assert!((crop.x - 25.0).abs() < 0.001);

        // Selection is square in natural pixels
        let rect = crop.to_natural((2000, 1000), (600.0, 300.0)).unwrap();
        assert_eq!(rect.width, 1000);
        assert_eq!(rect.height, 1000);
    }

    #[test]
    fn test_percent_to_natural() {
        let crop = CropRegion::percent(10.0, 10.0, 50.0, 50.0);
        let rect = crop.to_natural((1000, 1000), (400.0, 400.0)).unwrap();
        assert_eq!(
            rect,
            PixelRect {
                x: 100,
                y: 100,
                width: 500,
                height: 500
            }
        );
    }

    #[test]
    fn test_pixel_and_percent_agree() {
        // The same on-screen rectangle expressed in both unit systems
        let rendered = (400.0, 200.0);
        let natural = (1600, 800);
        let percent = CropRegion::percent(25.0, 25.0, 50.0, 50.0);
        let pixel = CropRegion::pixels(100.0, 50.0, 200.0, 100.0);

        let a = percent.to_natural(natural, rendered).unwrap();
        let b = pixel.to_natural(natural, rendered).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.width, 800);
        assert_eq!(a.height, 400);
    }

    #[test]
    fn test_out_of_bounds_is_clamped() {
        let crop = CropRegion::percent(-10.0, 90.0, 50.0, 50.0);
        let rect = crop.to_natural((1000, 1000), (400.0, 400.0)).unwrap();
        assert_eq!(rect.x, 0);
        assert_eq!(rect.width, 400); // -100..400 clamped to 0..400
        assert_eq!(rect.y, 900);
        assert_eq!(rect.height, 100); // 900..1400 clamped to 900..1000
    }

    #[test]
    fn test_degenerate_region_is_none() {
        assert!(CropRegion::percent(0.0, 0.0, 0.0, 50.0)
            .to_natural((1000, 1000), (400.0, 400.0))
            .is_none());
        assert!(CropRegion::percent(120.0, 0.0, 50.0, 50.0)
            .to_natural((1000, 1000), (400.0, 400.0))
            .is_none());
    }
}
