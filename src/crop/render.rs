//! Rasterization of a committed crop region into a PNG.

use std::io::Cursor;

use image::{imageops::FilterType, DynamicImage, ImageFormat};

use super::budget::PixelBudget;
use super::region::CropRegion;
use crate::error::CropError;

/// The finished artifact: encoded PNG bytes plus a suggested file name.
/// Ownership moves to the caller; nothing is retained here.
#[derive(Debug, Clone)]
pub struct ExportedAsset {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

/// Rasterize `region` of `source` into a PNG no larger than `budget`.
///
/// The region is resolved to natural pixels against `rendered` (the
/// on-screen dimensions it was expressed over), the output size is the crop
/// size scaled by `min(max_w/w, max_h/h, 1)` — never upscaled — and the crop
/// plus downscale happen in a single resample.
pub fn render_cropped_asset(
    source: &DynamicImage,
    region: &CropRegion,
    rendered: (f32, f32),
    budget: Option<PixelBudget>,
    file_name: &str,
) -> Result<ExportedAsset, CropError> {
    let rect = region
        .to_natural((source.width(), source.height()), rendered)
        .ok_or(CropError::EmptyRegion)?;

    let (mut out_width, mut out_height) = (rect.width, rect.height);
    if let Some(budget) = budget {
        let scale = (budget.max_width as f32 / rect.width as f32)
            .min(budget.max_height as f32 / rect.height as f32)
            .min(1.0);
        if scale < 1.0 {
            out_width = ((rect.width as f32 * scale).round() as u32).max(1);
            out_height = ((rect.height as f32 * scale).round() as u32).max(1);
        }
    }

    let cropped = source.crop_imm(rect.x, rect.y, rect.width, rect.height);
    let output = if (out_width, out_height) == (rect.width, rect.height) {
        cropped
    } else {
        cropped.resize_exact(out_width, out_height, FilterType::Lanczos3)
    };

    let mut bytes = Vec::new();
    output.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

    Ok(ExportedAsset {
        bytes,
        file_name: file_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crop::budget::{PrintSize, DEFAULT_PRINT_DPI};
    use crate::crop::region::CropRegion;

    fn test_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::new_rgb8(width, height)
    }

    fn decode_dims(asset: &ExportedAsset) -> (u32, u32) {
        let decoded = image::load_from_memory(&asset.bytes).unwrap();
        (decoded.width(), decoded.height())
    }

    #[test]
    fn test_downscales_to_budget() {
        // 1000×1000 natural, 50%×50% crop = 500×500, budget 295×295:
        // scale = min(295/500, 295/500, 1) = 0.59 → 295×295
        let source = test_image(1000, 1000);
        let region = CropRegion::percent(10.0, 10.0, 50.0, 50.0);
        let budget = PrintSize::new(2.5, 2.5).pixel_budget(DEFAULT_PRINT_DPI);

        let asset =
            render_cropped_asset(&source, &region, (500.0, 500.0), Some(budget), "logo.png")
                .unwrap();

        assert_eq!(decode_dims(&asset), (295, 295));
        assert_eq!(asset.file_name, "logo.png");
        // PNG signature
        assert_eq!(&asset.bytes[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_never_upscales() {
        // 200×200 crop fits inside the 295×295 budget: output is exact
        let source = test_image(1000, 1000);
        let region = CropRegion::percent(0.0, 0.0, 20.0, 20.0);
        let budget = PrintSize::new(2.5, 2.5).pixel_budget(DEFAULT_PRINT_DPI);

        let asset =
            render_cropped_asset(&source, &region, (500.0, 500.0), Some(budget), "logo.png")
                .unwrap();

        assert_eq!(decode_dims(&asset), (200, 200));
    }

    #[test]
    fn test_no_budget_keeps_natural_size() {
        let source = test_image(800, 600);
        let region = CropRegion::percent(25.0, 25.0, 50.0, 50.0);

        let asset = render_cropped_asset(&source, &region, (400.0, 300.0), None, "out.png").unwrap();

        assert_eq!(decode_dims(&asset), (400, 300));
    }

    #[test]
    fn test_aspect_preserved_within_rounding() {
        // 4:1 region on a wide budget: output ratio stays 4:1 ± 1px
        let source = test_image(2000, 1000);
        let region = CropRegion::percent(0.0, 0.0, 80.0, 40.0); // 1600×400
        let budget = PixelBudget {
            max_width: 400,
            max_height: 400,
        };

        let asset =
            render_cropped_asset(&source, &region, (1000.0, 500.0), Some(budget), "out.png")
                .unwrap();

        let (w, h) = decode_dims(&asset);
        assert_eq!(w, 400);
        assert!((h as i64 - 100).unsigned_abs() <= 1, "height was {}", h);
    }

    #[test]
    fn test_pixel_unit_region() {
        // Region in rendered pixels, image displayed at half resolution
        let source = test_image(1000, 1000);
        let region = CropRegion::pixels(50.0, 50.0, 250.0, 250.0);

        let asset = render_cropped_asset(&source, &region, (500.0, 500.0), None, "out.png").unwrap();

        // 2× scale factor: 250 rendered px → 500 natural px
        assert_eq!(decode_dims(&asset), (500, 500));
    }

    #[test]
    fn test_empty_region_is_an_error() {
        let source = test_image(100, 100);
        let region = CropRegion::percent(0.0, 0.0, 0.0, 0.0);
        let result = render_cropped_asset(&source, &region, (100.0, 100.0), None, "out.png");
        assert!(matches!(result, Err(CropError::EmptyRegion)));
    }
}
