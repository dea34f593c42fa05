use std::io::Cursor;

use image::{imageops, ImageFormat, Rgb, RgbImage};

use crate::Error;

/// Crops `image` to the bounding box of pixels that differ from
/// `background`. An image made only of background comes back unchanged.
pub fn trim_uniform_border(image: RgbImage, background: Rgb<u8>) -> RgbImage {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if *pixel == background {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    match bounds {
        Some((x0, y0, x1, y1)) => imageops::crop_imm(&image, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image(),
        None => image,
    }
}

pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, Error> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| Error::Render(format!("PNG encoding failed: {e}")))?;
    Ok(buf.into_inner())
}
