//! Test utilities for imageops-segedit
//!
//! This module provides common fixtures for testing mask compositing and
//! inpainting. It is only compiled when running tests.

#[cfg(test)]
use image::Rgba;
#[cfg(test)]
use imageproc::definitions::Image;

/// Creates an opaque RGBA image whose colour encodes the pixel position.
///
/// Red grows with `x`, green grows with `y`, blue is constant, so every pixel
/// in images up to 255×255 is distinct.
#[cfg(test)]
pub fn create_gradient_rgba_image(width: u32, height: u32) -> Image<Rgba<u8>> {
    Image::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 200, 255])
    })
}

/// Creates an opaque image of a single colour with the centre pixel
/// made fully transparent.
#[cfg(test)]
pub fn create_image_with_center_hole(width: u32, height: u32, color: Rgba<u8>) -> Image<Rgba<u8>> {
    let mut image = Image::from_pixel(width, height, color);
    image.put_pixel(width / 2, height / 2, Rgba([0, 0, 0, 0]));
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_gradient_rgba_image_with_valid_input_creates_image() {
        let image = create_gradient_rgba_image(3, 2);
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(0, 0), &Rgba([0, 0, 200, 255]));
        assert_eq!(image.get_pixel(2, 1), &Rgba([2, 1, 200, 255]));
    }

    #[test]
    fn create_image_with_center_hole_has_single_hole() {
        let image = create_image_with_center_hole(3, 3, Rgba([255, 0, 0, 255]));
        assert_eq!(image.pixels().filter(|pixel| pixel[3] == 0).count(), 1);
        assert_eq!(image.get_pixel(1, 1)[3], 0);
    }
}
