//! Internal utility functions for imageops-segedit.
//!
//! This module contains pixel predicates shared by the compositor, the
//! inpainter and the edit session.

use image::Rgba;
use imageproc::definitions::Image;

/// Whether a pixel is a hole, i.e. fully transparent.
///
/// Only alpha is inspected; colour channels of a hole are irrelevant.
#[inline]
pub fn is_hole(pixel: &Rgba<u8>) -> bool {
    pixel[3] == 0
}

/// Counts the holes in an image.
pub fn count_holes(image: &Image<Rgba<u8>>) -> usize {
    image.pixels().filter(|pixel| is_hole(pixel)).count()
}
