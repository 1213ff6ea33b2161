use image::Rgba;
use imageproc::definitions::Image;
use log::debug;

use crate::error::{CompositeError, MaskError};
use crate::imageops_segedit::class_mask::{ClassMask, SegmentationResult};
use crate::imageops_segedit::labels::LabelVocabulary;

/// Offset added to a pixel coordinate so that it samples the mask at the
/// pixel centre.
const ROUNDING_OFFSET: f32 = 0.5;

/// Fully transparent black, written over removed pixels.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Trait providing class-guided pixel removal for RGBA images
///
/// Pixels whose class in the segmentation mask equals the target class are
/// replaced with [`TRANSPARENT`]; every other pixel is copied unchanged. The
/// mask may have a lower resolution than the image. The input image is never
/// modified.
pub trait RemoveClassExt {
    /// Makes every pixel of the class named `keyword` transparent
    ///
    /// # Arguments
    ///
    /// * `segmentation` - Analysis record holding the class mask
    /// * `keyword` - Class name, matched case-insensitively
    /// * `vocabulary` - Class names in class-index order
    ///
    /// # Errors
    ///
    /// * `CompositeError::InvalidKeyword` - When `keyword` is not in `vocabulary`
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use imageops_segedit::{ClassMask, Image, LabelVocabulary, RemoveClassExt, SegmentationResult};
    /// use image::Rgba;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let vocabulary = LabelVocabulary::pascal_voc();
    /// let image: Image<Rgba<u8>> = Image::from_pixel(8, 8, Rgba([10, 20, 30, 255]));
    /// let mask = ClassMask::new(4, 4, vec![15; 16])?;
    /// let segmentation = SegmentationResult::from_mask(mask, &vocabulary);
    ///
    /// let removed = image.remove_class(&segmentation, "person", &vocabulary)?;
    /// # Ok(())
    /// # }
    /// ```
    fn remove_class(
        &self,
        segmentation: &SegmentationResult,
        keyword: &str,
        vocabulary: &LabelVocabulary,
    ) -> Result<Image<Rgba<u8>>, CompositeError>;

    /// Makes every pixel whose mask class equals `target` transparent
    ///
    /// Any index is a valid target, including 0 (background) and indices
    /// with no label.
    ///
    /// # Errors
    ///
    /// None in practice: `ClassMask` is validated on construction, so every
    /// sample lands inside its buffer.
    fn remove_class_index(
        &self,
        mask: &ClassMask,
        target: u8,
    ) -> Result<Image<Rgba<u8>>, CompositeError>;
}

impl RemoveClassExt for Image<Rgba<u8>> {
    fn remove_class(
        &self,
        segmentation: &SegmentationResult,
        keyword: &str,
        vocabulary: &LabelVocabulary,
    ) -> Result<Image<Rgba<u8>>, CompositeError> {
        let target = vocabulary
            .index_of(keyword)
            .ok_or_else(|| CompositeError::InvalidKeyword(keyword.to_owned()))?;
        debug!("resolved keyword {keyword:?} to class index {target}");

        self.remove_class_index(segmentation.mask(), target)
    }

    fn remove_class_index(
        &self,
        mask: &ClassMask,
        target: u8,
    ) -> Result<Image<Rgba<u8>>, CompositeError> {
        let (width, height) = self.dimensions();
        let sampler = MaskSampler::from_mask(mask, width, height);
        composite(self, &sampler, target)
    }
}

/// Class removal over a borrowed mask buffer.
///
/// This is the entry point for callers holding model output they do not want
/// to copy into a [`ClassMask`]. The buffer is validated the same way
/// [`ClassMask::new`] validates it.
///
/// # Errors
///
/// * `CompositeError::MalformedMask` - When `mask_width` is zero or the
///   buffer is shorter than one row
/// * `CompositeError::MaskIndexOutOfRange` - When a sample falls outside the
///   mask buffer
pub fn remove_class_from_raw(
    image: &Image<Rgba<u8>>,
    mask: &[u8],
    mask_width: u32,
    mask_height: u32,
    target: u8,
) -> Result<Image<Rgba<u8>>, CompositeError> {
    let (width, height) = image.dimensions();
    let sampler = MaskSampler::new(mask, mask_width, mask_height, width, height)?;
    composite(image, &sampler, target)
}

fn composite(
    image: &Image<Rgba<u8>>,
    sampler: &MaskSampler<'_>,
    target: u8,
) -> Result<Image<Rgba<u8>>, CompositeError> {
    let mut output = image.clone();
    let mut removed = 0usize;
    for (x, y, pixel) in output.enumerate_pixels_mut() {
        if sampler.class_at(x, y)? == target {
            *pixel = TRANSPARENT;
            removed += 1;
        }
    }

    debug!(
        "removed {removed} of {} pixels for class index {target}",
        u64::from(output.width()) * u64::from(output.height())
    );
    Ok(output)
}

/// Nearest-neighbour lookup from image coordinates into a class mask.
#[derive(Debug, Clone, Copy)]
struct MaskSampler<'a> {
    data: &'a [u8],
    width: usize,
    last_column: usize,
    last_row: usize,
    x_scale: f32,
    y_scale: f32,
}

impl<'a> MaskSampler<'a> {
    fn new(
        data: &'a [u8],
        mask_width: u32,
        mask_height: u32,
        image_width: u32,
        image_height: u32,
    ) -> Result<Self, MaskError> {
        if mask_width == 0 {
            return Err(MaskError::ZeroWidth);
        }
        let rows = data.len() / mask_width as usize;
        if rows == 0 {
            return Err(MaskError::BufferTooShort {
                len: data.len(),
                width: mask_width,
            });
        }

        Ok(Self::with_rows(data, mask_width, mask_height, rows, image_width, image_height))
    }

    /// Sampler over a mask that [`ClassMask::new`] has already validated.
    fn from_mask(mask: &'a ClassMask, image_width: u32, image_height: u32) -> Self {
        Self::with_rows(
            mask.as_raw(),
            mask.width(),
            mask.height(),
            mask.rows(),
            image_width,
            image_height,
        )
    }

    /// `mask_width` and `rows` must both be non-zero.
    fn with_rows(
        data: &'a [u8],
        mask_width: u32,
        mask_height: u32,
        rows: usize,
        image_width: u32,
        image_height: u32,
    ) -> Self {
        let width = mask_width as usize;
        Self {
            data,
            width,
            last_column: width - 1,
            last_row: rows - 1,
            x_scale: mask_width as f32 / image_width as f32,
            y_scale: mask_height as f32 / image_height as f32,
        }
    }

    /// Mask cell for the image pixel at `(x, y)`.
    ///
    /// `floor((coord + 0.5) * scale)`, clamped to the mask. The row bound
    /// comes from the buffer length, not the declared height.
    #[inline]
    fn cell(&self, x: u32, y: u32) -> (usize, usize) {
        // Float-to-int `as` truncates toward zero and saturates, which is
        // floor for these non-negative values.
        let mask_x = ((x as f32 + ROUNDING_OFFSET) * self.x_scale) as usize;
        let mask_y = ((y as f32 + ROUNDING_OFFSET) * self.y_scale) as usize;
        (mask_x.min(self.last_column), mask_y.min(self.last_row))
    }

    #[inline]
    fn class_at(&self, x: u32, y: u32) -> Result<u8, CompositeError> {
        let (mask_x, mask_y) = self.cell(x, y);
        let index = mask_y * self.width + mask_x;
        self.data
            .get(index)
            .copied()
            .ok_or(CompositeError::MaskIndexOutOfRange {
                index,
                len: self.data.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_gradient_rgba_image;
    use crate::utils::count_holes;

    fn mask(width: u32, height: u32, data: Vec<u8>) -> ClassMask {
        ClassMask::new(width, height, data).unwrap()
    }

    #[test]
    fn sampler_with_upscaled_mask_uses_centered_floor() {
        let data = [5u8, 6, 7, 8];
        let sampler = MaskSampler::new(&data, 2, 2, 1, 1).unwrap();

        // (0 + 0.5) * 2 = 1 in both directions
        assert_eq!(sampler.cell(0, 0), (1, 1));
        assert_eq!(sampler.class_at(0, 0), Ok(8));
    }

    #[test]
    fn sampler_with_downscaled_mask_maps_blocks() {
        let data = [0u8, 1, 2, 3];
        let sampler = MaskSampler::new(&data, 2, 2, 4, 4).unwrap();

        assert_eq!(sampler.cell(0, 0), (0, 0));
        assert_eq!(sampler.cell(1, 1), (0, 0));
        assert_eq!(sampler.cell(2, 1), (1, 0));
        assert_eq!(sampler.cell(3, 3), (1, 1));
        assert_eq!(sampler.class_at(1, 2), Ok(2));
    }

    #[test]
    fn sampler_with_same_size_mask_is_identity() {
        let data: Vec<u8> = (0..12).collect();
        let sampler = MaskSampler::new(&data, 4, 3, 4, 3).unwrap();

        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(sampler.class_at(x, y), Ok((y * 4 + x) as u8));
            }
        }
    }

    #[test]
    fn sampler_clamps_rows_to_buffer_capacity() {
        // Declared height 4, but only 2 rows are present
        let data = [1u8, 2, 3, 4];
        let sampler = MaskSampler::new(&data, 2, 4, 2, 2).unwrap();

        assert_eq!(sampler.cell(0, 1), (0, 1));
        assert_eq!(sampler.class_at(1, 1), Ok(4));
        assert_eq!(sampler.last_row, 1);
    }

    #[test]
    fn sampler_with_zero_width_returns_error() {
        assert_eq!(
            MaskSampler::new(&[1, 2], 0, 1, 2, 2).unwrap_err(),
            MaskError::ZeroWidth
        );
    }

    #[test]
    fn sampler_from_class_mask_matches_raw_buffer_sampler() {
        // Declared height 5 with a trailing partial row: only 3 rows address
        let class_mask = mask(3, 5, (0..11).collect());
        let from_mask = MaskSampler::from_mask(&class_mask, 7, 9);
        let from_raw = MaskSampler::new(class_mask.as_raw(), 3, 5, 7, 9).unwrap();

        assert_eq!(from_mask.last_row, 2);
        assert_eq!(from_mask.last_row, from_raw.last_row);
        for y in 0..9 {
            for x in 0..7 {
                assert_eq!(from_mask.cell(x, y), from_raw.cell(x, y));
                assert_eq!(from_mask.class_at(x, y), from_raw.class_at(x, y));
            }
        }
    }

    #[test]
    fn remove_class_index_with_matching_cells_makes_pixels_transparent() {
        let image = create_gradient_rgba_image(4, 4);
        let mask = mask(2, 2, vec![0, 15, 15, 0]);

        let result = image.remove_class_index(&mask, 15).unwrap();

        for (x, y, pixel) in result.enumerate_pixels() {
            let in_target = (x >= 2) != (y >= 2);
            if in_target {
                assert_eq!(*pixel, TRANSPARENT, "({x}, {y}) should be removed");
            } else {
                assert_eq!(pixel, image.get_pixel(x, y), "({x}, {y}) should be kept");
            }
        }
    }

    #[test]
    fn remove_class_index_with_background_target_is_allowed() {
        let image = create_gradient_rgba_image(4, 4);
        let mask = mask(2, 2, vec![0, 15, 15, 0]);

        let result = image.remove_class_index(&mask, 0).unwrap();

        assert_eq!(count_holes(&result), 8);
        assert_eq!(*result.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(result.get_pixel(3, 0), image.get_pixel(3, 0));
    }

    #[test]
    fn remove_class_with_unknown_keyword_returns_invalid_keyword() {
        let vocabulary = LabelVocabulary::pascal_voc();
        let image = create_gradient_rgba_image(2, 2);
        let segmentation = SegmentationResult::from_mask(mask(1, 1, vec![15]), &vocabulary);

        assert_eq!(
            image.remove_class(&segmentation, "Unicorn", &vocabulary),
            Err(CompositeError::InvalidKeyword("Unicorn".to_owned()))
        );
    }

    #[test]
    fn remove_class_with_uppercase_keyword_matches() {
        let vocabulary = LabelVocabulary::pascal_voc();
        let image = create_gradient_rgba_image(2, 2);
        let segmentation = SegmentationResult::from_mask(mask(1, 1, vec![15]), &vocabulary);

        let result = image.remove_class(&segmentation, "PERSON", &vocabulary).unwrap();

        assert_eq!(count_holes(&result), 4);
    }

    #[test]
    fn remove_class_with_uppercase_vocabulary_label_matches() {
        let vocabulary = LabelVocabulary::new(["Background", "Dog"]).unwrap();
        let image = create_gradient_rgba_image(2, 2);
        let segmentation = SegmentationResult::from_mask(mask(2, 1, vec![0, 1]), &vocabulary);

        assert_eq!(segmentation.found_classes(), &["background", "dog"]);
        let result = image.remove_class(&segmentation, "Dog", &vocabulary).unwrap();

        assert_eq!(count_holes(&result), 2);
        assert_eq!(*result.get_pixel(1, 0), TRANSPARENT);
        assert_eq!(result.get_pixel(0, 0), image.get_pixel(0, 0));
    }

    #[test]
    fn remove_class_from_raw_with_malformed_mask_returns_error() {
        let image = create_gradient_rgba_image(2, 2);

        assert_eq!(
            remove_class_from_raw(&image, &[0, 0], 0, 2, 0),
            Err(CompositeError::MalformedMask(MaskError::ZeroWidth))
        );
        assert_eq!(
            remove_class_from_raw(&image, &[0, 0], 3, 1, 0),
            Err(CompositeError::MalformedMask(MaskError::BufferTooShort {
                len: 2,
                width: 3
            }))
        );
    }

    #[test]
    fn remove_class_from_raw_with_empty_image_returns_empty_image() {
        let image: Image<Rgba<u8>> = Image::new(0, 0);

        let result = remove_class_from_raw(&image, &[15], 1, 1, 15).unwrap();

        assert_eq!(result.dimensions(), (0, 0));
    }
}
