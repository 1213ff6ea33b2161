//! # imageops-segedit
//!
//! Pixel-buffer operations for editing photos with a segmentation mask.
//!
//! - **Selective transparency**: maps a (usually lower-resolution) class mask
//!   onto an RGBA image and makes every pixel of a chosen class transparent
//! - **Hole inpainting**: fills transparent pixels by repeated 3×3
//!   neighbour averaging until the image stops changing
//! - **Edit session**: the analyze → remove → fill workflow on top of any
//!   [`Segmenter`]
//!
//! Inference is not part of this crate; a segmenter supplies the class mask.
//!
//! ## Example Usage
//!
//! ```no_run
//! use imageops_segedit::{
//!     ClassMask, Image, InpaintExt, LabelVocabulary, RemoveClassExt, SegmentationResult,
//! };
//! use image::Rgba;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let vocabulary = LabelVocabulary::pascal_voc();
//! let image: Image<Rgba<u8>> = Image::from_pixel(64, 64, Rgba([40, 80, 120, 255]));
//!
//! // 16x16 mask from a segmentation model, class 15 = "person"
//! let mut cells = vec![0u8; 16 * 16];
//! cells[8 * 16 + 8] = 15;
//! let segmentation = SegmentationResult::from_mask(ClassMask::new(16, 16, cells)?, &vocabulary);
//!
//! let removed = image.remove_class(&segmentation, "person", &vocabulary)?;
//! let filled = removed.fill_holes();
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `rayon`: Runs inpainting passes in parallel

mod error;
mod imageops_segedit;
mod utils;

#[cfg(test)]
mod test_utils;

pub use error::{CompositeError, InpaintError, LabelError, MaskError, SegmentError, SessionError};
pub use imageops_segedit::class_mask::{ClassMask, SegmentationResult};
pub use imageops_segedit::inpaint::{InpaintExt, InpaintOutcome, Inpainter, DEFAULT_MAX_ITERATIONS};
pub use imageops_segedit::labels::{LabelVocabulary, PASCAL_VOC_LABELS};
pub use imageops_segedit::mask_compositor::{remove_class_from_raw, RemoveClassExt, TRANSPARENT};
pub use imageops_segedit::session::{EditSession, Segmenter};
pub use utils::count_holes;

// Re-export imageproc::definitions::Image for convenience
pub use imageproc::definitions::Image;
