use itertools::Itertools;

use crate::error::MaskError;
use crate::imageops_segedit::labels::LabelVocabulary;

/// Per-cell class indices produced by a segmentation model.
///
/// The mask is usually smaller than the image it describes. The declared
/// height is kept as reported by the model and only feeds the vertical scale
/// factor; row addressing always uses the number of complete rows actually
/// present in the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ClassMask {
    /// Creates a class mask from raw model output.
    ///
    /// # Errors
    ///
    /// * `MaskError::ZeroWidth` - When `width` is zero
    /// * `MaskError::BufferTooShort` - When `data` holds less than one row
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, MaskError> {
        if width == 0 {
            return Err(MaskError::ZeroWidth);
        }
        if data.len() < width as usize {
            return Err(MaskError::BufferTooShort {
                len: data.len(),
                width,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height as declared by the producer of the mask.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of complete rows in the buffer. Always at least 1.
    pub fn rows(&self) -> usize {
        self.data.len() / self.width as usize
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Class index stored at a flat buffer position.
    #[inline]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.data.get(index).copied()
    }

    /// Distinct class indices in first-seen order, scanning from the start
    /// of the buffer.
    pub fn class_indices(&self) -> Vec<u8> {
        self.data.iter().copied().unique().collect()
    }
}

/// Analysis record for one image: its class mask and the labels found in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentationResult {
    mask: ClassMask,
    found_classes: Vec<String>,
}

impl SegmentationResult {
    /// Builds the record from a mask, listing every labelled class that
    /// occurs in it.
    ///
    /// Indices without a label in `vocabulary` are left out of
    /// `found_classes` but stay in the mask.
    pub fn from_mask(mask: ClassMask, vocabulary: &LabelVocabulary) -> Self {
        let found_classes = mask
            .class_indices()
            .into_iter()
            .filter_map(|index| vocabulary.label(index))
            .unique()
            .map(str::to_owned)
            .collect();

        Self {
            mask,
            found_classes,
        }
    }

    pub const fn mask(&self) -> &ClassMask {
        &self.mask
    }

    pub fn found_classes(&self) -> &[String] {
        &self.found_classes
    }

    /// Whether `keyword` names one of the found classes (case-insensitive).
    pub fn contains_class(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.found_classes.iter().any(|class| *class == keyword)
    }
}
