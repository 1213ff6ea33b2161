use thiserror::Error;

/// Error type for class mask construction
///
/// A class mask must have a usable row width: mask rows are addressed by
/// dividing the buffer length by the width.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaskError {
    /// Mask width is zero
    ///
    /// Rows cannot be addressed in a mask without columns.
    #[error("Mask width must be non-zero")]
    ZeroWidth,

    /// Mask buffer holds less than one full row
    ///
    /// This error occurs when the segmentation output is shorter than the
    /// declared mask width.
    #[error("Mask buffer length ({len}) is shorter than mask width ({width})")]
    BufferTooShort { len: usize, width: u32 },
}

/// Error type for label vocabulary operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    /// Vocabulary contains no labels
    #[error("Label vocabulary must contain at least one label")]
    Empty,

    /// Vocabulary has more labels than a class-index byte can address
    #[error("Label vocabulary has {0} labels, but class indices are limited to 256")]
    TooManyLabels(usize),
}

/// Error type for selective transparency operations
///
/// This error type covers failures that can occur when punching transparent
/// holes into an image using a segmentation mask.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositeError {
    /// Keyword is not present in the label vocabulary
    ///
    /// The keyword is compared case-insensitively; the stored value is the
    /// keyword as provided by the caller.
    #[error("No matching class for keyword \"{0}\"")]
    InvalidKeyword(String),

    /// Mask data cannot be addressed
    #[error("Malformed mask: {0}")]
    MalformedMask(#[from] MaskError),

    /// Sampled mask position falls outside the mask buffer
    ///
    /// Not produced for validated masks: columns clamp to `width - 1` and
    /// rows to `len / width - 1`, so every sample lands inside the buffer.
    /// The variant backs the checked lookup that replaces slice indexing.
    #[error("Mask index {index} is out of range for buffer of length {len}")]
    MaskIndexOutOfRange { index: usize, len: usize },
}

/// Error type for hole-filling operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InpaintError {
    /// Iteration budget must allow at least one pass
    #[error("Invalid iteration budget: {0} (must be at least 1)")]
    InvalidIterationBudget(usize),
}

/// Error reported by a [`Segmenter`](crate::Segmenter) implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentError {
    /// The segmenter produced no mask for the image
    #[error("Segmentation produced no mask")]
    NoMask,

    /// The segmenter produced a mask that cannot be used
    #[error("Segmentation produced a malformed mask: {0}")]
    MalformedMask(#[from] MaskError),

    /// Backend-specific failure
    #[error("Segmentation backend failed: {0}")]
    Backend(String),
}

/// Error type for edit session operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No image (or no segmentation) is available for the requested step
    #[error("No analyzed image is available")]
    NothingAnalyzed,

    #[error(transparent)]
    Composite(#[from] CompositeError),

    #[error(transparent)]
    Segment(#[from] SegmentError),
}
