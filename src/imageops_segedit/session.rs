use image::Rgba;
use imageproc::definitions::Image;
use log::{debug, warn};

use crate::error::{SegmentError, SessionError};
use crate::imageops_segedit::class_mask::SegmentationResult;
use crate::imageops_segedit::inpaint::{InpaintExt, Inpainter};
use crate::imageops_segedit::labels::LabelVocabulary;
use crate::imageops_segedit::mask_compositor::RemoveClassExt;

/// Source of class masks for an image.
///
/// Implementations wrap an inference backend; this crate never runs a model
/// itself. Any `Fn(&Image<Rgba<u8>>, &LabelVocabulary) -> Result<..>` closure
/// is a segmenter.
pub trait Segmenter {
    /// Segments `image`, reporting found classes against `vocabulary`.
    ///
    /// # Errors
    ///
    /// Backend-specific; see [`SegmentError`].
    fn segment(
        &self,
        image: &Image<Rgba<u8>>,
        vocabulary: &LabelVocabulary,
    ) -> Result<SegmentationResult, SegmentError>;
}

impl<F> Segmenter for F
where
    F: Fn(&Image<Rgba<u8>>, &LabelVocabulary) -> Result<SegmentationResult, SegmentError>,
{
    fn segment(
        &self,
        image: &Image<Rgba<u8>>,
        vocabulary: &LabelVocabulary,
    ) -> Result<SegmentationResult, SegmentError> {
        self(image, vocabulary)
    }
}

/// Analyze → remove → fill workflow over one image at a time.
///
/// The session keeps the last analyzed image, its segmentation and the most
/// recent pixel-removal output. Analyzing a new image discards the previous
/// state.
#[derive(Debug)]
pub struct EditSession<S> {
    segmenter: S,
    vocabulary: LabelVocabulary,
    inpainter: Inpainter,
    original: Option<Image<Rgba<u8>>>,
    segmentation: Option<SegmentationResult>,
    masked: Option<Image<Rgba<u8>>>,
}

impl<S: Segmenter> EditSession<S> {
    pub fn new(segmenter: S, vocabulary: LabelVocabulary) -> Self {
        Self {
            segmenter,
            vocabulary,
            inpainter: Inpainter::default(),
            original: None,
            segmentation: None,
            masked: None,
        }
    }

    /// Replaces the inpainter used by [`fill_holes`](Self::fill_holes).
    #[must_use]
    pub fn with_inpainter(mut self, inpainter: Inpainter) -> Self {
        self.inpainter = inpainter;
        self
    }

    /// Makes `image` the current image and segments it.
    ///
    /// The image is kept even when segmentation fails, so holes can still be
    /// filled in it; pixel removal then reports
    /// [`SessionError::NothingAnalyzed`].
    ///
    /// # Errors
    ///
    /// * `SessionError::Segment` - When the segmenter fails
    pub fn analyze(&mut self, image: Image<Rgba<u8>>) -> Result<&SegmentationResult, SessionError> {
        self.masked = None;
        self.segmentation = None;

        let result = self.segmenter.segment(&image, &self.vocabulary);
        self.original = Some(image);

        match result {
            Ok(segmentation) => {
                debug!("segmentation found classes {:?}", segmentation.found_classes());
                Ok(&*self.segmentation.insert(segmentation))
            }
            Err(error) => {
                warn!("segmentation failed: {error}");
                Err(error.into())
            }
        }
    }

    /// Removes the pixels of the class named `keyword` from the current image.
    ///
    /// The output replaces any earlier removal output. On failure the earlier
    /// output is discarded as well.
    ///
    /// # Errors
    ///
    /// * `SessionError::NothingAnalyzed` - When no image has been analyzed
    ///   successfully
    /// * `SessionError::Composite` - When compositing fails, e.g. for an
    ///   unknown keyword
    pub fn remove_pixels(&mut self, keyword: &str) -> Result<&Image<Rgba<u8>>, SessionError> {
        self.masked = None;

        let (Some(original), Some(segmentation)) = (&self.original, &self.segmentation) else {
            warn!("pixel removal requested without an analyzed image");
            return Err(SessionError::NothingAnalyzed);
        };

        let removed = original.remove_class(segmentation, keyword, &self.vocabulary)?;
        Ok(&*self.masked.insert(removed))
    }

    /// Fills the holes of the latest removal output, or of the current image
    /// when nothing has been removed.
    ///
    /// The removal output is consumed.
    ///
    /// # Errors
    ///
    /// * `SessionError::NothingAnalyzed` - When there is no current image
    pub fn fill_holes(&mut self) -> Result<Image<Rgba<u8>>, SessionError> {
        let filled = match (self.masked.take(), &self.original) {
            (Some(masked), _) => masked.fill_holes_with(&self.inpainter),
            (None, Some(original)) => original.fill_holes_with(&self.inpainter),
            (None, None) => {
                warn!("inpainting requested without an image");
                return Err(SessionError::NothingAnalyzed);
            }
        };
        Ok(filled)
    }

    pub fn vocabulary(&self) -> &LabelVocabulary {
        &self.vocabulary
    }

    pub fn original(&self) -> Option<&Image<Rgba<u8>>> {
        self.original.as_ref()
    }

    pub fn segmentation(&self) -> Option<&SegmentationResult> {
        self.segmentation.as_ref()
    }

    pub fn masked(&self) -> Option<&Image<Rgba<u8>>> {
        self.masked.as_ref()
    }
}
