use crate::error::LabelError;

/// PASCAL VOC class names in model output order.
pub const PASCAL_VOC_LABELS: [&str; 21] = [
    "background",
    "aeroplane",
    "bicycle",
    "bird",
    "boat",
    "bottle",
    "bus",
    "car",
    "cat",
    "chair",
    "cow",
    "diningtable",
    "dog",
    "horse",
    "motorbike",
    "person",
    "pottedplant",
    "sheep",
    "sofa",
    "train",
    "tvmonitor",
];

/// Ordered list of class names addressed by mask class index.
///
/// Index 0 is conventionally the background class. The vocabulary is a plain
/// value: load it once and hand it to whatever needs keyword resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelVocabulary {
    labels: Vec<String>,
}

impl LabelVocabulary {
    /// Creates a vocabulary from class names in class-index order.
    ///
    /// Labels are stored lowercased so that keyword lookup and found-class
    /// matching agree regardless of how the names were spelled.
    ///
    /// # Errors
    ///
    /// * `LabelError::Empty` - When no labels are given
    /// * `LabelError::TooManyLabels` - When more labels are given than a `u8`
    ///   class index can address
    pub fn new<I, S>(labels: I) -> Result<Self, LabelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels
            .into_iter()
            .map(Into::<String>::into)
            .map(|label| label.to_lowercase())
            .collect();
        if labels.is_empty() {
            return Err(LabelError::Empty);
        }
        if labels.len() > usize::from(u8::MAX) + 1 {
            return Err(LabelError::TooManyLabels(labels.len()));
        }
        Ok(Self { labels })
    }

    /// The 21-class PASCAL VOC vocabulary used by DeepLab-style segmenters.
    pub fn pascal_voc() -> Self {
        Self {
            labels: PASCAL_VOC_LABELS.iter().map(|&label| label.to_owned()).collect(),
        }
    }

    /// Resolves a keyword to its class index.
    ///
    /// The keyword is lowercased before lookup; the first matching position
    /// wins.
    pub fn index_of(&self, keyword: &str) -> Option<u8> {
        let keyword = keyword.to_lowercase();
        self.labels
            .iter()
            .position(|label| *label == keyword)
            .and_then(|index| u8::try_from(index).ok())
    }

    /// Returns the class name for `index`, if the vocabulary has one.
    pub fn label(&self, index: u8) -> Option<&str> {
        self.labels.get(usize::from(index)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl Default for LabelVocabulary {
    fn default() -> Self {
        Self::pascal_voc()
    }
}
