use crate::model::WordBox;
use crate::ocr::RawWord;

/// Turn raw OCR entries into word boxes.
///
/// Drops entries whose text is blank and entries with a negative confidence.
/// Surviving text is trimmed and otherwise kept as-is.
pub fn normalize_words(raw: &[RawWord]) -> Vec<WordBox> {
    raw.iter()
        .filter(|w| !w.confidence.is_some_and(|c| c < 0.0))
        .filter_map(|w| {
            let text = w.text.trim();
            if text.is_empty() {
                return None;
            }
            Some(WordBox::new(text, w.left, w.top, w.width, w.height))
        })
        .collect()
}

/// Page words sorted in reading order, with range lookups on `top`.
#[derive(Debug, Clone, Default)]
pub struct WordIndex {
    words: Vec<WordBox>,
}

impl WordIndex {
    pub fn new(mut words: Vec<WordBox>) -> Self {
        words.sort_by_key(|w| (w.top, w.left));
        WordIndex { words }
    }

    pub fn from_raw(raw: &[RawWord]) -> Self {
        Self::new(normalize_words(raw))
    }

    /// All words, top-to-bottom then left-to-right.
    pub fn words(&self) -> &[WordBox] {
        &self.words
    }

    /// Words whose `top` lies in `[top, bottom)`, in reading order.
    pub fn in_vertical_range(&self, top: i32, bottom: i32) -> &[WordBox] {
        if bottom <= top {
            return &[];
        }
        let start = self.words.partition_point(|w| w.top < top);
        let end = self.words.partition_point(|w| w.top < bottom);
        &self.words[start..end]
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
