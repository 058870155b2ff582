//! Aggregated outcome of scanning one document.

use serde::{Deserialize, Serialize};

use super::{Classification, PageNumber};

/// Page numbers split by verdict.
///
/// `color_pages` and `monochrome_pages` are disjoint and together cover
/// `1..=total_pages`. Pages are stored in the order they were scanned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Pages with chromatic content.
    pub color_pages: Vec<PageNumber>,

    /// Pages classified as black and white.
    pub monochrome_pages: Vec<PageNumber>,

    /// Number of pages actually processed.
    pub total_pages: u32,
}

impl ScanResult {
    /// Create an empty result; nothing analyzed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append the verdict for one page.
    pub(crate) fn record(&mut self, page: PageNumber, classification: Classification) {
        if classification.is_color() {
            self.color_pages.push(page);
        } else {
            self.monochrome_pages.push(page);
        }
        self.total_pages += 1;
    }

    pub fn color_count(&self) -> usize {
        self.color_pages.len()
    }

    pub fn monochrome_count(&self) -> usize {
        self.monochrome_pages.len()
    }

    /// True when no page was analyzed.
    pub fn is_empty(&self) -> bool {
        self.total_pages == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_counts_consistent() {
        let mut result = ScanResult::empty();
        result.record(1, Classification::Color);
        result.record(2, Classification::Monochrome);
        result.record(3, Classification::Color);

        assert_eq!(result.total_pages, 3);
        assert_eq!(result.color_pages, vec![1, 3]);
        assert_eq!(result.monochrome_pages, vec![2]);
        assert_eq!(
            result.color_count() + result.monochrome_count(),
            result.total_pages as usize
        );
    }

    #[test]
    fn test_json_shape() {
        let result = ScanResult {
            color_pages: vec![1],
            monochrome_pages: vec![2, 3],
            total_pages: 3,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["color_pages"], serde_json::json!([1]));
        assert_eq!(json["monochrome_pages"], serde_json::json!([2, 3]));
        assert_eq!(json["total_pages"], 3);
    }
}
