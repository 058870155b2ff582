//! Human-readable result text shared by the front ends.

use crate::models::ScanResult;
use crate::ranges::format_page_list;

/// Message shown when a scan produced no pages.
pub const NOTHING_ANALYZED: &str =
    "No pages were analyzed. The file might be empty or corrupted.";

impl ScanResult {
    /// Color pages as a page-range string.
    pub fn color_ranges(&self) -> String {
        format_page_list(self.color_pages.iter().copied())
    }

    /// Black and white pages as a page-range string.
    pub fn monochrome_ranges(&self) -> String {
        format_page_list(self.monochrome_pages.iter().copied())
    }

    /// Summary lines, one per non-empty category.
    pub fn summary_lines(&self) -> Vec<String> {
        let total = self.total_pages;
        if total == 0 {
            return vec![NOTHING_ANALYZED.to_string()];
        }

        let mut lines = Vec::with_capacity(2);
        let color = self.color_count();
        if color > 0 {
            if color == total as usize {
                lines.push(format!("All {} pages contain color.", total));
            } else {
                lines.push(format!(
                    "Color pages ({}/{}): {}",
                    color,
                    total,
                    self.color_ranges()
                ));
            }
        }

        let mono = self.monochrome_count();
        if mono > 0 {
            if mono == total as usize {
                lines.push(format!("All {} pages are black and white.", total));
            } else {
                lines.push(format!(
                    "Black and white pages ({}/{}): {}",
                    mono,
                    total,
                    self.monochrome_ranges()
                ));
            }
        }
        lines
    }

    /// Summary as a single block of text.
    pub fn summary(&self) -> String {
        self.summary_lines().join("\n")
    }
}
