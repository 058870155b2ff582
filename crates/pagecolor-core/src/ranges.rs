//! Compact page-range rendering ("1-3, 5, 7-8").

use std::fmt;

use crate::models::PageNumber;

/// A maximal run of consecutive page numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRun {
    pub start: PageNumber,
    pub end: PageNumber,
}

impl PageRun {
    pub fn is_single(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for PageRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Group page numbers into ascending runs of consecutive integers.
///
/// Input order and duplicates do not matter.
pub fn page_runs(pages: impl IntoIterator<Item = PageNumber>) -> Vec<PageRun> {
    let mut sorted: Vec<PageNumber> = pages.into_iter().collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut runs: Vec<PageRun> = Vec::new();
    for page in sorted {
        match runs.last_mut() {
            Some(run) if run.end.checked_add(1) == Some(page) => run.end = page,
            _ => runs.push(PageRun {
                start: page,
                end: page,
            }),
        }
    }
    runs
}

/// Format page numbers as a comma-separated list of runs.
pub fn format_page_list(pages: impl IntoIterator<Item = PageNumber>) -> String {
    page_runs(pages)
        .iter()
        .map(PageRun::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
