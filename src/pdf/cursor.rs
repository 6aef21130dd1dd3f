//! The single vertical cursor of the fixed-layout renderer.

use pdf_writer::Content;

use crate::config::PageGeometry;
use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CursorState {
    Positioning,
    /// The current page is finished; the next one has not been started yet.
    PageBreakPending,
}

/// Owns the finished pages and the page being written. `y` is the top of
/// the free space on the current page, in PDF coordinates.
pub(crate) struct PageCursor {
    pages: Vec<Content>,
    content: Content,
    y: f32,
    top: f32,
    bottom: f32,
    max_pages: usize,
    state: CursorState,
}

impl PageCursor {
    pub(crate) fn new(page: &PageGeometry, max_pages: usize) -> Self {
        let top = page.height - page.margin_top;
        Self {
            pages: Vec::new(),
            content: Content::new(),
            y: top,
            top,
            bottom: page.margin_bottom,
            max_pages,
            state: CursorState::Positioning,
        }
    }

    pub(crate) fn content(&mut self) -> &mut Content {
        &mut self.content
    }

    pub(crate) fn y(&self) -> f32 {
        self.y
    }

    /// Zero-based index of the page being written.
    pub(crate) fn page_index(&self) -> usize {
        self.pages.len()
    }

    pub(crate) fn state(&self) -> CursorState {
        self.state
    }

    pub(crate) fn at_page_top(&self) -> bool {
        (self.y - self.top).abs() < 0.5
    }

    pub(crate) fn fits(&self, needed: f32) -> bool {
        self.y - needed >= self.bottom - 0.01
    }

    /// Start a new page when `needed` points no longer fit above the bottom
    /// margin. Never breaks at the top of a page, so content taller than a
    /// page is placed rather than looping. Returns whether a break happened.
    pub(crate) fn check_page_break(&mut self, needed: f32) -> Result<bool, Error> {
        if self.at_page_top() || self.fits(needed) {
            return Ok(false);
        }
        log::debug!(
            "page break before page {}: needed {needed:.1}pt, {:.1}pt left",
            self.pages.len() + 2,
            self.y - self.bottom
        );
        self.break_page()?;
        Ok(true)
    }

    /// Unconditional break, unless the current page is still empty.
    pub(crate) fn force_page_break(&mut self) -> Result<(), Error> {
        if !self.at_page_top() {
            self.break_page()?;
        }
        Ok(())
    }

    fn break_page(&mut self) -> Result<(), Error> {
        self.state = CursorState::PageBreakPending;
        if self.pages.len() + 2 > self.max_pages {
            return Err(Error::Pdf(format!(
                "statement exceeds the limit of {} pages",
                self.max_pages
            )));
        }
        self.pages
            .push(std::mem::replace(&mut self.content, Content::new()));
        self.y = self.top;
        self.state = CursorState::Positioning;
        Ok(())
    }

    pub(crate) fn advance(&mut self, height: f32) {
        self.y -= height;
    }

    pub(crate) fn finish(mut self) -> Vec<Content> {
        self.pages.push(self.content);
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(max_pages: usize) -> PageCursor {
        PageCursor::new(&PageGeometry::default(), max_pages)
    }

    #[test]
    fn no_break_while_content_fits() {
        let mut c = cursor(10);
        assert!(c.at_page_top());
        c.advance(100.0);
        assert!(!c.check_page_break(500.0).unwrap());
        assert_eq!(c.page_index(), 0);
        assert_eq!(c.state(), CursorState::Positioning);
    }

    #[test]
    fn breaks_when_content_would_cross_margin() {
        let mut c = cursor(10);
        c.advance(600.0);
        assert_eq!(c.y(), 120.0);
        assert!(c.check_page_break(49.0).unwrap());
        assert_eq!(c.page_index(), 1);
        assert_eq!(c.y(), 720.0);
        assert_eq!(c.state(), CursorState::Positioning);
    }

    #[test]
    fn exact_fit_does_not_break() {
        let mut c = cursor(10);
        c.advance(600.0);
        assert!(!c.check_page_break(48.0).unwrap());
    }

    #[test]
    fn oversize_content_at_top_is_placed() {
        let mut c = cursor(10);
        assert!(!c.check_page_break(2000.0).unwrap());
        assert_eq!(c.page_index(), 0);
    }

    #[test]
    fn forced_break_skips_empty_page() {
        let mut c = cursor(10);
        c.force_page_break().unwrap();
        assert_eq!(c.page_index(), 0);
        c.advance(10.0);
        c.force_page_break().unwrap();
        assert_eq!(c.page_index(), 1);
        assert_eq!(c.finish().len(), 2);
    }

    #[test]
    fn page_limit_is_terminal() {
        let mut c = cursor(2);
        c.advance(10.0);
        c.force_page_break().unwrap();
        c.advance(10.0);
        let err = c.force_page_break().unwrap_err();
        assert!(matches!(err, Error::Pdf(_)));
        assert_eq!(c.state(), CursorState::PageBreakPending);
    }
}
