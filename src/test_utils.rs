//! Shared test fixtures
//!
//! `FixedLayout` is a canned [`PageLayoutProvider`] standing in for the
//! rendering collaborator. An empty layout models a document that has not
//! loaded yet.

use crate::geometry::PageLayoutProvider;
use crate::types::{Point, Size};

/// Canned page layout with explicit per-page origins and sizes
#[derive(Clone, Debug, Default)]
pub struct FixedLayout {
    pages: Vec<(Point, Size)>,
}

impl FixedLayout {
    /// No pages at all; every query returns `None`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One page of the given size at the viewport origin
    #[must_use]
    pub fn single_page(width: f32, height: f32) -> Self {
        let mut layout = Self::new();
        layout.push_page(Point::new(0.0, 0.0), Size::new(width, height));
        layout
    }

    /// `count` equal pages stacked vertically with `gap` pixels between them
    #[must_use]
    pub fn stacked(count: u32, size: Size, gap: f32) -> Self {
        let mut layout = Self::new();
        let mut y = 0.0;
        for _ in 0..count {
            layout.push_page(Point::new(0.0, y), size);
            y += size.height + gap;
        }
        layout
    }

    pub fn push_page(&mut self, origin: Point, size: Size) {
        self.pages.push((origin, size));
    }

    /// Simulate a resize by replacing a page's rendered size
    pub fn set_page_size(&mut self, page_number: u32, size: Size) {
        if let Some(entry) = page_number
            .checked_sub(1)
            .and_then(|idx| self.pages.get_mut(idx as usize))
        {
            entry.1 = size;
        }
    }

    fn page(&self, page_number: u32) -> Option<&(Point, Size)> {
        self.pages.get(page_number.checked_sub(1)? as usize)
    }
}

impl PageLayoutProvider for FixedLayout {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_render_size(&self, page_number: u32) -> Option<Size> {
        self.page(page_number).map(|(_, size)| *size)
    }

    fn page_viewport_origin(&self, page_number: u32) -> Option<Point> {
        self.page(page_number).map(|(origin, _)| *origin)
    }
}
