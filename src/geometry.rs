//! Coordinate mapping between page-native and on-screen pixel space
//!
//! Pure functions only. Anything that needs live page geometry goes through
//! the [`PageLayoutProvider`] capability instead of asking the rendering
//! collaborator directly.

use crate::types::{Point, Rect, RectRegion, Region, Size};

/// Minimum rectangle edge length, in capture-time pixel units.
/// Anything at or below this is treated as an accidental click.
pub const MIN_REGION_SIZE: f32 = 5.0;

/// Default comment modal dimensions
pub const MODAL_SIZE: Size = Size {
    width: 300.0,
    height: 300.0,
};

const MODAL_GUTTER_X: f32 = 20.0;
const MODAL_GUTTER_Y: f32 = 10.0;
const MODAL_MARGIN: f32 = 10.0;

/// Live page geometry supplied by the rendering collaborator.
///
/// Queries return `None` before the document has loaded or for pages not
/// currently rendered. Callers treat that as a transient condition, never
/// an error.
pub trait PageLayoutProvider {
    /// Total pages in the loaded document, 0 before load
    fn page_count(&self) -> u32;

    /// Rendered size of a page, if currently laid out
    fn page_render_size(&self, page_number: u32) -> Option<Size>;

    /// Viewport position of a page's top-left corner
    fn page_viewport_origin(&self, page_number: u32) -> Option<Point>;

    /// Page whose rendered bounds contain the given viewport point
    fn page_at_point(&self, point: Point) -> Option<u32> {
        (1..=self.page_count()).find(|&page| {
            match (self.page_viewport_origin(page), self.page_render_size(page)) {
                (Some(origin), Some(size)) => Rect::new(
                    origin.x,
                    origin.y,
                    origin.x + size.width,
                    origin.y + size.height,
                )
                .contains(point),
                _ => false,
            }
        })
    }
}

/// Scale factors from a rectangle's capture-time page size to the current
/// render size. A degenerate captured size falls back to 1.0.
#[must_use]
pub fn scale_factors(region: &RectRegion, current: Size) -> (f32, f32) {
    let scale_x = if region.captured_page_width > 0.0 {
        current.width / region.captured_page_width
    } else {
        1.0
    };
    let scale_y = if region.captured_page_height > 0.0 {
        current.height / region.captured_page_height
    } else {
        1.0
    };
    (scale_x, scale_y)
}

/// Map a region into the page's current pixel coordinates.
///
/// Rect regions scale proportionally from their capture-time page size.
/// Text regions are already expressed in the collaborator's scaled units
/// and pass through unchanged.
#[must_use]
pub fn to_viewport_rect(region: &Region, current: Size) -> Rect {
    match region {
        Region::Text(text) => text.bounding_box,
        Region::Rect(rect) => {
            let (scale_x, scale_y) = scale_factors(rect, current);
            Rect::new(
                rect.start_x * scale_x,
                rect.start_y * scale_y,
                rect.end_x * scale_x,
                rect.end_y * scale_y,
            )
        }
    }
}

/// Whether a region is big enough to keep.
///
/// Only the rectangle path can fail: the selection gesture guarantees a
/// text region carries non-empty text.
#[must_use]
pub fn is_large_enough(region: &Region) -> bool {
    match region {
        Region::Text(_) => true,
        Region::Rect(rect) => rect.width() > MIN_REGION_SIZE && rect.height() > MIN_REGION_SIZE,
    }
}

/// Place the comment modal near an anchor rect, keeping it inside the
/// container.
///
/// The fallback order is part of the contract: right of the anchor, then
/// left, then centered on it horizontally; below the anchor, then above,
/// vertically. The result is clamped into the container with a 10px margin.
#[must_use]
pub fn place_modal(anchor: Rect, container: Size, modal: Size) -> Point {
    let mut x = anchor.x2 + MODAL_GUTTER_X;
    if x + modal.width > container.width {
        x = anchor.x1 - modal.width - MODAL_GUTTER_X;
    }
    if x < 0.0 {
        x = anchor.center().x - modal.width / 2.0;
    }
    let max_x = (container.width - modal.width - MODAL_MARGIN).max(MODAL_MARGIN);
    x = x.max(MODAL_MARGIN).min(max_x);

    let mut y = anchor.y2 + MODAL_GUTTER_Y;
    if y + modal.height > container.height {
        y = anchor.y1 - modal.height - MODAL_GUTTER_Y;
    }
    let max_y = (container.height - modal.height - MODAL_MARGIN).max(MODAL_MARGIN);
    y = y.max(MODAL_MARGIN).min(max_y);

    Point::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TextRegion;

    fn rect_region(x1: f32, y1: f32, x2: f32, y2: f32, captured: Size) -> RectRegion {
        RectRegion::from_corners(1, Point::new(x1, y1), Point::new(x2, y2), captured)
    }

    #[test]
    fn rect_region_scales_uniformly_per_axis() {
        let captured = Size::new(600.0, 800.0);
        let region = Region::Rect(rect_region(100.0, 100.0, 300.0, 200.0, captured));

        let scaled = to_viewport_rect(&region, Size::new(900.0, 1200.0));
        assert_eq!(scaled, Rect::new(150.0, 150.0, 450.0, 300.0));

        // Rendering at the captured size is the identity
        let same = to_viewport_rect(&region, captured);
        assert_eq!(same, Rect::new(100.0, 100.0, 300.0, 200.0));
    }

    #[test]
    fn text_region_passes_through_unscaled() {
        let bounding_box = Rect::new(40.0, 50.0, 140.0, 70.0);
        let region = Region::Text(TextRegion {
            page_number: 1,
            bounding_box,
            rects: vec![bounding_box],
            text: "quoted".into(),
        });

        assert_eq!(to_viewport_rect(&region, Size::new(1234.0, 5678.0)), bounding_box);
    }

    #[test]
    fn degenerate_captured_size_falls_back_to_identity() {
        let region = rect_region(10.0, 10.0, 20.0, 20.0, Size::new(0.0, 0.0));
        assert_eq!(scale_factors(&region, Size::new(600.0, 800.0)), (1.0, 1.0));
    }

    #[test]
    fn minimum_size_is_strict() {
        let captured = Size::new(600.0, 800.0);
        let exact = Region::Rect(rect_region(0.0, 0.0, 5.0, 5.0, captured));
        assert!(!is_large_enough(&exact));

        let thin = Region::Rect(rect_region(0.0, 0.0, 100.0, 5.0, captured));
        assert!(!is_large_enough(&thin));

        let ok = Region::Rect(rect_region(0.0, 0.0, 5.1, 5.1, captured));
        assert!(is_large_enough(&ok));
    }

    #[test]
    fn text_regions_are_always_large_enough() {
        let region = Region::Text(TextRegion {
            page_number: 1,
            bounding_box: Rect::new(0.0, 0.0, 1.0, 1.0),
            rects: vec![],
            text: "x".into(),
        });
        assert!(is_large_enough(&region));
    }

    #[test]
    fn modal_prefers_right_and_below() {
        let anchor = Rect::new(100.0, 100.0, 200.0, 150.0);
        let pos = place_modal(anchor, Size::new(1000.0, 1000.0), MODAL_SIZE);
        assert_eq!(pos, Point::new(220.0, 160.0));
    }

    #[test]
    fn modal_falls_back_to_left_when_right_overflows() {
        let anchor = Rect::new(600.0, 100.0, 700.0, 150.0);
        let pos = place_modal(anchor, Size::new(900.0, 1000.0), MODAL_SIZE);
        // left of anchor: 600 - 300 - 20
        assert_eq!(pos.x, 280.0);
    }

    #[test]
    fn modal_centers_when_both_sides_overflow() {
        let anchor = Rect::new(150.0, 100.0, 250.0, 150.0);
        let pos = place_modal(anchor, Size::new(400.0, 1000.0), MODAL_SIZE);
        // center on anchor (200) minus half modal = 50, within [10, 90]
        assert_eq!(pos.x, 50.0);
    }

    #[test]
    fn modal_right_edge_clamp_always_holds() {
        let container = Size::new(320.0, 800.0);
        let anchor = Rect::new(
            container.width - 50.0,
            50.0,
            container.width - 50.0,
            50.0,
        );
        let pos = place_modal(anchor, container, MODAL_SIZE);
        assert!(pos.x <= container.width - MODAL_SIZE.width - 10.0);
        assert!(pos.x >= 10.0);
    }

    #[test]
    fn modal_goes_above_when_below_overflows() {
        let anchor = Rect::new(100.0, 600.0, 200.0, 700.0);
        let pos = place_modal(anchor, Size::new(1000.0, 800.0), MODAL_SIZE);
        // above anchor: 600 - 300 - 10
        assert_eq!(pos.y, 290.0);
    }

    #[test]
    fn modal_clamps_vertically_in_short_containers() {
        let anchor = Rect::new(100.0, 150.0, 200.0, 180.0);
        let pos = place_modal(anchor, Size::new(1000.0, 200.0), MODAL_SIZE);
        assert_eq!(pos.y, 10.0);
    }
}
