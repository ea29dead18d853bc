//! Core types for the review engine
//!
//! Geometry primitives plus the region/comment model shared by every
//! component. Regions come in two flavors: text selections reported by the
//! rendering collaborator and rectangles drawn directly over a page.

use serde::{Deserialize, Serialize};

/// A point in viewport or page pixel space
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Rendered dimensions of a page or container
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle with `(x1, y1)` top-left and `(x2, y2)` bottom-right
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Build from two arbitrary corners, normalizing the corner order
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x1: a.x.min(b.x),
            y1: a.y.min(b.y),
            x2: a.x.max(b.x),
            y2: a.y.max(b.y),
        }
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x1 && point.x <= self.x2 && point.y >= self.y1 && point.y <= self.y2
    }

    /// This rect shifted by the given offset
    #[must_use]
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x1 + dx, self.y1 + dy, self.x2 + dx, self.y2 + dy)
    }
}

/// Which gesture produced a region; drives issue id sequences and categories
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegionKind {
    Highlight,
    Rectangle,
}

/// Text selection region in page-relative scaled units.
///
/// The rendering collaborator reports bounding boxes already normalized to
/// its own scale factor, so these map to the viewport unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextRegion {
    pub page_number: u32,
    /// Bounding box of the whole selection
    pub bounding_box: Rect,
    /// Per-line boxes making up the selection
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rects: Vec<Rect>,
    /// The selected text
    pub text: String,
}

/// Rectangle region in pixel units as measured at creation time.
///
/// `captured_page_width`/`captured_page_height` record the page's rendered
/// size at that moment so later renders can rescale proportionally.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RectRegion {
    pub page_number: u32,
    pub start_x: f32,
    pub start_y: f32,
    pub end_x: f32,
    pub end_y: f32,
    pub captured_page_width: f32,
    pub captured_page_height: f32,
}

impl RectRegion {
    /// Build from two drag corners, normalizing so start <= end on both axes
    #[must_use]
    pub fn from_corners(page_number: u32, a: Point, b: Point, captured: Size) -> Self {
        Self {
            page_number,
            start_x: a.x.min(b.x),
            start_y: a.y.min(b.y),
            end_x: a.x.max(b.x),
            end_y: a.y.max(b.y),
            captured_page_width: captured.width,
            captured_page_height: captured.height,
        }
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.end_x - self.start_x
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.end_y - self.start_y
    }

    /// Bounds in capture-time page coordinates
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.start_x, self.start_y, self.end_x, self.end_y)
    }
}

/// The geometric description of a marked area
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Region {
    Text(TextRegion),
    Rect(RectRegion),
}

impl Region {
    #[must_use]
    pub fn page_number(&self) -> u32 {
        match self {
            Region::Text(text) => text.page_number,
            Region::Rect(rect) => rect.page_number,
        }
    }

    #[must_use]
    pub fn kind(&self) -> RegionKind {
        match self {
            Region::Text(_) => RegionKind::Highlight,
            Region::Rect(_) => RegionKind::Rectangle,
        }
    }
}

/// Reviewer comment attached to an annotation.
///
/// The emoji is optional decoration and is never validated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl Comment {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emoji: None,
        }
    }

    #[must_use]
    pub fn with_emoji(text: impl Into<String>, emoji: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emoji: Some(emoji.into()),
        }
    }
}

/// Partial comment update; `None` fields keep their current value
#[derive(Clone, Debug, Default)]
pub struct CommentPatch {
    pub text: Option<String>,
    pub emoji: Option<String>,
}
