//! Interactive selection gesture state machine
//!
//! Bridges raw pointer and text-selection events to the annotation store.
//! At most one gesture exists at a time:
//! `Idle -> Dragging -> PendingComment -> Idle`, with the interaction mode
//! gating which transitions are legal. A mode switch cancels whatever is in
//! flight; no gesture survives it.

use std::fmt;

use log::debug;

use crate::geometry::{self, MODAL_SIZE, PageLayoutProvider};
use crate::types::{Point, Rect, RectRegion, Region, Size, TextRegion};

/// Which gestures the viewer currently accepts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionMode {
    /// Text selections create highlight annotations
    Highlight,
    /// Click-and-drag draws rectangle annotations
    Rectangle,
    /// Scrolling and reading only; pointer-down never leaves Idle
    #[default]
    ViewOnly,
}

/// Collaborator callbacks delivered with a finished text selection.
///
/// `commit` transforms the collaborator's live selection into its rendered
/// highlight; `discard` clears its selection UI. Exactly one of the two
/// runs, exactly once, via the consuming methods on [`PendingSelection`].
pub struct SelectionCallbacks {
    pub commit: Box<dyn FnOnce()>,
    pub discard: Box<dyn FnOnce()>,
}

impl fmt::Debug for SelectionCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SelectionCallbacks")
    }
}

/// A gesture waiting on its comment
pub struct PendingSelection {
    pub region: Region,
    /// Where the comment modal goes, in viewport coordinates
    pub anchor: Point,
    callbacks: Option<SelectionCallbacks>,
}

impl PendingSelection {
    /// Accept the selection: runs the collaborator's commit callback
    pub fn commit(self) {
        if let Some(callbacks) = self.callbacks {
            (callbacks.commit)();
        }
    }

    /// Drop the selection: runs the collaborator's discard callback so its
    /// selection UI clears
    pub fn discard(self) {
        if let Some(callbacks) = self.callbacks {
            (callbacks.discard)();
        }
    }
}

impl fmt::Debug for PendingSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingSelection")
            .field("region", &self.region)
            .field("anchor", &self.anchor)
            .field("has_callbacks", &self.callbacks.is_some())
            .finish()
    }
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Idle,
    Dragging {
        /// Page under the initial pointer-down, used as a fallback when the
        /// drag ends in empty margin
        page_hint: u32,
        start: Point,
        current: Point,
    },
    Pending(PendingSelection),
}

/// Drives the gesture lifecycle for both input modes
#[derive(Debug)]
pub struct SelectionController {
    mode: InteractionMode,
    state: State,
    container: Size,
}

impl SelectionController {
    #[must_use]
    pub fn new(container: Size) -> Self {
        Self {
            mode: InteractionMode::default(),
            state: State::Idle,
            container,
        }
    }

    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Switch interaction mode, cancelling any in-flight gesture first
    pub fn set_mode(&mut self, mode: InteractionMode) {
        if mode == self.mode {
            return;
        }
        self.cancel();
        debug!("interaction mode -> {mode:?}");
        self.mode = mode;
    }

    /// Track the host container size for modal placement
    pub fn set_container_size(&mut self, container: Size) {
        self.container = container;
    }

    /// Pointer pressed at a viewport position over the given page
    pub fn pointer_down(&mut self, page_hint: u32, position: Point) {
        if self.mode != InteractionMode::Rectangle {
            return;
        }
        if !matches!(self.state, State::Idle) {
            return;
        }
        self.state = State::Dragging {
            page_hint,
            start: position,
            current: position,
        };
    }

    /// Pointer moved; returns the live preview rectangle while dragging.
    /// Visual feedback only, no state transition.
    pub fn pointer_move(&mut self, position: Point) -> Option<Rect> {
        if let State::Dragging { start, current, .. } = &mut self.state {
            *current = position;
            Some(Rect::from_corners(*start, position))
        } else {
            None
        }
    }

    /// Preview rectangle of a drag in progress
    #[must_use]
    pub fn preview_rect(&self) -> Option<Rect> {
        match self.state {
            State::Dragging { start, current, .. } => Some(Rect::from_corners(start, current)),
            _ => None,
        }
    }

    /// Pointer released: resolve the target page and either move to
    /// pending-comment or silently drop an undersized gesture.
    ///
    /// The page containing the rectangle's geometric center wins; if no
    /// page contains it, the pointer-down page is used when its layout is
    /// known, otherwise the gesture is discarded.
    pub fn pointer_up(&mut self, layout: &dyn PageLayoutProvider) {
        let (page_hint, start, current) =
            match std::mem::replace(&mut self.state, State::Idle) {
                State::Dragging {
                    page_hint,
                    start,
                    current,
                } => (page_hint, start, current),
                other => {
                    self.state = other;
                    return;
                }
            };

        let bounds = Rect::from_corners(start, current);
        let page = match layout.page_at_point(bounds.center()) {
            Some(page) => page,
            None if layout.page_render_size(page_hint).is_some() => page_hint,
            None => {
                debug!("drag ended outside any rendered page, discarding");
                return;
            }
        };
        let (origin, size) = match (
            layout.page_viewport_origin(page),
            layout.page_render_size(page),
        ) {
            (Some(origin), Some(size)) => (origin, size),
            _ => return,
        };

        let region = Region::Rect(RectRegion::from_corners(
            page,
            Point::new(bounds.x1 - origin.x, bounds.y1 - origin.y),
            Point::new(bounds.x2 - origin.x, bounds.y2 - origin.y),
            size,
        ));
        if !geometry::is_large_enough(&region) {
            debug!("rectangle below minimum size, discarding");
            return;
        }

        let anchor = geometry::place_modal(bounds, self.container, MODAL_SIZE);
        self.state = State::Pending(PendingSelection {
            region,
            anchor,
            callbacks: None,
        });
    }

    /// Pointer released outside the tracked surface: abort any drag with
    /// nothing created
    pub fn global_pointer_up(&mut self) {
        if matches!(self.state, State::Dragging { .. }) {
            debug!("global pointer-up aborted drag");
            self.state = State::Idle;
        }
    }

    /// Finished text selection delivered by the rendering collaborator.
    ///
    /// Outside highlight mode the selection is discarded immediately so the
    /// collaborator clears its selection UI. A stale pending gesture is
    /// cancelled before the new one takes its place.
    pub fn text_selection_finished(
        &mut self,
        region: TextRegion,
        callbacks: SelectionCallbacks,
        layout: &dyn PageLayoutProvider,
    ) {
        if self.mode != InteractionMode::Highlight {
            (callbacks.discard)();
            return;
        }
        self.cancel();

        let origin = layout
            .page_viewport_origin(region.page_number)
            .unwrap_or_default();
        let anchor = region.bounding_box.translated(origin.x, origin.y);
        let anchor = geometry::place_modal(anchor, self.container, MODAL_SIZE);
        self.state = State::Pending(PendingSelection {
            region: Region::Text(region),
            anchor,
            callbacks: Some(callbacks),
        });
    }

    /// Modal position while a selection is pending
    #[must_use]
    pub fn pending_anchor(&self) -> Option<Point> {
        match &self.state {
            State::Pending(pending) => Some(pending.anchor),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.state, State::Pending(_))
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, State::Dragging { .. })
    }

    /// Take the pending selection out for confirmation. The caller decides
    /// whether to `commit` or `discard` it after persisting.
    pub fn confirm(&mut self) -> Option<PendingSelection> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Pending(pending) => Some(pending),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Cancel whatever gesture is in flight
    pub fn cancel(&mut self) {
        if let State::Pending(pending) = std::mem::replace(&mut self.state, State::Idle) {
            pending.discard();
        }
    }
}
