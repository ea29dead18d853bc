//! Marker projection over current page layout
//!
//! Markers are ephemeral: each projection pass replaces the previous set
//! wholesale, so re-projecting with unchanged inputs is idempotent. Layout
//! churn from resize and scroll is coalesced through a debounce window, and
//! deferred settle passes cover a collaborator whose layout stabilizes only
//! after its own load completes.

use std::time::{Duration, Instant};

use log::debug;
use serde::Serialize;

use crate::annotations::AnnotationStore;
use crate::debounce::Debouncer;
use crate::geometry::{self, PageLayoutProvider};
use crate::issues::Issue;

/// Debounce window for layout and issue churn
pub const PROJECTION_DEBOUNCE: Duration = Duration::from_millis(100);

/// Delays for the post-load settle passes
const SETTLE_DELAYS: [Duration; 2] = [Duration::from_secs(1), Duration::from_secs(2)];

/// An issue projected onto the current viewport. Never stored beyond the
/// latest projection pass.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub issue_id: String,
    pub page: u32,
    pub x: f32,
    pub y: f32,
}

/// Recomputes the on-page marker set whenever issues or layout change
#[derive(Debug)]
pub struct MarkerProjector {
    debouncer: Debouncer,
    settle_deadlines: Vec<Instant>,
    markers: Vec<Marker>,
}

impl Default for MarkerProjector {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkerProjector {
    #[must_use]
    pub fn new() -> Self {
        Self {
            debouncer: Debouncer::new(PROJECTION_DEBOUNCE),
            settle_deadlines: Vec::new(),
            markers: Vec::new(),
        }
    }

    /// Issue collection changed; coalesced with other pending updates
    pub fn notify_issues_changed(&mut self) {
        self.debouncer.schedule();
    }

    /// Page layout changed (container resize, scroll-driven re-layout)
    pub fn notify_layout_changed(&mut self) {
        self.debouncer.schedule();
    }

    /// Document finished loading; queue the deferred settle passes for a
    /// collaborator whose layout keeps shifting shortly after load
    pub fn notify_document_loaded(&mut self) {
        let now = Instant::now();
        self.settle_deadlines = SETTLE_DELAYS.iter().map(|&delay| now + delay).collect();
        self.debouncer.schedule();
    }

    #[must_use]
    pub fn has_pending_work(&self) -> bool {
        self.debouncer.is_pending() || !self.settle_deadlines.is_empty()
    }

    /// Poll pending deadlines and recompute if any fired.
    /// Returns the fresh marker set when a recompute happened.
    pub fn tick(
        &mut self,
        issues: &[Issue],
        store: &AnnotationStore,
        layout: &dyn PageLayoutProvider,
    ) -> Option<&[Marker]> {
        let now = Instant::now();
        let before = self.settle_deadlines.len();
        self.settle_deadlines.retain(|&deadline| deadline > now);
        let settle_fired = self.settle_deadlines.len() != before;

        if self.debouncer.fire_if_due() || settle_fired {
            self.markers = project(issues, store, layout);
            debug!("projected {} markers", self.markers.len());
            Some(&self.markers)
        } else {
            None
        }
    }

    /// Recompute immediately, collapsing any pending deadline
    pub fn reproject(
        &mut self,
        issues: &[Issue],
        store: &AnnotationStore,
        layout: &dyn PageLayoutProvider,
    ) -> &[Marker] {
        self.debouncer.cancel();
        self.markers = project(issues, store, layout);
        &self.markers
    }

    /// Last projected marker set
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }
}

/// Compute viewport marker positions for every issue whose page is
/// currently rendered. Issues on unrendered pages, and issues whose
/// annotation is gone, are omitted rather than errors.
#[must_use]
pub fn project(
    issues: &[Issue],
    store: &AnnotationStore,
    layout: &dyn PageLayoutProvider,
) -> Vec<Marker> {
    issues
        .iter()
        .filter_map(|issue| {
            let annotation = issue.annotation_ref.and_then(|id| store.get(id))?;
            let size = layout.page_render_size(issue.page)?;
            let origin = layout.page_viewport_origin(issue.page)?;

            let center = geometry::to_viewport_rect(&annotation.region, size).center();
            Some(Marker {
                issue_id: issue.id.clone(),
                page: issue.page,
                x: origin.x + center.x,
                y: origin.y + center.y,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issues::{IssueLedger, IssuePriority};
    use crate::test_utils::FixedLayout;
    use crate::types::{Comment, Point, RectRegion, Region, Size};
    use std::thread;

    fn populated() -> (AnnotationStore, IssueLedger) {
        let mut store = AnnotationStore::new();
        let mut ledger = IssueLedger::new();
        let annotation = store
            .create(
                Region::Rect(RectRegion::from_corners(
                    1,
                    Point::new(100.0, 100.0),
                    Point::new(300.0, 200.0),
                    Size::new(600.0, 800.0),
                )),
                Comment::new("check"),
            )
            .unwrap();
        ledger.derive_from_annotation(&annotation, IssuePriority::Medium);
        (store, ledger)
    }

    #[test]
    fn marker_sits_at_the_scaled_center() {
        let (store, ledger) = populated();
        // rendered at 2x the captured size
        let layout = FixedLayout::single_page(1200.0, 1600.0);

        let markers = project(ledger.issues(), &store, &layout);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].issue_id, "RECT-001");
        assert_eq!(markers[0].page, 1);
        assert_eq!(markers[0].x, 400.0);
        assert_eq!(markers[0].y, 300.0);
    }

    #[test]
    fn unrendered_pages_are_omitted() {
        let (store, ledger) = populated();
        let layout = FixedLayout::new();
        assert!(project(ledger.issues(), &store, &layout).is_empty());
    }

    #[test]
    fn projection_is_idempotent() {
        let (store, ledger) = populated();
        let layout = FixedLayout::single_page(600.0, 800.0);
        let mut projector = MarkerProjector::new();

        let first = projector.reproject(ledger.issues(), &store, &layout).to_vec();
        let second = projector.reproject(ledger.issues(), &store, &layout).to_vec();
        assert_eq!(first, second);
        assert_eq!(projector.markers().len(), 1);
    }

    #[test]
    fn rapid_notifications_coalesce_into_one_recompute() {
        let (store, ledger) = populated();
        let layout = FixedLayout::single_page(600.0, 800.0);
        let mut projector = MarkerProjector::new();

        projector.notify_issues_changed();
        projector.notify_layout_changed();
        projector.notify_layout_changed();

        assert!(projector.tick(ledger.issues(), &store, &layout).is_none());

        thread::sleep(Duration::from_millis(110));
        let markers = projector.tick(ledger.issues(), &store, &layout).unwrap();
        assert_eq!(markers.len(), 1);

        // nothing left to do
        assert!(projector.tick(ledger.issues(), &store, &layout).is_none());
    }

    #[test]
    fn resize_reprojects_with_new_scale() {
        let (store, ledger) = populated();
        let mut layout = FixedLayout::single_page(600.0, 800.0);
        let mut projector = MarkerProjector::new();

        projector.reproject(ledger.issues(), &store, &layout);
        assert_eq!(projector.markers()[0].x, 200.0);

        layout.set_page_size(1, Size::new(300.0, 400.0));
        projector.reproject(ledger.issues(), &store, &layout);
        assert_eq!(projector.markers()[0].x, 100.0);
        assert_eq!(projector.markers().len(), 1);
    }

    #[test]
    fn document_load_queues_settle_passes() {
        let mut projector = MarkerProjector::new();
        assert!(!projector.has_pending_work());
        projector.notify_document_loaded();
        assert!(projector.has_pending_work());
    }
}
