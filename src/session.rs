//! Review session: the coordination surface over all engine components
//!
//! Owns the annotation store, issue ledger, selection controller, and
//! marker projector, and keeps them mutually consistent: a confirmed
//! gesture becomes annotation plus issue atomically, annotation deletes
//! cascade to their issue, and every collection or layout change
//! reschedules marker projection.

use log::{debug, info};
use uuid::Uuid;

use crate::annotations::{Annotation, AnnotationStore};
use crate::errors::ReviewError;
use crate::geometry::PageLayoutProvider;
use crate::issues::{Issue, IssueLedger, IssuePriority, IssueStatus, StatusCounts};
use crate::markers::{Marker, MarkerProjector};
use crate::selection::{InteractionMode, SelectionCallbacks, SelectionController};
use crate::types::{Comment, CommentPatch, Point, Rect, Region, Size, TextRegion};

/// Outward navigation request for the rendering collaborator
#[derive(Clone, Debug, PartialEq)]
pub enum NavigationRequest {
    /// Scroll the prior selection back into view
    ScrollToRegion(Region),
    /// Fall back to the page when the annotation is gone
    ScrollToPage(u32),
}

/// One in-memory review session; all state is discarded on reload
pub struct ReviewSession {
    store: AnnotationStore,
    ledger: IssueLedger,
    controller: SelectionController,
    projector: MarkerProjector,
    selected_issue: Option<String>,
    current_page: u32,
}

impl ReviewSession {
    #[must_use]
    pub fn new(container: Size) -> Self {
        Self {
            store: AnnotationStore::new(),
            ledger: IssueLedger::new(),
            controller: SelectionController::new(container),
            projector: MarkerProjector::new(),
            selected_issue: None,
            current_page: 1,
        }
    }

    // --- gesture surface ---

    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.controller.set_mode(mode);
    }

    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.controller.mode()
    }

    pub fn pointer_down(&mut self, page_hint: u32, position: Point) {
        self.controller.pointer_down(page_hint, position);
    }

    pub fn pointer_move(&mut self, position: Point) -> Option<Rect> {
        self.controller.pointer_move(position)
    }

    pub fn pointer_up(&mut self, layout: &dyn PageLayoutProvider) {
        self.controller.pointer_up(layout);
    }

    pub fn global_pointer_up(&mut self) {
        self.controller.global_pointer_up();
    }

    pub fn text_selection_finished(
        &mut self,
        region: TextRegion,
        callbacks: SelectionCallbacks,
        layout: &dyn PageLayoutProvider,
    ) {
        self.controller
            .text_selection_finished(region, callbacks, layout);
    }

    #[must_use]
    pub fn pending_anchor(&self) -> Option<Point> {
        self.controller.pending_anchor()
    }

    #[must_use]
    pub fn has_pending_selection(&self) -> bool {
        self.controller.is_pending()
    }

    /// Confirm the pending selection with the reviewer's comment.
    ///
    /// On success returns the derived issue's id. Validation failures
    /// (blank comment, undersized region) discard the gesture silently,
    /// matching the engine's no-fatal-errors policy.
    pub fn confirm_pending(&mut self, comment: Comment) -> Option<String> {
        let pending = self.controller.confirm()?;
        match self.store.create(pending.region.clone(), comment) {
            Ok(annotation) => {
                let issue_id = self
                    .ledger
                    .derive_from_annotation(&annotation, IssuePriority::Medium)
                    .id
                    .clone();
                pending.commit();
                self.projector.notify_issues_changed();
                info!("confirmed selection as {issue_id}");
                Some(issue_id)
            }
            Err(err) => {
                debug!("discarding selection: {err}");
                pending.discard();
                None
            }
        }
    }

    pub fn cancel_pending(&mut self) {
        self.controller.cancel();
    }

    // --- annotation surface ---

    pub fn update_comment(&mut self, id: Uuid, patch: CommentPatch) -> Result<(), ReviewError> {
        self.store.update(id, patch)
    }

    /// Delete an annotation and cascade to its derived issue
    pub fn delete_annotation(&mut self, id: Uuid) -> Result<(), ReviewError> {
        self.store.delete(id)?;
        if let Some(issue) = self.ledger.cascade_delete(id) {
            if self.selected_issue.as_deref() == Some(issue.id.as_str()) {
                self.selected_issue = None;
            }
            debug!("cascade removed issue {}", issue.id);
        }
        self.projector.notify_issues_changed();
        Ok(())
    }

    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.store.iter()
    }

    #[must_use]
    pub fn annotation(&self, id: Uuid) -> Option<&Annotation> {
        self.store.get(id)
    }

    // --- issue surface ---

    /// Read-only snapshot for the issue table
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        self.ledger.issues()
    }

    #[must_use]
    pub fn issue(&self, issue_id: &str) -> Option<&Issue> {
        self.ledger.get(issue_id)
    }

    pub fn set_issue_status(
        &mut self,
        issue_id: &str,
        status: IssueStatus,
    ) -> Result<(), ReviewError> {
        self.ledger.set_status(issue_id, status)
    }

    pub fn set_issue_priority(
        &mut self,
        issue_id: &str,
        priority: IssuePriority,
    ) -> Result<(), ReviewError> {
        self.ledger.set_priority(issue_id, priority)
    }

    /// Remove an issue from the table; its source annotation survives
    pub fn remove_issue(&mut self, issue_id: &str) -> Option<Issue> {
        let removed = self.ledger.remove(issue_id)?;
        if self.selected_issue.as_deref() == Some(issue_id) {
            self.selected_issue = None;
        }
        self.projector.notify_issues_changed();
        Some(removed)
    }

    #[must_use]
    pub fn status_counts(&self) -> StatusCounts {
        self.ledger.count_by_status()
    }

    /// Select an issue (table row or marker click) and produce the
    /// navigation request for the rendering collaborator. Unknown ids are
    /// a no-op.
    pub fn select_issue(&mut self, issue_id: &str) -> Option<NavigationRequest> {
        let issue = self.ledger.get(issue_id)?;
        self.selected_issue = Some(issue.id.clone());

        let request = issue
            .annotation_ref
            .and_then(|id| self.store.get(id))
            .map(|annotation| NavigationRequest::ScrollToRegion(annotation.region.clone()))
            .unwrap_or(NavigationRequest::ScrollToPage(issue.page));
        Some(request)
    }

    #[must_use]
    pub fn selected_issue(&self) -> Option<&str> {
        self.selected_issue.as_deref()
    }

    // --- layout and markers ---

    pub fn document_loaded(&mut self) {
        self.projector.notify_document_loaded();
    }

    pub fn container_resized(&mut self, size: Size) {
        self.controller.set_container_size(size);
        self.projector.notify_layout_changed();
    }

    /// Scroll position changed; `current_page` is the page the collaborator
    /// reports at the top of the viewport
    pub fn scroll_changed(&mut self, current_page: u32) {
        self.current_page = current_page;
        self.projector.notify_layout_changed();
    }

    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Poll debounce deadlines; returns a fresh marker set when projection
    /// ran
    pub fn tick(&mut self, layout: &dyn PageLayoutProvider) -> Option<&[Marker]> {
        self.projector.tick(self.ledger.issues(), &self.store, layout)
    }

    /// Recompute markers immediately, bypassing the debounce window
    pub fn reproject_markers(&mut self, layout: &dyn PageLayoutProvider) -> &[Marker] {
        self.projector
            .reproject(self.ledger.issues(), &self.store, layout)
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        self.projector.markers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FixedLayout;
    use crate::types::Rect;

    fn session_with_rect_mode() -> ReviewSession {
        let mut session = ReviewSession::new(Size::new(1000.0, 1000.0));
        session.set_mode(InteractionMode::Rectangle);
        session
    }

    fn draw_rectangle(session: &mut ReviewSession, layout: &FixedLayout, comment: &str) -> String {
        session.pointer_down(1, Point::new(100.0, 100.0));
        session.pointer_move(Point::new(300.0, 200.0));
        session.pointer_up(layout);
        session.confirm_pending(Comment::new(comment)).unwrap()
    }

    #[test]
    fn confirm_creates_annotation_and_issue_together() {
        let layout = FixedLayout::single_page(600.0, 800.0);
        let mut session = session_with_rect_mode();

        let issue_id = draw_rectangle(&mut session, &layout, "Check totals");
        assert_eq!(issue_id, "RECT-001");

        let issue = session.issue(&issue_id).unwrap();
        assert_eq!(issue.description, "Check totals");
        assert_eq!(issue.page, 1);

        let annotation_id = issue.annotation_ref.unwrap();
        assert_eq!(
            session.annotation(annotation_id).unwrap().comment.text,
            "Check totals"
        );
    }

    #[test]
    fn blank_comment_discards_the_gesture() {
        let layout = FixedLayout::single_page(600.0, 800.0);
        let mut session = session_with_rect_mode();

        session.pointer_down(1, Point::new(100.0, 100.0));
        session.pointer_move(Point::new(300.0, 200.0));
        session.pointer_up(&layout);

        assert!(session.confirm_pending(Comment::new("  ")).is_none());
        assert!(session.issues().is_empty());
        assert_eq!(session.annotations().count(), 0);
        assert!(!session.has_pending_selection());
    }

    #[test]
    fn delete_annotation_cascades_and_clears_selection() {
        let layout = FixedLayout::single_page(600.0, 800.0);
        let mut session = session_with_rect_mode();

        let issue_id = draw_rectangle(&mut session, &layout, "first");
        session.select_issue(&issue_id).unwrap();

        let annotation_id = session.issue(&issue_id).unwrap().annotation_ref.unwrap();
        session.delete_annotation(annotation_id).unwrap();

        assert!(session.issues().is_empty());
        assert!(session.selected_issue().is_none());
        assert_eq!(session.annotations().count(), 0);
    }

    #[test]
    fn remove_issue_keeps_the_annotation() {
        let layout = FixedLayout::single_page(600.0, 800.0);
        let mut session = session_with_rect_mode();

        let issue_id = draw_rectangle(&mut session, &layout, "keep region");
        session.remove_issue(&issue_id).unwrap();

        assert!(session.issues().is_empty());
        assert_eq!(session.annotations().count(), 1);
    }

    #[test]
    fn select_issue_navigates_to_region_or_page() {
        let layout = FixedLayout::single_page(600.0, 800.0);
        let mut session = session_with_rect_mode();

        let issue_id = draw_rectangle(&mut session, &layout, "navigate");
        match session.select_issue(&issue_id).unwrap() {
            NavigationRequest::ScrollToRegion(region) => assert_eq!(region.page_number(), 1),
            other => panic!("expected region navigation, got {other:?}"),
        }
        assert_eq!(session.selected_issue(), Some(issue_id.as_str()));

        // unknown issue is a no-op
        assert!(session.select_issue("RECT-999").is_none());
    }

    #[test]
    fn mode_switch_mid_drag_creates_nothing() {
        let mut session = session_with_rect_mode();

        let before = session.issues().len();
        session.pointer_down(1, Point::new(100.0, 100.0));
        session.pointer_move(Point::new(300.0, 300.0));
        session.set_mode(InteractionMode::Highlight);

        assert_eq!(session.issues().len(), before);
        assert!(session.confirm_pending(Comment::new("late")).is_none());
        assert_eq!(session.issues().len(), before);
    }

    #[test]
    fn markers_follow_issue_changes() {
        let layout = FixedLayout::single_page(600.0, 800.0);
        let mut session = session_with_rect_mode();

        let issue_id = draw_rectangle(&mut session, &layout, "marked");
        let markers = session.reproject_markers(&layout);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].issue_id, issue_id);
        // center of the 100..300 x 100..200 rectangle at capture scale
        assert_eq!(markers[0].x, 200.0);
        assert_eq!(markers[0].y, 150.0);
    }

    #[test]
    fn scroll_tracks_current_page() {
        let mut session = session_with_rect_mode();
        assert_eq!(session.current_page(), 1);
        session.scroll_changed(7);
        assert_eq!(session.current_page(), 7);
    }

    #[test]
    fn preview_rect_is_exposed_while_dragging() {
        let mut session = session_with_rect_mode();
        session.pointer_down(1, Point::new(10.0, 20.0));
        let preview = session.pointer_move(Point::new(50.0, 80.0)).unwrap();
        assert_eq!(preview, Rect::new(10.0, 20.0, 50.0, 80.0));
    }
}
