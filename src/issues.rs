//! Issue ledger: workflow records derived from annotations
//!
//! Issues are created only as a side effect of annotation creation, one per
//! annotation. Status and priority changes never touch the source
//! annotation; deleting an issue never deletes the annotation. The cascade
//! runs the other way: deleting an annotation removes its derived issue.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::annotations::Annotation;
use crate::errors::ReviewError;
use crate::types::RegionKind;

/// Category assigned to issues derived from text highlights
pub const HIGHLIGHT_CATEGORY: &str = "User Review";
/// Category assigned to issues derived from drawn rectangles
pub const RECTANGLE_CATEGORY: &str = "Rectangle Annotation";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueStatus {
    #[default]
    Open,
    InReview,
    Resolved,
}

impl IssueStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Open => "open",
            IssueStatus::InReview => "in-review",
            IssueStatus::Resolved => "resolved",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssuePriority {
    Low,
    #[default]
    Medium,
    High,
}

impl IssuePriority {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            IssuePriority::Low => "low",
            IssuePriority::Medium => "medium",
            IssuePriority::High => "high",
        }
    }
}

impl fmt::Display for IssuePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow-tracking record derived from an annotation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Sequential human-readable id, e.g. `ISSUE-003` or `RECT-002`
    pub id: String,
    pub page: u32,
    pub description: String,
    pub status: IssueStatus,
    pub priority: IssuePriority,
    pub category: String,
    /// Weak reference to the source annotation, cleared on cascade
    pub annotation_ref: Option<Uuid>,
}

/// Per-status tallies, recomputed on demand and never cached
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub open: usize,
    pub in_review: usize,
    pub resolved: usize,
}

impl StatusCounts {
    #[must_use]
    pub fn get(&self, status: IssueStatus) -> usize {
        match status {
            IssueStatus::Open => self.open,
            IssueStatus::InReview => self.in_review,
            IssueStatus::Resolved => self.resolved,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.open + self.in_review + self.resolved
    }
}

/// Maintains the issue collection and its per-kind id sequences
#[derive(Debug, Default)]
pub struct IssueLedger {
    issues: Vec<Issue>,
    highlight_seq: u32,
    rectangle_seq: u32,
}

impl IssueLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the workflow issue for a freshly created annotation.
    ///
    /// Ids are sequential per originating kind: `ISSUE-NNN` for highlights,
    /// `RECT-NNN` for rectangles, zero-padded to three digits. Sequences
    /// are strictly monotonic, so a deleted issue's number is never reused.
    pub fn derive_from_annotation(
        &mut self,
        annotation: &Annotation,
        initial_priority: IssuePriority,
    ) -> &Issue {
        let kind = annotation.region.kind();
        let id = match kind {
            RegionKind::Highlight => {
                self.highlight_seq += 1;
                format!("ISSUE-{:03}", self.highlight_seq)
            }
            RegionKind::Rectangle => {
                self.rectangle_seq += 1;
                format!("RECT-{:03}", self.rectangle_seq)
            }
        };
        let category = match kind {
            RegionKind::Highlight => HIGHLIGHT_CATEGORY,
            RegionKind::Rectangle => RECTANGLE_CATEGORY,
        };

        let issue = Issue {
            id,
            page: annotation.region.page_number(),
            description: annotation.comment.text.clone(),
            status: IssueStatus::Open,
            priority: initial_priority,
            category: category.to_string(),
            annotation_ref: Some(annotation.id),
        };
        debug!("derived issue {} from annotation {}", issue.id, annotation.id);
        self.issues.push(issue);
        &self.issues[self.issues.len() - 1]
    }

    pub fn set_status(&mut self, issue_id: &str, status: IssueStatus) -> Result<(), ReviewError> {
        let issue = self
            .issues
            .iter_mut()
            .find(|i| i.id == issue_id)
            .ok_or_else(|| ReviewError::NotFound(format!("issue {issue_id}")))?;
        issue.status = status;
        Ok(())
    }

    pub fn set_priority(
        &mut self,
        issue_id: &str,
        priority: IssuePriority,
    ) -> Result<(), ReviewError> {
        let issue = self
            .issues
            .iter_mut()
            .find(|i| i.id == issue_id)
            .ok_or_else(|| ReviewError::NotFound(format!("issue {issue_id}")))?;
        issue.priority = priority;
        Ok(())
    }

    /// Remove the issue derived from the given annotation, if any.
    /// No-op (returns `None`) when no issue references it.
    pub fn cascade_delete(&mut self, annotation_id: Uuid) -> Option<Issue> {
        let idx = self
            .issues
            .iter()
            .position(|i| i.annotation_ref == Some(annotation_id))?;
        Some(self.issues.remove(idx))
    }

    /// Remove an issue from the table side; the source annotation survives
    pub fn remove(&mut self, issue_id: &str) -> Option<Issue> {
        let idx = self.issues.iter().position(|i| i.id == issue_id)?;
        Some(self.issues.remove(idx))
    }

    #[must_use]
    pub fn get(&self, issue_id: &str) -> Option<&Issue> {
        self.issues.iter().find(|i| i.id == issue_id)
    }

    /// Read-only snapshot of the collection, insertion order
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Tally issues per status. Always equals the true count of issues
    /// currently held.
    #[must_use]
    pub fn count_by_status(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for issue in &self.issues {
            match issue.status {
                IssueStatus::Open => counts.open += 1,
                IssueStatus::InReview => counts.in_review += 1,
                IssueStatus::Resolved => counts.resolved += 1,
            }
        }
        counts
    }
}
