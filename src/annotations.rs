//! Annotation ownership and lifecycle
//!
//! `AnnotationStore` owns the canonical collection of highlight and
//! rectangle annotations. Identity is immutable; the comment is the only
//! field ever updated in place. Iteration is insertion order, which drives
//! the sequential issue numbering downstream.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ReviewError;
use crate::geometry;
use crate::types::{Comment, CommentPatch, Region};

/// A persisted spatial region plus the reviewer's comment.
/// Source of truth for "what was marked".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: Uuid,
    pub region: Region,
    pub comment: Comment,
    pub created_at: DateTime<Utc>,
}

/// Owns every annotation in the session
#[derive(Debug, Default)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
}

impl AnnotationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an annotation from a confirmed selection.
    ///
    /// Fails with `InvalidRegion` when a rectangle is at or below the
    /// minimum size, or when the comment text is blank.
    pub fn create(&mut self, region: Region, comment: Comment) -> Result<Annotation, ReviewError> {
        if !geometry::is_large_enough(&region) {
            return Err(ReviewError::InvalidRegion(format!(
                "rectangle below minimum size on page {}",
                region.page_number()
            )));
        }
        if comment.text.trim().is_empty() {
            return Err(ReviewError::InvalidRegion("comment text is blank".into()));
        }

        let annotation = Annotation {
            id: Uuid::new_v4(),
            region,
            comment,
            created_at: Utc::now(),
        };
        debug!(
            "created annotation {} on page {}",
            annotation.id,
            annotation.region.page_number()
        );
        self.annotations.push(annotation.clone());
        Ok(annotation)
    }

    /// Merge a partial update into an annotation's comment
    pub fn update(&mut self, id: Uuid, patch: CommentPatch) -> Result<(), ReviewError> {
        if let Some(text) = &patch.text {
            if text.trim().is_empty() {
                return Err(ReviewError::InvalidRegion("comment text is blank".into()));
            }
        }
        let annotation = self
            .annotations
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| ReviewError::NotFound(format!("annotation {id}")))?;

        if let Some(text) = patch.text {
            annotation.comment.text = text;
        }
        if let Some(emoji) = patch.emoji {
            annotation.comment.emoji = Some(emoji);
        }
        Ok(())
    }

    /// Remove an annotation. The session cascades the matching issue.
    pub fn delete(&mut self, id: Uuid) -> Result<Annotation, ReviewError> {
        let idx = self
            .annotations
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| ReviewError::NotFound(format!("annotation {id}")))?;
        let removed = self.annotations.remove(idx);
        debug!("deleted annotation {id}");
        Ok(removed)
    }

    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}
