use super::{Decision, ReviewItem, SessionStats};
use crate::error::{Result, SwipeError};
use std::collections::HashSet;

/// Outcome of recording a decision for the current item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvanceResult {
    /// The item the decision was recorded for
    pub decided: ReviewItem,
    /// The item now under review, `None` once the queue is exhausted
    pub next: Option<ReviewItem>,
}

/// Ordered items plus a cursor over them.
///
/// The cursor only moves forward. Every advance records the passed item's id in
/// exactly one of `kept` / `deleted`, so `kept.len() + deleted.len() == cursor`.
#[derive(Debug, Default)]
pub struct ReviewQueue {
    items: Vec<ReviewItem>,
    cursor: usize,
    kept: Vec<String>,
    deleted: Vec<String>,
}

impl ReviewQueue {
    /// Creates a queue over `items` in the order given.
    ///
    /// Fails with [`SwipeError::DuplicateId`] if two items share an id.
    pub fn new(items: Vec<ReviewItem>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(SwipeError::DuplicateId(item.id.clone()));
            }
        }

        Ok(Self {
            items,
            cursor: 0,
            kept: Vec::new(),
            deleted: Vec::new(),
        })
    }

    pub fn current(&self) -> Option<&ReviewItem> {
        self.items.get(self.cursor)
    }

    /// The item after the current one, if any
    pub fn peek_next(&self) -> Option<&ReviewItem> {
        self.items.get(self.cursor + 1)
    }

    pub fn record_keep(&mut self) -> Result<AdvanceResult> {
        self.record(Decision::Keep)
    }

    /// Records a delete decision. Storage is not touched here.
    pub fn record_delete(&mut self) -> Result<AdvanceResult> {
        self.record(Decision::Delete)
    }

    /// Records `decision` for the current item and advances the cursor
    pub fn record(&mut self, decision: Decision) -> Result<AdvanceResult> {
        let decided = self
            .current()
            .cloned()
            .ok_or(SwipeError::OutOfRange {
                cursor: self.cursor,
                len: self.items.len(),
            })?;

        match decision {
            Decision::Keep => self.kept.push(decided.id.clone()),
            Decision::Delete => self.deleted.push(decided.id.clone()),
        }
        self.cursor += 1;

        Ok(AdvanceResult {
            decided,
            next: self.current().cloned(),
        })
    }

    /// Drops every item and decision, returning to the empty queue
    pub fn reset(&mut self) {
        self.items.clear();
        self.cursor = 0;
        self.kept.clear();
        self.deleted.clear();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.items.len()
    }

    /// Ids recorded as kept, in decision order
    pub fn kept(&self) -> &[String] {
        &self.kept
    }

    /// Ids recorded as deleted, in decision order
    pub fn deleted(&self) -> &[String] {
        &self.deleted
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            total: self.items.len(),
            kept: self.kept.len(),
            deleted: self.deleted.len(),
            remaining: self.items.len() - self.cursor,
        }
    }
}
