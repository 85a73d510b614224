//! Per-session feed state: which cards were swiped, what is saved, what is
//! marked applied. All operations are linear scans over small vectors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::AppError;
use crate::feed::catalog::Catalog;
use crate::models::opportunity::{FeedFilter, Opportunity};

/// Inbox capacity shown next to the remaining count.
pub const INBOX_CAPACITY: usize = 10;

#[derive(Debug, Error, PartialEq)]
pub enum FeedError {
    #[error("Opportunity {0} not found")]
    UnknownOpportunity(String),

    #[error("Opportunity {0} is not saved")]
    NotSaved(String),

    #[error("No opportunities left in the inbox")]
    InboxEmpty,
}

impl From<FeedError> for AppError {
    fn from(err: FeedError) -> Self {
        match err {
            FeedError::UnknownOpportunity(_) | FeedError::NotSaved(_) => {
                AppError::NotFound(err.to_string())
            }
            FeedError::InboxEmpty => AppError::InvalidTransition(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    /// Skip the card.
    Left,
    /// Save the card.
    Right,
}

#[derive(Debug, Clone, Serialize)]
pub struct InboxView {
    pub current: Option<Opportunity>,
    pub remaining: usize,
    pub capacity: usize,
    pub filter: FeedFilter,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavedOpportunity {
    #[serde(flatten)]
    pub opportunity: Opportunity,
    pub applied: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FeedState {
    swiped: Vec<String>,
    saved: Vec<Opportunity>,
    applied: Vec<String>,
}

impl FeedState {
    fn pending<'a>(
        &'a self,
        catalog: &'a Catalog,
        filter: FeedFilter,
    ) -> impl Iterator<Item = &'a Opportunity> + 'a {
        catalog
            .filtered(filter)
            .filter(move |o| !self.swiped.contains(&o.id))
    }

    pub fn inbox(&self, catalog: &Catalog, filter: FeedFilter) -> InboxView {
        InboxView {
            current: self.pending(catalog, filter).next().cloned(),
            remaining: self.pending(catalog, filter).count(),
            capacity: INBOX_CAPACITY,
            filter,
        }
    }

    /// Swipes the current card. Right also saves it.
    pub fn swipe(
        &mut self,
        catalog: &Catalog,
        filter: FeedFilter,
        direction: SwipeDirection,
    ) -> Result<Opportunity, FeedError> {
        let current = self
            .pending(catalog, filter)
            .next()
            .cloned()
            .ok_or(FeedError::InboxEmpty)?;

        self.swiped.push(current.id.clone());
        if direction == SwipeDirection::Right {
            self.save(catalog, &current.id)?;
        }
        Ok(current)
    }

    /// Saving twice keeps a single entry.
    pub fn save(&mut self, catalog: &Catalog, id: &str) -> Result<(), FeedError> {
        let opportunity = catalog
            .get(id)
            .ok_or_else(|| FeedError::UnknownOpportunity(id.to_string()))?;
        if !self.is_saved(id) {
            self.saved.push(opportunity.clone());
        }
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<(), FeedError> {
        let before = self.saved.len();
        self.saved.retain(|o| o.id != id);
        if self.saved.len() == before {
            return Err(FeedError::NotSaved(id.to_string()));
        }
        Ok(())
    }

    pub fn mark_applied(&mut self, catalog: &Catalog, id: &str) -> Result<(), FeedError> {
        if catalog.get(id).is_none() {
            return Err(FeedError::UnknownOpportunity(id.to_string()));
        }
        if !self.is_applied(id) {
            self.applied.push(id.to_string());
        }
        Ok(())
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.saved.iter().any(|o| o.id == id)
    }

    pub fn is_applied(&self, id: &str) -> bool {
        self.applied.iter().any(|a| a == id)
    }

    pub fn saved(&self) -> Vec<SavedOpportunity> {
        self.saved
            .iter()
            .map(|o| SavedOpportunity {
                opportunity: o.clone(),
                applied: self.is_applied(&o.id),
            })
            .collect()
    }

    pub fn saved_ids(&self) -> Vec<String> {
        self.saved.iter().map(|o| o.id.clone()).collect()
    }

    pub fn applied_ids(&self) -> &[String] {
        &self.applied
    }
}
