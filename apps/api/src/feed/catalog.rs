use std::sync::Arc;

use anyhow::{Context, Result};

use crate::models::opportunity::{FeedFilter, Opportunity};

const SEED_OPPORTUNITIES: &str = include_str!("../../data/opportunities.json");

/// Read-only list of opportunities shared by every session.
#[derive(Debug, Clone)]
pub struct Catalog {
    opportunities: Arc<Vec<Opportunity>>,
}

impl Catalog {
    /// Loads the bundled seed list.
    pub fn seeded() -> Result<Self> {
        let opportunities: Vec<Opportunity> = serde_json::from_str(SEED_OPPORTUNITIES)
            .context("bundled opportunity seed is not valid JSON")?;
        Ok(Self::new(opportunities))
    }

    pub fn new(opportunities: Vec<Opportunity>) -> Self {
        Self {
            opportunities: Arc::new(opportunities),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Opportunity> {
        self.opportunities.iter().find(|o| o.id == id)
    }

    /// Catalog order is preserved.
    pub fn filtered(&self, filter: FeedFilter) -> impl Iterator<Item = &Opportunity> {
        self.opportunities.iter().filter(move |o| filter.matches(o))
    }
}
