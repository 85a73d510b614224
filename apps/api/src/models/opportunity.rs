use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityType {
    Internship,
    Scholarship,
    Research,
    Event,
    Fellowship,
}

impl OpportunityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityType::Internship => "internship",
            OpportunityType::Scholarship => "scholarship",
            OpportunityType::Research => "research",
            OpportunityType::Event => "event",
            OpportunityType::Fellowship => "fellowship",
        }
    }
}

impl FromStr for OpportunityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "internship" => Ok(OpportunityType::Internship),
            "scholarship" => Ok(OpportunityType::Scholarship),
            "research" => Ok(OpportunityType::Research),
            "event" => Ok(OpportunityType::Event),
            "fellowship" => Ok(OpportunityType::Fellowship),
            other => Err(format!("unknown opportunity type '{other}'")),
        }
    }
}

/// A seeded listing shown in the inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: String,
    pub title: String,
    pub org: String,
    pub category: OpportunityType,
    pub description: String,
    pub deadline: NaiveDate,
    /// Why this listing was matched to the user.
    pub explanation: String,
    pub skills_match: Vec<String>,
    pub location: String,
    pub link: String,
}

/// Inbox filter: everything, or a single category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FeedFilter {
    #[default]
    All,
    Only(OpportunityType),
}

impl FeedFilter {
    pub fn matches(&self, opportunity: &Opportunity) -> bool {
        match self {
            FeedFilter::All => true,
            FeedFilter::Only(category) => opportunity.category == *category,
        }
    }
}

impl FromStr for FeedFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(FeedFilter::All);
        }
        s.parse().map(FeedFilter::Only)
    }
}

impl TryFrom<String> for FeedFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FeedFilter> for String {
    fn from(filter: FeedFilter) -> Self {
        filter.to_string()
    }
}

impl fmt::Display for FeedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedFilter::All => f.write_str("all"),
            FeedFilter::Only(category) => f.write_str(category.as_str()),
        }
    }
}
