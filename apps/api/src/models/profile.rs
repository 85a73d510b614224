use serde::{Deserialize, Serialize};

use crate::models::opportunity::OpportunityType;

/// The user's profile as built up across the onboarding screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: Option<String>,
    pub major: Option<String>,
    pub graduation_year: Option<String>,
    pub school: Option<String>,
    pub interests: Vec<String>,
    pub skills: Vec<String>,
    pub industries: Vec<String>,
    pub locations: Vec<String>,
    pub desired_opportunities: Vec<OpportunityType>,
    pub avatar: Option<String>,
    pub photo_url: Option<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: None,
            major: None,
            graduation_year: None,
            school: None,
            interests: Vec::new(),
            skills: Vec::new(),
            industries: Vec::new(),
            locations: vec!["Remote".to_string()],
            desired_opportunities: vec![OpportunityType::Internship],
            avatar: None,
            photo_url: None,
        }
    }
}

/// Partial profile. Only fields present in the update are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub major: Option<String>,
    pub graduation_year: Option<String>,
    pub school: Option<String>,
    pub interests: Option<Vec<String>>,
    pub skills: Option<Vec<String>>,
    pub industries: Option<Vec<String>>,
    pub locations: Option<Vec<String>>,
    pub desired_opportunities: Option<Vec<OpportunityType>>,
    pub avatar: Option<String>,
    pub photo_url: Option<String>,
}

impl UserProfile {
    pub fn apply(&mut self, update: ProfileUpdate) {
        if update.name.is_some() {
            self.name = update.name;
        }
        if update.major.is_some() {
            self.major = update.major;
        }
        if update.graduation_year.is_some() {
            self.graduation_year = update.graduation_year;
        }
        if update.school.is_some() {
            self.school = update.school;
        }
        if let Some(interests) = update.interests {
            self.interests = interests;
        }
        if let Some(skills) = update.skills {
            self.skills = skills;
        }
        if let Some(industries) = update.industries {
            self.industries = industries;
        }
        if let Some(locations) = update.locations {
            self.locations = locations;
        }
        if let Some(desired) = update.desired_opportunities {
            self.desired_opportunities = desired;
        }
        if update.avatar.is_some() {
            self.avatar = update.avatar;
        }
        if update.photo_url.is_some() {
            self.photo_url = update.photo_url;
        }
    }

    /// First word of the name, or "Friend".
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .and_then(|name| name.split_whitespace().next())
            .unwrap_or("Friend")
    }

    /// Generated avatar if there is one, else the uploaded photo.
    pub fn avatar_source(&self) -> Option<&str> {
        self.avatar.as_deref().or(self.photo_url.as_deref())
    }
}
