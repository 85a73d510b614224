//! Screen navigation.
//!
//! Onboarding is a fixed sequence ending at the dashboard. Once the user has
//! reached the dashboard the app tabs open up and the onboarding screens
//! close for good.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    Welcome,
    UploadPhoto,
    BasicInfo,
    GoalsInterests,
    ProfileSummary,
    AgentActivation,
    Dashboard,
    Inbox,
    Saved,
    Activity,
    Profile,
    OpportunityDetails,
}

pub const ONBOARDING: [Screen; 7] = [
    Screen::Welcome,
    Screen::UploadPhoto,
    Screen::BasicInfo,
    Screen::GoalsInterests,
    Screen::ProfileSummary,
    Screen::AgentActivation,
    Screen::Dashboard,
];

impl Screen {
    pub fn is_onboarding_step(&self) -> bool {
        ONBOARDING[..ONBOARDING.len() - 1].contains(self)
    }

    pub fn is_app_tab(&self) -> bool {
        matches!(
            self,
            Screen::Dashboard | Screen::Inbox | Screen::Saved | Screen::Activity | Screen::Profile
        )
    }

    fn next_onboarding_step(&self) -> Option<Screen> {
        let idx = ONBOARDING.iter().position(|s| s == self)?;
        ONBOARDING.get(idx + 1).copied()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FlowError {
    #[error("cannot advance from {0:?}")]
    CannotAdvance(Screen),

    #[error("{0:?} is not reachable from {1:?}")]
    Unreachable(Screen, Screen),

    #[error("no opportunity selected")]
    NothingSelected,
}

impl From<FlowError> for AppError {
    fn from(err: FlowError) -> Self {
        AppError::InvalidTransition(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct Navigator {
    screen: Screen,
    onboarded: bool,
    selected: Option<String>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            screen: Screen::Welcome,
            onboarded: false,
            selected: None,
        }
    }
}

impl Navigator {
    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn onboarded(&self) -> bool {
        self.onboarded
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Moves to the next onboarding screen.
    pub fn advance(&mut self) -> Result<Screen, FlowError> {
        if !self.screen.is_onboarding_step() || self.onboarded {
            return Err(FlowError::CannotAdvance(self.screen));
        }
        let next = self
            .screen
            .next_onboarding_step()
            .ok_or(FlowError::CannotAdvance(self.screen))?;
        self.enter(next);
        Ok(next)
    }

    pub fn navigate(&mut self, target: Screen) -> Result<Screen, FlowError> {
        let allowed = if target == Screen::OpportunityDetails {
            self.onboarded && self.selected.is_some()
        } else if target.is_app_tab() {
            self.onboarded
        } else {
            !self.onboarded
        };

        if !allowed {
            if target == Screen::OpportunityDetails && self.onboarded {
                return Err(FlowError::NothingSelected);
            }
            return Err(FlowError::Unreachable(target, self.screen));
        }
        self.enter(target);
        Ok(target)
    }

    /// Selects an opportunity and shows its details.
    pub fn open_details(&mut self, opportunity_id: &str) -> Result<Screen, FlowError> {
        if !self.onboarded {
            return Err(FlowError::Unreachable(
                Screen::OpportunityDetails,
                self.screen,
            ));
        }
        self.selected = Some(opportunity_id.to_string());
        self.enter(Screen::OpportunityDetails);
        Ok(self.screen)
    }

    /// Leaves the details screen for the inbox.
    pub fn back(&mut self) -> Result<Screen, FlowError> {
        if self.screen != Screen::OpportunityDetails {
            return Err(FlowError::Unreachable(Screen::Inbox, self.screen));
        }
        self.enter(Screen::Inbox);
        Ok(Screen::Inbox)
    }

    fn enter(&mut self, screen: Screen) {
        self.screen = screen;
        if screen == Screen::Dashboard {
            self.onboarded = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn onboarded() -> Navigator {
        let mut nav = Navigator::default();
        while !nav.onboarded() {
            nav.advance().unwrap();
        }
        nav
    }

    #[test]
    fn test_advance_walks_onboarding_in_order() {
        let mut nav = Navigator::default();
        let mut visited = vec![nav.screen()];
        while !nav.onboarded() {
            visited.push(nav.advance().unwrap());
        }
        assert_eq!(visited, ONBOARDING.to_vec());
        assert_eq!(nav.screen(), Screen::Dashboard);
    }

    #[test]
    fn test_advance_past_dashboard_is_rejected() {
        let mut nav = onboarded();
        assert_eq!(
            nav.advance(),
            Err(FlowError::CannotAdvance(Screen::Dashboard))
        );
    }

    #[test]
    fn test_tabs_locked_until_onboarded() {
        let mut nav = Navigator::default();
        assert!(nav.navigate(Screen::Inbox).is_err());
        assert_eq!(nav.navigate(Screen::BasicInfo), Ok(Screen::BasicInfo));

        let mut nav = onboarded();
        assert_eq!(nav.navigate(Screen::Saved), Ok(Screen::Saved));
        assert!(nav.navigate(Screen::UploadPhoto).is_err());
    }

    #[test]
    fn test_navigating_to_dashboard_completes_onboarding() {
        let mut nav = Navigator::default();
        assert!(nav.navigate(Screen::Dashboard).is_err());
        nav.navigate(Screen::AgentActivation).unwrap();
        nav.advance().unwrap();
        assert!(nav.onboarded());
    }

    #[test]
    fn test_details_requires_selection_and_back_returns_to_inbox() {
        let mut nav = onboarded();
        assert_eq!(
            nav.navigate(Screen::OpportunityDetails),
            Err(FlowError::NothingSelected)
        );

        nav.open_details("3").unwrap();
        assert_eq!(nav.screen(), Screen::OpportunityDetails);
        assert_eq!(nav.selected(), Some("3"));

        assert_eq!(nav.back(), Ok(Screen::Inbox));
        assert!(nav.back().is_err());
        assert_eq!(
            nav.navigate(Screen::OpportunityDetails),
            Ok(Screen::OpportunityDetails)
        );
    }

    #[test]
    fn test_details_closed_during_onboarding() {
        let mut nav = Navigator::default();
        assert!(nav.open_details("1").is_err());
    }

    #[test]
    fn test_screen_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Screen::UploadPhoto).unwrap(),
            "\"upload-photo\""
        );
        let screen: Screen = serde_json::from_str("\"opportunity-details\"").unwrap();
        assert_eq!(screen, Screen::OpportunityDetails);
    }
}
