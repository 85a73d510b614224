// Opportunity feed: the seeded catalog, per-session inbox/saved/applied
// state, and its HTTP handlers.

pub mod catalog;
pub mod handlers;
pub mod state;
