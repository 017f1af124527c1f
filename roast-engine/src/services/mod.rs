//! Service Layer
//!
//! Business logic for each playground component. Services are free functions
//! over [`PlaygroundState`](crate::state::PlaygroundState); authentication
//! happens in the [`Playground`](crate::playground::Playground) facade before
//! a service is called.

pub mod brainstorm_service;
pub mod content_service;
pub mod conversation_service;
pub mod identity_service;
pub mod leaderboard_service;
pub mod ledger_service;
pub mod owner_service;
