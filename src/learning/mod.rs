//! Learning Module - Core of the SkillSpark roadmap
//!
//! Architecture:
//! - Types: Skill → Stage → Lesson tree with a gating quiz per stage
//! - Progress: roll-up math and the tagged update reducers
//! - Engine: owns the tree, applies updates, persists snapshots
//! - Collaborators: roadmap source, state store, notifier, identity provider
//! - Extras: mocked assistant chat, resume export, summary statistics

pub mod auth;
pub mod catalog;
pub mod chat;
pub mod engine;
pub mod error;
pub mod notify;
pub mod progress;
pub mod quiz;
pub mod resume;
pub mod store;
pub mod summary;
pub mod types;

pub use auth::*;
pub use catalog::*;
pub use chat::*;
pub use engine::*;
pub use error::*;
pub use notify::*;
pub use progress::*;
pub use quiz::*;
pub use resume::*;
pub use store::*;
pub use summary::*;
pub use types::*;
