//! SkillSpark Learning Engine
//!
//! Roadmap progress tracking for the SkillSpark e-learning client:
//! - Skill → Stage → Lesson tree with quiz-gated stage unlocking
//! - Roll-up progress percentages kept consistent after every change
//! - Snapshot persistence, mocked identity, assistant chat, resume export

pub mod api;
pub mod config;
pub mod learning;

pub use config::*;
pub use learning::*;
