//! Learning Engine
//!
//! Owns the Skill → Stage → Lesson tree and is the only place it changes.
//! Every operation turns into a `ProgressUpdate`, is applied by the
//! reducer, and the full snapshot is written back to the state store.
//!
//! Collaborators are injected at construction:
//! - `RoadmapSource` supplies the catalog for `generate_roadmap`
//! - `StateStore` receives the serialized snapshot after each change
//! - `Notifier` receives user-facing success/failure messages

use super::catalog::RoadmapSource;
use super::error::LearningError;
use super::notify::Notifier;
use super::progress::{apply_update, ProgressUpdate};
use super::quiz::{score_quiz, QuizOutcome};
use super::store::StateStore;
use super::types::{LearningSnapshot, Level, Skill};
use crate::config::EngineConfig;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Upper bound on skills per roadmap
pub const MAX_SELECTED_SKILLS: usize = 3;

// ============================================================
// ROADMAP REQUEST
// ============================================================

/// Parameters for generating a new roadmap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapRequest {
    pub goal: String,
    /// Skill names, matched case-insensitively against the catalog
    pub skills: Vec<String>,
    #[serde(default)]
    pub level: Level,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "English".to_string()
}

impl RoadmapRequest {
    /// Checks the hosting layer runs before calling the engine
    pub fn validate(&self) -> Result<(), LearningError> {
        if self.goal.trim().is_empty() {
            return Err(LearningError::Validation("Please enter a career goal".to_string()));
        }
        if self.skills.is_empty() {
            return Err(LearningError::Validation(
                "Please select at least one skill".to_string(),
            ));
        }
        if self.skills.len() > MAX_SELECTED_SKILLS {
            return Err(LearningError::Validation(format!(
                "You can select a maximum of {} skills",
                MAX_SELECTED_SKILLS
            )));
        }
        Ok(())
    }
}

// ============================================================
// LOADING FLAG
// ============================================================

/// Shared busy indicator, readable without borrowing the engine
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn is_loading(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn raise(&self) -> LoadingGuard {
        self.0.store(true, Ordering::SeqCst);
        LoadingGuard(self.clone())
    }
}

/// Lowers the flag on every exit path
struct LoadingGuard(LoadingFlag);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        (self.0).0.store(false, Ordering::SeqCst);
    }
}

// ============================================================
// ENGINE
// ============================================================

pub struct LearningEngine {
    config: EngineConfig,
    state: LearningSnapshot,
    source: Arc<dyn RoadmapSource>,
    store: Arc<dyn StateStore>,
    notifier: Arc<dyn Notifier>,
    loading: LoadingFlag,
}

impl LearningEngine {
    pub fn new(
        config: EngineConfig,
        source: Arc<dyn RoadmapSource>,
        store: Arc<dyn StateStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            state: LearningSnapshot::default(),
            source,
            store,
            notifier,
            loading: LoadingFlag::default(),
        }
    }

    /// Load the persisted snapshot, if any. A corrupt blob is logged and
    /// skipped so the engine keeps its defaults.
    pub fn restore(&mut self) -> Result<bool, LearningError> {
        let Some(blob) = self.store.load(&self.config.storage_key)? else {
            return Ok(false);
        };

        match serde_json::from_str::<LearningSnapshot>(&blob) {
            Ok(snapshot) => {
                info!(
                    "Restored learning state: {} skills, streak {}",
                    snapshot.skills.len(),
                    snapshot.learning_streak
                );
                self.state = snapshot;
                Ok(true)
            }
            Err(e) => {
                warn!("Ignoring unreadable learning state: {}", e);
                Ok(false)
            }
        }
    }

    // --------------------------------------------------------
    // Reads
    // --------------------------------------------------------

    pub fn snapshot(&self) -> &LearningSnapshot {
        &self.state
    }

    pub fn skills(&self) -> &[Skill] {
        &self.state.skills
    }

    pub fn skill(&self, skill_id: &str) -> Option<&Skill> {
        self.state.skills.iter().find(|s| s.id == skill_id)
    }

    pub fn streak(&self) -> u32 {
        self.state.learning_streak
    }

    pub fn preferred_language(&self) -> &str {
        &self.state.preferred_language
    }

    pub fn passing_score(&self) -> f64 {
        self.config.passing_score
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Lock state of a stage, `None` when it does not exist
    pub fn stage_locked(&self, skill_id: &str, stage_id: &str) -> Option<bool> {
        self.skill(skill_id)?.stage(stage_id).map(|s| s.is_locked)
    }

    /// Handle to the loading flag for observers that cannot borrow the engine
    pub fn loading_flag(&self) -> LoadingFlag {
        self.loading.clone()
    }

    // --------------------------------------------------------
    // Mutations
    // --------------------------------------------------------

    /// Mark a lesson complete. Unknown ids leave the tree unchanged, but the
    /// streak still advances on every call.
    pub fn complete_lesson(&mut self, skill_id: &str, stage_id: &str, lesson_id: &str) {
        let matched = apply_update(
            &mut self.state,
            ProgressUpdate::LessonCompleted {
                skill_id: skill_id.to_string(),
                stage_id: stage_id.to_string(),
                lesson_id: lesson_id.to_string(),
            },
        );
        if !matched {
            debug!("complete_lesson: no lesson {}/{}/{}", skill_id, stage_id, lesson_id);
        }

        self.persist();
        self.notifier.notify_success("Lesson completed!");
    }

    /// Force a stage to completed and unlock the next one
    pub fn pass_quiz(&mut self, skill_id: &str, stage_id: &str) {
        let matched = apply_update(
            &mut self.state,
            ProgressUpdate::QuizPassed {
                skill_id: skill_id.to_string(),
                stage_id: stage_id.to_string(),
            },
        );
        if !matched {
            debug!("pass_quiz: no stage {}/{}", skill_id, stage_id);
            return;
        }

        info!("Quiz passed for {}/{}", skill_id, stage_id);
        self.persist();
        self.notifier.notify_success("Quiz passed! Next stage unlocked!");
    }

    /// Score answers against a stage's quiz and pass it on success.
    /// Locked stages are refused without scoring.
    pub fn submit_quiz(
        &mut self,
        skill_id: &str,
        stage_id: &str,
        answers: &[Option<usize>],
    ) -> Result<QuizOutcome, LearningError> {
        let stage = self
            .skill(skill_id)
            .and_then(|skill| skill.stage(stage_id))
            .ok_or_else(|| LearningError::StageNotFound(format!("{}/{}", skill_id, stage_id)))?;
        if stage.is_locked {
            debug!("submit_quiz: stage {}/{} is locked", skill_id, stage_id);
            return Err(LearningError::StageLocked(stage_id.to_string()));
        }
        let outcome = score_quiz(&stage.quiz, answers, self.config.passing_score);

        if outcome.passed {
            self.notifier
                .notify_success(&format!("Great job! You scored {}%!", outcome.rounded()));
            self.pass_quiz(skill_id, stage_id);
        } else {
            self.notifier.notify_failure(&format!(
                "Quiz failed. You scored {}%. You need {}% to pass.",
                outcome.rounded(),
                self.config.passing_score
            ));
        }

        Ok(outcome)
    }

    pub fn set_preferred_language(&mut self, language: &str) {
        if self.state.preferred_language == language {
            return;
        }
        self.state.preferred_language = language.to_string();
        self.persist();
    }

    /// Replace the tree with the catalog filtered to the requested skills.
    /// On fetch failure the previous state is left as it was.
    pub async fn generate_roadmap(&mut self, request: RoadmapRequest) -> Result<(), LearningError> {
        let _busy = self.loading.raise();

        let catalog = match self.source.fetch().await {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("Roadmap generation failed: {}", e);
                self.notifier
                    .notify_failure(&format!("Failed to generate roadmap: {}", e));
                return Err(e);
            }
        };

        let wanted: Vec<String> = request.skills.iter().map(|s| s.to_lowercase()).collect();
        let skills: Vec<Skill> = catalog
            .into_iter()
            .filter(|skill| wanted.contains(&skill.name.to_lowercase()))
            .collect();

        info!(
            "Generated roadmap for '{}': {} of {} requested skills found",
            request.goal,
            skills.len(),
            request.skills.len()
        );

        apply_update(
            &mut self.state,
            ProgressUpdate::RoadmapGenerated {
                goal: request.goal,
                selected_skills: request.skills,
                level: request.level,
                language: request.language,
                skills,
            },
        );

        self.persist();
        self.notifier.notify_success("Your learning path is ready!");
        Ok(())
    }

    /// Write the full snapshot. Failures are logged, never surfaced.
    fn persist(&self) {
        let blob = match serde_json::to_string(&self.state) {
            Ok(blob) => blob,
            Err(e) => {
                warn!("Could not serialize learning state: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.save(&self.config.storage_key, &blob) {
            warn!("Could not persist learning state: {}", e);
        }
    }
}
