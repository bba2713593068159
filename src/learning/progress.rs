//! Progress Roll-up Module
//!
//! Every mutation of the roadmap tree is expressed as a `ProgressUpdate`
//! and applied by an explicit reducer, so the effect of each update on the
//! roll-up invariants can be read off one match arm:
//!
//! - stage progress = completed lessons / total lessons × 100 (0 when empty)
//! - skill progress = mean of stage progress (0 when a skill has no stages)
//! - a passed quiz pins its stage at 100
//! - only the first stage of a skill starts unlocked

use super::types::{Level, LearningSnapshot, Skill, Stage};
use serde::{Deserialize, Serialize};

// ============================================================
// ROLL-UP MATH
// ============================================================

/// Progress of a stage derived from its lessons
pub fn stage_progress(stage: &Stage) -> f64 {
    if stage.quiz_passed {
        return 100.0;
    }
    let total = stage.lessons.len();
    if total == 0 {
        return 0.0;
    }
    (stage.completed_lessons() as f64 / total as f64) * 100.0
}

/// Mean of the stored stage progress values
pub fn skill_progress(skill: &Skill) -> f64 {
    if skill.stages.is_empty() {
        return 0.0;
    }
    let sum: f64 = skill.stages.iter().map(|s| s.progress).sum();
    sum / skill.stages.len() as f64
}

/// Recompute lock flags and derived percentages when a tree enters the
/// engine. A stage is open when it is first, already passed, or follows
/// a passed stage.
pub fn normalize_skill(skill: &mut Skill) {
    let mut previous_passed = true;
    for stage in skill.stages.iter_mut() {
        stage.is_locked = !(previous_passed || stage.quiz_passed);
        stage.progress = stage_progress(stage);
        previous_passed = stage.quiz_passed;
    }
    skill.progress = skill_progress(skill);
}

// ============================================================
// UPDATES
// ============================================================

/// A single state transition of the learning engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ProgressUpdate {
    /// Mark a lesson done and roll its progress up
    LessonCompleted {
        skill_id: String,
        stage_id: String,
        lesson_id: String,
    },
    /// Force a stage to completed and unlock its successor
    QuizPassed { skill_id: String, stage_id: String },
    /// Replace the whole tree with a freshly generated roadmap
    RoadmapGenerated {
        goal: String,
        selected_skills: Vec<String>,
        level: Level,
        language: String,
        skills: Vec<Skill>,
    },
}

/// Apply an update to the state. Returns whether the update matched an
/// existing entity; unmatched ids leave the tree untouched.
pub fn apply_update(state: &mut LearningSnapshot, update: ProgressUpdate) -> bool {
    match update {
        ProgressUpdate::LessonCompleted {
            skill_id,
            stage_id,
            lesson_id,
        } => {
            // The streak counts calls, not calendar days.
            state.learning_streak = state.learning_streak.saturating_add(1);

            let Some(skill) = state.skills.iter_mut().find(|s| s.id == skill_id) else {
                return false;
            };
            let Some(stage) = skill.stages.iter_mut().find(|s| s.id == stage_id) else {
                return false;
            };
            let Some(lesson) = stage.lessons.iter_mut().find(|l| l.id == lesson_id) else {
                return false;
            };

            lesson.completed = true;
            stage.progress = stage_progress(stage);
            skill.progress = skill_progress(skill);
            true
        }
        ProgressUpdate::QuizPassed { skill_id, stage_id } => {
            let Some(skill) = state.skills.iter_mut().find(|s| s.id == skill_id) else {
                return false;
            };
            let Some(index) = skill.stages.iter().position(|s| s.id == stage_id) else {
                return false;
            };

            let stage = &mut skill.stages[index];
            stage.is_completed = true;
            stage.quiz_passed = true;
            stage.progress = 100.0;

            if let Some(next) = skill.stages.get_mut(index + 1) {
                next.is_locked = false;
            }

            skill.progress = skill_progress(skill);
            true
        }
        ProgressUpdate::RoadmapGenerated {
            goal,
            selected_skills,
            level,
            language,
            mut skills,
        } => {
            for skill in skills.iter_mut() {
                skill.level = level;
                normalize_skill(skill);
            }
            state.career_goal = goal;
            state.selected_skills = selected_skills;
            state.level = level;
            state.preferred_language = language;
            state.skills = skills;
            state.learning_streak = 1;
            true
        }
    }
}
