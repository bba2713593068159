//! Learning Roadmap Types
//!
//! Core data structures for the roadmap tree: Skill → Stage → Lesson,
//! plus the per-stage Quiz and the persisted state blob.
//! Field names serialize in camelCase to match the stored `learningData` blob.

use serde::{Deserialize, Serialize};

// ============================================================
// LEVEL
// ============================================================

/// Proficiency level chosen when the roadmap is generated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

// ============================================================
// LESSON
// ============================================================

/// Kind of content a lesson carries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LessonKind {
    Video,
    Article,
    Quiz,
}

/// A single unit of content within a stage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: LessonKind,
    /// Language tag, e.g. "English", "Spanish"
    pub language: String,
    /// Embed URL for videos, body text for articles
    pub content: String,
    /// The only field that changes after creation
    #[serde(default)]
    pub completed: bool,
}

impl Lesson {
    pub fn new(id: &str, title: &str, kind: LessonKind, language: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            language: language.to_string(),
            content: content.to_string(),
            completed: false,
        }
    }
}

// ============================================================
// QUIZ
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_option_index: usize,
}

impl Question {
    pub fn new(id: &str, question: &str, options: &[&str], correct_option_index: usize) -> Self {
        Self {
            id: id.to_string(),
            question: question.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_option_index,
        }
    }
}

/// The gating quiz of a stage. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Quiz {
    pub id: String,
    pub questions: Vec<Question>,
}

// ============================================================
// STAGE
// ============================================================

/// An ordered checkpoint within a skill
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: String,
    /// Ordinal number (1 = first)
    pub number: u32,
    pub title: String,
    pub description: String,
    pub lessons: Vec<Lesson>,
    pub quiz: Quiz,
    pub is_locked: bool,
    pub is_completed: bool,
    pub quiz_passed: bool,
    /// Derived: 0..=100
    pub progress: f64,
}

impl Stage {
    pub fn new(id: &str, number: u32, title: &str) -> Self {
        Self {
            id: id.to_string(),
            number,
            title: title.to_string(),
            description: String::new(),
            lessons: Vec::new(),
            quiz: Quiz::default(),
            is_locked: number > 1,
            is_completed: false,
            quiz_passed: false,
            progress: 0.0,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_lessons(mut self, lessons: Vec<Lesson>) -> Self {
        self.lessons = lessons;
        self
    }

    pub fn with_quiz(mut self, quiz: Quiz) -> Self {
        self.quiz = quiz;
        self
    }

    /// Lessons whose language tag matches the learner's preferred language
    pub fn lessons_in_language(&self, language: &str) -> Vec<&Lesson> {
        self.lessons
            .iter()
            .filter(|l| l.language.eq_ignore_ascii_case(language))
            .collect()
    }

    pub fn completed_lessons(&self) -> usize {
        self.lessons.iter().filter(|l| l.completed).count()
    }
}

// ============================================================
// SKILL
// ============================================================

/// A skill path made of ordered stages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub description: String,
    pub level: Level,
    pub stages: Vec<Stage>,
    /// Derived: mean of stage progress
    pub progress: f64,
    pub marketing_stat: String,
}

impl Skill {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            level: Level::default(),
            stages: Vec::new(),
            progress: 0.0,
            marketing_stat: String::new(),
        }
    }

    pub fn with_stages(mut self, stages: Vec<Stage>) -> Self {
        self.stages = stages;
        self
    }

    pub fn stage(&self, stage_id: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == stage_id)
    }

    pub fn is_mastered(&self) -> bool {
        self.progress >= 100.0
    }
}

// ============================================================
// PERSISTED STATE
// ============================================================

fn default_language() -> String {
    "English".to_string()
}

/// Full engine state as written to the key-value store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LearningSnapshot {
    pub career_goal: String,
    pub skills: Vec<Skill>,
    pub selected_skills: Vec<String>,
    pub level: Level,
    pub preferred_language: String,
    pub learning_streak: u32,
}

impl Default for LearningSnapshot {
    fn default() -> Self {
        Self {
            career_goal: String::new(),
            skills: Vec::new(),
            selected_skills: Vec::new(),
            level: Level::default(),
            preferred_language: default_language(),
            learning_streak: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_serializes_camel_case() {
        let stage = Stage::new("s1", 1, "Basics");
        let json = serde_json::to_value(&stage).unwrap();
        assert_eq!(json["isLocked"], false);
        assert_eq!(json["quizPassed"], false);
        assert!(json.get("is_locked").is_none());
    }

    #[test]
    fn test_lesson_kind_uses_type_field() {
        let lesson = Lesson::new("l1", "Intro", LessonKind::Video, "English", "https://x");
        let json = serde_json::to_value(&lesson).unwrap();
        assert_eq!(json["type"], "video");
    }

    #[test]
    fn test_snapshot_defaults_for_missing_fields() {
        let snapshot: LearningSnapshot = serde_json::from_str(r#"{"careerGoal":"Dev"}"#).unwrap();
        assert_eq!(snapshot.career_goal, "Dev");
        assert_eq!(snapshot.preferred_language, "English");
        assert_eq!(snapshot.level, Level::Beginner);
        assert_eq!(snapshot.learning_streak, 0);
    }

    #[test]
    fn test_lessons_in_language() {
        let stage = Stage::new("s1", 1, "Basics").with_lessons(vec![
            Lesson::new("a", "A", LessonKind::Video, "English", ""),
            Lesson::new("b", "B", LessonKind::Video, "Spanish", ""),
        ]);
        let english = stage.lessons_in_language("english");
        assert_eq!(english.len(), 1);
        assert_eq!(english[0].id, "a");
    }
}
