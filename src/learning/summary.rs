//! Dashboard and profile statistics derived from the roadmap

use super::types::Skill;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LearningSummary {
    /// Mean of skill progress, 0 when there are no skills
    pub overall_progress: f64,
    pub active_skills: usize,
    pub mastered_skills: usize,
    pub quizzes_passed: usize,
    pub lessons_completed: usize,
    pub learning_streak: u32,
}

impl LearningSummary {
    pub fn from_skills(skills: &[Skill], learning_streak: u32) -> Self {
        let overall_progress = if skills.is_empty() {
            0.0
        } else {
            skills.iter().map(|s| s.progress).sum::<f64>() / skills.len() as f64
        };

        let stages = || skills.iter().flat_map(|s| s.stages.iter());

        Self {
            overall_progress,
            active_skills: skills
                .iter()
                .filter(|s| s.progress > 0.0 && s.progress < 100.0)
                .count(),
            mastered_skills: skills.iter().filter(|s| s.is_mastered()).count(),
            quizzes_passed: stages().filter(|st| st.quiz_passed).count(),
            lessons_completed: stages().map(|st| st.completed_lessons()).sum(),
            learning_streak,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::types::Stage;

    #[test]
    fn test_empty_summary() {
        let summary = LearningSummary::from_skills(&[], 0);
        assert_eq!(summary.overall_progress, 0.0);
        assert_eq!(summary.mastered_skills, 0);
    }

    #[test]
    fn test_summary_counts() {
        let mut done = Skill::new("a", "A");
        done.progress = 100.0;
        let mut passed = Stage::new("s", 1, "S");
        passed.quiz_passed = true;
        done.stages.push(passed);

        let mut active = Skill::new("b", "B");
        active.progress = 50.0;

        let idle = Skill::new("c", "C");

        let summary = LearningSummary::from_skills(&[done, active, idle], 4);
        assert_eq!(summary.overall_progress, 50.0);
        assert_eq!(summary.active_skills, 1);
        assert_eq!(summary.mastered_skills, 1);
        assert_eq!(summary.quizzes_passed, 1);
        assert_eq!(summary.learning_streak, 4);
    }
}
