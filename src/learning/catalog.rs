//! Roadmap Catalog Module
//!
//! The roadmap data source the engine filters when generating a roadmap.
//! `StaticCatalog` serves the built-in catalog; a remote source only needs
//! to implement `RoadmapSource`.

use super::error::LearningError;
use super::types::{Lesson, LessonKind, Question, Quiz, Skill, Stage};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

#[async_trait]
pub trait RoadmapSource: Send + Sync {
    /// Fetch the full candidate catalog
    async fn fetch(&self) -> Result<Vec<Skill>, LearningError>;
}

/// Built-in catalog with an optional simulated network delay
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    latency: Duration,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl RoadmapSource for StaticCatalog {
    async fn fetch(&self) -> Result<Vec<Skill>, LearningError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(default_catalog())
    }
}

// ============================================================
// SELECTION LISTS
// ============================================================

#[derive(Debug, Clone, Serialize)]
pub struct SkillChoice {
    pub id: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct LanguageChoice {
    pub code: &'static str,
    pub name: &'static str,
}

/// Skills offered on the path selection screen
pub fn available_skills() -> Vec<SkillChoice> {
    [
        ("js", "JavaScript"),
        ("react", "React"),
        ("python", "Python"),
        ("node", "Node.js"),
        ("html", "HTML"),
        ("css", "CSS"),
        ("sql", "SQL"),
        ("git", "Git"),
        ("typescript", "TypeScript"),
    ]
    .into_iter()
    .map(|(id, name)| SkillChoice { id, name })
    .collect()
}

pub fn supported_languages() -> Vec<LanguageChoice> {
    [
        ("en", "English"),
        ("es", "Spanish"),
        ("hi", "Hindi"),
        ("te", "Telugu"),
        ("fr", "French"),
        ("de", "German"),
        ("zh", "Chinese"),
        ("ja", "Japanese"),
        ("ru", "Russian"),
    ]
    .into_iter()
    .map(|(code, name)| LanguageChoice { code, name })
    .collect()
}

// ============================================================
// DEFAULT CATALOG
// ============================================================

fn quiz(id: &str, questions: Vec<Question>) -> Quiz {
    Quiz {
        id: id.to_string(),
        questions,
    }
}

fn skill(id: &str, name: &str, description: &str, stat: &str, stages: Vec<Stage>) -> Skill {
    let mut skill = Skill::new(id, name).with_stages(stages);
    skill.description = description.to_string();
    skill.marketing_stat = stat.to_string();
    skill
}

/// The catalog served by `StaticCatalog`
pub fn default_catalog() -> Vec<Skill> {
    vec![javascript(), react(), python()]
}

fn javascript() -> Skill {
    let basics = Stage::new("js-stage-1", 1, "JavaScript Basics")
        .with_description("Learn the fundamentals of JavaScript")
        .with_lessons(vec![
            Lesson::new("js-lesson-1", "JavaScript Variables", LessonKind::Video, "English",
                "https://www.youtube.com/embed/PkZNo7MFNFg"),
            Lesson::new("js-lesson-2", "Variables en JavaScript", LessonKind::Video, "Spanish",
                "https://www.youtube.com/embed/sYqn4lhcMZE"),
            Lesson::new("js-lesson-3", "Data Types in JavaScript", LessonKind::Article, "English",
                "JavaScript has several data types: String, Number, Boolean, Object, undefined, etc. \
                 Strings are used for text content, while Numbers handle numerical values. \
                 Booleans are either true or false. Objects are collections of key-value pairs."),
        ])
        .with_quiz(quiz("js-quiz-1", vec![
            Question::new("js-q1", "Which keyword is used to declare variables in modern JavaScript?",
                &["var", "let", "const", "All of the above"], 3),
            Question::new("js-q2", "What is the output of: console.log(typeof([]));",
                &["array", "object", "undefined", "null"], 1),
            Question::new("js-q3", "How do you create a function in JavaScript?",
                &["function = myFunction()", "function:myFunction()", "function myFunction()",
                  "myFunction = function()"], 2),
        ]));

    let functions = Stage::new("js-stage-2", 2, "Functions & Scope")
        .with_description("Understanding functions and variable scope")
        .with_lessons(vec![
            Lesson::new("js-lesson-4", "JavaScript Functions", LessonKind::Video, "English",
                "https://www.youtube.com/embed/xUI5Tsl2JpY"),
            Lesson::new("js-lesson-5", "Function Scope", LessonKind::Article, "English",
                "JavaScript has function scope. Variables defined inside a function are not \
                 accessible from outside the function. Functions defined in the global scope \
                 can be accessed from anywhere in your code."),
        ])
        .with_quiz(quiz("js-quiz-2", vec![
            Question::new("js-q4", "What is the scope of a variable declared with 'var' inside a function?",
                &["Global scope", "Function scope", "Block scope", "Module scope"], 1),
            Question::new("js-q5", "What is hoisting in JavaScript?",
                &["Moving all variable declarations to the top",
                  "Moving all function declarations to the bottom",
                  "Removing unused variables",
                  "Organizing code in alphabetical order"], 0),
        ]));

    skill("js-123", "JavaScript", "Master JavaScript programming language",
        "73% of web developers use JavaScript daily", vec![basics, functions])
}

fn react() -> Skill {
    let fundamentals = Stage::new("react-stage-1", 1, "React Fundamentals")
        .with_description("Learn the basics of React")
        .with_lessons(vec![
            Lesson::new("react-lesson-1", "Introduction to React", LessonKind::Video, "English",
                "https://www.youtube.com/embed/Tn6-PIqc4UM"),
            Lesson::new("react-lesson-2", "React का परिचय", LessonKind::Video, "Hindi",
                "https://www.youtube.com/embed/RGKi6LSPDLU"),
            Lesson::new("react-lesson-3", "Components and Props", LessonKind::Article, "English",
                "React components are like JavaScript functions that accept inputs (props) and \
                 return React elements. Props are read-only and allow you to pass data from \
                 parent to child components."),
        ])
        .with_quiz(quiz("react-quiz-1", vec![
            Question::new("react-q1", "What is JSX in React?",
                &["A JavaScript library", "A syntax extension for JavaScript", "A React component",
                  "A testing framework"], 1),
            Question::new("react-q2", "How do you create a React component?",
                &["By creating a new JavaScript file",
                  "By creating a function that returns React elements",
                  "By importing React in your file", "By using JSX"], 1),
        ]));

    skill("react-456", "React", "Learn React framework for building user interfaces",
        "React is used by over 11 million developers worldwide", vec![fundamentals])
}

fn python() -> Skill {
    let basics = Stage::new("python-stage-1", 1, "Python Basics")
        .with_description("Learn the fundamentals of Python")
        .with_lessons(vec![
            Lesson::new("python-lesson-1", "Introduction to Python", LessonKind::Video, "English",
                "https://www.youtube.com/embed/_uQrJ0TkZlc"),
            Lesson::new("python-lesson-2", "Python Variables", LessonKind::Article, "English",
                "Python variables are containers for storing data values. Unlike other programming \
                 languages, Python has no command for declaring a variable. A variable is created \
                 the moment you first assign a value to it."),
            Lesson::new("python-lesson-3", "Python కోసం పరిచయం", LessonKind::Video, "Telugu",
                "https://www.youtube.com/embed/Tto8TS-fJQU"),
        ])
        .with_quiz(quiz("python-quiz-1", vec![
            Question::new("python-q1", "Which of these is NOT a valid Python data type?",
                &["int", "float", "decimal", "complex"], 2),
            Question::new("python-q2", "How do you create a comment in Python?",
                &["// comment", "/* comment */", "# comment", "<!-- comment -->"], 2),
        ]));

    skill("python-789", "Python", "Master Python programming language",
        "Python is the fastest-growing programming language in 2023", vec![basics])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_catalog_fetch() {
        let skills = StaticCatalog::new().fetch().await.unwrap();
        let names: Vec<&str> = skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["JavaScript", "React", "Python"]);
    }

    #[test]
    fn test_catalog_starts_with_first_stage_open() {
        for skill in default_catalog() {
            assert!(!skill.stages[0].is_locked, "{} first stage locked", skill.name);
            assert!(skill.stages.iter().skip(1).all(|s| s.is_locked));
            for stage in &skill.stages {
                for q in &stage.quiz.questions {
                    assert!(q.correct_option_index < q.options.len());
                }
            }
        }
    }

    #[test]
    fn test_selection_lists() {
        assert_eq!(available_skills().len(), 9);
        assert!(supported_languages().iter().any(|l| l.name == "Telugu"));
    }
}
