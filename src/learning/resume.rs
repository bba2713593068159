//! Resume Export Module
//!
//! Builds the downloadable resume from the signed-in user, the skills
//! they have mastered (progress 100) and their completed projects.

use super::auth::User;
use super::types::Skill;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProjectStatus {
    Complete,
    #[serde(rename = "In Review")]
    InReview,
}

/// A portfolio project shown on the profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub status: ProjectStatus,
    pub grade: Option<u32>,
}

impl Project {
    pub fn new(title: &str, description: &str, date: &str, status: ProjectStatus) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: description.to_string(),
            date: date.to_string(),
            status,
            grade: None,
        }
    }

    pub fn with_grade(mut self, grade: u32) -> Self {
        self.grade = Some(grade);
        self
    }
}

/// Demo portfolio used until projects are tracked for real
pub fn sample_projects() -> Vec<Project> {
    vec![
        Project::new("React Todo App", "A simple todo application built with React",
            "2023-05-15", ProjectStatus::Complete).with_grade(98),
        Project::new("Python Data Analysis", "Analyzed a dataset using pandas and matplotlib",
            "2023-06-02", ProjectStatus::InReview),
        Project::new("JavaScript Game", "Built a simple 2D game using vanilla JavaScript",
            "2023-06-20", ProjectStatus::Complete).with_grade(85),
    ]
}

#[derive(Debug, Clone)]
struct ResumeSkill {
    name: String,
    level: String,
}

/// Resume content, already filtered to what belongs on it
#[derive(Debug, Clone)]
pub struct ResumeExport {
    first_name: String,
    last_name: String,
    email: String,
    skills: Vec<ResumeSkill>,
    projects: Vec<Project>,
}

impl ResumeExport {
    pub fn new(user: &User, skills: &[Skill], projects: &[Project]) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            skills: skills
                .iter()
                .filter(|s| s.is_mastered())
                .map(|s| ResumeSkill {
                    name: s.name.clone(),
                    level: s.level.as_str().to_string(),
                })
                .collect(),
            projects: projects
                .iter()
                .filter(|p| p.status == ProjectStatus::Complete)
                .cloned()
                .collect(),
        }
    }

    /// Download name; characters unsafe in a header or path become `_`
    pub fn file_name(&self) -> String {
        format!("{}_{}_Resume.pdf", self.first_name, self.last_name)
            .chars()
            .map(|c| match c {
                '"' | '\\' | '/' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect()
    }

    pub fn render_html(&self) -> String {
        let name = escape_html(&format!("{} {}", self.first_name, self.last_name));
        let mut html = String::new();

        // Writing into a String cannot fail.
        let _ = write!(
            html,
            "<html>\n<head>\n<title>{name} - Resume</title>\n<style>\n\
             body {{ font-family: Arial, sans-serif; margin: 30px; }}\n\
             h1 {{ color: #8B5CF6; }}\n\
             h2 {{ color: #0EA5E9; border-bottom: 1px solid #eee; margin-top: 20px; }}\n\
             .contact {{ color: #666; }}\n\
             </style>\n</head>\n<body>\n<h1>{name}</h1>\n<p class=\"contact\">{email}</p>\n",
            name = name,
            email = escape_html(&self.email),
        );

        html.push_str("<h2>Skills</h2>\n<ul>\n");
        for skill in &self.skills {
            let _ = writeln!(
                html,
                "<li>{} ({})</li>",
                escape_html(&skill.name),
                escape_html(&skill.level)
            );
        }
        html.push_str("</ul>\n<h2>Projects</h2>\n<ul>\n");
        for project in &self.projects {
            let _ = writeln!(
                html,
                "<li><strong>{}</strong><p>{}</p></li>",
                escape_html(&project.title),
                escape_html(&project.description)
            );
        }
        html.push_str("</ul>\n</body>\n</html>\n");
        html
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::types::Level;

    fn user() -> User {
        User {
            id: "123".to_string(),
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    #[test]
    fn test_resume_keeps_mastered_skills_and_complete_projects() {
        let mut rust = Skill::new("rs", "Rust");
        rust.progress = 100.0;
        rust.level = Level::Advanced;
        let mut go = Skill::new("go", "Go");
        go.progress = 40.0;

        let resume = ResumeExport::new(&user(), &[rust, go], &sample_projects());
        let html = resume.render_html();

        assert!(html.contains("<h1>Ada Lovelace</h1>"));
        assert!(html.contains("<li>Rust (advanced)</li>"));
        assert!(!html.contains("Go ("));
        assert!(html.contains("React Todo App"));
        assert!(html.contains("JavaScript Game"));
        assert!(!html.contains("Python Data Analysis"));
        assert_eq!(resume.file_name(), "Ada_Lovelace_Resume.pdf");
    }

    #[test]
    fn test_file_name_replaces_unsafe_characters() {
        let mut u = user();
        u.first_name = "Ada\"x\nEvil: 1".to_string();
        u.last_name = "../L".to_string();
        let name = ResumeExport::new(&u, &[], &[]).file_name();
        assert_eq!(name, "Ada_x_Evil: 1_.._L_Resume.pdf");
    }

    #[test]
    fn test_resume_escapes_user_text() {
        let mut u = user();
        u.first_name = "<script>".to_string();
        let html = ResumeExport::new(&u, &[], &[]).render_html();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
