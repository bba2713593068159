//! Learning assistant chat
//!
//! Fully local: replies are picked by keyword, there is no model behind it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const GREETING: &str = "Hello! How can I help you with your learning today?";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Bot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub speaker: Speaker,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    fn new(speaker: Speaker, text: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            speaker,
            text: text.to_string(),
            sent_at: Utc::now(),
        }
    }
}

/// Canned reply for a user message
pub fn mock_reply(message: &str) -> String {
    let lower = message.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if mentions(&["hello", "hi"]) {
        "Hello there! How can I assist with your learning today?".to_string()
    } else if mentions(&["help"]) {
        "I can help you with explanations, additional learning resources, or clarity on lesson \
         topics. What specifically would you like help with?"
            .to_string()
    } else if mentions(&["difficult", "hard", "confused"]) {
        "It's normal to find certain concepts challenging! Breaking it down into smaller parts \
         and practicing with examples usually helps. Would you like me to explain any specific \
         concept?"
            .to_string()
    } else {
        format!("I'll echo what you said: {}", message)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatSession {
    history: Vec<ChatMessage>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self {
            history: vec![ChatMessage::new(Speaker::Bot, GREETING)],
        }
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Append the user's message and the assistant's reply. Blank input is
    /// ignored and returns `None`.
    pub fn send(&mut self, text: &str) -> Option<&ChatMessage> {
        if text.trim().is_empty() {
            return None;
        }
        self.history.push(ChatMessage::new(Speaker::User, text));
        self.history
            .push(ChatMessage::new(Speaker::Bot, &mock_reply(text)));
        self.history.last()
    }
}
