//! Content data models: subjects, chapters, questions.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Subject entity from database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: String,
}

/// Chapter entity from database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Chapter {
    pub id: String,
    pub subject_id: String,
    pub title: String,
    pub body: Option<String>,
    pub position: i64,
    pub created_at: String,
}

/// Question entity from database.
///
/// Options are stored as a JSON array of strings; the answer key stays
/// server-side and is only exposed through the admin view and grading.
#[derive(Debug, Clone, FromRow)]
pub struct Question {
    pub id: String,
    pub chapter_id: String,
    pub prompt: String,
    pub options: String,
    pub correct_index: i64,
    pub explanation: Option<String>,
    pub created_at: String,
}

impl Question {
    /// Parsed option list. A row that predates validation may hold malformed
    /// JSON; that surfaces as an empty list rather than a 500.
    pub fn option_list(&self) -> Vec<String> {
        serde_json::from_str(&self.options).unwrap_or_default()
    }

    /// View for quiz takers: no answer key, no explanation.
    pub fn student_view(&self) -> QuestionView {
        QuestionView {
            id: self.id.clone(),
            chapter_id: self.chapter_id.clone(),
            prompt: self.prompt.clone(),
            options: self.option_list(),
        }
    }

    /// View for content authors, answer key included.
    pub fn admin_view(&self) -> QuestionAdminView {
        QuestionAdminView {
            id: self.id.clone(),
            chapter_id: self.chapter_id.clone(),
            prompt: self.prompt.clone(),
            options: self.option_list(),
            correct_index: self.correct_index,
            explanation: self.explanation.clone(),
        }
    }
}

/// Question as seen by quiz takers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: String,
    pub chapter_id: String,
    pub prompt: String,
    pub options: Vec<String>,
}

/// Question as seen by content authors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionAdminView {
    pub id: String,
    pub chapter_id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: i64,
    pub explanation: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: &str) -> Question {
        Question {
            id: "q1".to_string(),
            chapter_id: "c1".to_string(),
            prompt: "2 + 2?".to_string(),
            options: options.to_string(),
            correct_index: 1,
            explanation: Some("basic arithmetic".to_string()),
            created_at: "2026-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_option_list_parses_json() {
        let q = question(r#"["3","4","5"]"#);
        assert_eq!(q.option_list(), vec!["3", "4", "5"]);
    }

    #[test]
    fn test_option_list_malformed_is_empty() {
        let q = question("not json");
        assert!(q.option_list().is_empty());
    }

    #[test]
    fn test_student_view_withholds_answer() {
        let q = question(r#"["3","4"]"#);
        let json = serde_json::to_string(&q.student_view()).unwrap();
        assert!(!json.contains("correct_index"));
        assert!(!json.contains("explanation"));
    }
}
