//! Quiz data models and grading.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::content::Question;

/// Stored quiz attempt.
///
/// The per-question results are frozen into the row at grading time, so the
/// history stays truthful after the chapter's questions are edited or deleted.
#[derive(Debug, Clone, FromRow)]
pub struct QuizAttempt {
    pub id: String,
    pub user_id: String,
    pub chapter_id: String,
    pub score: i64,
    pub total: i64,
    pub answers: String,
    pub results: String,
    pub created_at: String,
}

impl QuizAttempt {
    /// View with the answer map and results parsed back out of storage.
    pub fn view(&self) -> AttemptView {
        AttemptView {
            id: self.id.clone(),
            chapter_id: self.chapter_id.clone(),
            score: self.score,
            total: self.total,
            answers: serde_json::from_str(&self.answers).unwrap_or_default(),
            results: serde_json::from_str(&self.results).unwrap_or_default(),
            created_at: self.created_at.clone(),
        }
    }
}

/// Attempt as returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptView {
    pub id: String,
    pub chapter_id: String,
    pub score: i64,
    pub total: i64,
    pub answers: HashMap<String, i64>,
    pub results: Vec<QuestionResult>,
    pub created_at: String,
}

/// Per-question grading outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: String,
    pub chosen_index: Option<i64>,
    pub correct_index: i64,
    pub correct: bool,
    pub explanation: Option<String>,
}

/// Graded submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradedQuiz {
    pub score: i64,
    pub total: i64,
    pub results: Vec<QuestionResult>,
}

/// Grade a submission against the chapter's questions.
///
/// Unanswered questions count as wrong; answers to unknown question ids are
/// ignored. Explanations are revealed only after grading.
pub fn grade(questions: &[Question], answers: &HashMap<String, i64>) -> GradedQuiz {
    let mut score = 0;
    let mut results = Vec::with_capacity(questions.len());

    for question in questions {
        let chosen = answers.get(&question.id).copied();
        let correct = chosen == Some(question.correct_index);
        if correct {
            score += 1;
        }

        results.push(QuestionResult {
            question_id: question.id.clone(),
            chosen_index: chosen,
            correct_index: question.correct_index,
            correct,
            explanation: question.explanation.clone(),
        });
    }

    GradedQuiz {
        score,
        total: questions.len() as i64,
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, correct_index: i64) -> Question {
        Question {
            id: id.to_string(),
            chapter_id: "c1".to_string(),
            prompt: "?".to_string(),
            options: r#"["a","b","c"]"#.to_string(),
            correct_index,
            explanation: None,
            created_at: "2026-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_grade_all_correct() {
        let questions = vec![question("q1", 0), question("q2", 2)];
        let answers = HashMap::from([("q1".to_string(), 0), ("q2".to_string(), 2)]);

        let graded = grade(&questions, &answers);
        assert_eq!(graded.score, 2);
        assert_eq!(graded.total, 2);
        assert!(graded.results.iter().all(|r| r.correct));
    }

    #[test]
    fn test_grade_unanswered_counts_as_wrong() {
        let questions = vec![question("q1", 0), question("q2", 1)];
        let answers = HashMap::from([("q1".to_string(), 0)]);

        let graded = grade(&questions, &answers);
        assert_eq!(graded.score, 1);
        let q2 = graded.results.iter().find(|r| r.question_id == "q2").unwrap();
        assert_eq!(q2.chosen_index, None);
        assert!(!q2.correct);
    }

    #[test]
    fn test_grade_ignores_unknown_question_ids() {
        let questions = vec![question("q1", 1)];
        let answers = HashMap::from([("q1".to_string(), 1), ("ghost".to_string(), 0)]);

        let graded = grade(&questions, &answers);
        assert_eq!(graded.score, 1);
        assert_eq!(graded.results.len(), 1);
    }

    #[test]
    fn test_grade_empty_chapter() {
        let graded = grade(&[], &HashMap::new());
        assert_eq!(graded.score, 0);
        assert_eq!(graded.total, 0);
    }
}
