//! Quizzes: grading and attempt history.

mod models;
mod repository;

pub use models::{AttemptView, GradedQuiz, QuestionResult, QuizAttempt, grade};
pub use repository::QuizRepository;
