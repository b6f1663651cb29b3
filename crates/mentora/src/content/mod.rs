//! Course content: subjects, chapters, questions.

mod models;
mod repository;

pub use models::{Chapter, Question, QuestionAdminView, QuestionView, Subject};
pub use repository::ContentRepository;
