//! AI tutoring chat.

mod backend;
mod models;
mod repository;

pub use backend::{HttpTutorBackend, TurnAuthor, TutorBackend, TutorConfig, TutorTurn};
pub use models::{TutorConversation, TutorMessage, authors};
pub use repository::TutorRepository;
