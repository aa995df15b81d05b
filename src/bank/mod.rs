pub mod question;
pub mod repository;

pub use question::{Answer, Level, LevelFilter, Question, QuestionId};
pub use repository::QuestionBank;
