//! Port abstraction for forum persistence adapters.

use async_trait::async_trait;

use crate::domain::{ForumAnswer, ForumQuestion};

use super::StoreError;

/// Typed access to forum questions and answers.
#[async_trait]
pub trait ForumRepository: Send + Sync {
    /// Create a question, assigning the next id and creation time.
    async fn create_question(
        &self,
        user_id: i32,
        title: String,
        content: String,
    ) -> Result<ForumQuestion, StoreError>;

    /// Fetch a question by id.
    async fn find_question(&self, id: i32) -> Result<Option<ForumQuestion>, StoreError>;

    /// All questions.
    async fn list_questions(&self) -> Result<Vec<ForumQuestion>, StoreError>;

    /// Create an answer under a question.
    async fn create_answer(
        &self,
        question_id: i32,
        user_id: i32,
        content: String,
    ) -> Result<ForumAnswer, StoreError>;

    /// Answers belonging to one question.
    async fn answers_for(&self, question_id: i32) -> Result<Vec<ForumAnswer>, StoreError>;
}
