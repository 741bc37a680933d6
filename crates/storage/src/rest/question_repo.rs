use async_trait::async_trait;
use log::warn;

use quiz_core::model::{ChallengeId, Question};

use super::RestRepository;
use super::mapping::QuestionRow;
use crate::repository::{QuestionRepository, StorageError};

#[async_trait]
impl QuestionRepository for RestRepository {
    async fn questions_for_challenge(
        &self,
        challenge_id: ChallengeId,
    ) -> Result<Vec<Question>, StorageError> {
        let rows: Vec<QuestionRow> = self
            .client
            .get_rows(
                "questions",
                &[
                    ("select", "*".to_string()),
                    ("challenge_id", format!("eq.{challenge_id}")),
                ],
            )
            .await?;

        let mut questions = Vec::with_capacity(rows.len());
        for row in rows {
            match row.into_question() {
                Ok(question) => questions.push(question),
                Err(err) => warn!("skipping malformed question row: {err}"),
            }
        }
        Ok(questions)
    }
}
