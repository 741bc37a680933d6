use async_trait::async_trait;
use log::warn;

use quiz_core::model::{Challenge, ChallengeId};

use super::RestRepository;
use super::mapping::{ChallengeRow, TitleRow};
use crate::repository::{ChallengeRepository, StorageError};

#[async_trait]
impl ChallengeRepository for RestRepository {
    async fn list_challenges(&self) -> Result<Vec<Challenge>, StorageError> {
        let rows: Vec<ChallengeRow> = self
            .client
            .get_rows(
                "challenges",
                &[
                    ("select", "*,questions(id)".to_string()),
                    ("order", "required_score.asc".to_string()),
                ],
            )
            .await?;

        // A single malformed catalog row should not empty the whole
        // catalog; skip it and keep the rest.
        let mut challenges = Vec::with_capacity(rows.len());
        for row in rows {
            match row.into_challenge() {
                Ok(challenge) => challenges.push(challenge),
                Err(err) => warn!("skipping malformed challenge row: {err}"),
            }
        }
        Ok(challenges)
    }

    async fn challenge_title(&self, id: ChallengeId) -> Result<String, StorageError> {
        let rows: Vec<TitleRow> = self
            .client
            .get_rows(
                "challenges",
                &[
                    ("select", "title".to_string()),
                    ("id", format!("eq.{id}")),
                ],
            )
            .await?;

        rows.into_iter()
            .next()
            .map(|row| row.title)
            .ok_or(StorageError::NotFound)
    }
}
