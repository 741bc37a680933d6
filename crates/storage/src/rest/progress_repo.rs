use async_trait::async_trait;

use quiz_core::model::{ChallengeId, Progress, UserId};

use super::RestRepository;
use super::mapping::{ProgressRow, ProgressUpsertRow};
use crate::repository::{ProgressRepository, StorageError};

#[async_trait]
impl ProgressRepository for RestRepository {
    async fn get_progress(
        &self,
        user_id: UserId,
        challenge_id: ChallengeId,
    ) -> Result<Option<Progress>, StorageError> {
        let rows: Vec<ProgressRow> = self
            .client
            .get_rows(
                "progress",
                &[
                    ("select", "*".to_string()),
                    ("user_id", format!("eq.{user_id}")),
                    ("challenge_id", format!("eq.{challenge_id}")),
                ],
            )
            .await?;

        rows.into_iter()
            .next()
            .map(ProgressRow::into_progress)
            .transpose()
    }

    async fn upsert_progress(&self, progress: &Progress) -> Result<(), StorageError> {
        let row = ProgressUpsertRow::from_progress(progress);
        self.client
            .post_rows(
                "progress",
                &[("on_conflict", "user_id,challenge_id".to_string())],
                &[row],
                "resolution=merge-duplicates,return=minimal",
            )
            .await
    }
}
