use async_trait::async_trait;

use quiz_core::model::{Profile, UserId};

use super::RestRepository;
use super::mapping::{NewProfileRow, ProfileRow, TotalScorePatch};
use crate::repository::{NewProfileRecord, ProfileRepository, StorageError};

#[async_trait]
impl ProfileRepository for RestRepository {
    async fn get_profile(&self, id: UserId) -> Result<Option<Profile>, StorageError> {
        let rows: Vec<ProfileRow> = self
            .client
            .get_rows(
                "profiles",
                &[
                    ("select", "id,name,total_score".to_string()),
                    ("id", format!("eq.{id}")),
                ],
            )
            .await?;

        rows.into_iter()
            .next()
            .map(ProfileRow::into_profile)
            .transpose()
    }

    async fn insert_profile(&self, record: NewProfileRecord) -> Result<(), StorageError> {
        let row = NewProfileRow {
            id: record.id,
            name: &record.name,
            total_score: record.total_score,
        };
        self.client
            .post_rows("profiles", &[], &[row], "return=minimal")
            .await
    }

    async fn set_total_score(&self, id: UserId, total_score: u32) -> Result<(), StorageError> {
        self.client
            .patch_rows(
                "profiles",
                &[("id", format!("eq.{id}"))],
                &TotalScorePatch { total_score },
            )
            .await
    }
}
