//! MongoDB Group Repository implementation
//!
//! Groups are stored with their camelCase field names and looked up by the
//! `id` field. Joins use a single `findOneAndUpdate` whose filter excludes
//! documents that already list the user, so `$addToSet` and `$inc` apply
//! together or not at all.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, IndexModel};
use std::sync::Arc;
use ulid::Ulid;

use super::MongoConnection;
use crate::domain::error::DomainError;
use crate::domain::model::Group;
use crate::domain::repository::{GroupFilter, GroupRepository, GroupUpdate, Result, UpdateOutcome};

pub struct MongoGroupRepository {
    collection: Collection<Group>,
}

impl MongoGroupRepository {
    pub fn new(conn: Arc<MongoConnection>, collection: &str) -> Self {
        Self {
            collection: conn.collection(collection),
        }
    }

    /// Create the lookup indexes. Safe to call on every start.
    pub async fn ensure_indexes(&self) -> anyhow::Result<()> {
        let unique_id = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let created_by = IndexModel::builder().keys(doc! { "createdBy": 1 }).build();
        let members = IndexModel::builder().keys(doc! { "members": 1 }).build();

        self.collection
            .create_indexes([unique_id, created_by, members])
            .await?;

        tracing::debug!("MongoDB group indexes ensured");
        Ok(())
    }

    fn filter_document(filter: &GroupFilter) -> Document {
        match filter {
            GroupFilter::All => doc! {},
            GroupFilter::CreatedBy(uid) => doc! { "createdBy": uid.as_str() },
            // Equality on an array field matches any element.
            GroupFilter::HasMember(uid) => doc! { "members": uid.as_str() },
        }
    }
}

#[async_trait]
impl GroupRepository for MongoGroupRepository {
    async fn query_groups(&self, filter: GroupFilter) -> Result<Vec<Group>> {
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": 1, "id": 1 })
            .build();

        let cursor = self
            .collection
            .find(Self::filter_document(&filter))
            .with_options(options)
            .await?;

        let groups: Vec<Group> = cursor.try_collect().await?;
        Ok(groups)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Group>> {
        Ok(self.collection.find_one(doc! { "id": id }).await?)
    }

    async fn insert_group(&self, group: &Group) -> Result<String> {
        let mut doc = group.clone();
        doc.id = Ulid::new().to_string();

        self.collection.insert_one(&doc).await?;

        tracing::debug!(group_id = %doc.id, "Inserted group");
        Ok(doc.id)
    }

    async fn update_group_fields(&self, id: &str, update: GroupUpdate) -> Result<UpdateOutcome> {
        let user_id = update.members_add.as_str();
        let filter = doc! { "id": id, "members": { "$ne": user_id } };
        let change = doc! {
            "$addToSet": { "members": user_id },
            "$inc": { "memberCount": update.member_count_increment },
        };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .collection
            .find_one_and_update(filter, change)
            .with_options(options)
            .await?;

        if let Some(group) = updated {
            return Ok(UpdateOutcome::Applied(group));
        }

        // Filter missed: either the user is already listed or the group is gone.
        match self.find_by_id(id).await? {
            Some(group) => Ok(UpdateOutcome::Unchanged(group)),
            None => Err(DomainError::NotFound(id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_documents() {
        assert_eq!(MongoGroupRepository::filter_document(&GroupFilter::All), doc! {});
        assert_eq!(
            MongoGroupRepository::filter_document(&GroupFilter::CreatedBy("u1".into())),
            doc! { "createdBy": "u1" }
        );
        assert_eq!(
            MongoGroupRepository::filter_document(&GroupFilter::HasMember("u2".into())),
            doc! { "members": "u2" }
        );
    }
}
