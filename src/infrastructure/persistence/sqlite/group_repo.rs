use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};
use ulid::Ulid;

use super::{checked_table_name, DbConnection};
use crate::domain::error::DomainError;
use crate::domain::model::Group;
use crate::domain::repository::{GroupFilter, GroupRepository, GroupUpdate, Result, UpdateOutcome};

const COLUMNS: &str = "id, members, member_count, body";

struct GroupRow {
    id: String,
    members: String,
    member_count: i64,
    body: String,
}

impl GroupRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            members: row.get(1)?,
            member_count: row.get(2)?,
            body: row.get(3)?,
        })
    }

    fn into_group(self) -> Result<Group> {
        let mut group: Group = serde_json::from_str(&self.body)?;
        group.id = self.id;
        group.members = serde_json::from_str(&self.members)?;
        group.member_count = self.member_count;
        Ok(group)
    }
}

pub struct SqliteGroupRepository {
    conn: DbConnection,
    table: String,
}

impl SqliteGroupRepository {
    pub fn new(conn: DbConnection, collection: &str) -> Result<Self> {
        let table = checked_table_name(collection)?.to_string();
        Ok(Self { conn, table })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, rusqlite::Connection>> {
        self.conn
            .lock()
            .map_err(|e| DomainError::StoreUnavailable(e.to_string()))
    }
}

#[async_trait]
impl GroupRepository for SqliteGroupRepository {
    async fn query_groups(&self, filter: GroupFilter) -> Result<Vec<Group>> {
        let conn = self.lock()?;
        let table = &self.table;

        let rows = match &filter {
            GroupFilter::All => {
                let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM {table} ORDER BY rowid"))?;
                let rows = stmt.query_map([], GroupRow::from_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            GroupFilter::CreatedBy(uid) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {COLUMNS} FROM {table} WHERE created_by = ? ORDER BY rowid"
                ))?;
                let rows = stmt.query_map(params![uid], GroupRow::from_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            GroupFilter::HasMember(uid) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {COLUMNS} FROM {table}
                     WHERE EXISTS (SELECT 1 FROM json_each({table}.members) WHERE value = ?)
                     ORDER BY rowid"
                ))?;
                let rows = stmt.query_map(params![uid], GroupRow::from_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };

        rows.into_iter().map(GroupRow::into_group).collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Group>> {
        let conn = self.lock()?;

        let row = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM {} WHERE id = ?", self.table),
                params![id],
                GroupRow::from_row,
            )
            .optional()?;

        row.map(GroupRow::into_group).transpose()
    }

    async fn insert_group(&self, group: &Group) -> Result<String> {
        let conn = self.lock()?;

        let id = Ulid::new().to_string();
        let body = serde_json::to_string(group)?;
        let members = serde_json::to_string(&group.members)?;

        conn.execute(
            &format!(
                "INSERT INTO {} (id, created_by, members, member_count, body)
                 VALUES (?, ?, ?, ?, ?)",
                self.table
            ),
            params![id, group.created_by, members, group.member_count, body],
        )?;

        tracing::debug!(group_id = %id, table = %self.table, "Inserted group");
        Ok(id)
    }

    async fn update_group_fields(&self, id: &str, update: GroupUpdate) -> Result<UpdateOutcome> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let row = tx
            .query_row(
                &format!("SELECT {COLUMNS} FROM {} WHERE id = ?", self.table),
                params![id],
                GroupRow::from_row,
            )
            .optional()?
            .ok_or_else(|| DomainError::NotFound(id.to_string()))?;

        let mut group = row.into_group()?;
        if !update.apply_to(&mut group) {
            return Ok(UpdateOutcome::Unchanged(group));
        }

        let members = serde_json::to_string(&group.members)?;
        tx.execute(
            &format!(
                "UPDATE {} SET members = ?, member_count = ? WHERE id = ?",
                self.table
            ),
            params![members, group.member_count, id],
        )?;
        tx.commit()?;

        Ok(UpdateOutcome::Applied(group))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::GroupDraft;
    use crate::infrastructure::persistence::sqlite::open_in_memory;
    use time::OffsetDateTime;

    fn repo() -> SqliteGroupRepository {
        SqliteGroupRepository::new(open_in_memory("grupos").unwrap(), "grupos").unwrap()
    }

    fn group(name: &str, creator: &str) -> Group {
        Group::seeded(GroupDraft::new(name), creator.into(), OffsetDateTime::UNIX_EPOCH)
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = repo();
        let id = repo.insert_group(&group("G1", "u1")).await.unwrap();

        let stored = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.members, vec!["u1"]);
        assert_eq!(stored.member_count, 1);
        assert_eq!(stored.name, "G1");

        assert!(repo.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_conditional_join_update() {
        let repo = repo();
        let id = repo.insert_group(&group("G1", "u1")).await.unwrap();

        let applied = repo.update_group_fields(&id, GroupUpdate::join("u2")).await.unwrap();
        assert!(matches!(applied, UpdateOutcome::Applied(_)));

        let unchanged = repo.update_group_fields(&id, GroupUpdate::join("u2")).await.unwrap();
        assert!(matches!(unchanged, UpdateOutcome::Unchanged(_)));

        let stored = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.members, vec!["u1", "u2"]);
        assert_eq!(stored.member_count, 2);
    }

    #[tokio::test]
    async fn test_update_missing_group() {
        let repo = repo();
        let err = repo
            .update_group_fields("G_missing", GroupUpdate::join("u3"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        assert!(repo.query_groups(GroupFilter::All).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_filters() {
        let repo = repo();
        let g1 = repo.insert_group(&group("G1", "u1")).await.unwrap();
        let g2 = repo.insert_group(&group("G2", "u2")).await.unwrap();
        repo.update_group_fields(&g2, GroupUpdate::join("u1")).await.unwrap();

        let created: Vec<_> = repo
            .query_groups(GroupFilter::CreatedBy("u1".into()))
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(created, vec![g1.clone()]);

        let member: Vec<_> = repo
            .query_groups(GroupFilter::HasMember("u1".into()))
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(member, vec![g1, g2]);

        assert_eq!(repo.query_groups(GroupFilter::All).await.unwrap().len(), 2);
    }
}
