use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};

use crate::entities::session_item;
use crate::error::AppError;

/// String key/value items that belong to one session and disappear with it.
pub struct SessionStorage {
    db: DatabaseConnection,
    session_id: String,
}

impl SessionStorage {
    pub fn new(db: DatabaseConnection, session_id: String) -> Self {
        Self { db, session_id }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub async fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.find(key).await?.map(|item| item.value))
    }

    pub async fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        let now = Utc::now();
        match self.find(key).await? {
            Some(existing) => {
                let mut active = existing.into_active_model();
                active.value = Set(value.to_string());
                active.updated_at = Set(now);
                active.update(&self.db).await?;
            }
            None => {
                let active = session_item::ActiveModel {
                    session_id: Set(self.session_id.clone()),
                    item_key: Set(key.to_string()),
                    value: Set(value.to_string()),
                    updated_at: Set(now),
                    ..Default::default()
                };
                session_item::Entity::insert(active).exec(&self.db).await?;
            }
        }
        log::debug!("stored {key} for session {}", self.session_id);
        Ok(())
    }

    pub async fn remove_item(&self, key: &str) -> Result<bool, AppError> {
        let result = session_item::Entity::delete_many()
            .filter(session_item::Column::SessionId.eq(self.session_id.as_str()))
            .filter(session_item::Column::ItemKey.eq(key))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Drops every item of the session. Returns how many were removed.
    pub async fn clear(&self) -> Result<u64, AppError> {
        let result = session_item::Entity::delete_many()
            .filter(session_item::Column::SessionId.eq(self.session_id.as_str()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn find(&self, key: &str) -> Result<Option<session_item::Model>, AppError> {
        Ok(session_item::Entity::find()
            .filter(session_item::Column::SessionId.eq(self.session_id.as_str()))
            .filter(session_item::Column::ItemKey.eq(key))
            .one(&self.db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use tempfile::TempDir;

    async fn open(dir: &TempDir, session_id: &str) -> SessionStorage {
        let db_path = db::resolve_db_path(dir.path());
        db::ensure_parent_dir(&db_path).expect("ensure parent");
        let db = db::connect(&db_path).await.expect("connect db");
        db::ensure_schema(&db).await.expect("ensure schema");
        SessionStorage::new(db, session_id.to_string())
    }

    #[tokio::test]
    async fn set_then_get_overwrites_value() {
        let dir = TempDir::new().expect("temp dir");
        let storage = open(&dir, "tab-1").await;
        assert_eq!(storage.get_item("k").await.expect("get"), None);

        storage.set_item("k", "one").await.expect("set");
        storage.set_item("k", "two").await.expect("set");
        assert_eq!(
            storage.get_item("k").await.expect("get").as_deref(),
            Some("two")
        );
    }

    #[tokio::test]
    async fn sessions_do_not_see_each_other() {
        let dir = TempDir::new().expect("temp dir");
        let first = open(&dir, "tab-1").await;
        let second = open(&dir, "tab-2").await;

        first.set_item("k", "mine").await.expect("set");
        assert_eq!(second.get_item("k").await.expect("get"), None);

        second.set_item("k", "theirs").await.expect("set");
        assert_eq!(first.clear().await.expect("clear"), 1);
        assert_eq!(first.get_item("k").await.expect("get"), None);
        assert_eq!(
            second.get_item("k").await.expect("get").as_deref(),
            Some("theirs")
        );
    }

    #[tokio::test]
    async fn remove_item_reports_presence() {
        let dir = TempDir::new().expect("temp dir");
        let storage = open(&dir, "tab-1").await;
        storage.set_item("k", "v").await.expect("set");
        assert!(storage.remove_item("k").await.expect("remove"));
        assert!(!storage.remove_item("k").await.expect("remove"));
    }
}
