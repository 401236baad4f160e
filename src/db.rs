use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use url::Url;

use crate::entities::session_item;
use crate::error::AppError;

pub fn resolve_db_path(data_dir: &Path) -> PathBuf {
    data_dir.join("dayplan.db")
}

pub fn resolve_log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

pub fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub fn open_lock(path: &Path) -> Result<fd_lock::RwLock<File>, AppError> {
    let lock_path = path.with_extension("lock");
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(lock_path)?;
    Ok(fd_lock::RwLock::new(file))
}

pub async fn connect(path: &Path) -> Result<DatabaseConnection, AppError> {
    let mut url = Url::from_file_path(path)
        .map_err(|_| AppError::InvalidInput(format!("invalid sqlite path: {}", path.display())))?;
    url.set_query(Some("mode=rwc"));
    let sqlite_url = url.as_str().replacen("file://", "sqlite://", 1);
    Ok(Database::connect(&sqlite_url).await?)
}

pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), AppError> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut items_stmt = schema.create_table_from_entity(session_item::Entity);
    items_stmt.if_not_exists();
    db.execute(builder.build(&items_stmt)).await?;

    let mut key_index = Index::create()
        .name("idx_session_items_key")
        .table(session_item::Entity)
        .col(session_item::Column::SessionId)
        .col(session_item::Column::ItemKey)
        .unique()
        .to_owned();
    key_index.if_not_exists();
    db.execute(builder.build(&key_index)).await?;

    Ok(())
}
