use super::{get_connection, DbResult};
use serde::{Deserialize, Serialize};

/// Ledger entry for a course-material file that survived a persist.
/// `location` is opaque: a plain path or a provider-scoped URI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedMaterial {
    pub file_name: String,
    pub subject_id: String,
    pub file_id: i64,
    pub location: String,
    pub provider_scoped: bool,
    pub size: i64,
    pub saved_at: i64,
}

/// Get SQL for creating the materials ledger table
pub fn get_table_sql() -> &'static str {
    "
    CREATE TABLE IF NOT EXISTS materials (
        file_name TEXT PRIMARY KEY,
        subject_id TEXT NOT NULL,
        file_id INTEGER NOT NULL,
        location TEXT NOT NULL,
        provider_scoped INTEGER NOT NULL DEFAULT 0,
        size INTEGER NOT NULL DEFAULT 0,
        saved_at INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_materials_subject ON materials(subject_id);
    "
}

fn material_from_row(row: &turso::Row) -> DbResult<SavedMaterial> {
    let provider_scoped: i64 = row.get(4)?;
    Ok(SavedMaterial {
        file_name: row.get(0)?,
        subject_id: row.get(1)?,
        file_id: row.get(2)?,
        location: row.get(3)?,
        provider_scoped: provider_scoped != 0,
        size: row.get(5)?,
        saved_at: row.get(6)?,
    })
}

/// Insert or replace the ledger entry for `file_name`
pub async fn upsert_material(material: &SavedMaterial) -> DbResult<()> {
    let conn = get_connection()?.lock().await;
    conn.execute(
        "INSERT INTO materials
         (file_name, subject_id, file_id, location, provider_scoped, size, saved_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT (file_name) DO UPDATE SET
           subject_id = ?2, file_id = ?3, location = ?4,
           provider_scoped = ?5, size = ?6, saved_at = ?7",
        turso::params![
            material.file_name.clone(),
            material.subject_id.clone(),
            material.file_id,
            material.location.clone(),
            material.provider_scoped as i64,
            material.size,
            material.saved_at,
        ],
    )
    .await?;
    Ok(())
}

/// Get the ledger entry for `file_name`, if any
pub async fn get_material(file_name: &str) -> DbResult<Option<SavedMaterial>> {
    let conn = get_connection()?.lock().await;
    let mut rows = conn
        .query(
            "SELECT file_name, subject_id, file_id, location, provider_scoped, size, saved_at
             FROM materials WHERE file_name = ?1",
            turso::params![file_name],
        )
        .await?;

    if let Some(row) = rows.next().await? {
        Ok(Some(material_from_row(&row)?))
    } else {
        Ok(None)
    }
}

/// List every persisted material, newest first
pub async fn list_materials() -> DbResult<Vec<SavedMaterial>> {
    let conn = get_connection()?.lock().await;
    let mut rows = conn
        .query(
            "SELECT file_name, subject_id, file_id, location, provider_scoped, size, saved_at
             FROM materials ORDER BY saved_at DESC",
            turso::params![],
        )
        .await?;

    let mut materials = Vec::new();
    while let Some(row) = rows.next().await? {
        materials.push(material_from_row(&row)?);
    }
    Ok(materials)
}

/// Drop the ledger entry for `file_name`
pub async fn delete_material(file_name: &str) -> DbResult<()> {
    let conn = get_connection()?.lock().await;
    conn.execute(
        "DELETE FROM materials WHERE file_name = ?1",
        turso::params![file_name],
    )
    .await?;
    Ok(())
}
