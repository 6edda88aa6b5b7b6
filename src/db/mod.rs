use std::path::Path;
use std::sync::OnceLock;
use tokio::sync::Mutex;
use turso::{Builder, Connection};

// Wrap Connection in Mutex to serialize database access
// turso has race conditions in its page cache when accessed concurrently
static DB_CONNECTION: OnceLock<Mutex<Connection>> = OnceLock::new();

// Custom error type for database operations
pub(crate) type DbResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

// Re-export submodules
pub mod app_state;
pub mod materials;

// Re-export types
pub use materials::SavedMaterial;

// ============ Connection and Initialization ============

pub(crate) fn get_connection() -> DbResult<&'static Mutex<Connection>> {
    DB_CONNECTION
        .get()
        .ok_or_else(|| "Database not initialized".into())
}

/// Initialize the database with required tables
pub async fn init_db(db_path: &Path) -> DbResult<()> {
    let db = Builder::new_local(db_path.to_str().unwrap()).build().await?;
    let conn = db.connect()?;

    conn.execute_batch(app_state::get_table_sql()).await?;
    conn.execute_batch(materials::get_table_sql()).await?;

    DB_CONNECTION
        .set(Mutex::new(conn))
        .map_err(|_| "Database already initialized")?;

    Ok(())
}

// Re-export app_state functions
pub use app_state::{delete_app_state, get_app_state, set_app_state};
pub use app_state::{MATERIALS_FOLDER_KEY, SCHEDULE_SNAPSHOT_KEY, STUDENT_ID_KEY};

// Re-export material ledger functions
pub use materials::{delete_material, get_material, list_materials, upsert_material};

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    // Single test for the live database: the connection is a process-wide
    // OnceLock, so everything sharing it runs in one place.
    #[tokio::test]
    async fn database_round_trips_session_and_materials() {
        let dir = tempdir().unwrap();
        init_db(&dir.path().join("studport.db")).await.unwrap();

        // session key behaves like the login/logout flow
        assert_eq!(get_app_state(STUDENT_ID_KEY).await.unwrap(), None);
        set_app_state(STUDENT_ID_KEY, "42").await.unwrap();
        assert_eq!(
            get_app_state(STUDENT_ID_KEY).await.unwrap(),
            Some("42".to_string())
        );
        set_app_state(STUDENT_ID_KEY, "43").await.unwrap();
        assert_eq!(
            get_app_state(STUDENT_ID_KEY).await.unwrap(),
            Some("43".to_string())
        );
        delete_app_state(STUDENT_ID_KEY).await.unwrap();
        assert_eq!(get_app_state(STUDENT_ID_KEY).await.unwrap(), None);

        // materials ledger: upsert replaces, never duplicates
        let material = SavedMaterial {
            file_name: "syllabus.pdf".to_string(),
            subject_id: "CS101".to_string(),
            file_id: 12,
            location: "/storage/materials/syllabus.pdf".to_string(),
            provider_scoped: false,
            size: 1024,
            saved_at: 1_757_000_000,
        };
        upsert_material(&material).await.unwrap();
        let loaded = get_material("syllabus.pdf").await.unwrap().unwrap();
        assert_eq!(loaded.subject_id, "CS101");
        assert!(!loaded.provider_scoped);

        upsert_material(&SavedMaterial {
            size: 2048,
            provider_scoped: true,
            ..material.clone()
        })
        .await
        .unwrap();
        let all = list_materials().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].size, 2048);
        assert!(all[0].provider_scoped);

        delete_material("syllabus.pdf").await.unwrap();
        assert!(get_material("syllabus.pdf").await.unwrap().is_none());
    }
}
