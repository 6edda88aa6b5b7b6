//! Course-material acquisition commands: folder permission, download
//! orchestration, cancel and the saved-material ledger

use crate::api::{self, PortalState};
use crate::db::{self, SavedMaterial};
use chrono::Utc;
use log::{info, warn};
use serde::Deserialize;
use std::sync::atomic::Ordering;
use tauri::{AppHandle, Emitter, Manager, State};

use super::store::{provider_entry_path, MaterialStore};
use super::types::{LocalFileRef, MaterialProgress, MaterialStatus, MaterialStatusChanged};
use super::worker::{self, DOWNLOAD_CANCEL_REGISTRY};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadMaterialInput {
    pub student_id: String,
    pub subject_id: String,
    pub file_id: i64,
    pub file_name: String,
}

fn emit_status(app: &AppHandle, task_id: &str, status: MaterialStatus, error: Option<String>) {
    let _ = app.emit(
        "material-status-changed",
        MaterialStatusChanged {
            task_id: task_id.to_string(),
            status: status.to_string(),
            error,
        },
    );
}

async fn pick_materials_folder(app: &AppHandle) -> Result<Option<String>, String> {
    use tauri_plugin_dialog::DialogExt;

    let (tx, rx) = tokio::sync::oneshot::channel();

    app.dialog()
        .file()
        .set_title("Select Materials Folder")
        .pick_folder(move |folder_path| {
            let result = folder_path.map(|p| p.to_string());
            let _ = tx.send(result);
        });

    rx.await.map_err(|_| "Dialog was closed".to_string())
}

/// Stored directory handle, or a fresh grant from the native picker.
/// On grant the handle is persisted before it is returned; on denial no
/// retry happens and `None` comes back, so no persist is ever attempted.
async fn get_or_request_materials_dir(app: &AppHandle) -> Result<Option<String>, String> {
    let saved = db::get_app_state(db::MATERIALS_FOLDER_KEY)
        .await
        .map_err(|e| format!("Failed to read folder handle: {}", e))?;
    if let Some(folder) = saved {
        return Ok(Some(folder));
    }

    match pick_materials_folder(app).await? {
        Some(folder) => {
            db::set_app_state(db::MATERIALS_FOLDER_KEY, &folder)
                .await
                .map_err(|e| format!("Failed to store folder handle: {}", e))?;
            Ok(Some(folder))
        }
        None => Ok(None),
    }
}

/// Prompt for the materials folder explicitly (settings screen)
#[tauri::command]
pub async fn choose_materials_folder(app: AppHandle) -> Result<Option<String>, String> {
    match pick_materials_folder(&app).await? {
        Some(folder) => {
            db::set_app_state(db::MATERIALS_FOLDER_KEY, &folder)
                .await
                .map_err(|e| format!("Failed to store folder handle: {}", e))?;
            Ok(Some(folder))
        }
        None => Ok(None),
    }
}

/// Return the stored materials-folder handle, if one was ever granted
#[tauri::command]
pub async fn get_materials_folder() -> Result<Option<String>, String> {
    db::get_app_state(db::MATERIALS_FOLDER_KEY)
        .await
        .map_err(|e| format!("Failed to read folder handle: {}", e))
}

/// Download a course-material file and persist it into the user-chosen
/// folder: streaming fetch into scratch, then the platform persist
/// strategy, then the saved-material ledger. Progress and status are
/// emitted as `material-download-progress` / `material-status-changed`.
#[tauri::command]
pub async fn download_material(
    app: AppHandle,
    state: State<'_, PortalState>,
    store: State<'_, MaterialStore>,
    input: DownloadMaterialInput,
) -> Result<LocalFileRef, String> {
    let task_id = format!("umkd:{}:{}", input.subject_id, input.file_id);
    let url = format!(
        "{}?studentId={}&subjectId={}&fileId={}",
        state.url(api::UMKD_DOWNLOAD_PATH),
        urlencoding::encode(&input.student_id),
        urlencoding::encode(&input.subject_id),
        input.file_id
    );

    let cache_dir = app
        .path()
        .app_cache_dir()
        .map_err(|e| format!("Failed to resolve cache dir: {}", e))?;
    tokio::fs::create_dir_all(&cache_dir)
        .await
        .map_err(|e| format!("Failed to create cache dir: {}", e))?;
    let scratch = cache_dir.join(&input.file_name);

    info!("material_download_start: {} -> {}", task_id, scratch.display());
    emit_status(&app, &task_id, MaterialStatus::Downloading, None);

    let cancelled = worker::register_cancel_flag(&task_id).await;
    let progress_app = app.clone();
    let progress_task = task_id.clone();
    let on_progress = Box::new(move |percent: u32, downloaded: u64, total: u64| {
        let _ = progress_app.emit(
            "material-download-progress",
            MaterialProgress {
                task_id: progress_task.clone(),
                percent,
                downloaded_bytes: downloaded,
                total_bytes: total,
            },
        );
    });

    let downloaded = worker::download_to_scratch(
        &state.client,
        &url,
        &scratch,
        Some(&cancelled),
        Some(on_progress),
    )
    .await;
    worker::clear_cancel_flag(&task_id).await;

    let size = match downloaded {
        Ok(size) => size,
        Err(e) => {
            let status = if e.contains("cancelled") {
                MaterialStatus::Cancelled
            } else {
                MaterialStatus::Failed
            };
            emit_status(&app, &task_id, status, Some(e.clone()));
            return Err(e);
        }
    };

    let grant = get_or_request_materials_dir(&app).await?;

    emit_status(&app, &task_id, MaterialStatus::Persisting, None);
    match persist_with_grant(&store, grant.as_deref(), &scratch, &input.file_name).await {
        Ok(file_ref) => {
            let material = SavedMaterial {
                file_name: input.file_name.clone(),
                subject_id: input.subject_id.clone(),
                file_id: input.file_id,
                location: file_ref.location().to_string(),
                provider_scoped: file_ref.is_provider_scoped(),
                size: size as i64,
                saved_at: Utc::now().timestamp(),
            };
            if let Err(e) = db::upsert_material(&material).await {
                warn!("material_ledger_update_failed: {}", e);
            }
            emit_status(&app, &task_id, MaterialStatus::Saved, None);
            info!("material_download_done: {} ({} bytes)", task_id, size);
            Ok(file_ref)
        }
        Err(e) if grant.is_none() => {
            emit_status(&app, &task_id, MaterialStatus::Failed, Some(e.clone()));
            Err(e)
        }
        Err(e) => {
            // A write failure against a stored handle usually means the
            // folder is gone; drop the handle so the next attempt re-prompts.
            if let Err(err) = db::delete_app_state(db::MATERIALS_FOLDER_KEY).await {
                warn!("folder_handle_reset_failed: {}", err);
            }
            emit_status(&app, &task_id, MaterialStatus::Failed, Some(e.clone()));
            Err(format!("Failed to save file: {}", e))
        }
    }
}

/// Persist only when a directory grant exists. A denied prompt
/// short-circuits here: nothing is ever written to permanent storage.
async fn persist_with_grant(
    store: &MaterialStore,
    grant: Option<&str>,
    scratch: &std::path::Path,
    file_name: &str,
) -> Result<LocalFileRef, String> {
    match grant {
        Some(dir_handle) => store.persist(scratch, dir_handle, file_name).await,
        None => Err("Destination folder was not selected".to_string()),
    }
}

/// Flag an in-flight material download for cancellation
#[tauri::command]
pub async fn cancel_material_download(task_id: String) -> Result<(), String> {
    let registry = DOWNLOAD_CANCEL_REGISTRY.lock().await;
    if let Some(cancelled) = registry.get(&task_id) {
        cancelled.store(true, Ordering::SeqCst);
    }
    Ok(())
}

fn material_file_ref(material: &SavedMaterial) -> LocalFileRef {
    LocalFileRef::from_location(&material.location, material.provider_scoped)
}

/// Ledger row plus the reference the opener commands accept
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedMaterialView {
    #[serde(flatten)]
    pub material: SavedMaterial,
    pub file_ref: LocalFileRef,
}

/// Ledger lookup for one file name; a ledger entry whose backing file is
/// gone reads as not-saved and the stale row is dropped
#[tauri::command]
pub async fn get_saved_material(file_name: String) -> Result<Option<SavedMaterialView>, String> {
    let material = db::get_material(&file_name)
        .await
        .map_err(|e| format!("Failed to read materials ledger: {}", e))?;

    let Some(material) = material else {
        return Ok(None);
    };

    let backing = if material.provider_scoped {
        provider_entry_path(&material.location)?
    } else {
        std::path::PathBuf::from(&material.location)
    };

    if !backing.exists() {
        info!("material_ledger_stale: {}", material.file_name);
        let _ = db::delete_material(&material.file_name).await;
        return Ok(None);
    }

    let file_ref = material_file_ref(&material);
    Ok(Some(SavedMaterialView { material, file_ref }))
}

/// All persisted materials, newest first
#[tauri::command]
pub async fn list_saved_materials() -> Result<Vec<SavedMaterial>, String> {
    db::list_materials()
        .await
        .map_err(|e| format!("Failed to read materials ledger: {}", e))
}

#[cfg(test)]
mod tests {
    use super::{material_file_ref, persist_with_grant};
    use crate::db::SavedMaterial;
    use crate::transfer::store::{DirectoryStore, MaterialStore};
    use crate::transfer::types::LocalFileRef;
    use tempfile::tempdir;

    #[tokio::test]
    async fn denied_grant_skips_persist_and_leaves_storage_untouched() {
        let scratch_dir = tempdir().unwrap();
        let dest_dir = tempdir().unwrap();
        let scratch = scratch_dir.path().join("lecture.pdf");
        tokio::fs::write(&scratch, b"downloaded bytes").await.unwrap();

        let store = MaterialStore::Directory(DirectoryStore);
        let result = persist_with_grant(&store, None, &scratch, "lecture.pdf").await;

        assert!(result.is_err());
        // scratch untouched, destination never written
        assert!(scratch.exists());
        let mut dest = tokio::fs::read_dir(dest_dir.path()).await.unwrap();
        assert!(dest.next_entry().await.unwrap().is_none());
    }

    #[test]
    fn ledger_entry_rebuilds_matching_file_ref() {
        let material = SavedMaterial {
            file_name: "syllabus.pdf".to_string(),
            subject_id: "CS101".to_string(),
            file_id: 12,
            location: "/storage/materials/syllabus.pdf".to_string(),
            provider_scoped: false,
            size: 1024,
            saved_at: 1_757_000_000,
        };
        assert_eq!(
            material_file_ref(&material),
            LocalFileRef::Path {
                path: "/storage/materials/syllabus.pdf".to_string()
            }
        );

        let scoped = SavedMaterial {
            provider_scoped: true,
            location: "tree/syllabus.pdf".to_string(),
            ..material
        };
        assert!(material_file_ref(&scoped).is_provider_scoped());
    }
}
