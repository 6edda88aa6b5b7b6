//! Hand persisted materials to the OS for viewing or sharing

use log::warn;
use std::path::{Path, PathBuf};
use tauri::{AppHandle, Manager};
use tauri_plugin_opener::OpenerExt;

use super::store::provider_entry_path;
use super::types::LocalFileRef;

fn app_cache_dir(app: &AppHandle) -> Result<PathBuf, String> {
    app.path()
        .app_cache_dir()
        .map_err(|e| format!("Failed to resolve cache dir: {}", e))
}

/// Resolve a reference to a plain local path the OS surfaces can read.
/// Provider-scoped references are copied into the cache directory first;
/// plain paths pass through untouched.
pub(crate) async fn ensure_local(
    cache_dir: &Path,
    file_ref: &LocalFileRef,
) -> Result<PathBuf, String> {
    match file_ref {
        LocalFileRef::Path { path } => Ok(PathBuf::from(path)),
        LocalFileRef::Provider { uri } => {
            let source = provider_entry_path(uri)?;
            let file_name = source
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| format!("Malformed provider uri: {}", uri))?;

            tokio::fs::create_dir_all(cache_dir)
                .await
                .map_err(|e| format!("Failed to create cache dir: {}", e))?;

            let local = cache_dir.join(&file_name);
            tokio::fs::copy(&source, &local)
                .await
                .map_err(|e| format!("Failed to copy file: {}", e))?;
            Ok(local)
        }
    }
}

/// Dispatch a platform "view" action for a persisted material.
/// Fire-and-forget: a missing handler is logged, never surfaced.
#[tauri::command]
pub async fn open_material(app: AppHandle, file_ref: LocalFileRef) -> Result<(), String> {
    let cache_dir = app_cache_dir(&app)?;
    let path = ensure_local(&cache_dir, &file_ref).await?;
    if let Err(e) = app.opener().open_path(path.to_string_lossy(), None::<&str>) {
        warn!("open_material_no_handler: {}", e);
    }
    Ok(())
}

/// Invoke the platform share affordance on a cache-local copy of the file
#[tauri::command]
pub async fn share_material(app: AppHandle, file_ref: LocalFileRef) -> Result<(), String> {
    let cache_dir = app_cache_dir(&app)?;
    let path = ensure_local(&cache_dir, &file_ref).await?;
    app.opener()
        .reveal_item_in_dir(&path)
        .map_err(|_| "Sharing is not available on this platform".to_string())
}

#[cfg(test)]
mod tests {
    use super::ensure_local;
    use crate::transfer::store::{MaterialStore, ProviderStore};
    use crate::transfer::types::LocalFileRef;
    use tempfile::tempdir;

    #[tokio::test]
    async fn plain_path_refs_pass_through_untouched() {
        let cache_dir = tempdir().unwrap();
        let file_ref = LocalFileRef::Path {
            path: "/storage/materials/notes.pdf".to_string(),
        };
        let resolved = ensure_local(cache_dir.path(), &file_ref).await.unwrap();
        assert_eq!(resolved.to_str().unwrap(), "/storage/materials/notes.pdf");
    }

    #[tokio::test]
    async fn persisted_provider_ref_is_reachable_without_the_scratch_path() {
        let scratch_dir = tempdir().unwrap();
        let dest_dir = tempdir().unwrap();
        let cache_dir = tempdir().unwrap();

        let scratch = scratch_dir.path().join("upload");
        tokio::fs::write(&scratch, b"lecture slides").await.unwrap();

        let store = MaterialStore::Provider(ProviderStore);
        let file_ref = store
            .persist(&scratch, dest_dir.path().to_str().unwrap(), "slides week 1.pdf")
            .await
            .unwrap();

        // drop the original scratch file; the reference must stand alone
        tokio::fs::remove_file(&scratch).await.unwrap();

        let local = ensure_local(cache_dir.path(), &file_ref).await.unwrap();
        assert_eq!(tokio::fs::read(&local).await.unwrap(), b"lecture slides");
        assert_eq!(local.file_name().unwrap(), "slides week 1.pdf");
    }
}
