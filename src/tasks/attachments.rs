//! Task attachment commands: list, upload, download, delete

use crate::api::{self, PortalState};
use crate::cache::QueryCache;
use crate::transfer::worker;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use std::path::Path;
use tauri::{AppHandle, Manager, State};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use super::types::TaskAttachment;

/// Build a multipart part streaming from a local file
async fn file_part(file_path: &str) -> Result<Part, String> {
    let path = Path::new(file_path);
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| format!("Invalid file path: {}", file_path))?
        .to_string();

    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| format!("Failed to read file metadata: {}", e))?;
    let file = File::open(path)
        .await
        .map_err(|e| format!("Failed to open file: {}", e))?;

    Part::stream_with_length(Body::wrap_stream(ReaderStream::new(file)), metadata.len())
        .file_name(file_name)
        .mime_str("application/octet-stream")
        .map_err(|e| format!("Failed to build upload part: {}", e))
}

async fn post_form(
    state: &PortalState,
    path: &str,
    form: Form,
) -> Result<(), String> {
    let response = state
        .client
        .post(state.url(path))
        .multipart(form)
        .send()
        .await
        .map_err(|e| format!("Upload failed: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(format!("Upload failed: {} - {}", status, text));
    }
    Ok(())
}

/// List a task's attachments
#[tauri::command]
pub async fn list_task_attachments(
    state: State<'_, PortalState>,
    cache: State<'_, QueryCache>,
    task_id: i64,
) -> Result<Vec<TaskAttachment>, String> {
    let key = format!("taskAttachments:{}", task_id);
    if let Some(hit) = cache.get_as::<Vec<TaskAttachment>>(&key) {
        return Ok(hit);
    }

    let path = format!("{}/{}/attachments", api::TASKS_PATH, task_id);
    let attachments: Vec<TaskAttachment> = api::get_json(&state, &path, &[]).await?;
    cache.put(&key, &attachments)?;
    Ok(attachments)
}

/// Upload one file as a task attachment
#[tauri::command]
pub async fn upload_task_attachment(
    state: State<'_, PortalState>,
    cache: State<'_, QueryCache>,
    task_id: i64,
    file_path: String,
) -> Result<(), String> {
    let form = Form::new().part("file", file_part(&file_path).await?);
    let path = format!("{}/{}/attachments", api::TASKS_PATH, task_id);
    post_form(&state, &path, form).await?;

    cache.invalidate_prefix(&format!("taskAttachments:{}", task_id));
    cache.invalidate_prefix("tasks");
    Ok(())
}

/// Upload several files in one multipart request
#[tauri::command]
pub async fn upload_task_attachments(
    state: State<'_, PortalState>,
    cache: State<'_, QueryCache>,
    task_id: i64,
    file_paths: Vec<String>,
) -> Result<(), String> {
    if file_paths.is_empty() {
        return Err("No files selected".to_string());
    }

    let mut form = Form::new();
    for file_path in &file_paths {
        form = form.part("files", file_part(file_path).await?);
    }

    let path = format!("{}/{}/attachments/multiple", api::TASKS_PATH, task_id);
    post_form(&state, &path, form).await?;

    cache.invalidate_prefix(&format!("taskAttachments:{}", task_id));
    cache.invalidate_prefix("tasks");
    Ok(())
}

/// Download an attachment into the app cache directory and return its path.
/// Attachment bytes are only ever held transiently; nothing is persisted to
/// the materials folder.
#[tauri::command]
pub async fn download_task_attachment(
    app: AppHandle,
    state: State<'_, PortalState>,
    attachment_id: i64,
    file_name: String,
) -> Result<String, String> {
    let cache_dir = app
        .path()
        .app_cache_dir()
        .map_err(|e| format!("Failed to resolve cache dir: {}", e))?;
    tokio::fs::create_dir_all(&cache_dir)
        .await
        .map_err(|e| format!("Failed to create cache dir: {}", e))?;

    let scratch = cache_dir.join(&file_name);
    let url = state.url(&format!(
        "{}/attachments/{}/download",
        api::TASKS_PATH,
        attachment_id
    ));

    worker::download_to_scratch(&state.client, &url, &scratch, None, None).await?;
    Ok(scratch.to_string_lossy().into_owned())
}

/// Delete an attachment; the owning task id is unknown here, so every
/// cached attachment list is dropped
#[tauri::command]
pub async fn delete_task_attachment(
    state: State<'_, PortalState>,
    cache: State<'_, QueryCache>,
    attachment_id: i64,
) -> Result<(), String> {
    let path = format!("{}/attachments/{}", api::TASKS_PATH, attachment_id);
    api::delete(&state, &path).await?;

    cache.invalidate_prefix("taskAttachments");
    cache.invalidate_prefix("tasks");
    Ok(())
}
