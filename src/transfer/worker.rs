//! Streaming download into scratch storage with progress reporting

use futures_util::StreamExt;
use lazy_static::lazy_static;
use reqwest::Client;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

// Global cancel registry for in-flight material downloads
lazy_static! {
    pub(crate) static ref DOWNLOAD_CANCEL_REGISTRY: Mutex<HashMap<String, Arc<AtomicBool>>> =
        Mutex::new(HashMap::new());
}

pub(crate) async fn register_cancel_flag(task_id: &str) -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let mut registry = DOWNLOAD_CANCEL_REGISTRY.lock().await;
    registry.insert(task_id.to_string(), flag.clone());
    flag
}

pub(crate) async fn clear_cancel_flag(task_id: &str) {
    let mut registry = DOWNLOAD_CANCEL_REGISTRY.lock().await;
    registry.remove(task_id);
}

/// Stream `url` into `scratch_path`, overwriting any previous scratch file.
///
/// Progress is reported as `(percent, downloaded_bytes, total_bytes)`;
/// percent is clamped to [0, 100] and never decreases within one call, even
/// when the server's Content-Length is wrong. A failed or cancelled
/// transfer removes the partial scratch file. Returns the bytes written.
pub(crate) async fn download_to_scratch(
    client: &Client,
    url: &str,
    scratch_path: &Path,
    cancelled: Option<&Arc<AtomicBool>>,
    mut on_progress: Option<Box<dyn FnMut(u32, u64, u64) + Send>>,
) -> Result<u64, String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| format!("Download request failed: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(format!("Download failed: {} - {}", status, text));
    }

    let total_bytes = response.content_length().unwrap_or(0);

    if let Some(parent) = scratch_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| format!("Failed to create directory: {}", e))?;
    }

    // File::create truncates: repeated downloads overwrite the scratch file
    let mut file = File::create(scratch_path)
        .await
        .map_err(|e| format!("Failed to create scratch file: {}", e))?;

    let mut downloaded: u64 = 0;
    let mut last_percent: u32 = 0;
    if let Some(callback) = on_progress.as_mut() {
        callback(0, 0, total_bytes);
    }

    let mut stream = response.bytes_stream();
    while let Some(chunk_result) = stream.next().await {
        if let Some(flag) = cancelled {
            if flag.load(Ordering::SeqCst) {
                drop(file);
                let _ = tokio::fs::remove_file(scratch_path).await;
                return Err("Download cancelled".to_string());
            }
        }

        let chunk = match chunk_result {
            Ok(chunk) => chunk,
            Err(e) => {
                drop(file);
                let _ = tokio::fs::remove_file(scratch_path).await;
                return Err(format!("Failed to read chunk: {}", e));
            }
        };

        if let Err(e) = file.write_all(&chunk).await {
            drop(file);
            let _ = tokio::fs::remove_file(scratch_path).await;
            return Err(format!("Failed to write scratch file: {}", e));
        }

        downloaded += chunk.len() as u64;

        if total_bytes > 0 {
            let percent = std::cmp::min(
                ((downloaded as f64 / total_bytes as f64) * 100.0) as u32,
                100,
            );
            if percent > last_percent {
                last_percent = percent;
                if let Some(callback) = on_progress.as_mut() {
                    callback(percent, downloaded, total_bytes);
                }
            }
        }
    }

    if let Err(e) = file.flush().await {
        drop(file);
        let _ = tokio::fs::remove_file(scratch_path).await;
        return Err(format!("Failed to flush scratch file: {}", e));
    }

    if let Some(callback) = on_progress.as_mut() {
        callback(100, downloaded, total_bytes);
    }

    Ok(downloaded)
}
