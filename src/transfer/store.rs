//! Persist strategies for downloaded course materials.
//!
//! One conceptual operation, two storage surfaces: a conventional
//! directory where delete-then-rename is available, and a
//! capability-restricted document provider addressed by URI, where entries
//! must be listed, deleted and re-created through the provider and content
//! round-trips through base64. The strategy is chosen once in `lib.rs`
//! setup, never inline at call sites.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use lazy_static::lazy_static;
use log::info;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::types::LocalFileRef;

// One lock per target filename: concurrent persists of the same name are
// serialized so delete-then-create never interleaves; different names
// proceed without coordination.
lazy_static! {
    static ref PERSIST_LOCK_REGISTRY: Mutex<HashMap<String, Arc<Mutex<()>>>> =
        Mutex::new(HashMap::new());
}

async fn filename_lock(file_name: &str) -> Arc<Mutex<()>> {
    let mut registry = PERSIST_LOCK_REGISTRY.lock().await;
    registry
        .entry(file_name.to_string())
        .or_insert_with(|| Arc::new(Mutex::new(())))
        .clone()
}

pub enum MaterialStore {
    Directory(DirectoryStore),
    Provider(ProviderStore),
}

impl MaterialStore {
    /// Pick the persist strategy for the target platform, once
    pub fn for_platform() -> Self {
        if cfg!(target_os = "android") {
            MaterialStore::Provider(ProviderStore)
        } else {
            MaterialStore::Directory(DirectoryStore)
        }
    }

    /// Persist the scratch file under `dir_handle` as `file_name`.
    /// Afterwards at most one entry with that name exists there.
    pub async fn persist(
        &self,
        scratch: &Path,
        dir_handle: &str,
        file_name: &str,
    ) -> Result<LocalFileRef, String> {
        let lock = filename_lock(file_name).await;
        let _guard = lock.lock().await;
        match self {
            MaterialStore::Directory(store) => store.persist(scratch, dir_handle, file_name).await,
            MaterialStore::Provider(store) => store.persist(scratch, dir_handle, file_name).await,
        }
    }
}

// ============ Plain-directory strategy ============

/// Conventional filesystem directory: delete any previous version, then
/// move the scratch file into place. The scratch file is consumed.
pub struct DirectoryStore;

impl DirectoryStore {
    async fn persist(
        &self,
        scratch: &Path,
        dir_handle: &str,
        file_name: &str,
    ) -> Result<LocalFileRef, String> {
        let dest = Path::new(dir_handle).join(file_name);

        match tokio::fs::remove_file(&dest).await {
            Ok(()) => info!("persist_replaced_existing: {}", dest.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(format!("Failed to delete existing file: {}", e)),
        }

        tokio::fs::rename(scratch, &dest)
            .await
            .map_err(|e| format!("Failed to move file: {}", e))?;

        Ok(LocalFileRef::Path {
            path: dest.to_string_lossy().into_owned(),
        })
    }
}

// ============ Provider-scoped strategy ============

/// URI of the entry named `file_name` under a provider tree
fn entry_uri(tree_uri: &str, file_name: &str) -> String {
    format!(
        "{}/{}",
        tree_uri.trim_end_matches('/'),
        urlencoding::encode(file_name)
    )
}

/// Filesystem path backing a provider entry URI
pub(crate) fn provider_entry_path(uri: &str) -> Result<PathBuf, String> {
    let (tree, encoded_name) = uri
        .rsplit_once('/')
        .ok_or_else(|| format!("Malformed provider uri: {}", uri))?;
    let name = urlencoding::decode(encoded_name)
        .map_err(|e| format!("Malformed provider uri: {}", e))?;
    Ok(Path::new(tree).join(name.as_ref()))
}

/// Decoded display name of a provider entry URI
pub(crate) fn provider_entry_name(uri: &str) -> String {
    let encoded = uri.rsplit_once('/').map(|(_, name)| name).unwrap_or(uri);
    urlencoding::decode(encoded)
        .map(|name| name.into_owned())
        .unwrap_or_else(|_| encoded.to_string())
}

/// Capability-restricted document provider: entries are addressed by URI,
/// an existing same-named entry is deleted through the provider, a fresh
/// entry is created and scratch content is copied through a base64
/// round-trip. The scratch copy stays in the cache dir; sharing reuses it.
pub struct ProviderStore;

impl ProviderStore {
    async fn list_entries(&self, tree_uri: &str) -> Result<Vec<String>, String> {
        let mut dir = tokio::fs::read_dir(tree_uri)
            .await
            .map_err(|e| format!("Failed to list directory: {}", e))?;

        let mut entries = Vec::new();
        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|e| format!("Failed to list directory: {}", e))?
        {
            entries.push(entry_uri(tree_uri, &item.file_name().to_string_lossy()));
        }
        Ok(entries)
    }

    async fn delete_entry(&self, uri: &str) -> Result<(), String> {
        tokio::fs::remove_file(provider_entry_path(uri)?)
            .await
            .map_err(|e| format!("Failed to delete entry: {}", e))
    }

    async fn create_entry(&self, tree_uri: &str, file_name: &str) -> Result<String, String> {
        let uri = entry_uri(tree_uri, file_name);
        tokio::fs::File::create(provider_entry_path(&uri)?)
            .await
            .map_err(|e| format!("Failed to create entry: {}", e))?;
        Ok(uri)
    }

    async fn write_base64(&self, uri: &str, content: &str) -> Result<(), String> {
        let bytes = BASE64
            .decode(content)
            .map_err(|e| format!("Failed to decode content: {}", e))?;
        tokio::fs::write(provider_entry_path(uri)?, bytes)
            .await
            .map_err(|e| format!("Failed to write entry: {}", e))
    }

    async fn persist(
        &self,
        scratch: &Path,
        tree_uri: &str,
        file_name: &str,
    ) -> Result<LocalFileRef, String> {
        let entries = self.list_entries(tree_uri).await?;
        if let Some(existing) = entries
            .iter()
            .find(|uri| provider_entry_name(uri).ends_with(file_name))
        {
            info!("persist_replacing_entry: {}", existing);
            self.delete_entry(existing).await?;
        }

        let dest = self.create_entry(tree_uri, file_name).await?;

        // The provider does not accept raw byte streams; content goes
        // through a base64 round-trip.
        let bytes = tokio::fs::read(scratch)
            .await
            .map_err(|e| format!("Failed to read scratch file: {}", e))?;
        let encoded = BASE64.encode(&bytes);
        self.write_base64(&dest, &encoded).await?;

        Ok(LocalFileRef::Provider { uri: dest })
    }
}
