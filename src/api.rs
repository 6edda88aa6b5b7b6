//! Shared HTTP surface: base URL, endpoint paths and request helpers

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Default API origin (Android emulator loopback in development)
pub const DEFAULT_BASE_URL: &str = "http://10.0.2.2:5204/api";

/// Environment variable that overrides the API origin
pub const BASE_URL_ENV: &str = "STUDPORT_BASE_URL";

pub const LOGIN_PATH: &str = "/login";

pub const SEMESTER_SCHEDULE_PATH: &str = "/schedule/semester";
pub const REFRESH_SCHEDULE_PATH: &str = "/schedule/semester/refresh";
pub const TODAY_SCHEDULE_PATH: &str = "/schedule/semester/todaySchedule";

pub const UMKD_LISTS_PATH: &str = "/umkd/lists";
pub const UMKD_FILES_PATH: &str = "/umkd/files";
pub const UMKD_DOWNLOAD_PATH: &str = "/umkd/download-file";

pub const PROFILE_PATH: &str = "/profile/fetch";
pub const STUDENTS_PATH: &str = "/students";
pub const GITHUB_CREATE_BRANCH_PATH: &str = "/github/create-branch";

pub const TASKS_PATH: &str = "/tasks";
pub const GRADES_PATH: &str = "/grades";
pub const CERTIFICATION_PATH: &str = "/certification";

/// Application-wide HTTP state: one shared client and the portal origin.
/// Managed by the Tauri runtime, never a global.
pub struct PortalState {
    pub base_url: String,
    pub client: Client,
}

impl PortalState {
    pub fn new(base_url: impl Into<String>) -> Self {
        PortalState {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    pub fn from_env() -> Self {
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        PortalState::new(base_url)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, String> {
    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(format!("Request failed: {} - {}", status, text));
    }
    Ok(response)
}

/// GET `path` with query parameters and parse the JSON response
pub(crate) async fn get_json<T: DeserializeOwned>(
    state: &PortalState,
    path: &str,
    query: &[(&str, String)],
) -> Result<T, String> {
    let response = state
        .client
        .get(state.url(path))
        .query(query)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    check_status(response)
        .await?
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// POST a JSON body to `path` and parse the JSON response
pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
    state: &PortalState,
    path: &str,
    body: &B,
) -> Result<T, String> {
    let response = state
        .client
        .post(state.url(path))
        .json(body)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    check_status(response)
        .await?
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// POST a JSON body to `path`, discarding any response body
pub(crate) async fn post_empty<B: Serialize>(
    state: &PortalState,
    path: &str,
    body: &B,
) -> Result<(), String> {
    let response = state
        .client
        .post(state.url(path))
        .json(body)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    check_status(response).await?;
    Ok(())
}

/// PATCH `path` with an empty body and parse the JSON response
pub(crate) async fn patch_json<T: DeserializeOwned>(
    state: &PortalState,
    path: &str,
) -> Result<T, String> {
    let response = state
        .client
        .patch(state.url(path))
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    check_status(response)
        .await?
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// DELETE `path`, discarding any response body
pub(crate) async fn delete(state: &PortalState, path: &str) -> Result<(), String> {
    let response = state
        .client
        .delete(state.url(path))
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    check_status(response).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::PortalState;

    #[test]
    fn url_joins_base_and_path() {
        let state = PortalState::new("http://localhost:5204/api");
        assert_eq!(
            state.url(super::SEMESTER_SCHEDULE_PATH),
            "http://localhost:5204/api/schedule/semester"
        );
    }
}
