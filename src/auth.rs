//! Session commands: login, session lookup, logout

use crate::api::{self, PortalState};
use crate::db;
use log::info;
use serde::{Deserialize, Serialize};
use tauri::State;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub student_id: i64,
}

/// Exchange portal credentials for a student identifier and persist it.
/// The stored id gates which navigation graph the frontend shows.
#[tauri::command]
pub async fn login(
    state: State<'_, PortalState>,
    username: String,
    password: String,
) -> Result<LoginResponse, String> {
    login_inner(&state, username, password).await
}

pub(crate) async fn login_inner(
    state: &PortalState,
    username: String,
    password: String,
) -> Result<LoginResponse, String> {
    if username.is_empty() || password.is_empty() {
        return Err("Username and password are required".to_string());
    }

    let response: LoginResponse =
        api::post_json(state, api::LOGIN_PATH, &LoginRequest { username, password }).await?;

    db::set_app_state(db::STUDENT_ID_KEY, &response.student_id.to_string())
        .await
        .map_err(|e| format!("Failed to store student id: {}", e))?;

    info!("login_ok: studentId={}", response.student_id);
    Ok(response)
}

/// Return the persisted student id, if a session exists
#[tauri::command]
pub async fn get_session() -> Result<Option<String>, String> {
    db::get_app_state(db::STUDENT_ID_KEY)
        .await
        .map_err(|e| format!("Failed to read session: {}", e))
}

/// Clear the stored session and the offline schedule snapshot
#[tauri::command]
pub async fn logout() -> Result<(), String> {
    db::delete_app_state(db::STUDENT_ID_KEY)
        .await
        .map_err(|e| format!("Failed to clear session: {}", e))?;
    db::delete_app_state(db::SCHEDULE_SNAPSHOT_KEY)
        .await
        .map_err(|e| format!("Failed to clear schedule snapshot: {}", e))?;
    info!("logout_ok");
    Ok(())
}

/// Read the stored student id or fail with a sign-in error.
/// Shared by commands whose endpoints key on the current student.
pub(crate) async fn require_student_id() -> Result<String, String> {
    db::get_app_state(db::STUDENT_ID_KEY)
        .await
        .map_err(|e| format!("Failed to read session: {}", e))?
        .ok_or_else(|| "Not signed in".to_string())
}

#[cfg(test)]
mod tests {
    use super::{login_inner, LoginResponse};
    use crate::api::PortalState;

    #[test]
    fn login_response_parses_student_id() {
        let response: LoginResponse = serde_json::from_str(r#"{"studentId": 42}"#).unwrap();
        assert_eq!(response.student_id, 42);
    }

    #[tokio::test]
    async fn empty_credentials_are_rejected_before_any_request() {
        let state = PortalState::new("http://127.0.0.1:0");
        let result = login_inner(&state, "".to_string(), "secret".to_string()).await;
        assert_eq!(
            result.unwrap_err(),
            "Username and password are required".to_string()
        );
    }
}
