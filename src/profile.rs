//! Student profile, group mates and the GitHub branch trigger

use crate::api::{self, PortalState};
use crate::auth::require_student_id;
use crate::cache::QueryCache;
use serde::{Deserialize, Serialize};
use tauri::State;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInfo {
    pub student_id: i64,
    pub username: String,
    pub full_name: Option<String>,
    pub faculty: Option<String>,
    pub specialty: Option<String>,
    pub group: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentItem {
    pub student_id: i64,
    pub username: String,
    pub full_name: Option<String>,
    pub faculty: Option<String>,
    pub specialty: Option<String>,
    pub git_hub_branch_created: bool,
    pub is_current_user: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateBranchRequest {
    student_id: i64,
}

#[tauri::command]
pub async fn get_profile(
    state: State<'_, PortalState>,
    cache: State<'_, QueryCache>,
    student_id: String,
) -> Result<ProfileInfo, String> {
    let key = format!("profile:{}", student_id);
    if let Some(hit) = cache.get_as::<ProfileInfo>(&key) {
        return Ok(hit);
    }

    let profile: ProfileInfo =
        api::get_json(&state, api::PROFILE_PATH, &[("studentId", student_id)]).await?;
    cache.put(&key, &profile)?;
    Ok(profile)
}

/// List group mates with their GitHub branch status
#[tauri::command]
pub async fn list_students(
    state: State<'_, PortalState>,
    cache: State<'_, QueryCache>,
) -> Result<Vec<StudentItem>, String> {
    if let Some(hit) = cache.get_as::<Vec<StudentItem>>("students") {
        return Ok(hit);
    }

    let current_id = require_student_id().await?;
    let students: Vec<StudentItem> = api::get_json(
        &state,
        api::STUDENTS_PATH,
        &[("currentStudentId", current_id)],
    )
    .await?;
    cache.put("students", &students)?;
    Ok(students)
}

/// Trigger repository branch creation for a student
#[tauri::command]
pub async fn create_github_branch(
    state: State<'_, PortalState>,
    cache: State<'_, QueryCache>,
    student_id: i64,
) -> Result<(), String> {
    api::post_empty(
        &state,
        api::GITHUB_CREATE_BRANCH_PATH,
        &CreateBranchRequest { student_id },
    )
    .await?;
    cache.invalidate_prefix("students");
    Ok(())
}
