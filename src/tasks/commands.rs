//! Study-task Tauri commands

use crate::api::{self, PortalState};
use crate::cache::QueryCache;
use tauri::State;

use super::types::{CreateStudyTask, StudyTask, StudyTaskPage};

fn page_cache_key(student_id: Option<i64>, page_size: i64, page: i64) -> String {
    let student = student_id.map(|id| id.to_string()).unwrap_or_default();
    format!("tasks:{}:{}:{}", student, page_size, page)
}

/// Fetch one page of the student's tasks
#[tauri::command]
pub async fn list_tasks(
    state: State<'_, PortalState>,
    cache: State<'_, QueryCache>,
    page: i64,
    page_size: i64,
    student_id: Option<i64>,
) -> Result<StudyTaskPage, String> {
    let key = page_cache_key(student_id, page_size, page);
    if let Some(hit) = cache.get_as::<StudyTaskPage>(&key) {
        return Ok(hit);
    }

    let mut query = vec![
        ("page", page.to_string()),
        ("pageSize", page_size.to_string()),
    ];
    if let Some(id) = student_id {
        query.push(("studentId", id.to_string()));
    }

    let path = format!("{}/page", api::TASKS_PATH);
    let result: StudyTaskPage = api::get_json(&state, &path, &query).await?;
    cache.put(&key, &result)?;
    Ok(result)
}

/// Fetch tasks due today or tomorrow (home-screen widget)
#[tauri::command]
pub async fn list_today_tomorrow_tasks(
    state: State<'_, PortalState>,
    student_id: String,
) -> Result<Vec<StudyTask>, String> {
    let path = format!("{}/today-tomorrow", api::TASKS_PATH);
    api::get_json(&state, &path, &[("studentId", student_id)]).await
}

/// Create a task; every cached task page is dropped so the new task shows up
#[tauri::command]
pub async fn create_task(
    state: State<'_, PortalState>,
    cache: State<'_, QueryCache>,
    input: CreateStudyTask,
) -> Result<StudyTask, String> {
    let task: StudyTask = api::post_json(&state, api::TASKS_PATH, &input).await?;
    cache.invalidate_prefix("tasks");
    Ok(task)
}

/// Flip a task's completion flag
#[tauri::command]
pub async fn toggle_task_completion(
    state: State<'_, PortalState>,
    cache: State<'_, QueryCache>,
    id: i64,
) -> Result<StudyTask, String> {
    let path = format!("{}/{}/complete", api::TASKS_PATH, id);
    let task: StudyTask = api::patch_json(&state, &path).await?;
    cache.invalidate_prefix("tasks");
    Ok(task)
}

/// Delete a task. Invalidates every cached page plus the task's attachment
/// list; the attachment cascade itself is backend-owned.
#[tauri::command]
pub async fn delete_task(
    state: State<'_, PortalState>,
    cache: State<'_, QueryCache>,
    id: i64,
) -> Result<(), String> {
    let path = format!("{}/{}", api::TASKS_PATH, id);
    api::delete(&state, &path).await?;
    cache.invalidate_prefix("tasks");
    cache.invalidate_prefix(&format!("taskAttachments:{}", id));
    Ok(())
}
