//! UMKD listing Tauri commands

use crate::api::{self, PortalState};
use crate::cache::QueryCache;
use tauri::State;

use super::types::{TeacherFiles, UmkdSubject};

/// List subjects that have course materials
#[tauri::command]
pub async fn list_umkd_subjects(
    state: State<'_, PortalState>,
    cache: State<'_, QueryCache>,
    student_id: String,
) -> Result<Vec<UmkdSubject>, String> {
    let key = format!("umkdSubjects:{}", student_id);
    if let Some(hit) = cache.get_as::<Vec<UmkdSubject>>(&key) {
        return Ok(hit);
    }

    let subjects: Vec<UmkdSubject> =
        api::get_json(&state, api::UMKD_LISTS_PATH, &[("studentId", student_id)]).await?;
    cache.put(&key, &subjects)?;
    Ok(subjects)
}

/// List teacher-uploaded files for a subject
#[tauri::command]
pub async fn list_teacher_files(
    state: State<'_, PortalState>,
    cache: State<'_, QueryCache>,
    student_id: String,
    subject_id: String,
) -> Result<Vec<TeacherFiles>, String> {
    let key = format!("teacherFiles:{}:{}", student_id, subject_id);
    if let Some(hit) = cache.get_as::<Vec<TeacherFiles>>(&key) {
        return Ok(hit);
    }

    let query = vec![("studentId", student_id), ("subjectId", subject_id)];
    let files: Vec<TeacherFiles> = api::get_json(&state, api::UMKD_FILES_PATH, &query).await?;
    cache.put(&key, &files)?;
    Ok(files)
}
