//! Grade and certification Tauri commands.
//!
//! Both datasets are server-computed snapshots keyed on the stored student
//! id. A refresh replaces the cached snapshot wholesale, never merges.

use crate::api::{self, PortalState};
use crate::auth::require_student_id;
use crate::cache::QueryCache;
use tauri::State;

use super::types::{GradeInfo, SubjectGrade};

#[tauri::command]
pub async fn get_grades(
    state: State<'_, PortalState>,
    cache: State<'_, QueryCache>,
) -> Result<Vec<GradeInfo>, String> {
    if let Some(hit) = cache.get_as::<Vec<GradeInfo>>("grades") {
        return Ok(hit);
    }

    let student_id = require_student_id().await?;
    let grades: Vec<GradeInfo> =
        api::get_json(&state, api::GRADES_PATH, &[("studentId", student_id)]).await?;
    cache.put("grades", &grades)?;
    Ok(grades)
}

#[tauri::command]
pub async fn refresh_grades(
    state: State<'_, PortalState>,
    cache: State<'_, QueryCache>,
) -> Result<Vec<GradeInfo>, String> {
    let student_id = require_student_id().await?;
    let path = format!("{}/refresh", api::GRADES_PATH);
    let grades: Vec<GradeInfo> =
        api::get_json(&state, &path, &[("studentId", student_id)]).await?;
    cache.put("grades", &grades)?;
    Ok(grades)
}

#[tauri::command]
pub async fn get_certification(
    state: State<'_, PortalState>,
    cache: State<'_, QueryCache>,
) -> Result<Vec<SubjectGrade>, String> {
    if let Some(hit) = cache.get_as::<Vec<SubjectGrade>>("certification") {
        return Ok(hit);
    }

    let student_id = require_student_id().await?;
    let rows: Vec<SubjectGrade> =
        api::get_json(&state, api::CERTIFICATION_PATH, &[("studentId", student_id)]).await?;
    cache.put("certification", &rows)?;
    Ok(rows)
}

#[tauri::command]
pub async fn refresh_certification(
    state: State<'_, PortalState>,
    cache: State<'_, QueryCache>,
) -> Result<Vec<SubjectGrade>, String> {
    let student_id = require_student_id().await?;
    let path = format!("{}/refresh", api::CERTIFICATION_PATH);
    let rows: Vec<SubjectGrade> =
        api::get_json(&state, &path, &[("studentId", student_id)]).await?;
    cache.put("certification", &rows)?;
    Ok(rows)
}
