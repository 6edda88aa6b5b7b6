//! Schedule Tauri commands

use crate::api::{self, PortalState};
use crate::cache::QueryCache;
use log::warn;
use serde::Serialize;
use tauri::State;

use super::types::{ScheduleEntry, ScheduleResponse};
use super::{group_by_day, load_snapshot, save_snapshot};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest {
    student_id: String,
}

/// Fetch the full semester schedule, grouped by weekday.
/// Falls back to the persisted snapshot when the portal is unreachable,
/// so a refresh failure never leaves the screen blank.
#[tauri::command]
pub async fn get_semester_schedule(
    state: State<'_, PortalState>,
    cache: State<'_, QueryCache>,
    student_id: String,
) -> Result<ScheduleResponse, String> {
    let key = format!("semesterSchedule:{}", student_id);
    if let Some(hit) = cache.get_as::<ScheduleResponse>(&key) {
        return Ok(hit);
    }

    let query = vec![("studentId", student_id.clone())];
    match api::get_json::<ScheduleResponse>(&state, api::SEMESTER_SCHEDULE_PATH, &query).await {
        Ok(schedule) => {
            let flat: Vec<ScheduleEntry> = schedule.values().flatten().cloned().collect();
            if let Err(e) = save_snapshot(&flat).await {
                warn!("schedule_snapshot_save_failed: {}", e);
            }
            cache.put(&key, &schedule)?;
            Ok(schedule)
        }
        Err(e) => {
            let snapshot = load_snapshot().await;
            if snapshot.is_empty() {
                Err(e)
            } else {
                warn!("semester_schedule_fetch_failed, serving snapshot: {}", e);
                Ok(group_by_day(snapshot))
            }
        }
    }
}

/// Force-refresh the semester schedule. On failure the cached schedule and
/// the snapshot are left untouched; retry stays a manual user action.
#[tauri::command]
pub async fn refresh_semester_schedule(
    state: State<'_, PortalState>,
    cache: State<'_, QueryCache>,
    student_id: String,
) -> Result<Vec<ScheduleEntry>, String> {
    refresh_semester(&state, &cache, student_id).await
}

pub(crate) async fn refresh_semester(
    state: &PortalState,
    cache: &QueryCache,
    student_id: String,
) -> Result<Vec<ScheduleEntry>, String> {
    let entries: Vec<ScheduleEntry> = api::post_json(
        state,
        api::REFRESH_SCHEDULE_PATH,
        &RefreshRequest { student_id },
    )
    .await?;

    if let Err(e) = save_snapshot(&entries).await {
        warn!("schedule_snapshot_save_failed: {}", e);
    }
    cache.invalidate_prefix("semesterSchedule");
    cache.invalidate_prefix("todaySchedule");
    Ok(entries)
}

/// Fetch today's entries
#[tauri::command]
pub async fn get_today_schedule(
    state: State<'_, PortalState>,
    cache: State<'_, QueryCache>,
    student_id: String,
) -> Result<Vec<ScheduleEntry>, String> {
    let key = format!("todaySchedule:{}", student_id);
    if let Some(hit) = cache.get_as::<Vec<ScheduleEntry>>(&key) {
        return Ok(hit);
    }

    let query = vec![("studentId", student_id)];
    let entries: Vec<ScheduleEntry> =
        api::get_json(&state, api::TODAY_SCHEDULE_PATH, &query).await?;
    cache.put(&key, &entries)?;
    Ok(entries)
}

/// Return the persisted offline snapshot (empty if none was ever saved)
#[tauri::command]
pub async fn load_cached_schedule() -> Result<Vec<ScheduleEntry>, String> {
    Ok(load_snapshot().await)
}

#[cfg(test)]
mod tests {
    use super::refresh_semester;
    use crate::api::PortalState;
    use crate::cache::QueryCache;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn failed_refresh_leaves_cached_schedule_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/schedule/semester/refresh"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let state = PortalState::new(server.uri());
        let cache = QueryCache::new();
        cache.put("semesterSchedule:7", &"stale but displayed").unwrap();

        let result = refresh_semester(&state, &cache, "7".to_string()).await;

        assert!(result.is_err());
        assert_eq!(
            cache.get_as::<String>("semesterSchedule:7"),
            Some("stale but displayed".to_string())
        );
        assert_eq!(cache.version("semesterSchedule:7"), Some(1));
    }

    #[tokio::test]
    async fn successful_refresh_invalidates_schedule_caches() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/schedule/semester/refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
            .mount(&server)
            .await;

        let state = PortalState::new(server.uri());
        let cache = QueryCache::new();
        cache.put("semesterSchedule:7", &"old").unwrap();
        cache.put("todaySchedule:7", &"old").unwrap();
        cache.put("grades", &"untouched").unwrap();

        let entries = refresh_semester(&state, &cache, "7".to_string())
            .await
            .unwrap();

        assert!(entries.is_empty());
        assert!(cache.get_as::<String>("semesterSchedule:7").is_none());
        assert!(cache.get_as::<String>("todaySchedule:7").is_none());
        assert_eq!(cache.get_as::<String>("grades"), Some("untouched".to_string()));
    }
}
