//! Semester and daily schedule: fetch, refresh, offline snapshot

pub mod commands;
pub mod types;

use crate::db;
use types::{ScheduleEntry, ScheduleResponse, DAYS};

/// Persist the flattened entry list as the offline snapshot
pub(crate) async fn save_snapshot(entries: &[ScheduleEntry]) -> Result<(), String> {
    let json = serde_json::to_string(entries)
        .map_err(|e| format!("Failed to serialize schedule: {}", e))?;
    db::set_app_state(db::SCHEDULE_SNAPSHOT_KEY, &json)
        .await
        .map_err(|e| format!("Failed to save schedule: {}", e))
}

/// Load the offline snapshot; an absent or unreadable snapshot reads as empty
pub(crate) async fn load_snapshot() -> Vec<ScheduleEntry> {
    match db::get_app_state(db::SCHEDULE_SNAPSHOT_KEY).await {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Group a flat entry list by weekday, in portal day order
pub(crate) fn group_by_day(entries: Vec<ScheduleEntry>) -> ScheduleResponse {
    let mut grouped = ScheduleResponse::new();
    for entry in entries {
        grouped.entry(entry.day.clone()).or_default().push(entry);
    }
    for day in DAYS {
        grouped.entry(day.to_string()).or_default();
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::group_by_day;
    use super::types::{Corpus, ScheduleEntry, WeekType};

    fn entry(day: &str, subject: &str) -> ScheduleEntry {
        ScheduleEntry {
            day: day.to_string(),
            time: "10:00-10:50".to_string(),
            subject: subject.to_string(),
            teacher: "Petrov P.P.".to_string(),
            auditorium: "201".to_string(),
            corpus: Corpus::TwoK,
            week_type: WeekType::Both,
            week_start_date: "2025-09-01".to_string(),
            created_at: "2025-09-01T08:00:00Z".to_string(),
        }
    }

    #[test]
    fn group_by_day_collects_entries_and_keeps_all_days() {
        let grouped = group_by_day(vec![
            entry("ПН", "Algorithms"),
            entry("ПН", "Physics"),
            entry("СР", "History"),
        ]);

        assert_eq!(grouped.len(), 7);
        assert_eq!(grouped["ПН"].len(), 2);
        assert_eq!(grouped["СР"].len(), 1);
        assert!(grouped["ВС"].is_empty());
    }
}
