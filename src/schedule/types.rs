//! Schedule wire types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Weekday labels in portal order, as the backend groups them
pub const DAYS: [&str; 7] = ["ПН", "ВТ", "СР", "ЧТ", "ПТ", "СБ", "ВС"];

/// Week parity tag. The backend serializes this as an integer:
/// 0 - both weeks, 1 - numerator, 2 - denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum WeekType {
    Both,
    Numerator,
    Denominator,
}

impl From<u8> for WeekType {
    fn from(value: u8) -> Self {
        match value {
            1 => WeekType::Numerator,
            2 => WeekType::Denominator,
            _ => WeekType::Both,
        }
    }
}

impl From<WeekType> for u8 {
    fn from(value: WeekType) -> Self {
        match value {
            WeekType::Both => 0,
            WeekType::Numerator => 1,
            WeekType::Denominator => 2,
        }
    }
}

/// Campus building, integer-coded on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Corpus {
    Unknown,
    OneK,
    TwoK,
    Gla,
}

impl From<u8> for Corpus {
    fn from(value: u8) -> Self {
        match value {
            1 => Corpus::OneK,
            2 => Corpus::TwoK,
            3 => Corpus::Gla,
            _ => Corpus::Unknown,
        }
    }
}

impl From<Corpus> for u8 {
    fn from(value: Corpus) -> Self {
        match value {
            Corpus::Unknown => 0,
            Corpus::OneK => 1,
            Corpus::TwoK => 2,
            Corpus::Gla => 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub day: String,
    pub time: String,
    pub subject: String,
    pub teacher: String,
    pub auditorium: String,
    pub corpus: Corpus,
    pub week_type: WeekType,
    pub week_start_date: String,
    pub created_at: String,
}

/// Entries grouped by weekday, as `/schedule/semester` returns them
pub type ScheduleResponse = HashMap<String, Vec<ScheduleEntry>>;

#[cfg(test)]
mod tests {
    use super::{Corpus, ScheduleEntry, WeekType};

    #[test]
    fn week_type_uses_integer_wire_format() {
        let json = serde_json::to_string(&WeekType::Denominator).unwrap();
        assert_eq!(json, "2");
        let parsed: WeekType = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, WeekType::Numerator);
    }

    #[test]
    fn unknown_codes_fall_back_to_defaults() {
        let week: WeekType = serde_json::from_str("9").unwrap();
        assert_eq!(week, WeekType::Both);
        let corpus: Corpus = serde_json::from_str("9").unwrap();
        assert_eq!(corpus, Corpus::Unknown);
    }

    #[test]
    fn schedule_entry_parses_camel_case_payload() {
        let json = r#"{
            "day": "ПН",
            "time": "09:00-09:50",
            "subject": "Algorithms",
            "teacher": "Ivanov I.I.",
            "auditorium": "305",
            "corpus": 1,
            "weekType": 0,
            "weekStartDate": "2025-09-01",
            "createdAt": "2025-09-01T08:00:00Z"
        }"#;
        let entry: ScheduleEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.day, "ПН");
        assert_eq!(entry.corpus, Corpus::OneK);
        assert_eq!(entry.week_type, WeekType::Both);
    }
}
