//! Grade and certification wire types (server-computed, read-only)

use serde::{Deserialize, Serialize};

/// Midterm checkpoint tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rk {
    Rk1,
    Rk2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeItem {
    #[serde(rename = "type")]
    pub kind: Rk,
    pub date: String,
    pub score: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub teacher: String,
    pub grades: Vec<GradeItem>,
    pub has_data: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeInfo {
    pub subject_name: String,
    pub period: String,
    pub classes: Vec<ClassInfo>,
    pub r_k1: f64,
    pub r_k2: f64,
}

/// One row of the certification table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectGrade {
    pub discipline: String,
    pub credits: f64,
    pub r_k1: f64,
    pub r_k2: f64,
    pub pa: f64,
    pub sum: f64,
    pub gpa: f64,
    pub letter_grade: String,
    pub meaning: String,
}

#[cfg(test)]
mod tests {
    use super::{GradeInfo, Rk, SubjectGrade};

    #[test]
    fn grade_info_parses_rk_fields_and_type_tag() {
        let json = r#"{
            "subjectName": "Calculus",
            "period": "2025 Fall",
            "classes": [{
                "type": "Lecture",
                "teacher": "Sidorov S.S.",
                "grades": [{"type": "Rk1", "date": "2025-10-01", "score": 27.5, "total": 30.0}],
                "hasData": true
            }],
            "rK1": 27.5,
            "rK2": 0.0
        }"#;
        let info: GradeInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.r_k1, 27.5);
        assert_eq!(info.classes[0].grades[0].kind, Rk::Rk1);
    }

    #[test]
    fn subject_grade_parses_certification_row() {
        let json = r#"{
            "discipline": "Physics",
            "credits": 5.0,
            "rK1": 25.0,
            "rK2": 28.0,
            "pa": 35.0,
            "sum": 88.0,
            "gpa": 3.67,
            "letterGrade": "B+",
            "meaning": "Good"
        }"#;
        let row: SubjectGrade = serde_json::from_str(json).unwrap();
        assert_eq!(row.letter_grade, "B+");
        assert_eq!(row.sum, 88.0);
    }
}
