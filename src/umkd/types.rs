//! Course-material (UMKD) wire types

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UmkdSubject {
    pub subject: Option<String>,
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UmkdFile {
    pub id: i64,
    pub file_name: String,
    pub description: String,
    pub file_type: String,
    pub language_group: String,
    pub download_url: String,
    pub size: String,
    pub upload_date: String,
    pub downloads: i64,
    pub rating: f64,
}

/// Files for one subject, grouped by the teacher who uploaded them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherFiles {
    pub teacher_name: String,
    pub files: Vec<UmkdFile>,
}

#[cfg(test)]
mod tests {
    use super::TeacherFiles;

    #[test]
    fn teacher_files_parse_camel_case_payload() {
        let json = r#"[{
            "teacherName": "Akhmetova A.A.",
            "files": [{
                "id": 12,
                "fileName": "syllabus.pdf",
                "description": "Course syllabus",
                "fileType": "pdf",
                "languageGroup": "EN",
                "downloadUrl": "/umkd/download-file?fileId=12",
                "size": "1.2 MB",
                "uploadDate": "2025-09-01",
                "downloads": 40,
                "rating": 4.5
            }]
        }]"#;
        let groups: Vec<TeacherFiles> = serde_json::from_str(json).unwrap();
        assert_eq!(groups[0].files[0].file_name, "syllabus.pdf");
    }
}
