use serde::{Deserialize, Serialize};

/// A not-yet-persisted application. The backend assigns `id` and the gateway
/// stamps `appliedDate` on submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDraft {
    pub job_id: i64,
    pub applicant_name: String,
    pub applicant_email: String,
    pub resume: String,
    pub cover_letter: String,
}

/// A job application as persisted by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub job_id: i64,
    pub applicant_name: String,
    pub applicant_email: String,
    pub resume: String,
    pub cover_letter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_date: Option<String>,
}

impl ApplicationDraft {
    /// Outgoing record for `POST /applications`, without an id
    pub fn stamped(self, applied_date: String) -> JobApplication {
        JobApplication {
            id: None,
            job_id: self.job_id,
            applicant_name: self.applicant_name,
            applicant_email: self.applicant_email,
            resume: self.resume,
            cover_letter: self.cover_letter,
            applied_date: Some(applied_date),
        }
    }
}
