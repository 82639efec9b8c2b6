use serde::Deserialize;

/// Progress value that marks a job as finished regardless of its status string.
pub const PROGRESS_COMPLETE: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JobStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
    /// A status string this client does not know; treated as non-terminal.
    Unknown(String),
}

impl JobStatus {
    /// Maps the backend's status string. The backend has historically used
    /// `queued` and `error` for what is now `pending` and `failed`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" | "queued" => JobStatus::Pending,
            "processing" => JobStatus::Processing,
            "completed" => JobStatus::Completed,
            "failed" | "error" => JobStatus::Failed,
            _ => JobStatus::Unknown(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Unknown(raw) => raw,
        }
    }
}

/// One decoded answer from the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusReport {
    pub progress: u8,
    pub status: JobStatus,
    pub error: Option<String>,
    pub title: Option<String>,
    pub job_id: Option<String>,
}

/// What a single report means for the poll chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    Completed,
    Failed,
}

#[derive(Debug, Deserialize)]
struct StatusPayload {
    #[serde(default)]
    progress: Option<f64>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

impl StatusReport {
    /// Decodes a status endpoint body. Any body that is not a JSON object is an error.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let payload: StatusPayload = serde_json::from_str(body)?;
        Ok(payload.into())
    }

    /// Completion is checked before failure: a report at 100% is done even
    /// if it also carries an error string.
    pub fn verdict(&self) -> Verdict {
        if self.status == JobStatus::Completed || self.progress == PROGRESS_COMPLETE {
            Verdict::Completed
        } else if self.status == JobStatus::Failed || self.reported_error().is_some() {
            Verdict::Failed
        } else {
            Verdict::Continue
        }
    }

    pub fn failure_message(&self) -> String {
        self.reported_error()
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| "the synthesis job failed".to_string())
    }

    /// The backend's error string, if it carries one. Blank strings count as absent.
    fn reported_error(&self) -> Option<&str> {
        self.error
            .as_deref()
            .filter(|message| !message.trim().is_empty())
    }
}

impl From<StatusPayload> for StatusReport {
    fn from(payload: StatusPayload) -> Self {
        Self {
            progress: clamp_progress(payload.progress.unwrap_or(0.0)),
            status: payload
                .status
                .as_deref()
                .map(JobStatus::parse)
                .unwrap_or_default(),
            error: payload.error,
            title: payload.title,
            job_id: payload.id,
        }
    }
}

fn clamp_progress(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.trunc().clamp(0.0, f64::from(PROGRESS_COMPLETE)) as u8
}

#[cfg(test)]
mod tests {
    use super::{JobStatus, StatusReport, Verdict};

    #[test]
    fn decodes_minimal_payload() {
        let report = StatusReport::from_json(r#"{"progress": 35, "status": "processing"}"#).unwrap();
        assert_eq!(report.progress, 35);
        assert_eq!(report.status, JobStatus::Processing);
        assert_eq!(report.verdict(), Verdict::Continue);
    }

    #[test]
    fn legacy_status_names_are_mapped() {
        assert_eq!(JobStatus::parse("queued"), JobStatus::Pending);
        assert_eq!(JobStatus::parse("error"), JobStatus::Failed);
        assert_eq!(
            JobStatus::parse("paused"),
            JobStatus::Unknown("paused".to_string())
        );
    }

    #[test]
    fn progress_is_clamped_and_truncated() {
        let over = StatusReport::from_json(r#"{"progress": 140, "status": "processing"}"#).unwrap();
        assert_eq!(over.progress, 100);
        let under = StatusReport::from_json(r#"{"progress": -3, "status": "pending"}"#).unwrap();
        assert_eq!(under.progress, 0);
        let fractional = StatusReport::from_json(r#"{"progress": 79.9}"#).unwrap();
        assert_eq!(fractional.progress, 79);
        assert_eq!(fractional.status, JobStatus::Pending);
    }

    #[test]
    fn full_progress_completes_even_without_status() {
        let report = StatusReport::from_json(r#"{"progress": 100, "status": "processing"}"#).unwrap();
        assert_eq!(report.verdict(), Verdict::Completed);
    }

    #[test]
    fn error_field_fails_the_job() {
        let report =
            StatusReport::from_json(r#"{"progress": 20, "status": "error", "error": "boom"}"#)
                .unwrap();
        assert_eq!(report.verdict(), Verdict::Failed);
        assert_eq!(report.failure_message(), "boom");
    }

    #[test]
    fn blank_error_field_does_not_fail_the_job() {
        let report = StatusReport::from_json(
            r#"{"progress": 30, "status": "processing", "error": ""}"#,
        )
        .unwrap();
        assert_eq!(report.verdict(), Verdict::Continue);

        let report = StatusReport::from_json(r#"{"progress": 30, "error": "  "}"#).unwrap();
        assert_eq!(report.verdict(), Verdict::Continue);
    }

    #[test]
    fn non_json_body_is_rejected() {
        assert!(StatusReport::from_json("<html>502 Bad Gateway</html>").is_err());
        assert!(StatusReport::from_json("\"done\"").is_err());
        assert!(StatusReport::from_json("").is_err());
    }
}
