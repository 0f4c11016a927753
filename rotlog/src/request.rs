use std::time::Duration;

use rotlog_core::{Fields, LogError, LogLevel};
use uuid::Uuid;

use crate::{context::ContextLogger, logger::StructuredLogger};

/// Outcome of one HTTP request, as reported by the serving layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLog {
    pub method: String,
    pub path: String,
    pub status: u16,
    pub duration: Duration,
    pub client_ip: String,
    pub user_agent: String,
    pub body_size: u64,
    pub error: Option<String>,
}

impl RequestLog {
    /// 5xx logs as error, 4xx as warn, anything else as info.
    pub fn level(&self) -> LogLevel {
        LogLevel::for_status(self.status)
    }

    pub fn message(&self) -> String {
        format!("{} {} - {}", self.method, self.path, self.status)
    }

    pub fn fields(&self) -> Fields {
        let mut fields = Fields::new()
            .with("method", self.method.as_str())
            .with("path", self.path.as_str())
            .with("status", self.status)
            .with("duration_ms", self.duration.as_millis() as u64)
            .with("client_ip", self.client_ip.as_str())
            .with("user_agent", self.user_agent.as_str())
            .with("body_size", self.body_size);
        if let Some(error) = &self.error {
            fields.insert("error", error.as_str());
        }
        fields
    }
}

/// `req_` followed by 16 random hex characters.
pub fn generate_request_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("req_{}", &hex[..16])
}

impl StructuredLogger {
    /// Context carrying `request_id`, generated when `request_id` is absent or empty.
    pub fn request_scope(&self, request_id: Option<&str>) -> ContextLogger<'_> {
        let request_id = match request_id.filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => generate_request_id(),
        };
        self.with(Fields::new().with("request_id", request_id))
    }

    pub fn log_request(&self, request: &RequestLog) -> Result<(), LogError> {
        self.log(request.level(), &request.message(), request.fields())
    }
}

impl ContextLogger<'_> {
    pub fn log_request(&self, request: &RequestLog) -> Result<(), LogError> {
        self.log(request.level(), &request.message(), request.fields())
    }
}
