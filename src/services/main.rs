use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Public endpoints advertised by the API banner.
const ENDPOINTS: [&str; 5] = [
    "/api/auth",
    "/api/products",
    "/api/contact",
    "/api/checkout",
    "/api/health",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiBanner {
    pub message: String,
    pub available_endpoints: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    /// RFC 3339 time at which the check ran.
    pub timestamp: String,
    pub environment: String,
}

pub fn api_banner() -> ApiBanner {
    ApiBanner {
        message: format!("{} funcionando", env!("CARGO_PKG_NAME")),
        available_endpoints: ENDPOINTS.to_vec(),
    }
}

pub fn health(environment: &str) -> HealthStatus {
    HealthStatus {
        status: "ok",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        environment: environment.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_lists_public_endpoints() {
        let banner = serde_json::to_value(api_banner()).expect("serialize");

        let endpoints = banner["availableEndpoints"].as_array().expect("array");
        assert!(endpoints.iter().any(|value| value == "/api/products"));
    }

    #[test]
    fn health_reports_environment() {
        let status = health("development");

        assert_eq!(status.status, "ok");
        assert_eq!(status.environment, "development");
        assert!(status.timestamp.ends_with('Z'));
    }
}
