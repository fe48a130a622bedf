//! Configuration types.

/// Check-in service configuration.
#[derive(Debug, Clone)]
pub struct CheckInConfig {
    /// Port the REST server listens on.
    pub port: u16,
    /// Base URL of the backend jobsite API (QR verification, diary entries).
    pub api_base_url: String,
    /// Route the flow falls back to when a precondition is missing.
    pub home_route: String,
    /// Site supervisor name shown on the instructions page.
    pub supervisor_name: String,
    /// Site supervisor contact shown on the instructions page.
    pub supervisor_contact: String,
}

impl Default for CheckInConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            api_base_url: "http://localhost:8000".to_string(),
            home_route: "/home".to_string(),
            supervisor_name: "Site Supervisor".to_string(),
            supervisor_contact: String::new(),
        }
    }
}

impl CheckInConfig {
    /// Build a config from environment variables, falling back to defaults.
    ///
    /// Recognized variables: `SITE_CHECKIN_PORT`, `SITE_CHECKIN_API_URL`,
    /// `SITE_CHECKIN_SUPERVISOR`, `SITE_CHECKIN_SUPERVISOR_CONTACT`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: std::env::var("SITE_CHECKIN_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            api_base_url: std::env::var("SITE_CHECKIN_API_URL").unwrap_or(defaults.api_base_url),
            home_route: defaults.home_route,
            supervisor_name: std::env::var("SITE_CHECKIN_SUPERVISOR")
                .unwrap_or(defaults.supervisor_name),
            supervisor_contact: std::env::var("SITE_CHECKIN_SUPERVISOR_CONTACT")
                .unwrap_or(defaults.supervisor_contact),
        }
    }
}
