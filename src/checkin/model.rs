//! Typed check-in session model and its storage adapter.
//!
//! The flow's working memory is the `CheckInSession` struct, not raw
//! storage. Storage holds flat string key-value pairs (the browser
//! sessionStorage analog); the adapter here is the single place strings are
//! parsed into typed fields and back. A malformed stored value never aborts
//! anything — the field is left unset and a warning is logged.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether the person checking in is a visitor or a contractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInType {
    Visitor,
    Contractor,
}

impl CheckInType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visitor => "visitor",
            Self::Contractor => "contractor",
        }
    }

    /// Display label for the confirmation summary.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Visitor => "Visitor",
            Self::Contractor => "Contractor",
        }
    }

    fn parse_flag(value: &str) -> Option<Self> {
        match value {
            "visitor" => Some(Self::Visitor),
            "contractor" => Some(Self::Contractor),
            _ => None,
        }
    }
}

impl std::fmt::Display for CheckInType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Storage keys used by the check-in flow.
///
/// Every key the flow ever writes is listed in `ALL`; completion clears the
/// whole set in one batch.
pub mod flow_keys {
    pub const QR_TOKEN: &str = "qr_token";
    pub const JOBSITE_ID: &str = "jobsite_id";
    pub const JOBSITE_NAME: &str = "jobsite_name";
    pub const JOBSITE_ADDRESS: &str = "jobsite_address";
    pub const CHECK_IN_TYPE: &str = "check_in_type";
    pub const INDUCTED: &str = "inducted";
    pub const NAME: &str = "check_in_name";
    pub const CONTACT: &str = "check_in_contact";
    pub const COMPANY: &str = "check_in_company";
    pub const SUCCESS: &str = "check_in_success";
    pub const MESSAGE: &str = "check_in_message";
    pub const RECORDED_JOBSITE_NAME: &str = "check_in_jobsite_name";
    pub const TIME: &str = "check_in_time";
    pub const DIARY_ENTRY_ID: &str = "check_in_diary_entry_id";

    pub const ALL: &[&str] = &[
        QR_TOKEN,
        JOBSITE_ID,
        JOBSITE_NAME,
        JOBSITE_ADDRESS,
        CHECK_IN_TYPE,
        INDUCTED,
        NAME,
        CONTACT,
        COMPANY,
        SUCCESS,
        MESSAGE,
        RECORDED_JOBSITE_NAME,
        TIME,
        DIARY_ENTRY_ID,
    ];
}

/// Typed state for one check-in session.
///
/// Each field is written by exactly one step: the QR entry seeds the jobsite
/// fields, the type step sets `check_in_type`, the induction step sets
/// `inducted`, and the form step sets the person fields plus the backend
/// record fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckInSession {
    pub qr_token: Option<String>,
    pub jobsite_id: Option<i64>,
    pub jobsite_name: Option<String>,
    pub jobsite_address: Option<String>,
    pub check_in_type: Option<CheckInType>,
    pub inducted: Option<bool>,
    pub name: Option<String>,
    pub contact: Option<String>,
    pub company: Option<String>,
    pub success: Option<bool>,
    pub message: Option<String>,
    pub recorded_jobsite_name: Option<String>,
    pub check_in_time: Option<DateTime<Utc>>,
    pub diary_entry_id: Option<i64>,
}

impl CheckInSession {
    /// Deserialize a session from flat storage values.
    ///
    /// Unparseable numbers, booleans, and timestamps degrade to `None` —
    /// the guard decides whether the remaining state is enough to proceed.
    pub fn from_map(values: &HashMap<String, String>) -> Self {
        Self {
            qr_token: values.get(flow_keys::QR_TOKEN).cloned(),
            jobsite_id: parse_or_warn(values, flow_keys::JOBSITE_ID, |v| v.parse().ok()),
            jobsite_name: values.get(flow_keys::JOBSITE_NAME).cloned(),
            jobsite_address: values.get(flow_keys::JOBSITE_ADDRESS).cloned(),
            check_in_type: parse_or_warn(values, flow_keys::CHECK_IN_TYPE, |v| {
                CheckInType::parse_flag(v)
            }),
            inducted: parse_or_warn(values, flow_keys::INDUCTED, |v| v.parse().ok()),
            name: values.get(flow_keys::NAME).cloned(),
            contact: values.get(flow_keys::CONTACT).cloned(),
            company: values.get(flow_keys::COMPANY).cloned(),
            success: parse_or_warn(values, flow_keys::SUCCESS, |v| v.parse().ok()),
            message: values.get(flow_keys::MESSAGE).cloned(),
            recorded_jobsite_name: values.get(flow_keys::RECORDED_JOBSITE_NAME).cloned(),
            check_in_time: parse_or_warn(values, flow_keys::TIME, |v| {
                DateTime::parse_from_rfc3339(v)
                    .ok()
                    .map(|t| t.with_timezone(&Utc))
            }),
            diary_entry_id: parse_or_warn(values, flow_keys::DIARY_ENTRY_ID, |v| v.parse().ok()),
        }
    }

    /// Serialize the session back to flat storage values. Unset fields are
    /// simply absent from the map.
    pub fn to_map(&self) -> HashMap<String, String> {
        let mut values = HashMap::new();
        let mut put = |key: &str, value: Option<String>| {
            if let Some(v) = value {
                values.insert(key.to_string(), v);
            }
        };
        put(flow_keys::QR_TOKEN, self.qr_token.clone());
        put(flow_keys::JOBSITE_ID, self.jobsite_id.map(|v| v.to_string()));
        put(flow_keys::JOBSITE_NAME, self.jobsite_name.clone());
        put(flow_keys::JOBSITE_ADDRESS, self.jobsite_address.clone());
        put(
            flow_keys::CHECK_IN_TYPE,
            self.check_in_type.map(|v| v.as_str().to_string()),
        );
        put(flow_keys::INDUCTED, self.inducted.map(|v| v.to_string()));
        put(flow_keys::NAME, self.name.clone());
        put(flow_keys::CONTACT, self.contact.clone());
        put(flow_keys::COMPANY, self.company.clone());
        put(flow_keys::SUCCESS, self.success.map(|v| v.to_string()));
        put(flow_keys::MESSAGE, self.message.clone());
        put(
            flow_keys::RECORDED_JOBSITE_NAME,
            self.recorded_jobsite_name.clone(),
        );
        put(
            flow_keys::TIME,
            self.check_in_time.map(|t| t.to_rfc3339()),
        );
        put(
            flow_keys::DIARY_ENTRY_ID,
            self.diary_entry_id.map(|v| v.to_string()),
        );
        values
    }

    /// Whether a flow key has a value in this session. Drives the guard's
    /// declarative required-key table.
    pub fn has(&self, key: &str) -> bool {
        match key {
            flow_keys::QR_TOKEN => self.qr_token.is_some(),
            flow_keys::JOBSITE_ID => self.jobsite_id.is_some(),
            flow_keys::JOBSITE_NAME => self.jobsite_name.is_some(),
            flow_keys::JOBSITE_ADDRESS => self.jobsite_address.is_some(),
            flow_keys::CHECK_IN_TYPE => self.check_in_type.is_some(),
            flow_keys::INDUCTED => self.inducted.is_some(),
            flow_keys::NAME => self.name.is_some(),
            flow_keys::CONTACT => self.contact.is_some(),
            flow_keys::COMPANY => self.company.is_some(),
            flow_keys::SUCCESS => self.success.is_some(),
            flow_keys::MESSAGE => self.message.is_some(),
            flow_keys::RECORDED_JOBSITE_NAME => self.recorded_jobsite_name.is_some(),
            flow_keys::TIME => self.check_in_time.is_some(),
            flow_keys::DIARY_ENTRY_ID => self.diary_entry_id.is_some(),
            _ => false,
        }
    }
}

fn parse_or_warn<T>(
    values: &HashMap<String, String>,
    key: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = values.get(key)?;
    let parsed = parse(raw);
    if parsed.is_none() {
        tracing::warn!(key, value = %raw, "Ignoring malformed stored value");
    }
    parsed
}

// ── Instructions view ───────────────────────────────────────────────

/// Visual tone of the instructions status header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Neutral,
    Positive,
    Warning,
}

/// Display state for the instructions page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructionsView {
    pub status_title: &'static str,
    pub status_icon: &'static str,
    pub tone: StatusTone,
    pub instructions: &'static str,
}

/// Derive the instructions display state from the check-in type and
/// induction status. Pure function; the guard has already ensured the type
/// is set.
///
/// A contractor whose induction status was never recorded is shown the
/// not-inducted state — the safe default.
pub fn instructions_view(
    check_in_type: CheckInType,
    inducted: Option<bool>,
) -> InstructionsView {
    match (check_in_type, inducted) {
        (CheckInType::Visitor, _) => InstructionsView {
            status_title: "Visitor",
            status_icon: "info",
            tone: StatusTone::Neutral,
            instructions: "Please report to the site supervisor. Visitors must be \
                           accompanied by a supervisor at all times.",
        },
        (CheckInType::Contractor, Some(true)) => InstructionsView {
            status_title: "Contractor (Inducted)",
            status_icon: "check_circle",
            tone: StatusTone::Positive,
            instructions: "Please check in with the site supervisor and you may \
                           proceed to work.",
        },
        (CheckInType::Contractor, Some(false) | None) => InstructionsView {
            status_title: "Contractor (Not Inducted)",
            status_icon: "warning",
            tone: StatusTone::Warning,
            instructions: "Please see the site supervisor for site induction before \
                           starting work.",
        },
    }
}

// ── Confirmation summary ────────────────────────────────────────────

/// Default completion message when the backend supplied none.
const DEFAULT_COMPLETION_MESSAGE: &str = "Your check-in has been recorded in the site diary.";

/// Rendered confirmation summary.
///
/// Fields the session never captured (or captured malformed) are simply
/// absent — a bad timestamp blanks the time row, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInSummary {
    pub name: String,
    pub type_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub induction_status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobsite_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diary_entry_id: Option<i64>,
    pub message: String,
}

impl CheckInSession {
    /// Build the confirmation summary, or `None` when the minimum state
    /// (name and type) is missing — the caller redirects in that case.
    pub fn summary(&self) -> Option<CheckInSummary> {
        let name = self.name.clone()?;
        let check_in_type = self.check_in_type?;

        // Company and induction status only make sense for contractors.
        let (company, induction_status) = match check_in_type {
            CheckInType::Visitor => (None, None),
            CheckInType::Contractor => (
                self.company.clone(),
                self.inducted
                    .map(|i| if i { "Inducted" } else { "Not Inducted" }),
            ),
        };

        Some(CheckInSummary {
            name,
            type_label: check_in_type.label(),
            company,
            induction_status,
            jobsite_name: self.recorded_jobsite_name.clone(),
            time_display: self.check_in_time.map(|t| t.format("%-I:%M %p").to_string()),
            date_display: self
                .check_in_time
                .map(|t| t.format("%b %-d, %Y").to_string()),
            diary_entry_id: self.diary_entry_id,
            message: self
                .message
                .clone()
                .unwrap_or_else(|| DEFAULT_COMPLETION_MESSAGE.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_map_loads_empty_session() {
        let session = CheckInSession::from_map(&HashMap::new());
        assert_eq!(session, CheckInSession::default());
        for key in flow_keys::ALL {
            assert!(!session.has(key));
        }
    }

    #[test]
    fn map_round_trip_preserves_typed_fields() {
        let session = CheckInSession {
            qr_token: Some("tok-1".to_string()),
            jobsite_id: Some(5),
            jobsite_name: Some("Riverside Apartments".to_string()),
            check_in_type: Some(CheckInType::Contractor),
            inducted: Some(true),
            name: Some("Ann Lee".to_string()),
            contact: Some("ann@example.com".to_string()),
            company: Some("Lee Electrical".to_string()),
            success: Some(true),
            message: Some("Checked in".to_string()),
            recorded_jobsite_name: Some("Riverside Apartments".to_string()),
            check_in_time: Some("2025-03-14T09:26:00Z".parse().unwrap()),
            diary_entry_id: Some(42),
            ..Default::default()
        };

        let reloaded = CheckInSession::from_map(&session.to_map());
        assert_eq!(reloaded, session);
    }

    #[test]
    fn unset_fields_are_absent_from_map() {
        let session = CheckInSession {
            jobsite_id: Some(5),
            ..Default::default()
        };
        let map = session.to_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(flow_keys::JOBSITE_ID).unwrap(), "5");
    }

    #[test]
    fn malformed_values_degrade_to_none() {
        let session = CheckInSession::from_map(&raw(&[
            (flow_keys::JOBSITE_ID, "not-a-number"),
            (flow_keys::CHECK_IN_TYPE, "supervisor"),
            (flow_keys::INDUCTED, "maybe"),
            (flow_keys::TIME, "not-a-date"),
            (flow_keys::DIARY_ENTRY_ID, "forty-two"),
            (flow_keys::NAME, "Ann Lee"),
        ]));

        assert_eq!(session.jobsite_id, None);
        assert_eq!(session.check_in_type, None);
        assert_eq!(session.inducted, None);
        assert_eq!(session.check_in_time, None);
        assert_eq!(session.diary_entry_id, None);
        // The well-formed field survives.
        assert_eq!(session.name.as_deref(), Some("Ann Lee"));
    }

    #[test]
    fn has_reflects_field_presence() {
        let session = CheckInSession::from_map(&raw(&[
            (flow_keys::JOBSITE_ID, "5"),
            (flow_keys::CHECK_IN_TYPE, "contractor"),
        ]));
        assert!(session.has(flow_keys::JOBSITE_ID));
        assert!(session.has(flow_keys::CHECK_IN_TYPE));
        assert!(!session.has(flow_keys::INDUCTED));
        assert!(!session.has("unknown_key"));
    }

    #[test]
    fn instructions_view_for_visitor() {
        // Induction status is irrelevant for visitors.
        for inducted in [None, Some(true), Some(false)] {
            let view = instructions_view(CheckInType::Visitor, inducted);
            assert_eq!(view.status_title, "Visitor");
            assert_eq!(view.tone, StatusTone::Neutral);
            assert!(view.instructions.contains("accompanied by a supervisor"));
        }
    }

    #[test]
    fn instructions_view_for_inducted_contractor() {
        let view = instructions_view(CheckInType::Contractor, Some(true));
        assert_eq!(view.status_title, "Contractor (Inducted)");
        assert_eq!(view.tone, StatusTone::Positive);
        assert!(view.instructions.contains("proceed to work"));
    }

    #[test]
    fn instructions_view_for_non_inducted_contractor() {
        let view = instructions_view(CheckInType::Contractor, Some(false));
        assert_eq!(view.status_title, "Contractor (Not Inducted)");
        assert_eq!(view.tone, StatusTone::Warning);
        assert!(view.instructions.contains("site induction"));
    }

    #[test]
    fn contractor_without_induction_record_defaults_to_not_inducted() {
        let view = instructions_view(CheckInType::Contractor, None);
        assert_eq!(view.status_title, "Contractor (Not Inducted)");
        assert_eq!(view.tone, StatusTone::Warning);
    }

    #[test]
    fn summary_requires_name_and_type() {
        assert!(CheckInSession::default().summary().is_none());

        let name_only = CheckInSession {
            name: Some("Ann Lee".to_string()),
            ..Default::default()
        };
        assert!(name_only.summary().is_none());

        let type_only = CheckInSession {
            check_in_type: Some(CheckInType::Visitor),
            ..Default::default()
        };
        assert!(type_only.summary().is_none());
    }

    #[test]
    fn contractor_summary_formats_all_fields() {
        let session = CheckInSession {
            name: Some("Ann Lee".to_string()),
            check_in_type: Some(CheckInType::Contractor),
            company: Some("Lee Electrical".to_string()),
            inducted: Some(true),
            recorded_jobsite_name: Some("Riverside Apartments".to_string()),
            message: Some("Welcome back".to_string()),
            check_in_time: Some("2025-03-14T09:26:00Z".parse().unwrap()),
            diary_entry_id: Some(42),
            ..Default::default()
        };

        let summary = session.summary().unwrap();
        assert_eq!(summary.type_label, "Contractor");
        assert_eq!(summary.company.as_deref(), Some("Lee Electrical"));
        assert_eq!(summary.induction_status, Some("Inducted"));
        assert_eq!(summary.time_display.as_deref(), Some("9:26 AM"));
        assert_eq!(summary.date_display.as_deref(), Some("Mar 14, 2025"));
        assert_eq!(summary.diary_entry_id, Some(42));
        assert_eq!(summary.message, "Welcome back");
    }

    #[test]
    fn visitor_summary_hides_contractor_fields() {
        let session = CheckInSession {
            name: Some("Ann Lee".to_string()),
            check_in_type: Some(CheckInType::Visitor),
            // A stray company/induction value must not leak into a visitor summary.
            company: Some("Should Not Appear".to_string()),
            inducted: Some(true),
            ..Default::default()
        };

        let summary = session.summary().unwrap();
        assert_eq!(summary.type_label, "Visitor");
        assert_eq!(summary.company, None);
        assert_eq!(summary.induction_status, None);
        assert_eq!(summary.message, DEFAULT_COMPLETION_MESSAGE);
    }

    #[test]
    fn malformed_time_blanks_only_the_date_fields() {
        let session = CheckInSession::from_map(&raw(&[
            (flow_keys::NAME, "Ann Lee"),
            (flow_keys::CHECK_IN_TYPE, "visitor"),
            (flow_keys::RECORDED_JOBSITE_NAME, "Riverside Apartments"),
            (flow_keys::TIME, "not-a-date"),
        ]));

        let summary = session.summary().unwrap();
        assert_eq!(summary.time_display, None);
        assert_eq!(summary.date_display, None);
        assert_eq!(summary.name, "Ann Lee");
        assert_eq!(
            summary.jobsite_name.as_deref(),
            Some("Riverside Apartments")
        );
    }
}
