use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle stage of a tracked application. Serialized as the
/// human-readable strings the tracker file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Applied,
    Interview,
    #[serde(rename = "Offer Accepted")]
    OfferAccepted,
    #[serde(rename = "Offer Rejected")]
    OfferRejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Interview,
        ApplicationStatus::OfferAccepted,
        ApplicationStatus::OfferRejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::OfferAccepted => "Offer Accepted",
            ApplicationStatus::OfferRejected => "Offer Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Unknown application status '{s}' (expected one of: Applied, Interview, \
                     Offer Accepted, Offer Rejected)"
                )
            })
    }
}

/// One row of the tracker: a single analyzed application.
///
/// Serde field names double as the CSV column headers; they must stay in
/// sync with `tracker::store::COLUMNS`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    #[serde(rename = "Role")]
    pub role: String,
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Date Applied")]
    pub date_applied: NaiveDate,
    #[serde(rename = "Expected Salary")]
    pub expected_salary: u64,
    #[serde(rename = "Status")]
    pub status: ApplicationStatus,
    #[serde(rename = "Fit Summary")]
    pub fit_summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_as_display_strings() {
        for status in ApplicationStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }

    #[test]
    fn status_round_trips_through_serde() {
        let status: ApplicationStatus = serde_json::from_str("\"Offer Accepted\"").unwrap();
        assert_eq!(status, ApplicationStatus::OfferAccepted);
    }

    #[test]
    fn status_parses_from_form_values() {
        assert_eq!(
            "Interview".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::Interview
        );
        assert_eq!(
            "Offer Rejected".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::OfferRejected
        );
    }

    #[test]
    fn status_rejects_values_outside_the_enum() {
        let err = "Ghosted".parse::<ApplicationStatus>().unwrap_err();
        assert!(err.contains("Ghosted"));
        assert!(err.contains("Offer Accepted"));
    }

    #[test]
    fn record_serializes_with_declared_column_names() {
        let record = ApplicationRecord {
            role: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            date_applied: NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
            expected_salary: 120_000,
            status: ApplicationStatus::Applied,
            fit_summary: "Solid match.".to_string(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["Role"], "Backend Engineer");
        assert_eq!(value["Date Applied"], "2026-08-07");
        assert_eq!(value["Expected Salary"], 120_000);
        assert_eq!(value["Status"], "Applied");
    }
}
