//! Records of the program export and the summaries handed to the model.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

use crate::dates;
use crate::markdown::deserialize_html;

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A speaker as listed on a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expert {
    #[serde(default, deserialize_with = "null_as_default")]
    pub surname: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub forename: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bio: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
}

impl Expert {
    pub fn summary(&self) -> ExpertSummary {
        ExpertSummary {
            surname: self.surname.clone(),
            forename: self.forename.clone(),
            company: self.company.clone(),
        }
    }
}

/// What `getExperts` returns per speaker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpertSummary {
    pub surname: String,
    pub forename: String,
    pub company: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryTrack {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
}

/// Kind of session. `kind` is one of `SESSION`, `WORKSHOP`, `KEYNOTE`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionType {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
}

/// One entry of the conference program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceSession {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(with = "dates::localized", default)]
    pub localized_start_date: Option<DateTime<FixedOffset>>,
    #[serde(with = "dates::localized", default)]
    pub localized_end_date: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "deserialize_html")]
    pub long_abstract: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub workshop_short_label: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub room_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug_names: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub workshop_requirements: String,
    #[serde(default, deserialize_with = "deserialize_html")]
    pub details: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub session_type: SessionType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub primary_track: PrimaryTrack,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tracks: Vec<Track>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experts: Vec<Expert>,
}

impl ConferenceSession {
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            name: self.name.clone(),
            localized_start_date: self.localized_start_date,
            localized_end_date: self.localized_end_date,
        }
    }

    /// Whether a speaker with exactly this forename and surname is listed.
    pub fn has_expert(&self, forename: &str, surname: &str) -> bool {
        self.experts
            .iter()
            .any(|e| e.forename == forename && e.surname == surname)
    }
}

/// What `getSessionsByExpert` returns per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub name: String,
    #[serde(with = "dates::localized", default)]
    pub localized_start_date: Option<DateTime<FixedOffset>>,
    #[serde(with = "dates::localized", default)]
    pub localized_end_date: Option<DateTime<FixedOffset>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{
        "name": "Rust in Production",
        "localizedStartDate": "15/10/2024 08:00:00",
        "localizedEndDate": "15/10/2024 09:00:00",
        "longAbstract": "<p>Why <b>Rust</b>?</p>",
        "workshopShortLabel": null,
        "roomName": "Hall A",
        "language": "EN",
        "slugNames": ["rust-in-production"],
        "workshopRequirements": null,
        "details": null,
        "sessionType": { "type": "SESSION", "name": "Session", "slug": "session" },
        "primaryTrack": { "name": "Backend", "slug": "backend" },
        "tracks": [{ "name": "Backend", "slug": "backend" }],
        "experts": [
            { "surname": "Lovelace", "forename": "Ada", "company": "Analytical Engines",
              "bio": "First programmer", "slug": "ada-lovelace" }
        ]
    }"#;

    #[test]
    fn deserializes_export_record() {
        let session: ConferenceSession = serde_json::from_str(RECORD).unwrap();
        assert_eq!(session.name, "Rust in Production");
        assert_eq!(session.long_abstract, "Why **Rust**?");
        assert_eq!(session.details, "");
        assert_eq!(session.workshop_short_label, "");
        assert_eq!(session.session_type.kind, "SESSION");
        assert_eq!(session.experts.len(), 1);
        assert!(session.has_expert("Ada", "Lovelace"));
        assert!(!session.has_expert("ada", "Lovelace"));
    }

    #[test]
    fn null_experts_become_empty() {
        let session: ConferenceSession =
            serde_json::from_str(r#"{"name": "Break", "experts": null}"#).unwrap();
        assert!(session.experts.is_empty());
        assert!(session.localized_start_date.is_none());
    }

    #[test]
    fn summaries_serialize_camel_case() {
        let session: ConferenceSession = serde_json::from_str(RECORD).unwrap();
        let json = serde_json::to_value(session.summary()).unwrap();
        assert_eq!(json["name"], "Rust in Production");
        assert_eq!(json["localizedStartDate"], "2024-10-15T09:00:00+01:00");
        assert_eq!(json["localizedEndDate"], "2024-10-15T10:00:00+01:00");

        let expert = serde_json::to_value(session.experts[0].summary()).unwrap();
        assert_eq!(
            expert,
            serde_json::json!({
                "surname": "Lovelace",
                "forename": "Ada",
                "company": "Analytical Engines"
            })
        );
    }
}
