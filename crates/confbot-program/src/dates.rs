//! Localized timestamps as they appear in the program export.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serializer};

const EXPORT_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Offset of the conference venue (CET).
const VENUE_OFFSET_SECS: i32 = 3600;

/// Parse an export timestamp (`dd/MM/yyyy HH:mm:ss`, UTC) into venue time.
///
/// Returns `None` for anything that does not match the export format.
pub fn parse_localized(value: &str) -> Option<DateTime<FixedOffset>> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), EXPORT_FORMAT).ok()?;
    let offset = FixedOffset::east_opt(VENUE_OFFSET_SECS)?;
    Some(Utc.from_utc_datetime(&naive).with_timezone(&offset))
}

/// Serde adapter for `Option<DateTime<FixedOffset>>` fields.
///
/// Reads the export format, writes RFC 3339. Unparsable or missing input
/// becomes `None`, which is written as `null`.
pub mod localized {
    use super::*;

    pub fn serialize<S>(value: &Option<DateTime<FixedOffset>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_localized))
    }
}
