//! Data models for backend entities.
//!
//! This module contains the data structures the evaluator and the CLI
//! exchange with the backend:
//!
//! - `CategoryRef`: the shared `{id, name, slug}` category shape
//! - `QualificationCategory`, `Qualification`: qualification hierarchy and held qualifications
//! - `Event`, `EventClassification`: events and the slugs that drive the organizer rules
//! - `User`: a candidate organizer with birthday and qualifications

pub mod category;
pub mod event;
pub mod qualification;
pub mod user;

pub use category::{CategoryRef, Paginated, QualificationCategory};
pub use event::{Event, EventClassification, EventGroup, IntendedFor};
pub use qualification::Qualification;
pub use user::User;

use chrono::NaiveDate;

// Helper to deserialize an optional `YYYY-MM-DD` date where the backend may
// send null, a missing field or an empty string for "unknown"
pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    struct OptionalDateVisitor;

    impl<'de> de::Visitor<'de> for OptionalDateVisitor {
        type Value = Option<NaiveDate>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a YYYY-MM-DD date string, an empty string or null")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let v = v.trim();
            if v.is_empty() {
                return Ok(None);
            }
            // Datetimes are accepted too, only the date part matters
            let date_part = v.get(..10).unwrap_or(v);
            NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| E::custom(format!("invalid date: {}", v)))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(OptionalDateVisitor)
}
