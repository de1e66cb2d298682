use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{deserialize_optional_date, CategoryRef};

/// Who an event is intended for, parsed from the backend slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IntendedFor {
    ForKids,
    ForParentsWithKids,
    ForAll,
    ForYoungAndAdult,
    ForFirstTimeParticipant,
    #[default]
    Unspecified,
}

impl IntendedFor {
    /// Unknown and empty slugs map to `Unspecified`
    pub fn from_slug(slug: &str) -> Self {
        match slug {
            "for_kids" => IntendedFor::ForKids,
            "for_parents_with_kids" => IntendedFor::ForParentsWithKids,
            "for_all" => IntendedFor::ForAll,
            "for_young_and_adult" => IntendedFor::ForYoungAndAdult,
            "for_first_time_participant" => IntendedFor::ForFirstTimeParticipant,
            _ => IntendedFor::Unspecified,
        }
    }

    pub fn as_slug(&self) -> &'static str {
        match self {
            IntendedFor::ForKids => "for_kids",
            IntendedFor::ForParentsWithKids => "for_parents_with_kids",
            IntendedFor::ForAll => "for_all",
            IntendedFor::ForYoungAndAdult => "for_young_and_adult",
            IntendedFor::ForFirstTimeParticipant => "for_first_time_participant",
            IntendedFor::Unspecified => "",
        }
    }

    /// The three audiences that share the adult organizer rules
    pub fn is_general_audience(&self) -> bool {
        matches!(
            self,
            IntendedFor::ForAll
                | IntendedFor::ForYoungAndAdult
                | IntendedFor::ForFirstTimeParticipant
        )
    }
}

impl std::fmt::Display for IntendedFor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_slug())
    }
}

/// Event group (camp, weekend event, anything else).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventGroup {
    Camp,
    WeekendEvent,
    #[default]
    Other,
}

impl EventGroup {
    pub fn from_slug(slug: &str) -> Self {
        match slug {
            "camp" => EventGroup::Camp,
            "weekend_event" => EventGroup::WeekendEvent,
            _ => EventGroup::Other,
        }
    }

    pub fn as_slug(&self) -> &'static str {
        match self {
            EventGroup::Camp => "camp",
            EventGroup::WeekendEvent => "weekend_event",
            EventGroup::Other => "other",
        }
    }
}

impl std::fmt::Display for EventGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_slug())
    }
}

/// The three slugs that decide which qualification a main organizer needs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventClassification {
    #[serde(default)]
    pub intended_for: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub category: String,
}

impl EventClassification {
    pub fn new(
        intended_for: impl Into<String>,
        group: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            intended_for: intended_for.into(),
            group: group.into(),
            category: category.into(),
        }
    }

    pub fn intended_for(&self) -> IntendedFor {
        IntendedFor::from_slug(&self.intended_for)
    }

    pub fn group(&self) -> EventGroup {
        EventGroup::from_slug(&self.group)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub group: Option<CategoryRef>,
    #[serde(default)]
    pub intended_for: Option<CategoryRef>,
}

impl Event {
    /// Missing categories become empty slugs
    pub fn classification(&self) -> EventClassification {
        fn slug(category: &Option<CategoryRef>) -> String {
            category.as_ref().map(|c| c.slug.clone()).unwrap_or_default()
        }

        EventClassification {
            intended_for: slug(&self.intended_for),
            group: slug(&self.group),
            category: slug(&self.category),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_parsing() {
        assert_eq!(IntendedFor::from_slug("for_kids"), IntendedFor::ForKids);
        assert_eq!(IntendedFor::from_slug(""), IntendedFor::Unspecified);
        assert_eq!(IntendedFor::from_slug("for_aliens"), IntendedFor::Unspecified);
        assert_eq!(EventGroup::from_slug("weekend_event"), EventGroup::WeekendEvent);
        assert_eq!(EventGroup::from_slug("other"), EventGroup::Other);
        assert!(IntendedFor::ForFirstTimeParticipant.is_general_audience());
        assert!(!IntendedFor::ForKids.is_general_audience());
    }

    #[test]
    fn test_classification_from_backend_event() {
        let event: Event = serde_json::from_str(
            r#"{
                "id": 12,
                "name": "Letní tábor",
                "start": "2024-07-01",
                "end": "2024-07-14",
                "category": {"id": 1, "name": "Dobrovolnická", "slug": "public__volunteering"},
                "group": {"id": 2, "name": "Tábor", "slug": "camp"},
                "intended_for": {"id": 3, "name": "Pro děti", "slug": "for_kids"}
            }"#,
        )
        .unwrap();

        let classification = event.classification();
        assert_eq!(classification.category, "public__volunteering");
        assert_eq!(classification.group(), EventGroup::Camp);
        assert_eq!(classification.intended_for(), IntendedFor::ForKids);
        assert_eq!(event.start, NaiveDate::from_ymd_opt(2024, 7, 1));
    }

    #[test]
    fn test_missing_categories_become_empty_slugs() {
        let event: Event = serde_json::from_str(r#"{"name": "Schůzka", "start": ""}"#).unwrap();
        assert_eq!(event.classification(), EventClassification::default());
        assert_eq!(event.start, None);
    }
}
