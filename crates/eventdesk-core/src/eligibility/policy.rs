use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::hierarchy::CategoryTree;
use super::requirements::required_qualifications;
use crate::i18n::Locale;
use crate::models::{EventClassification, User};

/// Minimum age of a main organizer, in whole years.
pub const MIN_ORGANIZER_AGE: i32 = 18;

/// Why a person cannot be an event's main organizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IneligibilityKind {
    AgeUnknown,
    Underage { age: i32 },
    /// Names of the accepted qualification categories
    MissingQualification { required: Vec<String> },
}

/// A domain decision, not a fault: the person may not be main organizer.
/// `reason` is localized and meant for display.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[error("{reason}")]
pub struct IneligibleOrganizer {
    pub kind: IneligibilityKind,
    pub reason: String,
}

impl IneligibleOrganizer {
    pub fn new(kind: IneligibilityKind, locale: Locale) -> Self {
        let reason = match &kind {
            IneligibilityKind::AgeUnknown => locale.age_unknown_reason(),
            IneligibilityKind::Underage { .. } => locale.underage_reason(),
            IneligibilityKind::MissingQualification { required } => {
                locale.missing_qualification_reason(required)
            }
        };
        Self { kind, reason }
    }
}

/// Decide whether `user` may be registered as main organizer of `event`.
pub fn can_be_main_organizer(
    event: &EventClassification,
    user: &User,
    categories: &CategoryTree,
    today: NaiveDate,
    locale: Locale,
) -> Result<(), IneligibleOrganizer> {
    let age = user
        .age_on(today)
        .ok_or_else(|| IneligibleOrganizer::new(IneligibilityKind::AgeUnknown, locale))?;

    if age < MIN_ORGANIZER_AGE {
        return Err(IneligibleOrganizer::new(
            IneligibilityKind::Underage { age },
            locale,
        ));
    }

    let required = required_qualifications(event);
    if required.is_empty() {
        return Ok(());
    }

    let qualified = user
        .valid_qualifications(today)
        .any(|q| categories.satisfies(&q.category, &required));

    if qualified {
        return Ok(());
    }

    info!(
        user_id = user.id,
        category = %event.category,
        required = ?required,
        "Main organizer lacks a required qualification"
    );

    let required = required
        .iter()
        .map(|slug| categories.name_for_slug(slug).to_string())
        .collect();
    Err(IneligibleOrganizer::new(
        IneligibilityKind::MissingQualification { required },
        locale,
    ))
}

/// Yes/no form of [`can_be_main_organizer`] for callers that do not show
/// the reason.
pub fn is_eligible_main_organizer(
    event: &EventClassification,
    user: &User,
    categories: &CategoryTree,
    today: NaiveDate,
) -> bool {
    can_be_main_organizer(event, user, categories, today, Locale::default()).is_ok()
}

/// [`can_be_main_organizer`] evaluated against the local calendar date
pub fn can_be_main_organizer_today(
    event: &EventClassification,
    user: &User,
    categories: &CategoryTree,
    locale: Locale,
) -> Result<(), IneligibleOrganizer> {
    let today = chrono::Local::now().date_naive();
    can_be_main_organizer(event, user, categories, today, locale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Qualification, QualificationCategory};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn category(id: i64, slug: &str, name: &str, parents: &[i64]) -> QualificationCategory {
        QualificationCategory {
            id,
            slug: slug.to_string(),
            name: name.to_string(),
            parents: parents.to_vec(),
        }
    }

    fn tree() -> CategoryTree {
        CategoryTree::new(vec![
            category(1, "weekend_organizer", "Organizátor víkendovek", &[]),
            category(2, "organizer", "Organizátor", &[1]),
            category(3, "kids_intern", "Dětský praktikant", &[]),
            category(4, "kids_leader", "Vedoucí dětského oddílu", &[3]),
            category(5, "instructor", "Instruktor", &[2]),
        ])
        .unwrap()
    }

    fn user(birthday: Option<&str>, held: &[(i64, &str, &str)]) -> User {
        let tree = tree();
        User {
            id: 7,
            display_name: Some("Jana".to_string()),
            birthday: birthday.map(date),
            qualifications: held
                .iter()
                .map(|(id, since, till)| Qualification {
                    category: tree.get(*id).unwrap().clone(),
                    valid_since: date(since),
                    valid_till: date(till),
                })
                .collect(),
        }
    }

    fn kids_camp() -> EventClassification {
        EventClassification::new("for_kids", "camp", "public__volunteering")
    }

    const TODAY: &str = "2024-06-15";

    fn decide(
        event: &EventClassification,
        candidate: &User,
        locale: Locale,
    ) -> Result<(), IneligibleOrganizer> {
        can_be_main_organizer(event, candidate, &tree(), date(TODAY), locale)
    }

    #[test]
    fn test_age_unknown() {
        let err = decide(&kids_camp(), &user(None, &[]), Locale::En).unwrap_err();
        assert_eq!(err.kind, IneligibilityKind::AgeUnknown);
        assert_eq!(err.to_string(), "Main organizer's age is unknown");
    }

    #[test]
    fn test_underage_boundary() {
        let no_requirement =
            EventClassification::new("for_all", "other", "internal__general_meeting");

        let turns_18_tomorrow = user(Some("2006-06-16"), &[]);
        let err = decide(&no_requirement, &turns_18_tomorrow, Locale::En).unwrap_err();
        assert_eq!(err.kind, IneligibilityKind::Underage { age: 17 });

        let turns_18_today = user(Some("2006-06-15"), &[]);
        assert!(decide(&no_requirement, &turns_18_today, Locale::En).is_ok());
    }

    #[test]
    fn test_valid_qualification_passes() {
        let holder = user(Some("1990-01-01"), &[(4, "2020-01-01", "2026-01-01")]);
        assert!(decide(&kids_camp(), &holder, Locale::Cs).is_ok());
    }

    #[test]
    fn test_expired_or_future_qualification_fails() {
        let expired = user(Some("1990-01-01"), &[(4, "2018-01-01", "2024-06-14")]);
        let future = user(Some("1990-01-01"), &[(4, "2024-06-16", "2030-01-01")]);

        for holder in [expired, future] {
            let err = decide(&kids_camp(), &holder, Locale::Cs).unwrap_err();
            assert_eq!(
                err.kind,
                IneligibilityKind::MissingQualification {
                    required: vec!["Vedoucí dětského oddílu".to_string()]
                }
            );
        }
    }

    #[test]
    fn test_transitive_qualification_passes() {
        // instructor -> organizer -> weekend_organizer
        let weekend = EventClassification::new("for_all", "weekend_event", "public__volunteering");
        let holder = user(Some("1990-01-01"), &[(5, "2020-01-01", "2030-01-01")]);
        assert!(decide(&weekend, &holder, Locale::Cs).is_ok());
    }

    #[test]
    fn test_reason_lists_alternatives() {
        let family_camp =
            EventClassification::new("for_parents_with_kids", "camp", "public__volunteering");
        let holder = user(Some("1990-01-01"), &[(3, "2020-01-01", "2030-01-01")]);
        let err = decide(&family_camp, &holder, Locale::En).unwrap_err();
        assert_eq!(
            err.reason,
            "Main organizer must hold the qualification Vedoucí dětského oddílu or Organizátor"
        );
    }

    #[test]
    fn test_strict_and_lenient_agree() {
        let events = [
            kids_camp(),
            EventClassification::new("for_all", "camp", "public__educational__ohb"),
            EventClassification::new("for_kids", "other", "internal__section_meeting"),
        ];
        let users = [
            user(None, &[]),
            user(Some("2010-01-01"), &[]),
            user(Some("1990-01-01"), &[(4, "2020-01-01", "2030-01-01")]),
            user(Some("1990-01-01"), &[(5, "2020-01-01", "2030-01-01")]),
        ];
        for event in &events {
            for candidate in &users {
                assert_eq!(
                    is_eligible_main_organizer(event, candidate, &tree(), date(TODAY)),
                    decide(event, candidate, Locale::En).is_ok()
                );
            }
        }
    }
}
