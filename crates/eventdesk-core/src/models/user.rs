use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{deserialize_optional_date, Qualification};

/// A backend user, as far as organizer eligibility is concerned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub qualifications: Vec<Qualification>,
}

impl User {
    /// Whole years elapsed since `birthday` at `today`
    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        self.birthday.map(|birthday| age_between(birthday, today))
    }

    pub fn valid_qualifications(&self, today: NaiveDate) -> impl Iterator<Item = &Qualification> {
        self.qualifications.iter().filter(move |q| q.is_valid_on(today))
    }

    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("-")
    }
}

/// Standard age calculation: year difference, minus one when this year's
/// birthday has not been reached yet.
pub fn age_between(birthday: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birthday.year();
    if (today.month(), today.day()) < (birthday.month(), birthday.day()) {
        age -= 1;
    }
    age
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_age_between() {
        assert_eq!(age_between(date("2006-05-12"), date("2024-05-12")), 18);
        assert_eq!(age_between(date("2006-05-12"), date("2024-05-11")), 17);
        assert_eq!(age_between(date("2006-05-12"), date("2024-04-30")), 17);
        assert_eq!(age_between(date("2006-05-12"), date("2024-06-01")), 18);
        // Leap-day birthdays reach the next age on March 1st
        assert_eq!(age_between(date("2004-02-29"), date("2022-02-28")), 17);
        assert_eq!(age_between(date("2004-02-29"), date("2022-03-01")), 18);
    }

    #[test]
    fn test_empty_birthday_is_unknown() {
        let user: User = serde_json::from_str(r#"{"id": 5, "birthday": ""}"#).unwrap();
        assert!(user.birthday.is_none());
        assert_eq!(user.age_on(date("2024-01-01")), None);
        assert_eq!(user.name(), "-");
    }
}
