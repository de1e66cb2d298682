use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::QualificationCategory;

/// A qualification held by a user, valid within an inclusive date window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qualification {
    pub category: QualificationCategory,
    pub valid_since: NaiveDate,
    pub valid_till: NaiveDate,
}

impl Qualification {
    /// Both ends of the window are inclusive
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.valid_since <= date && date <= self.valid_till
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qualification(since: &str, till: &str) -> Qualification {
        Qualification {
            category: QualificationCategory {
                id: 1,
                slug: "kids_leader".to_string(),
                name: "Vedoucí dětského oddílu".to_string(),
                parents: vec![],
            },
            valid_since: since.parse().unwrap(),
            valid_till: till.parse().unwrap(),
        }
    }

    #[test]
    fn test_validity_window_is_inclusive() {
        let q = qualification("2024-01-01", "2024-12-31");
        assert!(q.is_valid_on("2024-01-01".parse().unwrap()));
        assert!(q.is_valid_on("2024-12-31".parse().unwrap()));
        assert!(!q.is_valid_on("2023-12-31".parse().unwrap()));
        assert!(!q.is_valid_on("2025-01-01".parse().unwrap()));
    }

    #[test]
    fn test_deserialize_from_backend_shape() {
        let q: Qualification = serde_json::from_str(
            r#"{
                "category": {"id": 4, "slug": "organizer", "name": "Organizátor", "parents": [2]},
                "valid_since": "2023-05-01",
                "valid_till": "2028-05-01"
            }"#,
        )
        .unwrap();
        assert_eq!(q.category.parents, vec![2]);
        assert_eq!(q.valid_till, NaiveDate::from_ymd_opt(2028, 5, 1).unwrap());
    }
}
