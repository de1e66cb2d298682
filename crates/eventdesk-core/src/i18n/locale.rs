use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Locale of strings produced by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Cs,
    En,
}

const EN_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl Locale {
    /// Unknown values fall back to the default locale
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" | "english" => Locale::En,
            _ => Locale::Cs,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::Cs => "cs",
            Locale::En => "en",
        }
    }

    pub fn yes(&self) -> &'static str {
        match self {
            Locale::Cs => "Ano",
            Locale::En => "Yes",
        }
    }

    pub fn no(&self) -> &'static str {
        match self {
            Locale::Cs => "Ne",
            Locale::En => "No",
        }
    }

    pub fn yes_no(&self, value: bool) -> &'static str {
        if value {
            self.yes()
        } else {
            self.no()
        }
    }

    /// Join alternatives: "A or B or C"
    pub fn join_or(&self, items: &[String]) -> String {
        let separator = match self {
            Locale::Cs => " nebo ",
            Locale::En => " or ",
        };
        items.join(separator)
    }

    /// Cs: "12. 5. 2020", En: "May 12, 2020"
    pub fn format_date(&self, date: NaiveDate) -> String {
        match self {
            Locale::Cs => format!("{}. {}. {}", date.day(), date.month(), date.year()),
            Locale::En => format!(
                "{} {}, {}",
                EN_MONTHS[date.month0() as usize],
                date.day(),
                date.year()
            ),
        }
    }

    pub fn eligible_text(&self) -> &'static str {
        match self {
            Locale::Cs => "Může být hlavním organizátorem",
            Locale::En => "May be the main organizer",
        }
    }

    pub fn age_unknown_reason(&self) -> String {
        match self {
            Locale::Cs => "Věk hlavního organizátora není znám".to_string(),
            Locale::En => "Main organizer's age is unknown".to_string(),
        }
    }

    pub fn underage_reason(&self) -> String {
        match self {
            Locale::Cs => "Hlavní organizátor musí mít alespoň 18 let".to_string(),
            Locale::En => "Main organizer must be at least 18 years old".to_string(),
        }
    }

    pub fn missing_qualification_reason(&self, required: &[String]) -> String {
        let alternatives = self.join_or(required);
        match self {
            Locale::Cs => format!("Hlavní organizátor musí mít kvalifikaci {}", alternatives),
            Locale::En => format!("Main organizer must hold the qualification {}", alternatives),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2020, 5, 12).unwrap();
        assert_eq!(Locale::Cs.format_date(date), "12. 5. 2020");
        assert_eq!(Locale::En.format_date(date), "May 12, 2020");
    }

    #[test]
    fn test_join_or() {
        let items = vec!["Instruktor".to_string(), "Organizátor".to_string()];
        assert_eq!(Locale::Cs.join_or(&items), "Instruktor nebo Organizátor");
        assert_eq!(Locale::En.join_or(&items), "Instruktor or Organizátor");
        assert_eq!(Locale::En.join_or(&items[..1]), "Instruktor");
    }

    #[test]
    fn test_eligible_text_is_a_sentence_in_both_locales() {
        assert_eq!(Locale::Cs.eligible_text(), "Může být hlavním organizátorem");
        assert_eq!(Locale::En.eligible_text(), "May be the main organizer");
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Locale::from_code("EN"), Locale::En);
        assert_eq!(Locale::from_code("cs"), Locale::Cs);
        assert_eq!(Locale::from_code("de"), Locale::Cs);
    }
}
