use chrono::NaiveDate;
use serde_json::{Map, Number, Value};

use crate::utils::{looks_like_html, parse_calendar_date};

/// Keys an image bundle carries, one per size variant.
const IMAGE_VARIANTS: [&str; 4] = ["small", "medium", "large", "original"];

/// Closed set of shapes the renderer knows how to display.
///
/// Every value is classified exactly once, before dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind<'a> {
    Empty,
    Boolean(bool),
    Number(&'a Number),
    DateString(NaiveDate),
    HtmlString(&'a str),
    PlainString(&'a str),
    List(&'a [Value]),
    /// `{slug, name, ...}`
    CategoryRef { name: &'a Value },
    /// `{id, name, ...}`, below the top level only
    EntityRef { name: &'a Value },
    /// `{id, display_name, ...}`, below the top level only
    PersonRef { id: &'a Value, display_name: &'a Value },
    /// `{small, medium, large, original}` with a string `small`
    ImageBundle { small: &'a str },
    GenericObject(&'a Map<String, Value>),
}

pub fn classify(value: &Value, depth: usize) -> ValueKind<'_> {
    match value {
        Value::Null => ValueKind::Empty,
        Value::Bool(b) => ValueKind::Boolean(*b),
        Value::Number(n) => ValueKind::Number(n),
        Value::String(s) if s.is_empty() => ValueKind::Empty,
        Value::String(s) => {
            if let Some(date) = parse_calendar_date(s) {
                ValueKind::DateString(date)
            } else if looks_like_html(s) {
                ValueKind::HtmlString(s)
            } else {
                ValueKind::PlainString(s)
            }
        }
        Value::Array(items) => ValueKind::List(items),
        Value::Object(map) => classify_object(map, depth),
    }
}

fn classify_object(map: &Map<String, Value>, depth: usize) -> ValueKind<'_> {
    if let (Some(_), Some(name)) = (map.get("slug"), map.get("name")) {
        return ValueKind::CategoryRef { name };
    }

    if depth > 0 {
        if let (Some(_), Some(name)) = (map.get("id"), map.get("name")) {
            return ValueKind::EntityRef { name };
        }
        if let (Some(id), Some(display_name)) = (map.get("id"), map.get("display_name")) {
            return ValueKind::PersonRef { id, display_name };
        }
    }

    if IMAGE_VARIANTS.iter().all(|key| map.contains_key(*key)) {
        if let Some(Value::String(small)) = map.get("small") {
            return ValueKind::ImageBundle { small };
        }
    }

    ValueKind::GenericObject(map)
}

/// Objects that render as a heading-less shortcut when nested: categories
/// (`slug` + `name`) and entities (`id` + `name`).
pub fn is_reference_shortcut(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            map.contains_key("name") && (map.contains_key("slug") || map.contains_key("id"))
        }
        _ => false,
    }
}

/// Values a generic object skips entirely: null, "" and [].
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(classify(&json!(null), 0), ValueKind::Empty);
        assert_eq!(classify(&json!(""), 3), ValueKind::Empty);
        assert_eq!(classify(&json!(true), 0), ValueKind::Boolean(true));
        assert!(matches!(classify(&json!(12), 0), ValueKind::Number(_)));
        assert_eq!(
            classify(&json!("2020-05-12"), 0),
            ValueKind::DateString(NaiveDate::from_ymd_opt(2020, 5, 12).unwrap())
        );
        assert_eq!(classify(&json!("<p>x</p>"), 0), ValueKind::HtmlString("<p>x</p>"));
        assert_eq!(classify(&json!("Brno"), 0), ValueKind::PlainString("Brno"));
    }

    #[test]
    fn test_category_at_any_depth() {
        let value = json!({"id": 1, "slug": "camp", "name": "Tábor"});
        for depth in [0, 1, 4] {
            assert_eq!(classify(&value, depth), ValueKind::CategoryRef { name: &json!("Tábor") });
        }
    }

    #[test]
    fn test_entity_and_person_only_below_top_level() {
        let entity = json!({"id": 1, "name": "A"});
        assert!(matches!(classify(&entity, 0), ValueKind::GenericObject(_)));
        assert_eq!(classify(&entity, 1), ValueKind::EntityRef { name: &json!("A") });

        let person = json!({"id": 9, "display_name": "Jana"});
        assert!(matches!(classify(&person, 0), ValueKind::GenericObject(_)));
        assert_eq!(
            classify(&person, 2),
            ValueKind::PersonRef { id: &json!(9), display_name: &json!("Jana") }
        );
    }

    #[test]
    fn test_image_bundle() {
        let image = json!({
            "small": "s.jpg",
            "medium": "m.jpg",
            "large": "l.jpg",
            "original": "o.jpg"
        });
        assert_eq!(classify(&image, 0), ValueKind::ImageBundle { small: "s.jpg" });

        let not_string = json!({"small": 1, "medium": "m", "large": "l", "original": "o"});
        assert!(matches!(classify(&not_string, 0), ValueKind::GenericObject(_)));

        let partial = json!({"small": "s.jpg", "medium": "m.jpg"});
        assert!(matches!(classify(&partial, 0), ValueKind::GenericObject(_)));
    }

    #[test]
    fn test_blank_and_shortcut() {
        assert!(is_blank(&json!(null)));
        assert!(is_blank(&json!("")));
        assert!(is_blank(&json!([])));
        assert!(!is_blank(&json!({})));
        assert!(!is_blank(&json!(0)));
        assert!(!is_blank(&json!(false)));

        assert!(is_reference_shortcut(&json!({"slug": "x", "name": "Y"})));
        assert!(is_reference_shortcut(&json!({"id": 1, "name": "Y"})));
        assert!(!is_reference_shortcut(&json!({"id": 1, "display_name": "Y"})));
        assert!(!is_reference_shortcut(&json!("name")));
    }
}
