use chrono::NaiveDate;

/// Parse a `YYYY-M-D` calendar date (4-digit year, 1-2 digit month and day).
/// The whole string must match and name a real date.
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let mut parts = s.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    if year.len() != 4 || !(1..=2).contains(&month.len()) || !(1..=2).contains(&day.len()) {
        return None;
    }
    if !all_digits(year) || !all_digits(month) || !all_digits(day) {
        return None;
    }

    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Whether a string contains markup: a `<` directly followed by a letter,
/// `/` or `!`, closed by a later `>`.
pub fn looks_like_html(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'<'
            && bytes
                .get(i + 1)
                .map(|&next| next.is_ascii_alphabetic() || next == b'/' || next == b'!')
                .unwrap_or(false)
            && bytes[i + 1..].contains(&b'>')
    })
}

/// Sanitize user-supplied HTML. Scripts, event handlers, `javascript:` URLs
/// and other active content are removed; basic formatting is kept.
pub fn sanitize_html(html: &str) -> String {
    ammonia::Builder::default()
        .link_rel(Some("noopener noreferrer"))
        .clean(html)
        .to_string()
}

/// Strip tags from HTML for plain-text display, collapsing whitespace
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Escape text for inclusion in HTML
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Decimal form of a JSON number; integral floats drop the `.0`
pub fn format_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_calendar_date() {
        assert_eq!(parse_calendar_date("2020-05-12"), NaiveDate::from_ymd_opt(2020, 5, 12));
        assert_eq!(parse_calendar_date("2020-5-2"), NaiveDate::from_ymd_opt(2020, 5, 2));
        assert_eq!(parse_calendar_date("2020-13-01"), None);
        assert_eq!(parse_calendar_date("2020-02-30"), None);
        assert_eq!(parse_calendar_date("20-05-12"), None);
        assert_eq!(parse_calendar_date("2020-05-12T10:00"), None);
        assert_eq!(parse_calendar_date("2020-05-12-1"), None);
        assert_eq!(parse_calendar_date("2020-+5-12"), None);
        assert_eq!(parse_calendar_date("Brno"), None);
    }

    #[test]
    fn test_looks_like_html() {
        assert!(looks_like_html("<p>Ahoj</p>"));
        assert!(looks_like_html("text <br/> more"));
        assert!(looks_like_html("</div>"));
        assert!(!looks_like_html("3 < 5 and 7 > 2"));
        assert!(!looks_like_html("a <b"));
        assert!(!looks_like_html("plain text"));
    }

    #[test]
    fn test_sanitize_html_strips_active_content() {
        let dirty = concat!(
            r#"<p onclick="steal()">Hi<script>alert(1)</script></p>"#,
            r#"<a href="javascript:alert(1)">x</a>"#,
        );
        let clean = sanitize_html(dirty);
        assert!(clean.contains("<p>Hi</p>"));
        assert!(!clean.contains("script"));
        assert!(!clean.contains("onclick"));
        assert!(!clean.contains("javascript:"));
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Ahoj <b>světe</b></p>"), "Ahoj světe");
        assert_eq!(strip_html("line<br>next &amp; last"), "line next & last");
        assert_eq!(strip_html("plain"), "plain");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_format_number() {
        let n = |v: serde_json::Value| match v {
            serde_json::Value::Number(n) => n,
            other => panic!("not a number: {other}"),
        };
        assert_eq!(format_number(&n(json!(42))), "42");
        assert_eq!(format_number(&n(json!(-7))), "-7");
        assert_eq!(format_number(&n(json!(2.0))), "2");
        assert_eq!(format_number(&n(json!(2.5))), "2.5");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Žluťoučký kůň", 8), "Žluťo...");
    }
}
