use serde::{Deserialize, Serialize};

use crate::utils::{escape_html, strip_html};

/// Structured display output of the renderer, laid out by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayNode {
    Empty,
    Text {
        text: String,
    },
    Date {
        iso: String,
        display: String,
    },
    /// Already sanitized markup
    RichText {
        html: String,
    },
    List {
        items: Vec<DisplayNode>,
    },
    PersonLink {
        id: String,
        name: String,
        href: String,
    },
    Image {
        src: String,
    },
    Group {
        entries: Vec<DisplayNode>,
    },
    Field {
        label: String,
        value: Box<DisplayNode>,
    },
    Section {
        level: u8,
        title: String,
        body: Box<DisplayNode>,
    },
}

impl DisplayNode {
    pub fn text(text: impl Into<String>) -> Self {
        DisplayNode::Text { text: text.into() }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DisplayNode::Empty)
    }

    /// Indented plain text for terminals and logs
    pub fn to_plain_text(&self) -> String {
        self.plain_lines().join("\n")
    }

    fn plain_lines(&self) -> Vec<String> {
        match self {
            DisplayNode::Empty => Vec::new(),
            DisplayNode::Text { text } => text.lines().map(str::to_string).collect(),
            DisplayNode::Date { display, .. } => vec![display.clone()],
            DisplayNode::RichText { html } => vec![strip_html(html)],
            DisplayNode::PersonLink { name, .. } => vec![name.clone()],
            DisplayNode::Image { src } => vec![format!("[image: {}]", src)],
            DisplayNode::List { items } => items
                .iter()
                .flat_map(|item| {
                    item.plain_lines().into_iter().enumerate().map(|(i, line)| {
                        if i == 0 {
                            format!("- {}", line)
                        } else {
                            format!("  {}", line)
                        }
                    })
                })
                .collect(),
            DisplayNode::Group { entries } => {
                entries.iter().flat_map(|e| e.plain_lines()).collect()
            }
            DisplayNode::Field { label, value } => {
                let lines = value.plain_lines();
                let block = matches!(**value, DisplayNode::List { .. } | DisplayNode::Group { .. });
                match lines.len() {
                    0 => vec![format!("{}:", label)],
                    1 if !block => vec![format!("{}: {}", label, lines[0])],
                    _ => std::iter::once(format!("{}:", label))
                        .chain(lines.into_iter().map(|line| format!("  {}", line)))
                        .collect(),
                }
            }
            DisplayNode::Section { level, title, body } => {
                std::iter::once(format!("{} {}", "#".repeat(*level as usize), title))
                    .chain(body.plain_lines().into_iter().map(|line| format!("  {}", line)))
                    .collect()
            }
        }
    }

    /// HTML fragment. Text is escaped; rich text is embedded as sanitized.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            DisplayNode::Empty => {}
            DisplayNode::Text { text } => out.push_str(&escape_html(text)),
            DisplayNode::Date { iso, display } => out.push_str(&format!(
                "<time datetime=\"{}\">{}</time>",
                escape_html(iso),
                escape_html(display)
            )),
            DisplayNode::RichText { html } => out.push_str(html),
            DisplayNode::PersonLink { name, href, .. } => out.push_str(&format!(
                "<a href=\"{}\">{}</a>",
                escape_html(href),
                escape_html(name)
            )),
            DisplayNode::Image { src } => {
                out.push_str(&format!("<img src=\"{}\" alt=\"\">", escape_html(src)))
            }
            DisplayNode::List { items } => {
                out.push_str("<ul>");
                for item in items {
                    out.push_str("<li>");
                    item.write_html(out);
                    out.push_str("</li>");
                }
                out.push_str("</ul>");
            }
            DisplayNode::Group { entries } => {
                for entry in entries {
                    entry.write_html(out);
                }
            }
            DisplayNode::Field { label, value } => {
                out.push_str(&format!("<div><strong>{}:</strong> ", escape_html(label)));
                value.write_html(out);
                out.push_str("</div>");
            }
            DisplayNode::Section { level, title, body } => {
                out.push_str(&format!("<section><h{0}>{1}</h{0}>", level, escape_html(title)));
                body.write_html(out);
                out.push_str("</section>");
            }
        }
    }
}
