//! Translated rendering of arbitrary backend data.
//!
//! A JSON value is classified once (`classify`) and turned into a
//! `DisplayNode` tree. Field labels come from a translation tree that mirrors
//! the data's shape, falling back to generic labels and then to the raw key.
//! Rendering is pure and never fails: anything unexpected degrades to a
//! generic object or a raw key.

mod classify;
mod node;

pub use classify::{classify, is_blank, is_reference_shortcut, ValueKind};
pub use node::DisplayNode;

use serde_json::Value;

use crate::i18n::{translate_key, GenericTranslations, Locale, TranslationCatalog, TranslationMap};
use crate::utils::{format_number, sanitize_html};

/// Route of the user-profile view person references link to.
pub const PROFILE_ROUTE: &str = "/profiles";

/// Deepest heading level a nested section gets.
const MAX_HEADING_LEVEL: usize = 6;

/// Renders values with a fixed locale and translation catalog.
///
/// Holds only shared references, so one renderer can serve any number of
/// render calls.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    catalog: Option<&'a TranslationCatalog>,
    generic: Option<&'a GenericTranslations>,
    locale: Locale,
}

impl<'a> Renderer<'a> {
    pub fn new(locale: Locale) -> Self {
        Self {
            catalog: None,
            generic: None,
            locale,
        }
    }

    pub fn with_generic(mut self, generic: &'a GenericTranslations) -> Self {
        self.generic = Some(generic);
        self
    }

    /// Renderer using the catalog's generic labels and model trees
    pub fn from_catalog(catalog: &'a TranslationCatalog, locale: Locale) -> Self {
        Self {
            catalog: Some(catalog),
            generic: Some(catalog.generic()),
            locale,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Render a top-level record of a backend model (`event`, `user`, ...)
    pub fn render_model(&self, value: &Value, model: &str) -> DisplayNode {
        let translations = self.catalog.and_then(|catalog| catalog.model(model));
        self.render(value, translations, 0)
    }

    pub fn render(
        &self,
        value: &Value,
        translations: Option<&TranslationMap>,
        depth: usize,
    ) -> DisplayNode {
        match classify(value, depth) {
            ValueKind::Empty => DisplayNode::Empty,
            ValueKind::Boolean(b) => DisplayNode::text(self.locale.yes_no(b)),
            ValueKind::Number(n) => DisplayNode::text(format_number(n)),
            ValueKind::DateString(date) => DisplayNode::Date {
                iso: date.format("%Y-%m-%d").to_string(),
                display: self.locale.format_date(date),
            },
            ValueKind::HtmlString(html) => DisplayNode::RichText {
                html: sanitize_html(html),
            },
            ValueKind::PlainString(s) => DisplayNode::text(s),
            ValueKind::List(items) => DisplayNode::List {
                items: items
                    .iter()
                    .map(|item| self.render(item, translations, depth))
                    .collect(),
            },
            ValueKind::CategoryRef { name } | ValueKind::EntityRef { name } => {
                self.render(name, None, depth)
            }
            ValueKind::PersonRef { id, display_name } => {
                let id = self.scalar_text(id);
                DisplayNode::PersonLink {
                    href: format!("{}/{}", PROFILE_ROUTE, id),
                    name: self.scalar_text(display_name),
                    id,
                }
            }
            ValueKind::ImageBundle { small } => DisplayNode::Image {
                src: small.to_string(),
            },
            ValueKind::GenericObject(map) => {
                let entries = map
                    .iter()
                    .filter(|(_, child)| !is_blank(child))
                    .map(|(key, child)| self.render_entry(key, child, translations, depth))
                    .collect();
                DisplayNode::Group { entries }
            }
        }
    }

    fn render_entry(
        &self,
        key: &str,
        child: &Value,
        translations: Option<&TranslationMap>,
        depth: usize,
    ) -> DisplayNode {
        let label = translate_key(key, translations, self.generic).to_string();
        let child_translations = translations.and_then(|map| map.child(key));
        let body = Box::new(self.render(child, child_translations, depth + 1));

        if child.is_object() && !is_reference_shortcut(child) {
            DisplayNode::Section {
                level: heading_level(depth),
                title: label,
                body,
            }
        } else {
            DisplayNode::Field { label, value: body }
        }
    }

    fn scalar_text(&self, value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => format_number(n),
            Value::Bool(b) => self.locale.yes_no(*b).to_string(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

fn heading_level(depth: usize) -> u8 {
    (depth + 2).min(MAX_HEADING_LEVEL) as u8
}

/// Render `value` with explicit translation trees and the default locale.
pub fn render(
    value: &Value,
    translations: Option<&TranslationMap>,
    generic: Option<&GenericTranslations>,
    depth: usize,
) -> DisplayNode {
    let mut renderer = Renderer::new(Locale::default());
    renderer.generic = generic;
    renderer.render(value, translations, depth)
}
