//! Localization: UI locale strings and backend translation dictionaries.
//!
//! - `Locale`: the fixed strings the core itself emits (Yes/No, "or",
//!   date formats, eligibility reasons)
//! - `TranslationMap`, `TranslationCatalog`: field-label dictionaries that
//!   mirror the shape of backend models, built once and passed by reference
//!   into the renderer

pub mod locale;
pub mod translations;

pub use locale::Locale;
pub use translations::{
    translate_key, GenericTranslations, TranslationCatalog, TranslationEntry, TranslationError,
    TranslationMap, NAME_KEY,
};
