//! eventdesk core library.
//!
//! Business rules and data plumbing of the event-management front-end:
//!
//! - [`eligibility`]: who may be registered as an event's main organizer
//! - [`render`]: translated rendering of arbitrary backend records
//! - [`i18n`]: locale strings and translation dictionaries
//! - [`api`], [`auth`], [`cache`], [`config`]: backend access and local state
//! - [`models`]: typed backend entities

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod eligibility;
pub mod i18n;
pub mod models;
pub mod render;
pub mod utils;

pub use eligibility::{
    can_be_main_organizer, is_eligible_main_organizer, required_qualifications, CategoryTree,
    IneligibleOrganizer,
};
pub use i18n::{translate_key, Locale, TranslationCatalog, TranslationMap};
pub use render::{DisplayNode, Renderer};
