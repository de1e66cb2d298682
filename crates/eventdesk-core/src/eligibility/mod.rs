//! Main-organizer eligibility rules.
//!
//! An event's classification (audience, group, category) decides which
//! qualifications its main organizer needs (`required_qualifications`).
//! `can_be_main_organizer` then checks the candidate's age and whether any
//! currently valid qualification, or one of its ancestors in the
//! `CategoryTree`, is among the accepted ones.

mod hierarchy;
mod policy;
mod requirements;

pub use hierarchy::{CategoryTree, HierarchyError};
pub use policy::{
    can_be_main_organizer, can_be_main_organizer_today, is_eligible_main_organizer,
    IneligibilityKind, IneligibleOrganizer, MIN_ORGANIZER_AGE,
};
pub use requirements::{
    required_qualifications, INSTRUCTOR, KIDS_INTERN, KIDS_LEADER, ORGANIZER,
    QUALIFYING_CATEGORIES, WEEKEND_ORGANIZER,
};
