use crate::models::{EventClassification, EventGroup, IntendedFor};

/// Event categories whose main organizer needs any qualification at all.
pub const QUALIFYING_CATEGORIES: [&str; 7] = [
    "internal__section_meeting",
    "public__volunteering",
    "public__only_experiential",
    "public__educational__course",
    "public__educational__ohb",
    "public__educational__educational",
    "public__educational__educational_with_stay",
];

pub const SECTION_MEETING: &str = "internal__section_meeting";
pub const OHB: &str = "public__educational__ohb";

pub const KIDS_LEADER: &str = "kids_leader";
pub const KIDS_INTERN: &str = "kids_intern";
pub const ORGANIZER: &str = "organizer";
pub const WEEKEND_ORGANIZER: &str = "weekend_organizer";
pub const INSTRUCTOR: &str = "instructor";

/// Qualification slugs the main organizer must hold, any one of them is
/// enough. Empty means no requirement.
///
/// Order of checks: category outside `QUALIFYING_CATEGORIES`, then the kids
/// section-meeting exemption, then the audience/group table. The OHB
/// override is applied last and always wins.
pub fn required_qualifications(event: &EventClassification) -> Vec<&'static str> {
    let category = event.category.as_str();
    if !QUALIFYING_CATEGORIES.contains(&category) {
        return Vec::new();
    }

    let intended_for = event.intended_for();
    if intended_for == IntendedFor::ForKids && category == SECTION_MEETING {
        return Vec::new();
    }

    let required = by_audience(intended_for, event.group());

    if category == OHB {
        return vec![INSTRUCTOR];
    }

    required
}

fn by_audience(intended_for: IntendedFor, group: EventGroup) -> Vec<&'static str> {
    match (intended_for, group) {
        (IntendedFor::ForKids, EventGroup::Camp) => vec![KIDS_LEADER],
        (IntendedFor::ForKids, _) => vec![KIDS_INTERN],
        (IntendedFor::ForParentsWithKids, EventGroup::Camp) => vec![KIDS_LEADER, ORGANIZER],
        (IntendedFor::ForParentsWithKids, EventGroup::WeekendEvent) => {
            vec![KIDS_INTERN, WEEKEND_ORGANIZER]
        }
        (audience, EventGroup::Camp) if audience.is_general_audience() => vec![ORGANIZER],
        (audience, EventGroup::WeekendEvent) if audience.is_general_audience() => {
            vec![WEEKEND_ORGANIZER]
        }
        _ => Vec::new(),
    }
}
