use crate::data::{LabRequirement, Rank, RoomClass, RoomType};

// Zone rules in precedence order; only the first matching rule applies.
const ZONE_RULES: [(&[&str], Rank, &str); 5] = [
    (&["CBM"], 1, "CBM building"),
    (&["SSK"], 2, "SSK building"),
    (&["I.MGMT", "IMGMT"], 3, "Institute of Management"),
    (&["LIBRARY"], 4, "Library"),
    (&["CREEK", "CHS"], 5, "Creek campus"),
];
const FALLBACK_RANK: Rank = 6;
const FALLBACK_CATEGORY: &str = "Other";

const IT_LAB_MARKERS: [&str; 4] = ["IT LAB", "ITROOM", "IT_LAB", "IT_ROOM"];
const PHYSICS_LAB_MARKER: &str = "SSKLAB402";
const SCIENCE_LAB_MARKER: &str = "SSKLAB";

// Course-code tables; exact codes take precedence over prefixes.
const IT_LAB_COURSES: [&str; 2] = ["STA301", "STA408"];
const IT_LAB_PREFIXES: [&str; 4] = ["MIS", "CSC", "CIS", "SEN"];
const PHYSICS_PREFIX: &str = "PHY";
const SCIENCE_PREFIXES: [&str; 3] = ["BIO", "CHM", "CHE"];

const RESEARCH_MARKERS: [&str; 2] = ["THESIS", "RESEARCH"];

/// Derives type, zone priority and reporting category from a room name.
/// Pure and stable: the same name always classifies the same way.
pub fn classify(room_name: &str) -> RoomClass {
    let name = room_name.to_uppercase();
    let (priority, category) = ZONE_RULES
        .iter()
        .find(|(markers, _, _)| markers.iter().any(|m| name.contains(m)))
        .map(|(_, rank, category)| (*rank, *category))
        .unwrap_or((FALLBACK_RANK, FALLBACK_CATEGORY));
    RoomClass {
        room_type: room_type_of(&name),
        priority,
        category,
    }
}

fn room_type_of(name: &str) -> RoomType {
    if IT_LAB_MARKERS.iter().any(|m| name.contains(m)) {
        RoomType::ItLab
    } else if name.contains(PHYSICS_LAB_MARKER) {
        RoomType::PhysicsLab
    } else if name.contains(SCIENCE_LAB_MARKER) {
        RoomType::ScienceLab
    } else {
        RoomType::General
    }
}

/// Derives the specialized-room need from a course code.
pub fn lab_requirement(course_code: &str) -> LabRequirement {
    let code = course_code.trim().to_uppercase();
    if IT_LAB_COURSES.iter().any(|c| code == *c)
        || IT_LAB_PREFIXES.iter().any(|p| code.starts_with(p))
    {
        LabRequirement::ItLab
    } else if code.starts_with(PHYSICS_PREFIX) {
        LabRequirement::PhysicsLab
    } else if SCIENCE_PREFIXES.iter().any(|p| code.starts_with(p)) {
        LabRequirement::ScienceLab
    } else {
        LabRequirement::None
    }
}

/// Research and thesis sessions meet in faculty rooms, not scheduled ones.
pub fn is_research_program(program: &str) -> bool {
    let program = program.to_uppercase();
    RESEARCH_MARKERS.iter().any(|m| program.contains(m))
}
