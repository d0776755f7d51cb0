use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::data::{AllocationInput, AllocationRequest, Session};

// Column aliases accepted for each session field, tried in order. The
// canonical camelCase name always comes first so well-formed requests
// never fall through to the spreadsheet-style spellings.
const PROGRAM_ALIASES: &[&str] = &["program", "Program", "Programme", "Degree"];
const SECTION_ALIASES: &[&str] = &["section", "Section", "Sec"];
const COURSE_CODE_ALIASES: &[&str] = &["courseCode", "Course Code", "Course", "Code"];
const TITLE_ALIASES: &[&str] = &["title", "Title", "Course Title", "Subject"];
const INSTRUCTOR_ALIASES: &[&str] = &["instructor", "Instructor", "Faculty", "Teacher"];
const DAYS_ALIASES: &[&str] = &["daysText", "Days", "Day", "Days of Week"];
const TIME_ALIASES: &[&str] = &["timeText", "Time", "Timing", "Time Slot"];
const STUDENT_COUNT_ALIASES: &[&str] = &["studentCount", "Strength", "Students", "Enrollment"];
const SEMESTER_ALIASES: &[&str] = &["semester", "Semester", "Term"];
const CATALOG_YEAR_ALIASES: &[&str] = &["catalogYear", "Catalog Year", "Catalog", "Year"];

/// Normalizes a raw request into engine input: rooms cleaned, every
/// session record reduced to canonical field names.
pub fn build_input(request: &AllocationRequest) -> Result<AllocationInput, String> {
    let rooms = clean_rooms(&request.rooms);
    if rooms.is_empty() {
        return Err("room list is empty after cleanup".to_string());
    }

    let sessions = request
        .sessions
        .iter()
        .enumerate()
        .map(|(index, record)| {
            canonical_session(record).map_err(|reason| format!("session record {}: {}", index, reason))
        })
        .collect::<Result<Vec<_>, String>>()?;

    Ok(AllocationInput {
        rooms,
        sessions,
        seed: request.seed,
    })
}

/// Trims room names, drops empties and keeps the first occurrence of
/// each duplicate, preserving input order otherwise.
pub fn clean_rooms(raw: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut rooms = Vec::new();
    for room in raw {
        let trimmed = room.trim();
        if trimmed.is_empty() || !seen.insert(trimmed.to_string()) {
            continue;
        }
        rooms.push(trimmed.to_string());
    }
    rooms
}

/// Builds one canonical `Session` from a loose record. Missing or
/// unusable fields degrade to empty strings and zero counts; the engine
/// turns those into per-session diagnostic outcomes later.
pub fn canonical_session(record: &Value) -> Result<Session, String> {
    let fields = record
        .as_object()
        .ok_or_else(|| "expected a JSON object".to_string())?;

    Ok(Session {
        program: text_field(fields, PROGRAM_ALIASES),
        section: text_field(fields, SECTION_ALIASES),
        course_code: text_field(fields, COURSE_CODE_ALIASES),
        title: text_field(fields, TITLE_ALIASES),
        instructor: text_field(fields, INSTRUCTOR_ALIASES),
        days_text: text_field(fields, DAYS_ALIASES),
        time_text: text_field(fields, TIME_ALIASES),
        student_count: count_field(fields, STUDENT_COUNT_ALIASES),
        semester: optional_text_field(fields, SEMESTER_ALIASES),
        catalog_year: optional_text_field(fields, CATALOG_YEAR_ALIASES),
    })
}

fn lookup<'a>(fields: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|alias| fields.get(*alias))
}

fn text_field(fields: &Map<String, Value>, aliases: &[&str]) -> String {
    match lookup(fields, aliases) {
        Some(Value::String(text)) => text.trim().to_string(),
        // Spreadsheet exports hand over sections and years as bare numbers.
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

fn optional_text_field(fields: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    let text = text_field(fields, aliases);
    if text.is_empty() { None } else { Some(text) }
}

fn count_field(fields: &Map<String, Value>, aliases: &[&str]) -> u32 {
    match lookup(fields, aliases) {
        Some(Value::Number(number)) => number
            .as_u64()
            .and_then(|count| u32::try_from(count).ok())
            .unwrap_or(0),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
