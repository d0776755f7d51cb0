use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// Type aliases for clarity
pub type Minutes = u32;
pub type Rank = u8;

/// Weekdays a session can meet on, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

/// A normalized meeting time: weekday set plus a minute interval.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSlot {
    /// Sorted, de-duplicated, never empty.
    pub days: Vec<Weekday>,
    /// Minutes since midnight.
    pub start: Minutes,
    /// Minutes since midnight; start < end.
    pub end: Minutes,
    /// Original day text, kept for diagnostics.
    pub raw_days: String,
    /// Original time text, kept for diagnostics.
    pub raw_time: String,
}

/// Room categories derived from the room name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomType {
    General,
    ItLab,
    ScienceLab,
    PhysicsLab,
}

/// Specialized-room need derived from a course code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabRequirement {
    None,
    ItLab,
    ScienceLab,
    PhysicsLab,
}

/// Classification of a single room name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomClass {
    pub room_type: RoomType,
    /// Zone precedence, lower = preferred.
    pub priority: Rank,
    /// Coarse zone label, used only for reporting.
    pub category: &'static str,
}

/// A course meeting to be scheduled, with canonical field names.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub program: String,
    pub section: String,
    pub course_code: String,
    pub title: String,
    pub instructor: String,
    pub days_text: String,
    pub time_text: String,
    pub student_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_year: Option<String>,
}

/// What the engine decided for one session. The diagnostic variants
/// render to fixed label strings that downstream consumers display in
/// place of a room name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Assigned(String),
    RoomRequired,
    ItLabRequired,
    InvalidTimeSlot,
    NoRoom,
    Facroom,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Assigned(room) => write!(f, "{}", room),
            Outcome::RoomRequired => write!(f, "ROOM REQUIRED"),
            Outcome::ItLabRequired => write!(f, "IT LAB REQUIRED"),
            Outcome::InvalidTimeSlot => write!(f, "INVALID TIME SLOT"),
            Outcome::NoRoom => write!(f, "No Room"),
            Outcome::Facroom => write!(f, "Facroom"),
        }
    }
}

/// The complete input for one allocation run.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationInput {
    pub rooms: Vec<String>,
    pub sessions: Vec<Session>,
    /// Fixed seed for reproducible runs; random otherwise.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// The raw request body: rooms plus loose session records whose column
/// names have not been normalized yet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRequest {
    pub rooms: Vec<String>,
    pub sessions: Vec<Value>,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// A session echoed back with its allocation outcome attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedSession {
    #[serde(flatten)]
    pub session: Session,
    /// A room name or one of the diagnostic labels.
    pub assigned_room: String,
}

/// The final output of one allocation run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationOutput {
    pub sessions: Vec<AnnotatedSession>,
    pub room_shortfall: u32,
    pub it_lab_shortfall: u32,
}
