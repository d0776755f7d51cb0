use crate::data::TimeSlot;

/// True when the two slots share a weekday and their minute intervals
/// overlap. Touching endpoints do not overlap (half-open semantics), and
/// a degenerate slot (start >= end) never conflicts with anything.
pub fn conflicts(a: &TimeSlot, b: &TimeSlot) -> bool {
    if a.start >= a.end || b.start >= b.end {
        return false;
    }
    if !a.days.iter().any(|day| b.days.contains(day)) {
        return false;
    }
    !(a.end <= b.start || b.end <= a.start)
}
