use std::collections::{HashMap, HashSet};
use std::time::Instant;

use itertools::Itertools;
use log::{info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::classify;
use crate::conflict::conflicts;
use crate::data::{
    AllocationInput, AllocationOutput, AnnotatedSession, LabRequirement, Outcome, RoomType,
    TimeSlot, Weekday,
};
use crate::shuffle::order_by_priority;
use crate::timeslot;

/// Successful placements between resets of the recently-used exclusion set.
const FAIRNESS_WINDOW: usize = 8;

/// Runs a full allocation pass over `input`, seeding the shuffle RNG from
/// `input.seed` when present and from the OS otherwise.
pub fn allocate(input: &AllocationInput) -> AllocationOutput {
    let mut rng = match input.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    allocate_with_rng(input, &mut rng)
}

/// Same as [`allocate`] but with a caller-supplied RNG, so runs can be
/// reproduced exactly.
///
/// Sessions are handled strictly in input order. Each one either short-circuits
/// to a diagnostic outcome (research program, Friday teaching, unparsable slot)
/// or goes through the greedy room search. A room that accepts a session is
/// recorded in its occupancy ledger and in the recently-used set; the latter is
/// cleared after every [`FAIRNESS_WINDOW`] successful placements.
pub fn allocate_with_rng<R: Rng>(input: &AllocationInput, rng: &mut R) -> AllocationOutput {
    let start_time = Instant::now();
    info!(
        "Allocating {} sessions across {} rooms...",
        input.sessions.len(),
        input.rooms.len()
    );

    let mut occupancy: HashMap<String, Vec<TimeSlot>> = input
        .rooms
        .iter()
        .map(|room| (room.clone(), Vec::new()))
        .collect();
    let mut recently_used: HashSet<String> = HashSet::new();

    let mut allocated: usize = 0;
    let mut special: usize = 0;
    let mut room_shortfall: u32 = 0;
    let mut it_lab_shortfall: u32 = 0;
    let mut by_category: HashMap<&'static str, usize> = HashMap::new();
    let mut sessions = Vec::with_capacity(input.sessions.len());

    for session in &input.sessions {
        let outcome = if classify::is_research_program(&session.program) {
            special += 1;
            Outcome::Facroom
        } else if timeslot::parse_days(&session.days_text).contains(&Weekday::Fri) {
            // Friday teaching stays off the room pool. Decided from the day
            // tokens alone, so a Friday session with a broken time text is
            // still reported as roomless rather than invalid.
            special += 1;
            Outcome::NoRoom
        } else {
            match timeslot::parse(&session.days_text, &session.time_text) {
                None => {
                    special += 1;
                    Outcome::InvalidTimeSlot
                }
                Some(slot) => {
                    let requirement = classify::lab_requirement(&session.course_code);
                    let candidates =
                        candidate_rooms(requirement, &input.rooms, &recently_used, rng);
                    match first_fit(&slot, &candidates, &occupancy) {
                        Some(room) => {
                            occupancy.entry(room.clone()).or_default().push(slot);
                            recently_used.insert(room.clone());
                            allocated += 1;
                            if allocated % FAIRNESS_WINDOW == 0 {
                                recently_used.clear();
                            }
                            *by_category
                                .entry(classify::classify(&room).category)
                                .or_insert(0) += 1;
                            Outcome::Assigned(room)
                        }
                        None => match requirement {
                            LabRequirement::ItLab => {
                                it_lab_shortfall += 1;
                                Outcome::ItLabRequired
                            }
                            _ => {
                                room_shortfall += 1;
                                Outcome::RoomRequired
                            }
                        },
                    }
                }
            }
        };

        trace!(
            "{} {} ({} {}) -> {}",
            session.course_code, session.section, session.days_text, session.time_text, outcome
        );
        sessions.push(AnnotatedSession {
            session: session.clone(),
            assigned_room: outcome.to_string(),
        });
    }

    info!(
        "Allocation finished in {:.2?}: {} assigned, {} short of rooms, {} short of IT labs, {} special-cased",
        start_time.elapsed(),
        allocated,
        room_shortfall,
        it_lab_shortfall,
        special
    );
    for (category, count) in by_category.iter().sorted() {
        info!("  {}: {} assignments", category, count);
    }

    AllocationOutput {
        sessions,
        room_shortfall,
        it_lab_shortfall,
    }
}

/// Builds the ordered candidate list for one session.
///
/// Lab sessions try their dedicated pool before spilling into general rooms.
/// The physics pool is so small that it is taken in supplied order; every
/// other pool goes through the priority shuffle, which also drops
/// recently-used rooms. Sessions with no lab requirement additionally fall
/// back on IT labs and, as a last resort, science labs in supplied order.
fn candidate_rooms<R: Rng>(
    requirement: LabRequirement,
    rooms: &[String],
    recently_used: &HashSet<String>,
    rng: &mut R,
) -> Vec<String> {
    let of_type = |wanted: RoomType| -> Vec<String> {
        rooms
            .iter()
            .filter(|room| classify::classify(room).room_type == wanted)
            .cloned()
            .collect()
    };
    let general = of_type(RoomType::General);
    let it_labs = of_type(RoomType::ItLab);
    let science = of_type(RoomType::ScienceLab);
    let physics = of_type(RoomType::PhysicsLab);

    match requirement {
        LabRequirement::PhysicsLab => {
            let mut candidates = physics;
            candidates.extend(order_by_priority(&science, recently_used, rng));
            candidates.extend(order_by_priority(&general, recently_used, rng));
            candidates
        }
        LabRequirement::ItLab => {
            let mut candidates = order_by_priority(&it_labs, recently_used, rng);
            candidates.extend(order_by_priority(&general, recently_used, rng));
            candidates
        }
        LabRequirement::ScienceLab => {
            let mut candidates = order_by_priority(&science, recently_used, rng);
            candidates.extend(order_by_priority(&general, recently_used, rng));
            candidates
        }
        LabRequirement::None => {
            let mut candidates = order_by_priority(&general, recently_used, rng);
            candidates.extend(order_by_priority(&it_labs, recently_used, rng));
            candidates.extend(science);
            candidates
        }
    }
}

/// Returns the first candidate whose ledger has no conflict with `slot`.
fn first_fit(
    slot: &TimeSlot,
    candidates: &[String],
    occupancy: &HashMap<String, Vec<TimeSlot>>,
) -> Option<String> {
    candidates
        .iter()
        .find(|room| {
            occupancy
                .get(*room)
                .map_or(true, |ledger| ledger.iter().all(|taken| !conflicts(taken, slot)))
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Session;

    fn session(course: &str, days: &str, time: &str) -> Session {
        Session {
            program: "BBA".to_string(),
            section: "A".to_string(),
            course_code: course.to_string(),
            title: String::new(),
            instructor: String::new(),
            days_text: days.to_string(),
            time_text: time.to_string(),
            student_count: 30,
            semester: None,
            catalog_year: None,
        }
    }

    fn input(rooms: &[&str], sessions: Vec<Session>) -> AllocationInput {
        AllocationInput {
            rooms: rooms.iter().map(|room| room.to_string()).collect(),
            sessions,
            seed: Some(1),
        }
    }

    fn outcomes(output: &AllocationOutput) -> Vec<String> {
        output
            .sessions
            .iter()
            .map(|annotated| annotated.assigned_room.clone())
            .collect()
    }

    #[test]
    fn test_lab_course_routed_to_it_lab_and_general_course_to_classroom() {
        let run = input(
            &["IT LAB 1", "CBM204"],
            vec![
                session("MIS101", "Tuesday / Thursday", "10:45 AM - 12:15 PM"),
                session("MAN405", "Tuesday / Thursday", "10:45 AM - 12:15 PM"),
            ],
        );
        let output = allocate(&run);

        assert_eq!(outcomes(&output), vec!["IT LAB 1", "CBM204"]);
        assert_eq!(output.room_shortfall, 0);
        assert_eq!(output.it_lab_shortfall, 0);
    }

    #[test]
    fn test_overflow_session_marked_room_required() {
        let run = input(
            &["CBM101", "CBM102"],
            vec![
                session("MAN101", "Monday", "9:00 AM - 10:00 AM"),
                session("MAN101", "Monday", "9:00 AM - 10:00 AM"),
                session("MAN101", "Monday", "9:00 AM - 10:00 AM"),
            ],
        );
        let output = allocate(&run);
        let got = outcomes(&output);

        let mut assigned: Vec<&str> = got[..2].iter().map(String::as_str).collect();
        assigned.sort();
        assert_eq!(assigned, vec!["CBM101", "CBM102"]);
        assert_eq!(got[2], "ROOM REQUIRED");
        assert_eq!(output.room_shortfall, 1);
        assert_eq!(output.it_lab_shortfall, 0);
    }

    #[test]
    fn test_it_overflow_marked_it_lab_required() {
        let run = input(
            &["IT LAB 1"],
            vec![
                session("MIS101", "Monday", "9:00 AM - 10:00 AM"),
                session("CSC200", "Monday", "9:00 AM - 10:00 AM"),
            ],
        );
        let output = allocate(&run);

        assert_eq!(outcomes(&output), vec!["IT LAB 1", "IT LAB REQUIRED"]);
        assert_eq!(output.room_shortfall, 0);
        assert_eq!(output.it_lab_shortfall, 1);
    }

    #[test]
    fn test_friday_session_gets_no_room_and_leaves_ledgers_untouched() {
        let run = input(
            &["CBM101"],
            vec![
                session("MAN101", "Fri", "9:00 AM - 10:00 AM"),
                session("MAN102", "Monday", "9:00 AM - 10:00 AM"),
            ],
        );
        let output = allocate(&run);

        assert_eq!(outcomes(&output), vec!["No Room", "CBM101"]);
        assert_eq!(output.room_shortfall, 0);
    }

    #[test]
    fn test_friday_wins_over_unparsable_time() {
        let run = input(
            &["CBM101"],
            vec![session("MAN101", "Friday", "whenever")],
        );
        let output = allocate(&run);

        assert_eq!(outcomes(&output), vec!["No Room"]);
    }

    #[test]
    fn test_unparsable_time_marked_invalid() {
        let run = input(
            &["CBM101"],
            vec![session("MAN101", "Monday", "25:99 AM - 3:00 PM")],
        );
        let output = allocate(&run);

        assert_eq!(outcomes(&output), vec!["INVALID TIME SLOT"]);
        assert_eq!(output.room_shortfall, 0);
        assert_eq!(output.it_lab_shortfall, 0);
    }

    #[test]
    fn test_research_program_routed_to_facroom() {
        let mut thesis = session("MAN899", "Monday", "9:00 AM - 10:00 AM");
        thesis.program = "MPhil Thesis".to_string();
        let run = input(&["CBM101"], vec![thesis]);
        let output = allocate(&run);

        assert_eq!(outcomes(&output), vec!["Facroom"]);
    }

    #[test]
    fn test_physics_course_prefers_dedicated_lab_then_science_then_general() {
        let run = input(
            &["CBM101", "SSKLAB301", "SSKLAB402"],
            vec![
                session("PHY101", "Monday", "9:00 AM - 10:00 AM"),
                session("PHY102", "Monday", "9:00 AM - 10:00 AM"),
                session("PHY103", "Monday", "9:00 AM - 10:00 AM"),
            ],
        );
        let output = allocate(&run);

        assert_eq!(outcomes(&output), vec!["SSKLAB402", "SSKLAB301", "CBM101"]);
    }

    #[test]
    fn test_science_tail_ignores_recently_used_exclusion() {
        // A lone science lab serves back-to-back general sessions because the
        // unshuffled tail of the candidate list skips the exclusion set.
        let run = input(
            &["SSKLAB301"],
            vec![
                session("MAN101", "Monday", "9:00 AM - 10:00 AM"),
                session("MAN102", "Monday", "10:00 AM - 11:00 AM"),
            ],
        );
        let output = allocate(&run);

        assert_eq!(outcomes(&output), vec!["SSKLAB301", "SSKLAB301"]);
    }

    #[test]
    fn test_recently_used_general_room_starves_followup_session() {
        // Same shape as above but with a general room: the second session
        // cannot see the room again before the fairness window resets.
        let run = input(
            &["CBM101"],
            vec![
                session("MAN101", "Monday", "9:00 AM - 10:00 AM"),
                session("MAN102", "Monday", "10:00 AM - 11:00 AM"),
            ],
        );
        let output = allocate(&run);

        assert_eq!(outcomes(&output), vec!["CBM101", "ROOM REQUIRED"]);
        assert_eq!(output.room_shortfall, 1);
    }

    #[test]
    fn test_exclusion_set_resets_after_fairness_window() {
        let rooms = [
            "CBM101", "CBM102", "CBM103", "CBM104", "CBM105", "CBM106", "CBM107", "CBM108",
        ];
        // Nine non-overlapping sessions against eight rooms. The exclusion
        // set forces the first eight onto eight distinct rooms, then clears,
        // so the ninth is placed instead of starving.
        let sessions = (0..9)
            .map(|hour| {
                session(
                    "MAN101",
                    "Monday",
                    &format!("{}:00 AM - {}:30 AM", hour + 1, hour + 1),
                )
            })
            .collect();
        let run = input(&rooms, sessions);
        let output = allocate(&run);
        let got = outcomes(&output);

        let distinct: HashSet<&String> = got[..8].iter().collect();
        assert_eq!(distinct.len(), 8);
        assert!(rooms.contains(&got[8].as_str()));
        assert_eq!(output.room_shortfall, 0);
    }

    #[test]
    fn test_no_room_is_double_booked() {
        let rooms = ["CBM101", "CBM102", "IT LAB 1"];
        let mut sessions = Vec::new();
        for start in [8, 9, 10] {
            for course in ["MAN101", "MIS101", "HRM300", "FIN202"] {
                sessions.push(session(
                    course,
                    "Monday / Wednesday",
                    &format!("{}:00 AM - {}:30 AM", start, start + 1),
                ));
            }
        }
        let run = input(&rooms, sessions);
        let output = allocate(&run);

        let mut ledgers: HashMap<&str, Vec<TimeSlot>> = HashMap::new();
        for annotated in &output.sessions {
            if !run.rooms.contains(&annotated.assigned_room) {
                continue;
            }
            let slot = timeslot::parse(
                &annotated.session.days_text,
                &annotated.session.time_text,
            )
            .unwrap();
            let ledger = ledgers.entry(annotated.assigned_room.as_str()).or_default();
            assert!(
                ledger.iter().all(|taken| !conflicts(taken, &slot)),
                "{} booked twice in one slot",
                annotated.assigned_room
            );
            ledger.push(slot);
        }
    }

    #[test]
    fn test_every_session_comes_back_in_input_order() {
        let run = input(
            &["CBM101", "IT LAB 1"],
            vec![
                session("MAN101", "Monday", "9:00 AM - 10:00 AM"),
                session("MIS101", "Friday", "9:00 AM - 10:00 AM"),
                session("FIN202", "Someday", "whenever"),
                session("MKT305", "Tuesday", "2:30 PM - 3:45 PM"),
            ],
        );
        let output = allocate(&run);

        let codes: Vec<&str> = output
            .sessions
            .iter()
            .map(|annotated| annotated.session.course_code.as_str())
            .collect();
        assert_eq!(codes, vec!["MAN101", "MIS101", "FIN202", "MKT305"]);
        assert!(output
            .sessions
            .iter()
            .all(|annotated| !annotated.assigned_room.is_empty()));
    }

    #[test]
    fn test_shortfall_counters_match_outcome_labels() {
        let run = input(
            &["CBM101"],
            vec![
                session("MAN101", "Monday", "9:00 AM - 10:00 AM"),
                session("MAN102", "Monday", "9:00 AM - 10:00 AM"),
                session("MIS101", "Monday", "9:00 AM - 10:00 AM"),
                session("MAN103", "Monday", "9:00 AM - 10:00 AM"),
            ],
        );
        let output = allocate(&run);
        let got = outcomes(&output);

        let rooms_short = got.iter().filter(|label| *label == "ROOM REQUIRED").count();
        let it_short = got
            .iter()
            .filter(|label| *label == "IT LAB REQUIRED")
            .count();
        assert_eq!(output.room_shortfall as usize, rooms_short);
        assert_eq!(output.it_lab_shortfall as usize, it_short);
        assert_eq!(rooms_short, 2);
        assert_eq!(it_short, 1);
    }

    #[test]
    fn test_outcome_classes_conserve_session_count() {
        let mut thesis = session("MAN899", "Monday", "9:00 AM - 10:00 AM");
        thesis.program = "MS Research".to_string();
        let run = input(
            &["CBM101"],
            vec![
                session("MAN101", "Monday", "9:00 AM - 10:00 AM"),
                session("MAN102", "Monday", "9:00 AM - 10:00 AM"),
                thesis,
                session("MKT305", "Friday", "9:00 AM - 10:00 AM"),
                session("FIN202", "Monday", "nonsense"),
                session("MIS101", "Monday", "9:00 AM - 10:00 AM"),
            ],
        );
        let output = allocate(&run);
        let got = outcomes(&output);

        let special = ["Facroom", "No Room", "INVALID TIME SLOT"];
        let assigned = got
            .iter()
            .filter(|label| run.rooms.contains(*label))
            .count();
        let special_cased = got
            .iter()
            .filter(|label| special.contains(&label.as_str()))
            .count();
        let short = (output.room_shortfall + output.it_lab_shortfall) as usize;

        assert_eq!(assigned, 1);
        assert_eq!(special_cased, 3);
        assert_eq!(short, 2);
        assert_eq!(assigned + special_cased + short, run.sessions.len());
    }

    #[test]
    fn test_same_seed_reproduces_identical_assignments() {
        let rooms = ["CBM101", "CBM102", "SSK201", "IT LAB 1", "LIBRARY HALL"];
        let sessions: Vec<Session> = (0..12)
            .map(|index| {
                session(
                    if index % 3 == 0 { "MIS101" } else { "MAN101" },
                    "Monday / Wednesday",
                    &format!("{}:00 AM - {}:45 AM", index % 4 + 8, index % 4 + 8),
                )
            })
            .collect();
        let mut run = input(&rooms, sessions);
        run.seed = Some(99);

        let first = outcomes(&allocate(&run));
        let second = outcomes(&allocate(&run));
        assert_eq!(first, second);
    }
}
