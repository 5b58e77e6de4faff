//! Textual reports over the allocator state.
//!
//! Both reports are pure: the returned text is the artifact, written
//! verbatim to the console or a file, and repeated calls with no
//! intervening mutation produce identical bytes.

use crate::allocator::Allocator;

const SEPARATOR: &str = "---------------------------------------------";

/// Occupancy report: every room, offices first then living spaces, each in
/// creation order. A room renders as a `KIND: NAME` header, a separator,
/// and the comma-joined occupant names; an empty room keeps the header
/// with a blank name line.
pub fn allocations_report(alloc: &Allocator) -> String {
    let mut out = String::new();
    for room in alloc.offices().chain(alloc.living_spaces()) {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(room.kind.label());
        out.push_str(": ");
        out.push_str(&room.name.to_uppercase());
        out.push('\n');
        out.push_str(SEPARATOR);
        out.push('\n');
        let names: Vec<String> = room
            .occupants
            .iter()
            .map(|p| alloc.person(*p).name.to_uppercase())
            .collect();
        out.push_str(&names.join(", "));
        out.push('\n');
    }
    out
}

/// Waitlist report: one line per waitlisted person, fellows without an
/// office first, then fellows without a living space, then staff without
/// an office.
pub fn unallocated_report(alloc: &Allocator) -> String {
    let mut out = String::new();
    for id in alloc.fellows_waiting_for_office() {
        out.push_str(&alloc.person(*id).name.to_uppercase());
        out.push_str(", Fellow Unallocated Office\n");
    }
    for id in alloc.fellows_waiting_for_living_space() {
        out.push_str(&alloc.person(*id).name.to_uppercase());
        out.push_str(", Fellow Unallocated Living Space\n");
    }
    for id in alloc.staff_waiting_for_office() {
        out.push_str(&alloc.person(*id).name.to_uppercase());
        out.push_str(", Staff Unallocated Office\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::RoomKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_allocations_report_layout() {
        let mut alloc = Allocator::new();
        alloc
            .create_rooms(&names(&["blue"]), RoomKind::Office)
            .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        alloc.admit_fellow("alice ade", false, &mut rng);
        alloc.admit_fellow("bob ogi", false, &mut rng);

        let report = allocations_report(&alloc);
        assert_eq!(
            report,
            "OFFICE: BLUE\n\
             ---------------------------------------------\n\
             ALICE ADE, BOB OGI\n"
        );
    }

    #[test]
    fn test_empty_room_keeps_header() {
        let mut alloc = Allocator::new();
        alloc
            .create_rooms(&names(&["blue"]), RoomKind::Office)
            .unwrap();
        alloc
            .create_rooms(&names(&["orange"]), RoomKind::LivingSpace)
            .unwrap();

        let report = allocations_report(&alloc);
        assert_eq!(
            report,
            "OFFICE: BLUE\n\
             ---------------------------------------------\n\
             \n\
             \n\
             LIVING SPACE: ORANGE\n\
             ---------------------------------------------\n\
             \n"
        );
    }

    #[test]
    fn test_offices_render_before_living_spaces() {
        let mut alloc = Allocator::new();
        // Created living space first; the report still leads with offices.
        alloc
            .create_rooms(&names(&["orange"]), RoomKind::LivingSpace)
            .unwrap();
        alloc
            .create_rooms(&names(&["blue"]), RoomKind::Office)
            .unwrap();
        let report = allocations_report(&alloc);
        let office_at = report.find("OFFICE: BLUE").unwrap();
        let living_at = report.find("LIVING SPACE: ORANGE").unwrap();
        assert!(office_at < living_at);
    }

    #[test]
    fn test_unallocated_report_order_and_annotations() {
        let mut alloc = Allocator::new();
        let mut rng = StdRng::seed_from_u64(1);
        alloc.admit_staff("samuel obi", &mut rng);
        alloc.admit_fellow("patrick wane", true, &mut rng);

        let report = unallocated_report(&alloc);
        assert_eq!(
            report,
            "PATRICK WANE, Fellow Unallocated Office\n\
             PATRICK WANE, Fellow Unallocated Living Space\n\
             SAMUEL OBI, Staff Unallocated Office\n"
        );
    }

    #[test]
    fn test_reports_idempotent() {
        let mut alloc = Allocator::new();
        alloc
            .create_rooms(&names(&["blue"]), RoomKind::Office)
            .unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        for i in 0..8 {
            alloc.admit_fellow(format!("fellow{i}"), true, &mut rng);
        }
        assert_eq!(allocations_report(&alloc), allocations_report(&alloc));
        assert_eq!(unallocated_report(&alloc), unallocated_report(&alloc));
    }

    #[test]
    fn test_empty_session_yields_empty_reports() {
        let alloc = Allocator::new();
        assert_eq!(allocations_report(&alloc), "");
        assert_eq!(unallocated_report(&alloc), "");
    }
}
