//! The allocator state machine: room creation, admission, waitlists, and
//! reallocation.
//!
//! One [`Allocator`] value holds an entire working session. After every
//! public operation the following must hold:
//!
//! - a person appears in at most one office and at most one living space
//! - no room ever exceeds its archetype capacity
//! - a person is either placed or waitlisted for each resource kind they
//!   asked for, never both
//! - room names are unique across offices and living spaces together
//! - staff never appear in a living space or its waitlist
//!
//! Room selection at admission time is a uniform random choice among all
//! rooms of the kind that still have space, so occupants spread evenly
//! across rooms instead of filling the earliest-created room first. All
//! randomized operations take the generator as an argument; tests seed one.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::AllocError;
use crate::people::{Person, PersonId};
use crate::rooms::{Room, RoomId, RoomKind};
use crate::snapshot::SnapshotError;

/// Per-name outcome of a room-creation batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomCreation {
    Created(RoomId),
    /// A room of either kind already uses this name. The name is skipped
    /// and the rest of the batch is still processed.
    Duplicate(String),
}

/// Where a fellow landed at admission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FellowAdmission {
    pub person: PersonId,
    /// `None` means the fellow joined the office waitlist.
    pub office: Option<RoomId>,
    pub wants_accommodation: bool,
    /// Only meaningful when accommodation was requested; `None` then means
    /// the fellow joined the living-space waitlist.
    pub living_space: Option<RoomId>,
}

/// Where a staff member landed at admission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaffAdmission {
    pub person: PersonId,
    /// `None` means the staff member joined the office waitlist.
    pub office: Option<RoomId>,
}

/// What a successful reallocation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reallocation {
    /// The person already occupied the target room; nothing changed.
    AlreadyThere,
    /// Moved out of a previous room of the same kind.
    MovedFromRoom(RoomId),
    /// Taken off the waitlist for the target's kind.
    MovedFromWaitlist,
    /// The person held neither a placement nor a waitlist entry for this
    /// kind (a fellow who never asked for accommodation); the transfer is
    /// treated as opting in.
    NewlyPlaced,
}

/// Process-wide state for one working session.
///
/// Rooms and people live in creation/admission order and are never
/// deleted; occupancy links mutate only through admission and
/// reallocation.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Allocator {
    rooms: Vec<Room>,
    people: Vec<Person>,
    fellows_waiting_for_office: Vec<PersonId>,
    fellows_waiting_for_living_space: Vec<PersonId>,
    staff_waiting_for_office: Vec<PersonId>,
}

impl Allocator {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// All rooms in creation order, offices and living spaces interleaved.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// All people in admission order, fellows and staff interleaved.
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn room(&self, id: RoomId) -> &Room {
        &self.rooms[id.0 as usize]
    }

    pub fn person(&self, id: PersonId) -> &Person {
        &self.people[id.0 as usize]
    }

    /// Offices in creation order.
    pub fn offices(&self) -> impl Iterator<Item = &Room> + '_ {
        self.rooms.iter().filter(|r| r.kind == RoomKind::Office)
    }

    /// Living spaces in creation order.
    pub fn living_spaces(&self) -> impl Iterator<Item = &Room> + '_ {
        self.rooms.iter().filter(|r| r.kind == RoomKind::LivingSpace)
    }

    pub fn fellows_waiting_for_office(&self) -> &[PersonId] {
        &self.fellows_waiting_for_office
    }

    pub fn fellows_waiting_for_living_space(&self) -> &[PersonId] {
        &self.fellows_waiting_for_living_space
    }

    pub fn staff_waiting_for_office(&self) -> &[PersonId] {
        &self.staff_waiting_for_office
    }

    /// First person admitted under `name`, if any. Names are not unique,
    /// so later namesakes are unreachable by name.
    pub fn find_person(&self, name: &str) -> Option<PersonId> {
        self.people
            .iter()
            .position(|p| p.name == name)
            .map(|i| PersonId(i as u32))
    }

    /// Room with exactly `name` (case-sensitive), of either kind.
    pub fn find_room(&self, name: &str) -> Option<RoomId> {
        self.rooms
            .iter()
            .position(|r| r.name == name)
            .map(|i| RoomId(i as u32))
    }

    /// Occupant names of a room, in placement order.
    pub fn occupant_names(&self, id: RoomId) -> Vec<String> {
        self.room(id)
            .occupants
            .iter()
            .map(|p| self.person(*p).name.clone())
            .collect()
    }

    // ── Room creation ───────────────────────────────────────────────────

    /// Create one room per name, all of the given kind.
    ///
    /// A name already used by a room of either kind yields a
    /// [`RoomCreation::Duplicate`] outcome for that name only; the rest of
    /// the batch is still processed.
    pub fn create_rooms(
        &mut self,
        names: &[String],
        kind: RoomKind,
    ) -> Result<Vec<RoomCreation>, AllocError> {
        if names.is_empty() {
            return Err(AllocError::InvalidArgument);
        }
        let mut outcomes = Vec::with_capacity(names.len());
        for name in names {
            if self.find_room(name).is_some() {
                outcomes.push(RoomCreation::Duplicate(name.clone()));
                continue;
            }
            let id = RoomId(self.rooms.len() as u32);
            self.rooms.push(Room::new(name.clone(), kind));
            outcomes.push(RoomCreation::Created(id));
        }
        Ok(outcomes)
    }

    // ── Admission ───────────────────────────────────────────────────────

    /// Admit a fellow, placing them in a random office with space (or the
    /// office waitlist), and likewise for a living space when
    /// accommodation was requested. The fellow joins the roster whether or
    /// not any placement succeeded.
    pub fn admit_fellow(
        &mut self,
        name: impl Into<String>,
        wants_accommodation: bool,
        rng: &mut impl Rng,
    ) -> FellowAdmission {
        let person = PersonId(self.people.len() as u32);
        self.people.push(Person::fellow(name, wants_accommodation));

        let office = self.pick_available(RoomKind::Office, rng);
        match office {
            Some(id) => self.place(person, id),
            None => self.fellows_waiting_for_office.push(person),
        }

        let mut living_space = None;
        if wants_accommodation {
            living_space = self.pick_available(RoomKind::LivingSpace, rng);
            match living_space {
                Some(id) => self.place(person, id),
                None => self.fellows_waiting_for_living_space.push(person),
            }
        }

        FellowAdmission {
            person,
            office,
            wants_accommodation,
            living_space,
        }
    }

    /// Admit a staff member, placing them in a random office with space or
    /// on the staff office waitlist. Staff are never considered for living
    /// spaces.
    pub fn admit_staff(&mut self, name: impl Into<String>, rng: &mut impl Rng) -> StaffAdmission {
        let person = PersonId(self.people.len() as u32);
        self.people.push(Person::staff(name));

        let office = self.pick_available(RoomKind::Office, rng);
        match office {
            Some(id) => self.place(person, id),
            None => self.staff_waiting_for_office.push(person),
        }

        StaffAdmission { person, office }
    }

    // ── Reallocation ────────────────────────────────────────────────────

    /// Move a person, placed or waitlisted, into the named target room.
    ///
    /// Checks run in order: room exists, room has space, person exists,
    /// role may hold the room kind. All of them complete before any
    /// mutation, so a failure leaves the session untouched.
    pub fn reallocate_person(
        &mut self,
        person_name: &str,
        target_room_name: &str,
    ) -> Result<Reallocation, AllocError> {
        let target = self
            .find_room(target_room_name)
            .ok_or_else(|| AllocError::RoomNotFound(target_room_name.to_string()))?;
        if !self.room(target).has_space() {
            return Err(AllocError::CapacityExceeded(target_room_name.to_string()));
        }
        let person = self
            .find_person(person_name)
            .ok_or_else(|| AllocError::PersonNotFound(person_name.to_string()))?;

        let kind = self.room(target).kind;
        if kind == RoomKind::LivingSpace && self.person(person).is_staff() {
            return Err(AllocError::InvalidTransfer);
        }

        let current = match kind {
            RoomKind::Office => self.person(person).office(),
            RoomKind::LivingSpace => self.person(person).living_space(),
        };
        if current == Some(target) {
            return Ok(Reallocation::AlreadyThere);
        }

        let outcome = match current {
            Some(old) => {
                self.rooms[old.0 as usize].occupants.retain(|p| *p != person);
                Reallocation::MovedFromRoom(old)
            }
            None => {
                if self.remove_from_waitlist(person, kind) {
                    Reallocation::MovedFromWaitlist
                } else {
                    Reallocation::NewlyPlaced
                }
            }
        };
        self.place(person, target);
        Ok(outcome)
    }

    // ── Restoration (snapshot loading) ──────────────────────────────────
    //
    // Direct placement used when rebuilding a persisted session. Random
    // admission is never re-run here.

    pub(crate) fn restore_person(&mut self, person: Person) -> PersonId {
        let id = PersonId(self.people.len() as u32);
        self.people.push(person);
        id
    }

    pub(crate) fn restore_placement(
        &mut self,
        person: PersonId,
        person_name: &str,
        room_name: &str,
        expected: RoomKind,
    ) -> Result<(), SnapshotError> {
        let room = self
            .find_room(room_name)
            .ok_or_else(|| SnapshotError::UnknownRoom {
                person: person_name.to_string(),
                room: room_name.to_string(),
            })?;
        if self.room(room).kind != expected {
            return Err(SnapshotError::KindMismatch {
                person: person_name.to_string(),
                room: room_name.to_string(),
            });
        }
        if !self.room(room).has_space() {
            return Err(SnapshotError::OverCapacity(room_name.to_string()));
        }
        self.place(person, room);
        Ok(())
    }

    pub(crate) fn restore_office_waitlist(&mut self, person: PersonId) {
        if self.people[person.0 as usize].is_staff() {
            self.staff_waiting_for_office.push(person);
        } else {
            self.fellows_waiting_for_office.push(person);
        }
    }

    pub(crate) fn restore_living_space_waitlist(&mut self, person: PersonId) {
        self.fellows_waiting_for_living_space.push(person);
    }

    // ── Internals ───────────────────────────────────────────────────────

    /// Uniform random choice among all rooms of `kind` that still have
    /// space.
    fn pick_available(&self, kind: RoomKind, rng: &mut impl Rng) -> Option<RoomId> {
        let candidates: Vec<RoomId> = self
            .rooms
            .iter()
            .enumerate()
            .filter(|(_, r)| r.kind == kind && r.has_space())
            .map(|(i, _)| RoomId(i as u32))
            .collect();
        candidates.choose(rng).copied()
    }

    /// Insert `person` into `room` and update the matching back-reference.
    /// Callers guarantee free space and role eligibility.
    fn place(&mut self, person: PersonId, room: RoomId) {
        self.rooms[room.0 as usize].occupants.push(person);
        match self.rooms[room.0 as usize].kind {
            RoomKind::Office => self.people[person.0 as usize].set_office(room),
            RoomKind::LivingSpace => self.people[person.0 as usize].set_living_space(room),
        }
    }

    /// Drop `person` from the waitlist matching `kind` and their role.
    /// Returns whether they were actually on it.
    fn remove_from_waitlist(&mut self, person: PersonId, kind: RoomKind) -> bool {
        let list = match kind {
            RoomKind::Office => {
                if self.people[person.0 as usize].is_staff() {
                    &mut self.staff_waiting_for_office
                } else {
                    &mut self.fellows_waiting_for_office
                }
            }
            RoomKind::LivingSpace => &mut self.fellows_waiting_for_living_space,
        };
        let before = list.len();
        list.retain(|p| *p != person);
        list.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_create_rooms() {
        let mut alloc = Allocator::new();
        let outcomes = alloc
            .create_rooms(&names(&["blue", "red"]), RoomKind::Office)
            .unwrap();
        assert_eq!(
            outcomes,
            vec![
                RoomCreation::Created(RoomId(0)),
                RoomCreation::Created(RoomId(1)),
            ]
        );
        assert_eq!(alloc.offices().count(), 2);
    }

    #[test]
    fn test_create_rooms_empty_batch() {
        let mut alloc = Allocator::new();
        assert_eq!(
            alloc.create_rooms(&[], RoomKind::Office),
            Err(AllocError::InvalidArgument)
        );
    }

    #[test]
    fn test_duplicate_name_skipped_batch_continues() {
        let mut alloc = Allocator::new();
        alloc
            .create_rooms(&names(&["blue"]), RoomKind::Office)
            .unwrap();
        // Same name as a living space, plus one fresh name.
        let outcomes = alloc
            .create_rooms(&names(&["blue", "orange"]), RoomKind::LivingSpace)
            .unwrap();
        assert_eq!(outcomes[0], RoomCreation::Duplicate("blue".to_string()));
        assert_eq!(outcomes[1], RoomCreation::Created(RoomId(1)));
        assert_eq!(alloc.rooms().len(), 2);
    }

    #[test]
    fn test_room_names_case_sensitive() {
        let mut alloc = Allocator::new();
        alloc
            .create_rooms(&names(&["blue"]), RoomKind::Office)
            .unwrap();
        let outcomes = alloc
            .create_rooms(&names(&["Blue"]), RoomKind::Office)
            .unwrap();
        assert_eq!(outcomes[0], RoomCreation::Created(RoomId(1)));
    }

    #[test]
    fn test_office_overflow_goes_to_waitlist() {
        let mut alloc = Allocator::new();
        alloc
            .create_rooms(&names(&["blue"]), RoomKind::Office)
            .unwrap();
        let mut rng = rng();
        for i in 1..=7 {
            alloc.admit_fellow(format!("name{i}"), false, &mut rng);
        }
        let blue = alloc.find_room("blue").unwrap();
        assert_eq!(alloc.room(blue).occupants.len(), 6);
        assert_eq!(alloc.fellows_waiting_for_office().len(), 1);
        let waiting = alloc.fellows_waiting_for_office()[0];
        assert_eq!(alloc.person(waiting).name, "name7");
    }

    #[test]
    fn test_living_space_overflow_goes_to_waitlist() {
        let mut alloc = Allocator::new();
        alloc
            .create_rooms(&names(&["blue"]), RoomKind::LivingSpace)
            .unwrap();
        let mut rng = rng();
        for i in 1..=8 {
            alloc.admit_fellow(format!("name{i}"), true, &mut rng);
        }
        let blue = alloc.find_room("blue").unwrap();
        assert_eq!(alloc.room(blue).occupants.len(), 4);
        assert_eq!(alloc.fellows_waiting_for_living_space().len(), 4);
        // No office exists, so everyone also waits for one.
        assert_eq!(alloc.fellows_waiting_for_office().len(), 8);
    }

    #[test]
    fn test_fellow_without_accommodation_skips_living_space() {
        let mut alloc = Allocator::new();
        alloc
            .create_rooms(&names(&["orange"]), RoomKind::LivingSpace)
            .unwrap();
        let admission = alloc.admit_fellow("Patrick Wane", false, &mut rng());
        assert_eq!(admission.living_space, None);
        assert!(alloc.fellows_waiting_for_living_space().is_empty());
        let orange = alloc.find_room("orange").unwrap();
        assert!(alloc.room(orange).occupants.is_empty());
    }

    #[test]
    fn test_staff_admission_office_only() {
        let mut alloc = Allocator::new();
        alloc
            .create_rooms(&names(&["blue"]), RoomKind::Office)
            .unwrap();
        alloc
            .create_rooms(&names(&["orange"]), RoomKind::LivingSpace)
            .unwrap();
        let admission = alloc.admit_staff("Samuel Obi", &mut rng());
        let office = admission.office.unwrap();
        assert_eq!(alloc.room(office).name, "blue");
        let orange = alloc.find_room("orange").unwrap();
        assert!(alloc.room(orange).occupants.is_empty());
    }

    #[test]
    fn test_admission_spreads_across_offices() {
        let mut alloc = Allocator::new();
        alloc
            .create_rooms(&names(&["a", "b", "c", "d"]), RoomKind::Office)
            .unwrap();
        let mut rng = rng();
        for i in 0..12 {
            alloc.admit_fellow(format!("fellow{i}"), false, &mut rng);
        }
        // Uniform choice among rooms with space: with 12 people over 4
        // six-seat offices, first-fit would leave two offices empty.
        let occupied = alloc.offices().filter(|r| !r.occupants.is_empty()).count();
        assert!(occupied >= 3, "occupied only {occupied} of 4 offices");
    }

    #[test]
    fn test_reallocate_to_unknown_room() {
        let mut alloc = Allocator::new();
        assert_eq!(
            alloc.reallocate_person("Patrick Wane", "red"),
            Err(AllocError::RoomNotFound("red".to_string()))
        );
    }

    #[test]
    fn test_reallocate_unknown_person() {
        let mut alloc = Allocator::new();
        alloc
            .create_rooms(&names(&["red"]), RoomKind::Office)
            .unwrap();
        assert_eq!(
            alloc.reallocate_person("Patrick Wane", "red"),
            Err(AllocError::PersonNotFound("Patrick Wane".to_string()))
        );
    }

    #[test]
    fn test_reallocate_to_full_room() {
        let mut alloc = Allocator::new();
        alloc
            .create_rooms(&names(&["blue"]), RoomKind::Office)
            .unwrap();
        let mut rng = rng();
        for i in 0..6 {
            alloc.admit_fellow(format!("fellow{i}"), false, &mut rng);
        }
        alloc.admit_fellow("Patrick Wane", false, &mut rng);
        assert_eq!(
            alloc.reallocate_person("Patrick Wane", "blue"),
            Err(AllocError::CapacityExceeded("blue".to_string()))
        );
        // The failed transfer left the waitlist untouched.
        assert_eq!(alloc.fellows_waiting_for_office().len(), 1);
    }

    #[test]
    fn test_reallocate_office_to_office() {
        let mut alloc = Allocator::new();
        alloc
            .create_rooms(&names(&["blue"]), RoomKind::Office)
            .unwrap();
        let mut rng = rng();
        alloc.admit_fellow("Patrick Wane", false, &mut rng);
        alloc
            .create_rooms(&names(&["red"]), RoomKind::Office)
            .unwrap();

        let blue = alloc.find_room("blue").unwrap();
        let red = alloc.find_room("red").unwrap();
        let outcome = alloc.reallocate_person("Patrick Wane", "red").unwrap();
        assert_eq!(outcome, Reallocation::MovedFromRoom(blue));

        let patrick = alloc.find_person("Patrick Wane").unwrap();
        assert!(alloc.room(blue).occupants.is_empty());
        assert_eq!(alloc.room(red).occupants, vec![patrick]);
        assert_eq!(alloc.person(patrick).office(), Some(red));
    }

    #[test]
    fn test_reallocate_same_room_is_noop() {
        let mut alloc = Allocator::new();
        alloc
            .create_rooms(&names(&["blue"]), RoomKind::Office)
            .unwrap();
        let mut rng = rng();
        alloc.admit_fellow("Patrick Wane", false, &mut rng);
        let outcome = alloc.reallocate_person("Patrick Wane", "blue").unwrap();
        assert_eq!(outcome, Reallocation::AlreadyThere);
        let blue = alloc.find_room("blue").unwrap();
        assert_eq!(alloc.room(blue).occupants.len(), 1);
    }

    #[test]
    fn test_reallocate_staff_to_living_space_rejected() {
        let mut alloc = Allocator::new();
        alloc
            .create_rooms(&names(&["blue"]), RoomKind::Office)
            .unwrap();
        let mut rng = rng();
        alloc.admit_staff("Samuel Obi", &mut rng);
        alloc
            .create_rooms(&names(&["orange"]), RoomKind::LivingSpace)
            .unwrap();

        assert_eq!(
            alloc.reallocate_person("Samuel Obi", "orange"),
            Err(AllocError::InvalidTransfer)
        );
        // Samuel's office assignment is unchanged.
        let samuel = alloc.find_person("Samuel Obi").unwrap();
        let blue = alloc.find_room("blue").unwrap();
        assert_eq!(alloc.person(samuel).office(), Some(blue));
        assert_eq!(alloc.room(blue).occupants, vec![samuel]);
        let orange = alloc.find_room("orange").unwrap();
        assert!(alloc.room(orange).occupants.is_empty());
    }

    #[test]
    fn test_reallocate_promotes_from_waitlist() {
        let mut alloc = Allocator::new();
        let mut rng = rng();
        alloc.admit_staff("Samuel Obi", &mut rng);
        assert_eq!(alloc.staff_waiting_for_office().len(), 1);

        alloc
            .create_rooms(&names(&["blue"]), RoomKind::Office)
            .unwrap();
        let outcome = alloc.reallocate_person("Samuel Obi", "blue").unwrap();
        assert_eq!(outcome, Reallocation::MovedFromWaitlist);
        assert!(alloc.staff_waiting_for_office().is_empty());
        let samuel = alloc.find_person("Samuel Obi").unwrap();
        let blue = alloc.find_room("blue").unwrap();
        assert_eq!(alloc.room(blue).occupants, vec![samuel]);
        assert_eq!(alloc.person(samuel).office(), Some(blue));
    }

    #[test]
    fn test_reallocate_fellow_into_living_space_updates_living_reference() {
        let mut alloc = Allocator::new();
        alloc
            .create_rooms(&names(&["blue"]), RoomKind::Office)
            .unwrap();
        let mut rng = rng();
        alloc.admit_fellow("Patrick Wane", true, &mut rng);
        alloc
            .create_rooms(&names(&["orange"]), RoomKind::LivingSpace)
            .unwrap();

        let outcome = alloc.reallocate_person("Patrick Wane", "orange").unwrap();
        assert_eq!(outcome, Reallocation::MovedFromWaitlist);

        let patrick = alloc.find_person("Patrick Wane").unwrap();
        let blue = alloc.find_room("blue").unwrap();
        let orange = alloc.find_room("orange").unwrap();
        // The office reference is untouched; the living-space reference
        // moved.
        assert_eq!(alloc.person(patrick).office(), Some(blue));
        assert_eq!(alloc.person(patrick).living_space(), Some(orange));
        assert_eq!(alloc.room(blue).occupants, vec![patrick]);
        assert_eq!(alloc.room(orange).occupants, vec![patrick]);
    }

    #[test]
    fn test_reallocate_opts_fellow_into_accommodation() {
        let mut alloc = Allocator::new();
        alloc
            .create_rooms(&names(&["orange"]), RoomKind::LivingSpace)
            .unwrap();
        let mut rng = rng();
        alloc.admit_fellow("Patrick Wane", false, &mut rng);

        let outcome = alloc.reallocate_person("Patrick Wane", "orange").unwrap();
        assert_eq!(outcome, Reallocation::NewlyPlaced);
        let patrick = alloc.find_person("Patrick Wane").unwrap();
        let orange = alloc.find_room("orange").unwrap();
        assert_eq!(alloc.person(patrick).living_space(), Some(orange));
    }

    #[test]
    fn test_find_person_prefers_earliest_namesake() {
        let mut alloc = Allocator::new();
        let mut rng = rng();
        let first = alloc.admit_fellow("John Doe", false, &mut rng).person;
        alloc.admit_staff("John Doe", &mut rng);
        assert_eq!(alloc.find_person("John Doe"), Some(first));
    }
}
