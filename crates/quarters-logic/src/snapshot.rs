//! Versioned plain-data image of an allocator session.
//!
//! A [`Snapshot`] flattens the session to rooms and people keyed by name,
//! with weak room references carried as room names. Loading rebuilds
//! occupancy by direct placement in roster order (the random admission
//! procedure is never re-run) and restores waitlist membership for
//! everyone left unplaced.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::allocator::Allocator;
use crate::people::{Person, Role};
use crate::rooms::{RoomId, RoomKind};

/// Version number for the snapshot format (increment when it changes).
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable image of one working session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub rooms: Vec<RoomRecord>,
    pub people: Vec<PersonRecord>,
}

/// One room, in creation order. Capacity is implied by the kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub name: String,
    pub kind: RoomKind,
}

/// Role tag for a stored person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonKind {
    Fellow,
    Staff,
}

/// One person, in admission order, with room references by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub name: String,
    pub kind: PersonKind,
    pub wants_accommodation: bool,
    pub office: Option<String>,
    pub living_space: Option<String>,
}

/// Failures while rebuilding an allocator from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("snapshot version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("duplicate room name '{0}' in snapshot")]
    DuplicateRoom(String),

    #[error("person '{person}' references unknown room '{room}'")]
    UnknownRoom { person: String, room: String },

    #[error("person '{person}' references '{room}' as the wrong room kind")]
    KindMismatch { person: String, room: String },

    #[error("room '{0}' is over capacity in snapshot")]
    OverCapacity(String),

    #[error("staff member '{0}' holds a living space")]
    StaffInLivingSpace(String),
}

impl Allocator {
    /// Flatten the session into a [`Snapshot`].
    pub fn snapshot(&self) -> Snapshot {
        let room_name = |id: Option<RoomId>| id.map(|id| self.room(id).name.clone());
        let rooms = self
            .rooms()
            .iter()
            .map(|r| RoomRecord {
                name: r.name.clone(),
                kind: r.kind,
            })
            .collect();
        let people = self
            .people()
            .iter()
            .map(|p| match p.role {
                Role::Fellow {
                    wants_accommodation,
                    office,
                    living_space,
                } => PersonRecord {
                    name: p.name.clone(),
                    kind: PersonKind::Fellow,
                    wants_accommodation,
                    office: room_name(office),
                    living_space: room_name(living_space),
                },
                Role::Staff { office } => PersonRecord {
                    name: p.name.clone(),
                    kind: PersonKind::Staff,
                    wants_accommodation: false,
                    office: room_name(office),
                    living_space: None,
                },
            })
            .collect();
        Snapshot {
            version: SNAPSHOT_VERSION,
            rooms,
            people,
        }
    }

    /// Rebuild a session from a [`Snapshot`], validating capacities, room
    /// kinds, and the version tag. Occupants land in roster order.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Allocator, SnapshotError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                found: snapshot.version,
            });
        }

        let mut alloc = Allocator::new();
        for room in &snapshot.rooms {
            let outcomes = alloc
                .create_rooms(std::slice::from_ref(&room.name), room.kind)
                .map_err(|_| SnapshotError::DuplicateRoom(room.name.clone()))?;
            if matches!(outcomes[0], crate::allocator::RoomCreation::Duplicate(_)) {
                return Err(SnapshotError::DuplicateRoom(room.name.clone()));
            }
        }

        for record in snapshot.people {
            if record.kind == PersonKind::Staff && record.living_space.is_some() {
                return Err(SnapshotError::StaffInLivingSpace(record.name));
            }
            let person = match record.kind {
                PersonKind::Fellow => Person::fellow(&record.name, record.wants_accommodation),
                PersonKind::Staff => Person::staff(&record.name),
            };
            let id = alloc.restore_person(person);

            match &record.office {
                Some(room) => {
                    alloc.restore_placement(id, &record.name, room, RoomKind::Office)?
                }
                None => alloc.restore_office_waitlist(id),
            }
            if record.kind == PersonKind::Fellow {
                match &record.living_space {
                    Some(room) => {
                        alloc.restore_placement(id, &record.name, room, RoomKind::LivingSpace)?
                    }
                    None if record.wants_accommodation => {
                        alloc.restore_living_space_waitlist(id)
                    }
                    None => {}
                }
            }
        }
        Ok(alloc)
    }
}
