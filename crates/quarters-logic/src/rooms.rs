//! Room archetypes, capacities, and occupancy.

use serde::{Deserialize, Serialize};

use crate::people::PersonId;

/// Identifier of a room in the allocator's creation-ordered room list.
///
/// Rooms are never deleted, so the index stays stable for the whole
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(pub u32);

/// The two fixed room archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomKind {
    /// Workspace for fellows and staff.
    Office,
    /// Accommodation for fellows who opted in.
    LivingSpace,
}

impl RoomKind {
    /// Fixed capacity of the archetype.
    pub const fn capacity(self) -> usize {
        match self {
            RoomKind::Office => 6,
            RoomKind::LivingSpace => 4,
        }
    }

    /// Label used in report headers.
    pub const fn label(self) -> &'static str {
        match self {
            RoomKind::Office => "OFFICE",
            RoomKind::LivingSpace => "LIVING SPACE",
        }
    }
}

/// A bounded-capacity room.
///
/// The room owns its occupant list; people hold only a [`RoomId`]
/// back-reference. Free space is derived from the occupant count, never
/// stored separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    pub kind: RoomKind,
    pub occupants: Vec<PersonId>,
}

impl Room {
    pub fn new(name: impl Into<String>, kind: RoomKind) -> Self {
        Self {
            name: name.into(),
            kind,
            occupants: Vec::new(),
        }
    }

    /// Whether at least one unit of capacity remains.
    pub fn has_space(&self) -> bool {
        self.occupants.len() < self.kind.capacity()
    }
}
