//! Fellows and staff, with weak back-references to their rooms.

use serde::{Deserialize, Serialize};

use crate::rooms::RoomId;

/// Identifier of a person in the allocator's admission-ordered roster.
///
/// People are never deleted, so the index stays stable for the whole
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonId(pub u32);

/// Role-specific placement state. Reallocation dispatches on this tag.
///
/// The room references are plain identifiers, not owning pointers: the
/// room's occupant list is authoritative and these exist for lookup
/// convenience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Fellow {
        /// Accommodation preference, fixed at admission.
        wants_accommodation: bool,
        office: Option<RoomId>,
        living_space: Option<RoomId>,
    },
    Staff {
        office: Option<RoomId>,
    },
}

/// A person on the roster.
///
/// Names are not unique across the system; name lookup resolves to the
/// earliest admission, so name-based reallocation is ambiguous when
/// duplicates exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub role: Role,
}

impl Person {
    pub fn fellow(name: impl Into<String>, wants_accommodation: bool) -> Self {
        Self {
            name: name.into(),
            role: Role::Fellow {
                wants_accommodation,
                office: None,
                living_space: None,
            },
        }
    }

    pub fn staff(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: Role::Staff { office: None },
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self.role, Role::Staff { .. })
    }

    pub fn wants_accommodation(&self) -> bool {
        matches!(
            self.role,
            Role::Fellow {
                wants_accommodation: true,
                ..
            }
        )
    }

    /// Current office, for either role.
    pub fn office(&self) -> Option<RoomId> {
        match self.role {
            Role::Fellow { office, .. } => office,
            Role::Staff { office } => office,
        }
    }

    /// Current living space. Always `None` for staff.
    pub fn living_space(&self) -> Option<RoomId> {
        match self.role {
            Role::Fellow { living_space, .. } => living_space,
            Role::Staff { .. } => None,
        }
    }

    pub(crate) fn set_office(&mut self, id: RoomId) {
        match &mut self.role {
            Role::Fellow { office, .. } => *office = Some(id),
            Role::Staff { office } => *office = Some(id),
        }
    }

    /// Callers must rule out staff first; a staff role is left untouched.
    pub(crate) fn set_living_space(&mut self, id: RoomId) {
        if let Role::Fellow { living_space, .. } = &mut self.role {
            *living_space = Some(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fellow_starts_unplaced() {
        let fellow = Person::fellow("Patrick Wane", true);
        assert!(!fellow.is_staff());
        assert!(fellow.wants_accommodation());
        assert_eq!(fellow.office(), None);
        assert_eq!(fellow.living_space(), None);
    }

    #[test]
    fn test_staff_never_holds_living_space() {
        let mut staff = Person::staff("Samuel Obi");
        staff.set_living_space(RoomId(0));
        assert_eq!(staff.living_space(), None);
    }

    #[test]
    fn test_set_office_both_roles() {
        let mut fellow = Person::fellow("A B", false);
        let mut staff = Person::staff("C D");
        fellow.set_office(RoomId(3));
        staff.set_office(RoomId(3));
        assert_eq!(fellow.office(), Some(RoomId(3)));
        assert_eq!(staff.office(), Some(RoomId(3)));
    }
}
