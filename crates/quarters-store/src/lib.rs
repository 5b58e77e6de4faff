//! SQLite persistence gateway for allocator sessions.
//!
//! Saves and loads [`Snapshot`]s against a small relational schema. Weak
//! room references on people are flattened to foreign-key ids on save and
//! resolved back to room names on load; the core rebuilds occupancy from
//! the returned snapshot, never by re-running random admission.

use std::path::Path;

use rusqlite::{params, Connection};
use thiserror::Error;
use tracing::debug;

use quarters_logic::rooms::RoomKind;
use quarters_logic::snapshot::{PersonKind, PersonRecord, RoomRecord, Snapshot, SNAPSHOT_VERSION};

/// Failures at the database boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("unknown room kind '{0}' in database")]
    UnknownKind(String),

    #[error("unknown role '{0}' in database")]
    UnknownRole(String),

    #[error("person '{0}' references a room missing from the saved state")]
    MissingRoom(String),
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS rooms (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    kind TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS people (
    id                  INTEGER PRIMARY KEY,
    name                TEXT NOT NULL,
    role                TEXT NOT NULL,
    wants_accommodation INTEGER NOT NULL DEFAULT 0,
    office_id           INTEGER REFERENCES rooms(id),
    living_space_id     INTEGER REFERENCES rooms(id)
);
";

/// Handle on one SQLite database file.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (and if needed create) the database at `path`, installing the
    /// schema when absent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch(SCHEMA)?;
        debug!(path = %path.as_ref().display(), "opened state database");
        Ok(Self { conn })
    }

    /// Replace the stored state with `snapshot`, atomically.
    pub fn save_all(&mut self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM people", [])?;
        tx.execute("DELETE FROM rooms", [])?;

        for room in &snapshot.rooms {
            tx.execute(
                "INSERT INTO rooms (name, kind) VALUES (?1, ?2)",
                params![room.name, kind_to_sql(room.kind)],
            )?;
        }
        for person in &snapshot.people {
            let office_id = room_row_id(&tx, &person.name, person.office.as_deref())?;
            let living_space_id = room_row_id(&tx, &person.name, person.living_space.as_deref())?;
            tx.execute(
                "INSERT INTO people (name, role, wants_accommodation, office_id, living_space_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    person.name,
                    role_to_sql(person.kind),
                    person.wants_accommodation,
                    office_id,
                    living_space_id,
                ],
            )?;
        }
        tx.commit()?;
        debug!(
            rooms = snapshot.rooms.len(),
            people = snapshot.people.len(),
            "saved state"
        );
        Ok(())
    }

    /// Read the stored state back, in insertion order.
    pub fn load_all(&self) -> Result<Snapshot, StoreError> {
        let mut room_names: Vec<(i64, String)> = Vec::new();
        let mut rooms = Vec::new();
        {
            let mut stmt = self
                .conn
                .prepare("SELECT id, name, kind FROM rooms ORDER BY id")?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let id: i64 = row.get(0)?;
                let name: String = row.get(1)?;
                let kind: String = row.get(2)?;
                room_names.push((id, name.clone()));
                rooms.push(RoomRecord {
                    name,
                    kind: kind_from_sql(&kind)?,
                });
            }
        }

        let mut people = Vec::new();
        {
            let mut stmt = self.conn.prepare(
                "SELECT name, role, wants_accommodation, office_id, living_space_id
                 FROM people ORDER BY id",
            )?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let name: String = row.get(0)?;
                let role: String = row.get(1)?;
                let office_id: Option<i64> = row.get(3)?;
                let living_space_id: Option<i64> = row.get(4)?;
                people.push(PersonRecord {
                    kind: role_from_sql(&role)?,
                    wants_accommodation: row.get(2)?,
                    office: resolve_room(&room_names, &name, office_id)?,
                    living_space: resolve_room(&room_names, &name, living_space_id)?,
                    name,
                });
            }
        }

        debug!(rooms = rooms.len(), people = people.len(), "loaded state");
        Ok(Snapshot {
            version: SNAPSHOT_VERSION,
            rooms,
            people,
        })
    }
}

fn kind_to_sql(kind: RoomKind) -> &'static str {
    match kind {
        RoomKind::Office => "office",
        RoomKind::LivingSpace => "living_space",
    }
}

fn kind_from_sql(text: &str) -> Result<RoomKind, StoreError> {
    match text {
        "office" => Ok(RoomKind::Office),
        "living_space" => Ok(RoomKind::LivingSpace),
        other => Err(StoreError::UnknownKind(other.to_string())),
    }
}

fn role_to_sql(kind: PersonKind) -> &'static str {
    match kind {
        PersonKind::Fellow => "fellow",
        PersonKind::Staff => "staff",
    }
}

fn role_from_sql(text: &str) -> Result<PersonKind, StoreError> {
    match text {
        "fellow" => Ok(PersonKind::Fellow),
        "staff" => Ok(PersonKind::Staff),
        other => Err(StoreError::UnknownRole(other.to_string())),
    }
}

/// Foreign-key id for a referenced room name, within the open transaction.
fn room_row_id(
    tx: &Connection,
    person: &str,
    room: Option<&str>,
) -> Result<Option<i64>, StoreError> {
    let Some(name) = room else { return Ok(None) };
    let mut stmt = tx.prepare("SELECT id FROM rooms WHERE name = ?1")?;
    let mut rows = stmt.query(params![name])?;
    match rows.next()? {
        Some(row) => Ok(Some(row.get(0)?)),
        None => Err(StoreError::MissingRoom(person.to_string())),
    }
}

fn resolve_room(
    room_names: &[(i64, String)],
    person: &str,
    id: Option<i64>,
) -> Result<Option<String>, StoreError> {
    let Some(id) = id else { return Ok(None) };
    room_names
        .iter()
        .find(|(room_id, _)| *room_id == id)
        .map(|(_, name)| Some(name.clone()))
        .ok_or_else(|| StoreError::MissingRoom(person.to_string()))
}
