//! One interactive session: the allocator, its random source, and the
//! dispatch from parsed commands to core operations.
//!
//! Every core outcome renders as a user-facing message; domain failures
//! never leave this layer as errors.

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::debug;

use quarters_logic::allocator::{Allocator, Reallocation, RoomCreation};
use quarters_logic::report::{allocations_report, unallocated_report};
use quarters_store::Store;

use crate::commands::{Command, PersonRole, YesNo};
use crate::loader;
use crate::output::{print_error, print_info, print_success, print_warning};

pub struct Session<R: Rng> {
    alloc: Allocator,
    rng: R,
    default_db: PathBuf,
}

impl<R: Rng> Session<R> {
    pub fn new(rng: R, default_db: PathBuf) -> Self {
        Self {
            alloc: Allocator::new(),
            rng,
            default_db,
        }
    }

    #[cfg(test)]
    pub fn allocator(&self) -> &Allocator {
        &self.alloc
    }

    /// Run one command. Returns `false` when the session should end.
    pub fn execute(&mut self, command: Command) -> bool {
        debug!(?command, "dispatching");
        match command {
            Command::CreateRoom { room_type, names } => {
                match self.alloc.create_rooms(&names, room_type.kind()) {
                    Ok(outcomes) => {
                        for outcome in outcomes {
                            match outcome {
                                RoomCreation::Created(id) => print_success(&format!(
                                    "{} '{}' created",
                                    room_type.noun(),
                                    self.alloc.room(id).name
                                )),
                                RoomCreation::Duplicate(name) => print_warning(&format!(
                                    "room name '{name}' already exists, skipped"
                                )),
                            }
                        }
                    }
                    Err(err) => print_error(&err.to_string()),
                }
            }

            Command::AddPerson {
                first_name,
                last_name,
                role,
                wants_accommodation,
            } => {
                let name = format!("{first_name} {last_name}");
                let wants = wants_accommodation == Some(YesNo::Y);
                match role {
                    PersonRole::Fellow => self.add_fellow(name, wants),
                    PersonRole::Staff => {
                        if wants {
                            print_warning("staff can not be allocated a living space; ignoring the accommodation flag");
                        }
                        self.add_staff(name);
                    }
                }
            }

            Command::PrintRoom { name } => match self.alloc.find_room(&name) {
                Some(id) => {
                    let occupants = self.alloc.occupant_names(id);
                    if occupants.is_empty() {
                        print_info(&format!("room '{name}' is empty"));
                    } else {
                        for occupant in occupants {
                            println!("{occupant}");
                        }
                    }
                }
                None => print_error(&format!("no room named '{name}'")),
            },

            Command::PrintAllocations { output } => {
                self.emit_report(&allocations_report(&self.alloc), output.as_deref());
            }

            Command::PrintUnallocated { output } => {
                self.emit_report(&unallocated_report(&self.alloc), output.as_deref());
            }

            Command::ReallocatePerson {
                first_name,
                last_name,
                room,
            } => {
                let name = format!("{first_name} {last_name}");
                match self.alloc.reallocate_person(&name, &room) {
                    Ok(Reallocation::AlreadyThere) => {
                        print_info(&format!("{name} is already in '{room}'"));
                    }
                    Ok(Reallocation::MovedFromRoom(old)) => print_success(&format!(
                        "moved {name} from '{}' to '{room}'",
                        self.alloc.room(old).name
                    )),
                    Ok(Reallocation::MovedFromWaitlist) => print_success(&format!(
                        "{name} taken off the waitlist and placed in '{room}'"
                    )),
                    Ok(Reallocation::NewlyPlaced) => {
                        print_success(&format!("{name} placed in '{room}'"));
                    }
                    Err(err) => print_error(&err.to_string()),
                }
            }

            Command::LoadPeople { path } => {
                match loader::load_people(&mut self.alloc, &path, &mut self.rng) {
                    Ok(summary) => {
                        print_success(&format!(
                            "admitted {} fellows and {} staff from '{}'",
                            summary.fellows,
                            summary.staff,
                            path.display()
                        ));
                        for (line_no, reason) in &summary.skipped {
                            print_warning(&format!("line {line_no} skipped: {reason}"));
                        }
                    }
                    Err(err) => {
                        print_error(&format!("could not read '{}': {err}", path.display()));
                    }
                }
            }

            Command::SaveState { db } => {
                let path = state_path(db.as_deref(), &self.default_db);
                match Store::open(&path).and_then(|mut store| store.save_all(&self.alloc.snapshot()))
                {
                    Ok(()) => print_success(&format!("state saved to '{}'", path.display())),
                    Err(err) => print_error(&format!("save failed: {err}")),
                }
            }

            Command::LoadState { db } => {
                let path = state_path(db.as_deref(), &self.default_db);
                if !path.exists() {
                    print_error(&format!("no saved state at '{}'", path.display()));
                    return true;
                }
                match load_session(&path) {
                    Ok(alloc) => {
                        print_success(&format!(
                            "state loaded from '{}' ({} rooms, {} people)",
                            path.display(),
                            alloc.rooms().len(),
                            alloc.people().len()
                        ));
                        self.alloc = alloc;
                    }
                    Err(err) => print_error(&err),
                }
            }

            Command::Quit => {
                println!("Good bye!");
                return false;
            }
        }
        true
    }

    fn add_fellow(&mut self, name: String, wants_accommodation: bool) {
        let admission = self
            .alloc
            .admit_fellow(name.clone(), wants_accommodation, &mut self.rng);
        match admission.office {
            Some(id) => print_success(&format!(
                "fellow {name} placed in office '{}'",
                self.alloc.room(id).name
            )),
            None => print_warning(&format!(
                "no office has space; {name} added to the office waitlist"
            )),
        }
        if wants_accommodation {
            match admission.living_space {
                Some(id) => print_success(&format!(
                    "{name} given living space '{}'",
                    self.alloc.room(id).name
                )),
                None => print_warning(&format!(
                    "no living space has space; {name} added to the living-space waitlist"
                )),
            }
        }
    }

    fn add_staff(&mut self, name: String) {
        let admission = self.alloc.admit_staff(name.clone(), &mut self.rng);
        match admission.office {
            Some(id) => print_success(&format!(
                "staff {name} placed in office '{}'",
                self.alloc.room(id).name
            )),
            None => print_warning(&format!(
                "no office has space; {name} added to the office waitlist"
            )),
        }
    }

    /// Write the report verbatim to the file, or print it verbatim. The
    /// text is the artifact; both destinations receive the same bytes.
    fn emit_report(&self, text: &str, destination: Option<&Path>) {
        match destination {
            Some(path) => match fs::write(path, text) {
                Ok(()) => print_success(&format!("report written to '{}'", path.display())),
                Err(err) => print_error(&format!("could not write '{}': {err}", path.display())),
            },
            None => print!("{text}"),
        }
    }
}

/// Resolve a `save-state`/`load-state` database name to a path. A bare
/// name gets a `.db` extension; no name means the session default.
fn state_path(name: Option<&str>, default: &Path) -> PathBuf {
    match name {
        None => default.to_path_buf(),
        Some(name) if name.ends_with(".db") => PathBuf::from(name),
        Some(name) => PathBuf::from(format!("{name}.db")),
    }
}

fn load_session(path: &Path) -> Result<Allocator, String> {
    let store = Store::open(path).map_err(|e| format!("load failed: {e}"))?;
    let snapshot = store.load_all().map_err(|e| format!("load failed: {e}"))?;
    Allocator::from_snapshot(snapshot).map_err(|e| format!("saved state is inconsistent: {e}"))
}
