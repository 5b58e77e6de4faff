//! Command-per-line grammar for the interactive prompt.
//!
//! Each input line is tokenized on whitespace and parsed as a multicall
//! invocation, so the first token names the command and `help` works the
//! usual way.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use quarters_logic::rooms::RoomKind;

/// One line of the interactive prompt.
#[derive(Debug, Parser)]
#[command(multicall = true)]
pub struct ReplLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Create one or more rooms of the given type.
    CreateRoom {
        #[arg(value_enum, ignore_case = true)]
        room_type: RoomType,
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Admit a fellow or staff member.
    AddPerson {
        first_name: String,
        last_name: String,
        #[arg(value_enum, ignore_case = true)]
        role: PersonRole,
        /// Whether a fellow wants a living space.
        #[arg(value_enum, ignore_case = true)]
        wants_accommodation: Option<YesNo>,
    },

    /// Print the occupants of one room.
    PrintRoom { name: String },

    /// Print the allocations report, to the console or a file.
    PrintAllocations {
        #[arg(long = "o", value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print everyone still on a waitlist.
    PrintUnallocated {
        #[arg(long = "o", value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Move a person, placed or waitlisted, into a different room.
    ReallocatePerson {
        first_name: String,
        last_name: String,
        room: String,
    },

    /// Admit people in bulk from a text file.
    LoadPeople { path: PathBuf },

    /// Save the session to the state database.
    SaveState {
        #[arg(long, value_name = "NAME")]
        db: Option<String>,
    },

    /// Replace the session with one loaded from the state database.
    LoadState {
        #[arg(long, value_name = "NAME")]
        db: Option<String>,
    },

    /// Leave the program.
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoomType {
    Office,
    #[value(alias = "living_space")]
    LivingSpace,
}

impl RoomType {
    pub fn kind(self) -> RoomKind {
        match self {
            RoomType::Office => RoomKind::Office,
            RoomType::LivingSpace => RoomKind::LivingSpace,
        }
    }

    /// Noun used in console messages.
    pub fn noun(self) -> &'static str {
        match self {
            RoomType::Office => "office",
            RoomType::LivingSpace => "living space",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PersonRole {
    Fellow,
    Staff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum YesNo {
    Y,
    N,
}
