//! Bulk loader for the person-per-line admission format.
//!
//! Each line reads `FIRSTNAME LASTNAME FELLOW|STAFF [Y]`; the trailing
//! column only means accommodation when it is literally `Y`. Malformed
//! lines are recorded with their line number and skipped; loading
//! continues with the rest of the file.

use std::fs;
use std::io;
use std::path::Path;

use quarters_logic::allocator::Allocator;
use rand::Rng;

/// What a bulk load admitted and what it skipped.
#[derive(Debug, Default)]
pub struct LoadSummary {
    pub fellows: usize,
    pub staff: usize,
    /// Line number and reason for each skipped line.
    pub skipped: Vec<(usize, String)>,
}

/// Admit every well-formed line of the file at `path`.
pub fn load_people(
    alloc: &mut Allocator,
    path: &Path,
    rng: &mut impl Rng,
) -> io::Result<LoadSummary> {
    let text = fs::read_to_string(path)?;
    let mut summary = LoadSummary::default();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if !(3..=4).contains(&fields.len()) {
            summary.skipped.push((
                line_no,
                format!("expected 'FIRSTNAME LASTNAME FELLOW|STAFF [Y]', got '{line}'"),
            ));
            continue;
        }
        let name = format!("{} {}", fields[0], fields[1]);
        match fields[2] {
            "FELLOW" => {
                let wants_accommodation = fields.get(3).copied() == Some("Y");
                alloc.admit_fellow(name, wants_accommodation, rng);
                summary.fellows += 1;
            }
            "STAFF" => {
                alloc.admit_staff(name, rng);
                summary.staff += 1;
            }
            other => {
                summary
                    .skipped
                    .push((line_no, format!("unknown role '{other}'")));
            }
        }
    }
    Ok(summary)
}
