use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};

use crate::hospitals::HospitalRecord;

/// Print a prompt and read one trimmed line. `None` once input is exhausted.
pub fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, message: &str) -> io::Result<Option<String>> {
    write!(out, "{}: ", message)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    Ok(Some(line.trim().to_string()))
}

/// Display welcome message
pub fn display_welcome<W: Write>(out: &mut W, conditions: &[&str]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "╔═══════════════════════════════════════════════════════════════╗")?;
    writeln!(out, "║                 Disease & Hospital Finder                     ║")?;
    writeln!(out, "╠═══════════════════════════════════════════════════════════════╣")?;
    writeln!(out, "║  Enter a condition and your location to see common            ║")?;
    writeln!(out, "║  medications and the nearest hospitals (OpenStreetMap).       ║")?;
    writeln!(out, "║                                                               ║")?;
    writeln!(out, "║  Medication names are general suggestions, not prescriptions. ║")?;
    writeln!(out, "║  Hospital data comes from volunteers and may be out of date.  ║")?;
    writeln!(out, "║  In an emergency, call your local emergency number.           ║")?;
    writeln!(out, "╚═══════════════════════════════════════════════════════════════╝")?;
    writeln!(out)?;
    writeln!(out, "Known conditions: {}", conditions.join("; "))?;
    writeln!(out)
}

pub fn display_goodbye<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Exiting... Stay healthy!")
}

pub fn display_searching<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "\nSearching for hospitals... Please wait...\n")
}

/// Spinner shown on stderr while the network calls run.
///
/// Ticked by hand from the calling thread, see [`spinner_stage`].
pub fn searching_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb
}

/// Advance the spinner to the next lookup stage
pub fn spinner_stage(pb: &ProgressBar, message: &'static str) {
    pb.set_message(message);
    pb.tick();
}

/// Numbered hospital list; prints nothing when there are no hospitals
pub fn display_hospitals<W: Write>(out: &mut W, location: &str, hospitals: &[HospitalRecord]) -> io::Result<()> {
    if hospitals.is_empty() {
        return Ok(());
    }

    writeln!(out, "Top hospitals near {}:", location)?;
    writeln!(out, "{}", "=".repeat(50))?;
    for (i, hospital) in hospitals.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, hospital.name)?;
        writeln!(out, "   Address: {}", hospital.address)?;
        writeln!(out, "   Contact: {}\n", hospital.contact)?;
    }
    Ok(())
}

/// Medication checklist followed by the disclaimer
pub fn display_medications<W: Write>(out: &mut W, condition: &str, medications: &[&str]) -> io::Result<()> {
    writeln!(out, "Recommended medications for {}:", capitalize(condition))?;
    writeln!(out, "{}", "-".repeat(50))?;
    for med in medications {
        writeln!(out, "[x] {}", med)?;
    }
    writeln!(out, "\nAlways consult a doctor before taking any medication.\n")
}

/// User-facing diagnostic for a failed or empty lookup
pub fn display_problem<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "{}", message)
}

/// First character upper case, the rest lower case
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
