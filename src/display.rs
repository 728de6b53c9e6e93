use std::fs;
use std::path::{Path, PathBuf};

use crate::badge::{Badge, BadgeSheet};

/// Formats a badge holder as `#id Name (WCA ID)`
pub fn format_person_name(badge: &Badge) -> String {
    match badge.registrant_id {
        Some(id) => format!("#{} {} ({})", id, badge.name, badge.wca_id),
        None => format!("{} ({})", badge.name, badge.wca_id),
    }
}

/// Writes a rendered document into the output directory, creating it if needed.
pub fn write_artifact(dir: &Path, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, bytes)?;
    Ok(path)
}

/// Prints every badge's agenda in a readable format
pub fn print_badge_summary(sheet: &BadgeSheet) {
    println!("\n=== {} ===", sheet.competition);
    println!("Total badges generated: {}", sheet.badges.len());

    if sheet.skipped_assignments > 0 {
        println!("⚠️  Assignments skipped: {}", sheet.skipped_assignments);
    }
    if !sheet.skipped_persons.is_empty() {
        println!("⚠️  Persons without badge ({}):", sheet.skipped_persons.len());
        for name in &sheet.skipped_persons {
            println!("  - {}", name);
        }
    }

    for badge in &sheet.badges {
        println!("\n{} - {}", format_person_name(badge), badge.country);
        if !badge.roles.is_empty() {
            let roles: Vec<&str> = badge.roles.iter().map(String::as_str).collect();
            println!("  Roles: {}", roles.join(", "));
        }
        for (day, entries) in badge.agenda.days() {
            println!("  {}", day);
            for entry in entries.values() {
                println!("    {} {} [{}]", entry.time, entry.event, entry.role);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::PersonalAgenda;

    fn badge(id: Option<u32>) -> Badge {
        Badge {
            registrant_id: id,
            name: "Ada Lovelace".to_string(),
            wca_id: "None".to_string(),
            country: "United Kingdom".to_string(),
            guests: 0,
            agenda: PersonalAgenda::default(),
            roles: Default::default(),
        }
    }

    #[test]
    fn formats_with_and_without_registrant_id() {
        assert_eq!(format_person_name(&badge(Some(3))), "#3 Ada Lovelace (None)");
        assert_eq!(format_person_name(&badge(None)), "Ada Lovelace (None)");
    }

    #[test]
    fn writes_artifact_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        let path = write_artifact(&out, "guests.csv", b"name\n").unwrap();
        assert_eq!(path, out.join("guests.csv"));
        assert_eq!(fs::read(path).unwrap(), b"name\n");
    }
}
