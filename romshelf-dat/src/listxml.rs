//! Loader for MAME `-listxml` catalogs (and Logiqx-style `<game>` datafiles).

use std::io::BufRead;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use romshelf_core::{DumpStatus, FileRecord};

use crate::catalog::{GameCatalog, GameEntry};
use crate::error::DatError;

/// Summary of a catalog load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Entries read from the file, duplicates included
    pub games: usize,
    /// Names that appeared more than once; the last occurrence was kept
    pub duplicates: Vec<String>,
}

/// Parse a catalog from XML.
pub fn parse_listxml<R: BufRead>(reader: R) -> Result<(GameCatalog, LoadReport), DatError> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut catalog = GameCatalog::new();
    let mut report = LoadReport::default();

    let mut current: Option<GameEntry> = None;
    let mut current_tag = String::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let tag_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match tag_name.as_str() {
                    "machine" | "game" => current = Some(parse_entry_start(e)?),
                    "rom" | "disk" => {
                        if let Some(ref mut entry) = current {
                            add_file(entry, &tag_name, e)?;
                        }
                    }
                    _ => current_tag = tag_name,
                }
            }
            Event::Empty(ref e) => {
                let tag_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match tag_name.as_str() {
                    "machine" | "game" => {
                        let entry = parse_entry_start(e)?;
                        insert(&mut catalog, &mut report, entry);
                    }
                    "rom" | "disk" => {
                        if let Some(ref mut entry) = current {
                            add_file(entry, &tag_name, e)?;
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(ref e) => {
                if current_tag == "description" {
                    if let Some(ref mut entry) = current {
                        entry.description = Some(e.unescape()?.to_string());
                    }
                }
            }
            Event::End(ref e) => {
                let tag_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match tag_name.as_str() {
                    "machine" | "game" => {
                        if let Some(entry) = current.take() {
                            insert(&mut catalog, &mut report, entry);
                        }
                    }
                    _ => current_tag.clear(),
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if catalog.is_empty() {
        return Err(DatError::invalid_catalog("No machine or game entries found"));
    }

    log::debug!(
        "Loaded {} catalog entries ({} duplicate names)",
        catalog.len(),
        report.duplicates.len()
    );

    Ok((catalog, report))
}

/// Parse a catalog from a file path.
pub fn load_listxml(path: &Path) -> Result<(GameCatalog, LoadReport), DatError> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    parse_listxml(reader)
}

fn insert(catalog: &mut GameCatalog, report: &mut LoadReport, entry: GameEntry) {
    report.games += 1;
    let name = entry.name.clone();
    if catalog.insert(entry).is_some() {
        log::warn!("Duplicate catalog entry '{name}'; keeping the last one");
        report.duplicates.push(name);
    }
}

fn parse_entry_start(e: &BytesStart<'_>) -> Result<GameEntry, DatError> {
    let mut name = String::new();
    let mut clone_of = None;
    let mut rom_of = None;

    for attr in e.attributes() {
        let attr = attr?;
        let value = String::from_utf8_lossy(&attr.value).to_string();
        match attr.key.as_ref() {
            b"name" => name = value,
            b"cloneof" => clone_of = Some(value),
            b"romof" => rom_of = Some(value),
            _ => {}
        }
    }

    if name.is_empty() {
        return Err(DatError::invalid_catalog("Entry without a name attribute"));
    }

    Ok(GameEntry::new(name, clone_of, rom_of))
}

fn add_file(entry: &mut GameEntry, tag: &str, e: &BytesStart<'_>) -> Result<(), DatError> {
    let mut name = String::new();
    let mut size: u32 = 0;
    let mut crc = String::new();
    let mut sha1 = String::new();
    let mut status = DumpStatus::Normal;

    for attr in e.attributes() {
        let attr = attr?;
        let value = String::from_utf8_lossy(&attr.value).to_string();
        match attr.key.as_ref() {
            b"name" => name = value,
            b"size" => {
                size = value.trim().parse().map_err(|_| {
                    DatError::invalid_catalog(format!(
                        "Invalid size '{value}' in {}",
                        entry.name
                    ))
                })?;
            }
            b"crc" => crc = value,
            b"sha1" => sha1 = value,
            b"status" => status = DumpStatus::from_attr(&value),
            _ => {}
        }
    }

    if name.trim().is_empty() {
        log::warn!("Skipping unnamed {tag} in {}", entry.name);
        return Ok(());
    }

    if tag == "disk" {
        entry
            .disk_images
            .push(FileRecord::disk(&name, sha1).with_status(status));
    } else {
        entry.archive_members.push(
            FileRecord::new(&name, size, sha1)
                .with_crc32(crc)
                .with_status(status),
        );
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/listxml_tests.rs"]
mod tests;
