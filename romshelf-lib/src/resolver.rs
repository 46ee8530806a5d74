//! Resolution engine: finds and verifies every file a catalog entry needs.
//!
//! An entry resolves when all of its non-nodump archive members are found in
//! its own archive (first directory in search order wins), in its ancestors'
//! already-verified archives, or split between the two; and every disk image
//! is either credited to an ancestor or found with a matching header digest.
//! Successful results are memoized in the catalog and never recomputed.
//! Failures are not memoized, so a later call can succeed once files appear.
//!
//! Each entry's state is locked for the whole of its resolution. Locks are
//! taken child before ancestor, and cyclic ancestry is rejected before any
//! lock is taken, so concurrent callers cannot deadlock.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use romshelf_core::FileRecord;
use romshelf_dat::{GameCatalog, GameEntry, ResolutionState, SearchList};

use crate::archive::{ArchiveOutcome, ExtraMembers, archive_path, match_archive};
use crate::disk_image::{disk_image_file, verify_disk_image};
use crate::error::ResolveError;

/// Outcome of resolving one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Every required file was found.
    ///
    /// `archive_path` is `None` for entries that need no archive members.
    Resolved { archive_path: Option<PathBuf> },
    /// Some required file is missing or failed verification
    NotFound,
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

/// Where the archive members ended up, if they could be found at all.
enum ArchiveCoverage {
    Satisfied(Option<PathBuf>),
    Unsatisfied,
}

/// Resolves catalog entries against an ordered list of directories.
pub struct Resolver<'a> {
    catalog: &'a GameCatalog,
    dirs: &'a SearchList,
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a GameCatalog, dirs: &'a SearchList) -> Self {
        Self { catalog, dirs }
    }

    pub fn catalog(&self) -> &'a GameCatalog {
        self.catalog
    }

    pub fn search_list(&self) -> &'a SearchList {
        self.dirs
    }

    /// Resolve `name`, resolving its ancestors first.
    pub fn resolve(&self, name: &str) -> Result<Resolution, ResolveError> {
        {
            let state = self
                .catalog
                .lock_state(name)
                .ok_or_else(|| ResolveError::UnknownGame(name.to_string()))?;
            if state.resolved {
                return Ok(resolved(&state));
            }
        }

        // Validates the whole ancestry (cycles, dangling parents) up front.
        self.ancestors(name)?;
        self.resolve_entry(name)
    }

    /// Verified path of `disk` for `name`, once `name` has resolved.
    pub fn disk_image_path(&self, name: &str, disk: &str) -> Option<PathBuf> {
        let state = self.catalog.lock_state(name)?;
        if !state.resolved {
            return None;
        }
        state.disk_locations.get(disk.trim()).cloned()
    }

    /// Snapshot of `name`'s resolution state.
    pub fn state(&self, name: &str) -> Option<ResolutionState> {
        self.catalog.state(name)
    }

    /// All ancestors of `name`, depth-first in `parents` order, each once.
    ///
    /// Fails with [`ResolveError::CyclicAncestry`] if a name reappears on the
    /// path being walked.
    pub fn ancestors(&self, name: &str) -> Result<Vec<String>, ResolveError> {
        let mut order = Vec::new();
        let mut path = vec![name.to_string()];
        self.walk_ancestors(name, &mut path, &mut order)?;
        Ok(order)
    }

    fn walk_ancestors(
        &self,
        name: &str,
        path: &mut Vec<String>,
        order: &mut Vec<String>,
    ) -> Result<(), ResolveError> {
        let entry = self.entry(name)?;
        for parent in entry.parents() {
            if path.contains(parent) {
                let mut chain = path.clone();
                chain.push(parent.clone());
                return Err(ResolveError::CyclicAncestry { chain });
            }
            if !self.catalog.contains(parent) {
                return Err(ResolveError::MissingParent {
                    game: name.to_string(),
                    parent: parent.clone(),
                });
            }
            // Already walked from another branch, and found acyclic then
            if order.contains(parent) {
                continue;
            }
            order.push(parent.clone());
            path.push(parent.clone());
            self.walk_ancestors(parent, path, order)?;
            path.pop();
        }
        Ok(())
    }

    fn entry(&self, name: &str) -> Result<&'a GameEntry, ResolveError> {
        self.catalog
            .get(name)
            .ok_or_else(|| ResolveError::UnknownGame(name.to_string()))
    }

    fn resolve_entry(&self, name: &str) -> Result<Resolution, ResolveError> {
        let entry = self.entry(name)?;
        let mut state = self
            .catalog
            .lock_state(name)
            .ok_or_else(|| ResolveError::UnknownGame(name.to_string()))?;
        if state.resolved {
            return Ok(resolved(&state));
        }

        for parent in entry.parents() {
            if !self.resolve_entry(parent)?.is_resolved() {
                log::debug!("{name}: parent {parent} not found");
                return Ok(Resolution::NotFound);
            }
        }

        let ancestors = self.ancestors(name)?;
        let mut members = required_set(&entry.archive_members);
        let disks = required_set(&entry.disk_images);

        let archive_location = match self.resolve_archive(entry, &ancestors, &mut members)? {
            ArchiveCoverage::Satisfied(location) => location,
            ArchiveCoverage::Unsatisfied => {
                log::debug!(
                    "{name}: {} archive member(s) not found: {}",
                    members.len(),
                    members.keys().cloned().collect::<Vec<_>>().join(", ")
                );
                return Ok(Resolution::NotFound);
            }
        };

        let Some(disk_locations) = self.resolve_disks(entry, &ancestors, disks)? else {
            return Ok(Resolution::NotFound);
        };

        state.archive_location = archive_location;
        state.disk_locations = disk_locations;
        state.resolved = true;

        match state.archive_location {
            Some(ref path) => log::info!("{name}: resolved to {}", path.display()),
            None => log::info!("{name}: resolved (no archive needed)"),
        }
        Ok(resolved(&state))
    }

    fn resolve_archive(
        &self,
        entry: &GameEntry,
        ancestors: &[String],
        required: &mut BTreeMap<String, FileRecord>,
    ) -> Result<ArchiveCoverage, ResolveError> {
        if required.is_empty() {
            return Ok(ArchiveCoverage::Satisfied(None));
        }

        // Own archive, directories in search order. A merged set also
        // carries its clones' members; those are left for the clones to verify.
        let merged = self.descendant_members(entry);
        let mut partial: Option<(PathBuf, BTreeMap<String, FileRecord>)> = None;
        for dir in self.dirs {
            let path = archive_path(dir, &entry.name);
            let mut attempt = required.clone();
            match match_archive(&path, &mut attempt, ExtraMembers::Skip(&merged))? {
                ArchiveOutcome::NotFound => {}
                ArchiveOutcome::Mismatch { member, reason } => {
                    log::debug!("{}: rejected {} ({member}: {reason})", entry.name, path.display());
                }
                ArchiveOutcome::Matched { complete: true, .. } => {
                    *required = attempt;
                    return Ok(ArchiveCoverage::Satisfied(Some(path)));
                }
                ArchiveOutcome::Matched { matched, .. } => {
                    log::debug!(
                        "{}: {} covers {} member(s), {} left",
                        entry.name,
                        path.display(),
                        matched.len(),
                        attempt.len()
                    );
                    if partial.is_none() && !matched.is_empty() {
                        partial = Some((path, attempt));
                    }
                }
            }
        }

        let mut own = None;
        if let Some((path, remaining)) = partial {
            *required = remaining;
            own = Some(path);
        }

        // Ancestors' verified archives fill in the rest
        let mut tried: Vec<PathBuf> = Vec::new();
        for ancestor in ancestors {
            let Some(location) = self
                .catalog
                .state(ancestor)
                .and_then(|s| s.archive_location)
            else {
                continue;
            };
            if tried.contains(&location) {
                continue;
            }
            let mut attempt = required.clone();
            match match_archive(&location, &mut attempt, ExtraMembers::Allow)? {
                ArchiveOutcome::Matched { .. } => {
                    *required = attempt;
                    if required.is_empty() {
                        return Ok(ArchiveCoverage::Satisfied(Some(own.unwrap_or(location))));
                    }
                }
                ArchiveOutcome::NotFound => {
                    log::warn!(
                        "{}: archive {} of ancestor {ancestor} has disappeared",
                        entry.name,
                        location.display()
                    );
                }
                ArchiveOutcome::Mismatch { member, reason } => {
                    log::debug!(
                        "{}: ancestor archive {} rejected ({member}: {reason})",
                        entry.name,
                        location.display()
                    );
                }
            }
            tried.push(location);
        }

        Ok(ArchiveCoverage::Unsatisfied)
    }

    /// Archive member names declared by entries descending from `entry`.
    fn descendant_members(&self, entry: &GameEntry) -> BTreeSet<String> {
        self.catalog
            .descendants(&entry.name)
            .iter()
            .filter_map(|name| self.catalog.get(name))
            .flat_map(|child| child.archive_members.iter().map(|r| r.name.clone()))
            .collect()
    }

    fn resolve_disks(
        &self,
        entry: &GameEntry,
        ancestors: &[String],
        mut required: BTreeMap<String, FileRecord>,
    ) -> Result<Option<BTreeMap<String, PathBuf>>, ResolveError> {
        let mut locations = BTreeMap::new();

        // Images an ancestor declares are the ancestor's to prove, and it has.
        let names: Vec<String> = required.keys().cloned().collect();
        for disk in names {
            let mut credited = false;
            for ancestor in ancestors {
                let Some(parent) = self.catalog.get(ancestor) else {
                    continue;
                };
                if !parent.disk_images.iter().any(|d| d.name.trim() == disk) {
                    continue;
                }
                credited = true;
                if let Some(path) = self.disk_image_path(ancestor, &disk) {
                    locations.insert(disk.clone(), path);
                    break;
                }
            }
            if credited {
                required.remove(&disk);
            }
        }

        let search_names: Vec<&str> = std::iter::once(entry.name.as_str())
            .chain(ancestors.iter().map(String::as_str))
            .collect();

        for (disk, record) in &required {
            match self.find_disk_image(&search_names, disk, record)? {
                Some(path) => {
                    locations.insert(disk.clone(), path);
                }
                None => {
                    log::debug!("{}: disk image {disk} not found", entry.name);
                    return Ok(None);
                }
            }
        }

        Ok(Some(locations))
    }

    /// First `<dir>/<game>/<disk>.chd` with a matching digest, trying the
    /// entry's own name across all directories before each ancestor's.
    fn find_disk_image(
        &self,
        games: &[&str],
        disk: &str,
        record: &FileRecord,
    ) -> Result<Option<PathBuf>, ResolveError> {
        for game in games {
            for dir in self.dirs {
                let path = disk_image_file(dir, game, disk);
                match verify_disk_image(&path, record)? {
                    Some(true) => return Ok(Some(path)),
                    Some(false) => log::debug!("{}: digest mismatch", path.display()),
                    None => {}
                }
            }
        }
        Ok(None)
    }
}

fn resolved(state: &ResolutionState) -> Resolution {
    Resolution::Resolved {
        archive_path: state.archive_location.clone(),
    }
}

/// Records that must be present, keyed by trimmed name. Nodump records are
/// left out; they could never be found.
fn required_set(records: &[FileRecord]) -> BTreeMap<String, FileRecord> {
    records
        .iter()
        .filter(|r| r.is_required())
        .map(|r| (r.name.trim().to_string(), r.clone()))
        .collect()
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;
