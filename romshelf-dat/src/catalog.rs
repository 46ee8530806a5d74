//! The in-memory game catalog: entries, parent links and resolution state.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::path::PathBuf;

use parking_lot::{Mutex, MutexGuard};

use romshelf_core::FileRecord;

/// A single catalog entry (one MAME machine / game).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEntry {
    pub name: String,
    /// Human-readable title, if the catalog had one
    pub description: Option<String>,
    clone_of: Option<String>,
    rom_of: Option<String>,
    pub archive_members: Vec<FileRecord>,
    pub disk_images: Vec<FileRecord>,
    /// `clone_of`, then `rom_of` if it names a different game
    parents: Vec<String>,
}

impl GameEntry {
    /// Create an entry. Empty parent names are treated as absent.
    pub fn new(name: impl Into<String>, clone_of: Option<String>, rom_of: Option<String>) -> Self {
        let clone_of = clone_of.filter(|s| !s.is_empty());
        let rom_of = rom_of.filter(|s| !s.is_empty());

        let mut parents = Vec::with_capacity(2);
        if let Some(ref c) = clone_of {
            parents.push(c.clone());
        }
        if let Some(ref r) = rom_of {
            if clone_of.as_ref() != Some(r) {
                parents.push(r.clone());
            }
        }

        Self {
            name: name.into(),
            description: None,
            clone_of,
            rom_of,
            archive_members: Vec::new(),
            disk_images: Vec::new(),
            parents,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_archive_member(mut self, record: FileRecord) -> Self {
        self.archive_members.push(record);
        self
    }

    pub fn with_disk_image(mut self, record: FileRecord) -> Self {
        self.disk_images.push(record);
        self
    }

    pub fn clone_of(&self) -> Option<&str> {
        self.clone_of.as_deref()
    }

    pub fn rom_of(&self) -> Option<&str> {
        self.rom_of.as_deref()
    }

    /// Direct ancestors in lookup order.
    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    pub fn has_disk_images(&self) -> bool {
        !self.disk_images.is_empty()
    }
}

/// Where a resolved entry's files were found.
///
/// Written once, by the resolution that succeeds; never cleared afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionState {
    pub resolved: bool,
    /// The archive (own or an ancestor's) credited with this entry's members
    pub archive_location: Option<PathBuf>,
    /// Disk image name → verified image path
    pub disk_locations: BTreeMap<String, PathBuf>,
}

struct Slot {
    entry: GameEntry,
    state: Mutex<ResolutionState>,
}

/// All catalog entries keyed by unique name, each with its resolution state.
#[derive(Default)]
pub struct GameCatalog {
    slots: HashMap<String, Slot>,
    /// Parent name → names of entries listing it in `parents`
    children: HashMap<String, Vec<String>>,
}

impl GameCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the entry it replaced if the name was taken.
    ///
    /// A replaced entry's resolution state is discarded with it. Loaders use
    /// the return value to report duplicate names.
    pub fn insert(&mut self, entry: GameEntry) -> Option<GameEntry> {
        let name = entry.name.clone();
        for parent in entry.parents() {
            self.children
                .entry(parent.clone())
                .or_default()
                .push(name.clone());
        }
        let slot = Slot {
            entry,
            state: Mutex::new(ResolutionState::default()),
        };
        let old = self.slots.insert(name.clone(), slot)?.entry;
        for parent in old.parents() {
            if let Some(list) = self.children.get_mut(parent) {
                // Drop one link; the new entry pushed its own above
                if let Some(pos) = list.iter().position(|c| *c == name) {
                    list.remove(pos);
                }
            }
        }
        Some(old)
    }

    pub fn get(&self, name: &str) -> Option<&GameEntry> {
        self.slots.get(name).map(|s| &s.entry)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Exclusive access to an entry's state when the catalog itself is not shared.
    pub fn resolution_state_mut(&mut self, name: &str) -> Option<&mut ResolutionState> {
        self.slots.get_mut(name).map(|s| s.state.get_mut())
    }

    /// Lock an entry's state. Blocks while another thread is resolving it.
    pub fn lock_state(&self, name: &str) -> Option<MutexGuard<'_, ResolutionState>> {
        self.slots.get(name).map(|s| s.state.lock())
    }

    /// Snapshot of an entry's state.
    pub fn state(&self, name: &str) -> Option<ResolutionState> {
        self.lock_state(name).map(|s| s.clone())
    }

    /// Entries naming `name` directly as `clone_of` or `rom_of`.
    pub fn children(&self, name: &str) -> &[String] {
        self.children.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every entry whose ancestry includes `name`, breadth-first, each once.
    ///
    /// `name` itself is never included, even when the parent graph loops.
    pub fn descendants(&self, name: &str) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::from([name]);
        let mut order = Vec::new();
        let mut queue = VecDeque::from([name]);
        while let Some(current) = queue.pop_front() {
            for child in self.children(current) {
                if seen.insert(child.as_str()) {
                    order.push(child.clone());
                    queue.push_back(child.as_str());
                }
            }
        }
        order
    }

    /// All entry names, sorted.
    pub fn all_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.slots.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn entries(&self) -> impl Iterator<Item = &GameEntry> {
        self.slots.values().map(|s| &s.entry)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl FromIterator<GameEntry> for GameCatalog {
    fn from_iter<I: IntoIterator<Item = GameEntry>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for entry in iter {
            catalog.insert(entry);
        }
        catalog
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
