//! Set resolution for romshelf: archive and disk image matching, the
//! resolver, the virtual filesystem view, batch checks and shared settings.

pub mod archive;
pub mod disk_image;
pub mod error;
pub mod report;
pub mod resolver;
pub mod settings;
pub mod vfs;
pub mod worker_pool;

#[cfg(test)]
#[path = "tests/fixtures.rs"]
pub(crate) mod fixtures;

pub use archive::{ArchiveOutcome, ExtraMembers, MemberRejection, archive_path, match_archive};
pub use disk_image::{DiskHeader, DiskImageError, read_digest, verify_disk_image};
pub use error::ResolveError;
pub use report::{CheckLine, CheckOutcome, CheckSummary, check_all, summarize};
pub use resolver::{Resolution, Resolver};
pub use vfs::{DirEntry, NodeAttr, NodeKind, Vfs, VfsError, VfsPath, parse_path};
pub use worker_pool::WorkerPool;

// Re-export the catalog types every caller needs alongside the resolver
pub use romshelf_dat::{GameCatalog, GameEntry, ResolutionState, SearchList};
