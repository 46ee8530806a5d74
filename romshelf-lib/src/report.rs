//! Batch resolution: resolve many entries and report where each was found.

use std::path::PathBuf;
use std::sync::Arc;

use romshelf_dat::{GameCatalog, SearchList};

use crate::resolver::{Resolution, Resolver};
use crate::worker_pool::WorkerPool;

/// What a check found for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Found {
        archive: Option<PathBuf>,
        /// Disk image name → verified path
        disks: Vec<(String, PathBuf)>,
    },
    NotFound,
    /// Resolution aborted; the message is the error's display text
    Error(String),
}

/// One report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckLine {
    pub name: String,
    pub outcome: CheckOutcome,
}

/// Tally of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub found: usize,
    pub not_found: usize,
    pub errors: usize,
}

impl CheckSummary {
    pub fn total(&self) -> usize {
        self.found + self.not_found + self.errors
    }
}

/// Resolve one entry and describe the result.
pub fn check_one(resolver: &Resolver<'_>, name: &str) -> CheckLine {
    let outcome = match resolver.resolve(name) {
        Ok(Resolution::Resolved { archive_path }) => {
            let disks = resolver
                .state(name)
                .map(|s| s.disk_locations.into_iter().collect())
                .unwrap_or_default();
            CheckOutcome::Found {
                archive: archive_path,
                disks,
            }
        }
        Ok(Resolution::NotFound) => CheckOutcome::NotFound,
        Err(e) => CheckOutcome::Error(e.to_string()),
    };
    CheckLine {
        name: name.to_string(),
        outcome,
    }
}

/// Resolve each name in turn, in the order given.
pub fn check_sequential(resolver: &Resolver<'_>, names: &[String]) -> Vec<CheckLine> {
    names.iter().map(|name| check_one(resolver, name)).collect()
}

/// Resolve names on `jobs` workers, each resolution on the blocking pool.
///
/// Results come back sorted by name.
pub async fn check_concurrent(
    catalog: Arc<GameCatalog>,
    dirs: Arc<SearchList>,
    names: Vec<String>,
    jobs: usize,
) -> Vec<CheckLine> {
    let expected = names.len();
    let mut pool = WorkerPool::start(jobs, names, move |name: String| {
        let catalog = Arc::clone(&catalog);
        let dirs = Arc::clone(&dirs);
        async move {
            let fallback = name.clone();
            tokio::task::spawn_blocking(move || check_one(&Resolver::new(&catalog, &dirs), &name))
                .await
                .unwrap_or_else(|e| CheckLine {
                    name: fallback,
                    outcome: CheckOutcome::Error(format!("worker failed: {e}")),
                })
        }
    });

    let mut lines = Vec::with_capacity(expected);
    while let Some(line) = pool.recv().await {
        lines.push(line);
    }
    lines.sort_by(|a, b| a.name.cmp(&b.name));
    lines
}

/// Resolve `names`: sequentially when `jobs <= 1`, else on a worker pool.
///
/// Sequential checks keep the given order; pooled checks are sorted by name.
pub async fn check_all(
    catalog: Arc<GameCatalog>,
    dirs: Arc<SearchList>,
    names: Vec<String>,
    jobs: usize,
) -> Vec<CheckLine> {
    if jobs <= 1 {
        return check_sequential(&Resolver::new(&catalog, &dirs), &names);
    }
    check_concurrent(catalog, dirs, names, jobs).await
}

pub fn summarize(lines: &[CheckLine]) -> CheckSummary {
    let mut summary = CheckSummary::default();
    for line in lines {
        match line.outcome {
            CheckOutcome::Found { .. } => summary.found += 1,
            CheckOutcome::NotFound => summary.not_found += 1,
            CheckOutcome::Error(_) => summary.errors += 1,
        }
    }
    summary
}

#[cfg(test)]
#[path = "tests/report_tests.rs"]
mod tests;
