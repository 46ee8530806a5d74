//! `stat`, `cat` and `ls`: the virtual filesystem from the command line.

use std::io::Write;
use std::time::UNIX_EPOCH;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romshelf_core::util::format_bytes_approx;
use romshelf_lib::{NodeKind, Resolver, Vfs};

use crate::commands::Inputs;
use crate::error::CliError;

const READ_CHUNK: usize = 64 * 1024;

pub(crate) fn run_stat(inputs: Inputs, path: &str) -> Result<(), CliError> {
    let vfs = Vfs::new(Resolver::new(&inputs.catalog, &inputs.dirs));
    let attr = vfs.getattr(path).map_err(|e| CliError::vfs(path, &e))?;

    let kind = match attr.kind {
        NodeKind::File => "file",
        NodeKind::Directory => "directory",
    };
    log::info!("{}", path.if_supports_color(Stdout, |t| t.bold()));
    log::info!("  type: {kind}");
    if attr.kind == NodeKind::File {
        log::info!("  size: {} ({})", attr.size, format_bytes_approx(attr.size));
    }
    log::info!("  mode: {:o}", attr.mode);
    if let Some(secs) = attr
        .mtime
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
    {
        log::info!("  mtime: {secs}");
    }
    Ok(())
}

/// Copy a virtual file to stdout in fixed-size reads.
pub(crate) fn run_cat(inputs: Inputs, path: &str) -> Result<(), CliError> {
    let vfs = Vfs::new(Resolver::new(&inputs.catalog, &inputs.dirs));
    let mut out = std::io::stdout().lock();
    let mut offset = 0u64;
    loop {
        let chunk = vfs
            .read(path, offset, READ_CHUNK)
            .map_err(|e| CliError::vfs(path, &e))?;
        if chunk.is_empty() {
            break;
        }
        out.write_all(&chunk)?;
        offset += chunk.len() as u64;
    }
    out.flush()?;
    Ok(())
}

pub(crate) fn run_ls(inputs: Inputs, path: &str) -> Result<(), CliError> {
    let vfs = Vfs::new(Resolver::new(&inputs.catalog, &inputs.dirs));
    let entries = vfs.readdir(path).map_err(|e| CliError::vfs(path, &e))?;
    for entry in entries {
        match entry.kind {
            NodeKind::Directory => log::info!(
                "{}/",
                entry.name.if_supports_color(Stdout, |t| t.blue())
            ),
            NodeKind::File => log::info!("{}", entry.name),
        }
    }
    Ok(())
}
