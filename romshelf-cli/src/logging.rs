//! Logger setup: normal output goes through `log::info!` to stdout.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Env, Target, WriteStyle};
use log::Level;

/// Writes to stdout and to a log file, stripping ANSI codes from the file copy.
struct TeeWriter {
    stdout: io::Stdout,
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.write_all(buf)?;
        self.file.write_all(&strip_ansi_escapes::strip(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()?;
        self.file.flush()
    }
}

/// Install the global logger.
///
/// `--quiet` keeps warnings and errors, `--verbose` adds debug messages with
/// timestamps. `RUST_LOG` overrides both.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> io::Result<()> {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    let mut builder = Builder::from_env(Env::default().default_filter_or(level));
    builder.format(move |buf, record| {
        if verbose {
            writeln!(
                buf,
                "[{} {:5} {}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        } else if record.level() == Level::Info {
            writeln!(buf, "{}", record.args())
        } else {
            writeln!(buf, "{}: {}", record.level().as_str().to_lowercase(), record.args())
        }
    });

    match logfile {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .target(Target::Pipe(Box::new(TeeWriter {
                    stdout: io::stdout(),
                    file,
                })))
                .write_style(WriteStyle::Always);
        }
        None => {
            builder.target(Target::Stdout);
        }
    }

    builder.init();
    Ok(())
}
