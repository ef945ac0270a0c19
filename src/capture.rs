//! Run the test command and tee its combined output into a temp file.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Combined stdout/stderr of one finished command. The log file is removed
/// when this is dropped.
pub struct Capture {
    pub command: String,
    pub log: NamedTempFile,
    pub status: ExitStatus,
    pub lines: usize,
}

impl Capture {
    /// Reopen the captured log from the start.
    pub fn reader(&self) -> Result<BufReader<File>> {
        let mut file = self.log.reopen()?;
        file.seek(SeekFrom::Start(0))?;
        Ok(BufReader::new(file))
    }

    /// Copy the captured log somewhere that outlives the run.
    pub fn persist(&self, dest: &Path) -> Result<()> {
        std::fs::copy(self.log.path(), dest)?;
        info!(path = %dest.display(), "kept captured log");
        Ok(())
    }

    /// `Err(UpstreamProcessFailure)` when the command did not exit cleanly.
    pub fn check_status(&self) -> Result<()> {
        if self.status.success() {
            Ok(())
        } else {
            Err(Error::UpstreamProcessFailure {
                command: self.command.clone(),
                code: self.status.code(),
            })
        }
    }
}

/// Spawn `cmd[0]` with `cmd[1..]`, wait for it, and collect everything it
/// printed. With `echo`, every line is also forwarded to our stderr as it
/// arrives.
pub fn run(cmd: &[String], echo: bool) -> Result<Capture> {
    let (program, args) = cmd.split_first().ok_or(Error::EmptyCommand)?;
    let command = cmd.join(" ");
    info!(%command, "running test command");

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| Error::Spawn {
            program: program.clone(),
            source,
        })?;

    let (tx, rx) = mpsc::channel::<Vec<u8>>();
    let mut readers = Vec::with_capacity(2);
    if let Some(out) = child.stdout.take() {
        readers.push(forward_lines("stdout", out, tx.clone()));
    }
    if let Some(err) = child.stderr.take() {
        readers.push(forward_lines("stderr", err, tx.clone()));
    }
    // the channel closes once both pipes hit EOF
    drop(tx);

    // lines are copied byte for byte; decoding happens when the log is reduced
    let mut log = NamedTempFile::new()?;
    let mut lines = 0usize;
    {
        let mut sink = BufWriter::new(log.as_file_mut());
        let stderr = io::stderr();
        for line in rx {
            sink.write_all(&line)?;
            sink.write_all(b"\n")?;
            if echo {
                let mut term = stderr.lock();
                term.write_all(&line)?;
                term.write_all(b"\n")?;
            }
            lines += 1;
        }
        sink.flush()?;
    }

    join_readers(readers);
    let status = child.wait()?;
    debug!(lines, ?status, path = %log.path().display(), "capture finished");

    Ok(Capture {
        command,
        log,
        status,
        lines,
    })
}

fn forward_lines<R: Read + Send + 'static>(
    name: &'static str,
    pipe: R,
    tx: mpsc::Sender<Vec<u8>>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for line in BufReader::new(pipe).split(b'\n') {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(pipe = name, error = %e, "stopped reading child output");
                    break;
                }
            }
        }
    })
}

/// Wait for the pipe readers; returns how many of them panicked.
fn join_readers(readers: Vec<thread::JoinHandle<()>>) -> usize {
    let mut panicked = 0;
    for reader in readers {
        if reader.join().is_err() {
            warn!("pipe reader panicked, captured output may be incomplete");
            panicked += 1;
        }
    }
    panicked
}
