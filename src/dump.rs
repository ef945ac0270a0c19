//! `build` + `dump`: compile the program, then hand the artifact to an
//! external dump script. Nothing here touches the log reducer.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::info;

use crate::error::{Error, Result};

pub const DEFAULT_BUILD_CMD: &str = "anchor build";
pub const DEFAULT_ARTIFACT: &str = "target/deploy/openbook_v2_cu.so";

#[derive(Debug, Clone)]
pub struct DumpConfig {
    pub script: PathBuf,
    pub artifact: PathBuf,
    /// Whitespace-separated program and arguments.
    pub build_cmd: String,
}

pub fn run(config: &DumpConfig) -> Result<()> {
    let build: Vec<String> = config
        .build_cmd
        .split_whitespace()
        .map(str::to_string)
        .collect();
    run_inherited(&build)?;

    let dump = vec![
        config.script.display().to_string(),
        config.artifact.display().to_string(),
    ];
    run_inherited(&dump)
}

/// Run a command with our own stdio and fail on a non-zero exit.
fn run_inherited(cmd: &[String]) -> Result<()> {
    let (program, args) = cmd.split_first().ok_or(Error::EmptyCommand)?;
    let command = cmd.join(" ");
    info!(%command, "running");

    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .status()
        .map_err(|source| Error::Spawn {
            program: program.clone(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::UpstreamProcessFailure {
            command,
            code: status.code(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn config(script: &str, build_cmd: &str) -> DumpConfig {
        DumpConfig {
            script: script.into(),
            artifact: DEFAULT_ARTIFACT.into(),
            build_cmd: build_cmd.into(),
        }
    }

    #[test]
    fn test_build_then_dump() {
        assert!(run(&config("true", "true")).is_ok());
    }

    #[test]
    fn test_failed_build_skips_dump() {
        let err = run(&config("definitely-not-a-real-binary-cu", "false")).unwrap_err();
        match err {
            Error::UpstreamProcessFailure { command, code } => {
                assert_eq!(command, "false");
                assert_eq!(code, Some(1));
            }
            other => panic!("expected build failure, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_script() {
        let err = run(&config("definitely-not-a-real-binary-cu", "true")).unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }

    #[test]
    fn test_blank_build_command() {
        assert!(matches!(
            run(&config("true", "   ")),
            Err(Error::EmptyCommand)
        ));
    }
}
