use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("line {line}: malformed consumption value `{value}`")]
    MalformedNumericField { line: usize, value: String },

    #[error("`{command}` exited with {}", describe_code(.code))]
    UpstreamProcessFailure { command: String, code: Option<i32> },

    #[error("no command given")]
    EmptyCommand,

    #[error("failed to spawn `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::MalformedNumericField { .. } => 2,
            Error::UpstreamProcessFailure { code, .. } => match code {
                Some(0) | None => 1,
                Some(c) => *c,
            },
            Error::Io(_) | Error::Json(_) | Error::EmptyCommand | Error::Spawn { .. } => 1,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "no status (killed by signal)".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_failure_keeps_child_exit_code() {
        let err = Error::UpstreamProcessFailure {
            command: "cargo test-sbf".into(),
            code: Some(101),
        };
        assert_eq!(err.exit_code(), 101);
        assert_eq!(err.to_string(), "`cargo test-sbf` exited with status 101");
    }

    #[test]
    fn signal_kill_maps_to_generic_failure() {
        let err = Error::UpstreamProcessFailure {
            command: "anchor build".into(),
            code: None,
        };
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn malformed_field_message_names_line() {
        let err = Error::MalformedNumericField {
            line: 4,
            value: "abc".into(),
        };
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "line 4: malformed consumption value `abc`");
    }

    #[test]
    fn wrapped_errors_print_their_cause_once() {
        let io = Error::Io(std::io::Error::other("stream did not contain valid UTF-8"));
        let chained = anyhow::Error::from(io).context("Reducing log from stdin");
        assert_eq!(
            format!("{chained:#}"),
            "Reducing log from stdin: stream did not contain valid UTF-8"
        );

        let spawn = Error::Spawn {
            program: "cargo".into(),
            source: std::io::Error::other("not found"),
        };
        assert_eq!(
            format!("{:#}", anyhow::Error::from(spawn)),
            "failed to spawn `cargo`: not found"
        );
    }
}
