use thiserror::Error;

/// Unified error type for release-engine operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Command `{program}` failed with exit code {code}: {stderr}")]
    Command {
        program: String,
        code: i32,
        stderr: String,
    },

    #[error("Tag {tag} already exists at {existing}, refusing to move it to {target}")]
    PublishConflict {
        tag: String,
        existing: String,
        target: String,
    },

    #[error("Upstream notes unavailable: {0}")]
    Fetch(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Release notes template error: {0}")]
    Template(#[from] tera::Error),
}

/// Convenience type alias for Results in release-engine
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }

    /// Create a fetch error with context
    pub fn fetch(msg: impl Into<String>) -> Self {
        ReleaseError::Fetch(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        ReleaseError::Remote(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReleaseError::config("PR_TITLE is required");
        assert_eq!(
            err.to_string(),
            "Configuration error: PR_TITLE is required"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReleaseError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_from_template() {
        let mut tera = tera::Tera::default();
        let err: ReleaseError = tera
            .add_raw_template("broken", "{% if %}")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("Release notes template error"));
    }

    #[test]
    fn test_publish_conflict_names_both_commits() {
        let err = ReleaseError::PublishConflict {
            tag: "v1.2.0".to_string(),
            existing: "aaaaaaa".to_string(),
            target: "bbbbbbb".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("v1.2.0"));
        assert!(msg.contains("aaaaaaa"));
        assert!(msg.contains("bbbbbbb"));
    }

    #[test]
    fn test_command_failure_display() {
        let err = ReleaseError::Command {
            program: "gh".to_string(),
            code: 1,
            stderr: "HTTP 404".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Command `gh` failed with exit code 1: HTTP 404"
        );
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ReleaseError::config("x"), "Configuration error"),
            (ReleaseError::version("x"), "Version parsing error"),
            (ReleaseError::fetch("x"), "Upstream notes unavailable"),
            (ReleaseError::remote("x"), "Remote operation failed"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
