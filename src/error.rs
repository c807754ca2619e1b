/// Crate-level error types for termlinks diagnostics.
use std::path::PathBuf;

/// Every fallible operation outside the per-line scan reports one of these.
/// Each variant names the file, value, or reason for failure so the
/// diagnostic is useful without a debugger. Scanning itself never errors.
#[allow(clippy::error_impl_error, reason = "crate-level error type re-exported as termlinks::Error")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A config file named explicitly on the command line does not exist.
    #[error("config not found: {}", path.display())]
    ConfigNotFound {
        /// Path to the missing config file.
        path: PathBuf,
    },

    /// A remote repository URL could not be turned into a web base URL.
    #[error("invalid remote url `{url}`: {reason}")]
    InvalidRemoteUrl {
        /// Why the URL was rejected.
        reason: String,
        /// The URL as given.
        url: String,
    },

    /// Text given to `url` is not a commit, issue, or cross-repo reference.
    #[error("not a reference: `{text}`")]
    NotAReference {
        /// The text as given.
        text: String,
    },

    /// A commit or issue reference needs a remote base, and none is configured.
    #[error("no remote configured for `{reference}`")]
    RemoteRequired {
        /// The reference that needed a remote.
        reference: String,
    },

    /// Underlying I/O error from the filesystem or a standard stream.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization of scan output failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// TOML deserialization of `.termlinks.toml` failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// The transcript file to scan or watch does not exist.
    #[error("transcript not found: {}", path.display())]
    TranscriptNotFound {
        /// Path to the missing transcript.
        path: PathBuf,
    },

    /// The filesystem watcher could not be created or attached.
    #[error("watch failed: {reason}")]
    WatchFailed {
        /// Description of the watcher failure.
        reason: String,
    },
}
