//! Link detection for terminal output.
//!
//! Scans rendered terminal rows for file paths, commit hashes, and issue
//! references, and turns each match into an interactive link: a cell range,
//! a resolved target, and activate/hover/leave behavior delegated to the
//! host's navigation collaborators.
//!
//! A host implements [`TerminalBuffer`], [`LinkHost`], and [`LinkActions`],
//! then mounts a [`ProviderRegistry`] for each terminal view.

pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod host;
pub mod link;
pub mod matcher;
pub mod path;
pub mod platform;
pub mod provider;
pub mod range;
pub mod registry;
pub mod remote;
pub mod transcript;
pub mod types;
pub mod watch;

pub use config::Config;
pub use error::Error;
pub use host::{LinkHost, Registration, TerminalBuffer};
pub use link::{LinkActions, ResolvedLink};
pub use platform::Platform;
pub use provider::{FileLinkProvider, LinkProvider, OverlapPolicy, ProviderConfig, ReferenceLinkProvider};
pub use registry::ProviderRegistry;
pub use remote::RemoteBase;
pub use types::{LinkCandidate, LinkCategory, LinkRange, LinkTarget, MouseEvent, ParsedFileReference};
