use std::path::Path;
use std::rc::Rc;

use crate::error::Error;
use crate::host::TerminalBuffer;
use crate::link::LinkActions;
use crate::platform::Platform;
use crate::provider::{OverlapPolicy, ProviderConfig};
use crate::remote::RemoteBase;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = ".termlinks.toml";

/// Settings loaded from `.termlinks.toml`, then overridden by CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// How overlapping candidates are handled.
    pub overlap: OverlapPolicy,
    /// Platform override; detected when unset.
    pub platform: Option<Platform>,
    /// Repository remote URL, in any form `RemoteBase::parse` accepts.
    pub remote_url: Option<String>,
    /// Directory relative paths resolve against; the process cwd when unset.
    pub working_dir: Option<String>,
}

/// Raw TOML structure for `.termlinks.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct TermlinksTomlConfig {
    /// `overlap = "keep-all" | "prefer-first"`.
    #[serde(default)]
    overlap: OverlapPolicy,
    /// `platform = "linux" | "macos" | "windows"`.
    #[serde(default)]
    platform: Option<Platform>,
    /// `remote_url = "git@github.com:org/repo.git"`.
    #[serde(default)]
    remote_url: Option<String>,
    /// `working_dir = "/home/me/project"`.
    #[serde(default)]
    working_dir: Option<String>,
}

impl Config {
    /// Load `.termlinks.toml` from `root`. A missing file yields defaults;
    /// a file that exists but is malformed is an error, never a silent
    /// fallback.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            },
            Err(e) => return Err(Error::Io(e)),
        };
        return Self::parse(&content);
    }

    /// Load a config file named explicitly; unlike [`Config::load`], it must exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigNotFound` if the file does not exist,
    /// `Error::Io` if it cannot be read, or `Error::TomlDe` if malformed.
    pub fn load_file(path: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ConfigNotFound { path: path.to_path_buf() });
            },
            Err(e) => return Err(Error::Io(e)),
        };
        return Self::parse(&content);
    }

    /// Parse config text.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the TOML is malformed or has unknown keys.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let raw: TermlinksTomlConfig = toml::from_str(content)?;
        return Ok(Self {
            overlap: raw.overlap,
            platform: raw.platform,
            remote_url: raw.remote_url,
            working_dir: raw.working_dir,
        });
    }

    /// Apply command-line values over file values.
    #[must_use]
    pub fn with_overrides(mut self, working_dir: Option<String>, remote_url: Option<String>) -> Self {
        if working_dir.is_some() {
            self.working_dir = working_dir;
        }
        if remote_url.is_some() {
            self.remote_url = remote_url;
        }
        return self;
    }

    /// Working directory in effect: the configured one, else the process cwd.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if no directory is configured and the process
    /// cwd cannot be read.
    pub fn effective_working_dir(&self) -> Result<String, Error> {
        if let Some(dir) = &self.working_dir {
            return Ok(dir.clone());
        }
        let cwd = std::env::current_dir()?;
        return Ok(cwd.to_string_lossy().into_owned());
    }

    /// Parsed remote base, if a remote URL is configured.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRemoteUrl` if the configured URL is malformed.
    pub fn remote_base(&self) -> Result<Option<RemoteBase>, Error> {
        return self.remote_url.as_deref().map(RemoteBase::parse).transpose();
    }

    /// Build the provider configuration for one view.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRemoteUrl` for a malformed remote, or
    /// `Error::Io` if the working directory cannot be determined.
    pub fn provider_config(
        &self,
        buffer: Rc<dyn TerminalBuffer>,
        actions: Rc<dyn LinkActions>,
    ) -> Result<ProviderConfig, Error> {
        let config = ProviderConfig::new(buffer, actions, self.effective_working_dir()?)
            .with_overlap(self.overlap)
            .with_platform(self.platform)
            .with_remote(self.remote_base()?);
        return Ok(config);
    }
}
