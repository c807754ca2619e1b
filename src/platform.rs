//! Host platform: decides the activation modifier and the path separator.

use crate::types::MouseEvent;

/// The platform families the engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Linux and other Unix-likes: Ctrl, forward slashes.
    Linux,
    /// macOS: Cmd, forward slashes.
    MacOs,
    /// Windows: Ctrl, backslashes.
    Windows,
}

impl Platform {
    /// Platform of the running build. Cheap, so callers query it at the
    /// point of use rather than storing it.
    pub const fn detect() -> Self {
        if cfg!(target_os = "macos") {
            return Platform::MacOs;
        }
        if cfg!(windows) {
            return Platform::Windows;
        }
        return Platform::Linux;
    }

    /// Whether the event carries the modifier that gates activation here.
    pub const fn modifier_held(self, event: &MouseEvent) -> bool {
        return match self {
            Platform::MacOs => event.meta_key,
            Platform::Linux | Platform::Windows => event.ctrl_key,
        };
    }

    /// Tooltip hint shown while hovering a link.
    pub const fn modifier_hint(self) -> &'static str {
        return match self {
            Platform::MacOs => "Cmd+Click to open",
            Platform::Linux | Platform::Windows => "Ctrl+Click to open",
        };
    }

    /// Whether resolved paths use `\` as the separator.
    pub const fn uses_backslash(self) -> bool {
        return matches!(self, Platform::Windows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_requires_meta() {
        let ctrl = MouseEvent { ctrl_key: true, meta_key: false };
        let meta = MouseEvent { ctrl_key: false, meta_key: true };
        assert!(Platform::MacOs.modifier_held(&meta));
        assert!(!Platform::MacOs.modifier_held(&ctrl));
        assert!(Platform::Linux.modifier_held(&ctrl));
        assert!(!Platform::Windows.modifier_held(&meta));
    }

    #[test]
    fn hints_name_the_modifier() {
        assert_eq!(Platform::MacOs.modifier_hint(), "Cmd+Click to open");
        assert_eq!(Platform::Windows.modifier_hint(), "Ctrl+Click to open");
    }

    #[test]
    fn deserializes_lowercase_names() {
        #[derive(serde::Deserialize)]
        struct Holder {
            platform: Platform,
        }
        let holder: Holder = toml::from_str("platform = \"macos\"").unwrap();
        assert_eq!(holder.platform, Platform::MacOs);
    }
}
