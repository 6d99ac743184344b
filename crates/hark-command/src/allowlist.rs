use hark_core::AppTargets;
use std::collections::HashMap;

/// Host OS family, detected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    Mac,
    Linux,
}

impl OsFamily {
    pub fn detect() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::Mac
        } else {
            Self::Linux
        }
    }
}

/// How an allowlisted application is launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchTarget {
    /// Spawn the executable directly.
    Executable(String),
    /// macOS application bundle, launched via `open -a`.
    AppBundle(String),
    /// Windows shell launch via `cmd /C start`.
    Shell(String),
}

impl LaunchTarget {
    pub fn label(&self) -> &str {
        match self {
            Self::Executable(name) | Self::AppBundle(name) | Self::Shell(name) => name,
        }
    }
}

/// Built-in entries: (key, windows, macos, linux).
const DEFAULT_APPS: [(&str, &str, &str, &str); 4] = [
    ("chrome", "chrome", "Google Chrome", "google-chrome"),
    ("calculator", "calc", "Calculator", "gnome-calculator"),
    ("notepad", "notepad", "TextEdit", "gedit"),
    ("vscode", "code", "Visual Studio Code", "code"),
];

/// The closed set of applications the executor may launch; the system's
/// sole safety boundary. Targets are resolved for one OS family at startup
/// and the map is read-only afterward.
pub struct Allowlist {
    os: OsFamily,
    entries: HashMap<String, LaunchTarget>,
}

impl Allowlist {
    pub fn with_defaults(os: OsFamily) -> Self {
        let mut list = Self {
            os,
            entries: HashMap::new(),
        };
        for (key, win, mac, linux) in DEFAULT_APPS {
            list.entries
                .insert(key.to_string(), resolve_target(os, win, mac, linux));
        }
        list
    }

    /// Merge `[apps]` config entries over the defaults. Entries with no
    /// target for the current OS family are skipped with a warning.
    pub fn extend_from_config(&mut self, apps: &HashMap<String, AppTargets>) {
        for (key, targets) in apps {
            let target = match self.os {
                OsFamily::Windows => targets.win.as_ref().map(|t| LaunchTarget::Shell(t.clone())),
                OsFamily::Mac => targets.mac.as_ref().map(|t| LaunchTarget::AppBundle(t.clone())),
                OsFamily::Linux => targets
                    .linux
                    .as_ref()
                    .map(|t| LaunchTarget::Executable(t.clone())),
            };
            match target {
                Some(target) => {
                    self.entries.insert(key.to_lowercase(), target);
                }
                None => {
                    tracing::warn!(key, "app entry has no target for this OS, skipping");
                }
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&LaunchTarget> {
        self.entries.get(key)
    }

    /// Action keys, sorted for stable help and error messages.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(|s| s.as_str()).collect();
        keys.sort_unstable();
        keys
    }

    pub fn os(&self) -> OsFamily {
        self.os
    }
}

fn resolve_target(os: OsFamily, win: &str, mac: &str, linux: &str) -> LaunchTarget {
    match os {
        OsFamily::Windows => LaunchTarget::Shell(win.to_string()),
        OsFamily::Mac => LaunchTarget::AppBundle(mac.to_string()),
        OsFamily::Linux => LaunchTarget::Executable(linux.to_string()),
    }
}
