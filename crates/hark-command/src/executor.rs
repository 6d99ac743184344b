use crate::allowlist::Allowlist;
use crate::launcher::Launcher;
use crate::router::ActionRequest;
use hark_core::ActionError;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SEARCH_URL: &str = "https://www.google.com/search?q=";

/// Sink for mid-action announcements: the timer speaks its confirmation
/// before the sleep and its completion after.
pub trait Announce {
    fn say(&self, text: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Terminate,
    Help,
    Time,
    Date,
    OpenApp,
    OpenWebsite,
    WebSearch,
    SaveNote,
    SetTimer,
    Unrecognized,
}

/// Result of one dispatch. Never persisted beyond the session loop's
/// immediate handling.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub kind: ActionKind,
    pub success: bool,
    pub message: String,
    pub detail: Option<String>,
}

impl ActionOutcome {
    fn ok(kind: ActionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            success: true,
            message: message.into(),
            detail: None,
        }
    }

    fn ok_with_detail(
        kind: ActionKind,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            success: true,
            message: message.into(),
            detail: Some(detail.into()),
        }
    }

    fn failed(kind: ActionKind, message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            success: false,
            message: message.into(),
            detail: Some(detail.into()),
        }
    }
}

/// Performs the side effect for one matched action. Every external failure
/// is caught here and converted into a spoken error message; nothing
/// propagates past this boundary.
pub struct ActionExecutor {
    allowlist: Allowlist,
    launcher: Box<dyn Launcher>,
    notes_file: PathBuf,
}

impl ActionExecutor {
    pub fn new(allowlist: Allowlist, launcher: Box<dyn Launcher>, notes_file: PathBuf) -> Self {
        Self {
            allowlist,
            launcher,
            notes_file,
        }
    }

    pub fn allowlist(&self) -> &Allowlist {
        &self.allowlist
    }

    pub fn execute(&self, request: &ActionRequest, announce: &dyn Announce) -> ActionOutcome {
        match request {
            ActionRequest::Terminate => ActionOutcome::ok(ActionKind::Terminate, "Goodbye."),
            ActionRequest::Help => self.help(),
            ActionRequest::Time => ActionOutcome::ok(
                ActionKind::Time,
                format!(
                    "The time is {}.",
                    chrono::Local::now().format("%-I:%M %p")
                ),
            ),
            ActionRequest::Date => ActionOutcome::ok(
                ActionKind::Date,
                format!("Today is {}.", chrono::Local::now().format("%A, %B %-d")),
            ),
            ActionRequest::OpenApp(key) => self.open_app(key),
            ActionRequest::OpenWebsite { domain, path } => self.open_website(domain, path),
            ActionRequest::WebSearch(query) => self.web_search(query),
            ActionRequest::SaveNote(text) => self.save_note(text),
            ActionRequest::SetTimer {
                seconds,
                count,
                unit,
            } => self.run_timer(*seconds, *count, unit, announce),
            ActionRequest::Unrecognized => ActionOutcome::ok(
                ActionKind::Unrecognized,
                "I heard you, but that action isn't installed yet. \
                 Say 'help' to see what I can do.",
            ),
        }
    }

    fn help(&self) -> ActionOutcome {
        let keys = self.allowlist.keys().join(", ");
        ActionOutcome::ok_with_detail(
            ActionKind::Help,
            "Try: open chrome, search something, note your text, \
             timer for ten seconds, or ask for time.",
            format!("allowed apps: {keys}"),
        )
    }

    fn open_app(&self, key: &str) -> ActionOutcome {
        let Some(target) = self.allowlist.get(key) else {
            let err = ActionError::NotAllowlisted {
                key: key.to_string(),
                allowed: self.allowlist.keys().join(", "),
            };
            tracing::warn!("{err}");
            return ActionOutcome::failed(
                ActionKind::OpenApp,
                format!("I can't open {key}; it isn't in my allowlist."),
                err.to_string(),
            );
        };

        match self.launcher.launch(target) {
            Ok(()) => ActionOutcome::ok(ActionKind::OpenApp, format!("Opening {key}.")),
            Err(e) => ActionOutcome::failed(
                ActionKind::OpenApp,
                format!("I couldn't open {key}."),
                e.to_string(),
            ),
        }
    }

    fn open_website(&self, domain: &str, path: &str) -> ActionOutcome {
        let url = normalize_url(&format!("{domain}{path}"));
        match self.launcher.open_url(&url) {
            Ok(()) => {
                ActionOutcome::ok_with_detail(ActionKind::OpenWebsite, format!("Opening {domain}."), url)
            }
            Err(e) => ActionOutcome::failed(
                ActionKind::OpenWebsite,
                format!("I couldn't open {domain}."),
                e.to_string(),
            ),
        }
    }

    fn web_search(&self, query: &str) -> ActionOutcome {
        let url = format!("{SEARCH_URL}{}", urlencoding::encode(query));
        match self.launcher.open_url(&url) {
            Ok(()) => {
                ActionOutcome::ok_with_detail(ActionKind::WebSearch, format!("Searching for {query}."), url)
            }
            Err(e) => ActionOutcome::failed(
                ActionKind::WebSearch,
                "I couldn't run that search.",
                e.to_string(),
            ),
        }
    }

    fn save_note(&self, text: &str) -> ActionOutcome {
        match append_note(&self.notes_file, text) {
            Ok(path) => ActionOutcome::ok_with_detail(
                ActionKind::SaveNote,
                "Saved.",
                path.display().to_string(),
            ),
            Err(e) => ActionOutcome::failed(
                ActionKind::SaveNote,
                "I couldn't save that note.",
                e.to_string(),
            ),
        }
    }

    /// Blocks the session thread for the full duration. There is no
    /// concurrent timer scheduling; the assistant is deaf until this
    /// returns.
    fn run_timer(&self, seconds: u64, count: u64, unit: &str, announce: &dyn Announce) -> ActionOutcome {
        announce.say(&format!("Timer set for {count} {unit}."));
        std::thread::sleep(Duration::from_secs(seconds));
        ActionOutcome::ok(ActionKind::SetTimer, "Time is up!")
    }
}

/// Prefix bare domains with `https://`; URLs that already carry a scheme
/// pass through untouched.
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Append one timestamped line; the file is created on first use and never
/// rewritten.
fn append_note(path: &Path, text: &str) -> Result<PathBuf, ActionError> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ActionError::NoteWrite(e.to_string()))?;

    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    writeln!(file, "{timestamp} - {text}").map_err(|e| ActionError::NoteWrite(e.to_string()))?;

    Ok(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()))
}
