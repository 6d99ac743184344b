use crate::allowlist::{LaunchTarget, OsFamily};
use hark_core::ActionError;
use std::process::Command;

/// Seam between the executor and the OS. Only ever handed allowlisted
/// launch targets or URLs the executor has normalized, never raw user
/// text.
pub trait Launcher {
    fn launch(&self, target: &LaunchTarget) -> Result<(), ActionError>;
    fn open_url(&self, url: &str) -> Result<(), ActionError>;
}

pub struct SystemLauncher {
    os: OsFamily,
}

impl SystemLauncher {
    pub fn new(os: OsFamily) -> Self {
        Self { os }
    }

    fn spawn(mut command: Command, label: &str) -> Result<(), ActionError> {
        // Spawned children detach; GUI apps and browsers manage themselves
        command
            .spawn()
            .map(|_| ())
            .map_err(|e| ActionError::LaunchFailed {
                target: label.to_string(),
                reason: e.to_string(),
            })
    }
}

impl Launcher for SystemLauncher {
    fn launch(&self, target: &LaunchTarget) -> Result<(), ActionError> {
        tracing::info!(app = target.label(), "launching application");
        match target {
            LaunchTarget::Executable(name) => Self::spawn(Command::new(name), name),
            LaunchTarget::AppBundle(name) => {
                let mut command = Command::new("open");
                command.arg("-a").arg(name);
                Self::spawn(command, name)
            }
            LaunchTarget::Shell(name) => {
                let mut command = Command::new("cmd");
                command.args(["/C", "start", ""]).arg(name);
                Self::spawn(command, name)
            }
        }
    }

    fn open_url(&self, url: &str) -> Result<(), ActionError> {
        tracing::info!(url, "opening in browser");
        let command = match self.os {
            OsFamily::Windows => {
                let mut c = Command::new("cmd");
                c.args(["/C", "start", ""]).arg(url);
                c
            }
            OsFamily::Mac => {
                let mut c = Command::new("open");
                c.arg(url);
                c
            }
            OsFamily::Linux => {
                let mut c = Command::new("xdg-open");
                c.arg(url);
                c
            }
        };
        Self::spawn(command, url)
    }
}
