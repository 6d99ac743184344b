pub mod allowlist;
pub mod executor;
pub mod launcher;
pub mod router;

pub use allowlist::{Allowlist, LaunchTarget, OsFamily};
pub use executor::{ActionExecutor, ActionKind, ActionOutcome, Announce};
pub use launcher::{Launcher, SystemLauncher};
pub use router::{seconds_from, ActionRequest, CommandRouter};
