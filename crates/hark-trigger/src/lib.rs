pub mod energy;
pub mod engine;
pub mod manual;
pub mod registry;
#[cfg(feature = "rustpotter")]
pub mod rustpotter_engine;
pub mod wake;

pub use energy::EnergyEngine;
pub use engine::WakeEngine;
pub use manual::ManualTrigger;
pub use registry::WakeEngineRegistry;
#[cfg(feature = "rustpotter")]
pub use rustpotter_engine::RustpotterEngine;
pub use wake::{FrameSource, MicFrames, WakeTrigger};

use hark_core::TriggerError;

/// What a trigger source resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    /// Capture a command window now.
    Ready,
    /// End the session.
    Stop,
}

/// A readiness signal that optionally blocks: either a press-to-talk prompt
/// or a continuous wake-word detector. Both honor the shared stop flag at
/// their checkpoints; in-flight blocking reads are not preempted.
pub trait TriggerSource {
    fn wait_for_trigger(&mut self) -> Result<TriggerEvent, TriggerError>;
}

impl<T: TriggerSource + ?Sized> TriggerSource for Box<T> {
    fn wait_for_trigger(&mut self) -> Result<TriggerEvent, TriggerError> {
        (**self).wait_for_trigger()
    }
}
