use crate::{TriggerEvent, TriggerSource};
use hark_core::TriggerError;
use std::io::{BufRead, StdinLock, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Press-to-talk trigger: blocks on a console line read. An empty line arms
/// a capture; `q`/`quit` or closed input ends the session.
pub struct ManualTrigger<R> {
    input: R,
    stop: Arc<AtomicBool>,
}

impl ManualTrigger<StdinLock<'static>> {
    pub fn from_stdin(stop: Arc<AtomicBool>) -> Self {
        Self::new(std::io::stdin().lock(), stop)
    }
}

impl<R: BufRead> ManualTrigger<R> {
    pub fn new(input: R, stop: Arc<AtomicBool>) -> Self {
        Self { input, stop }
    }
}

impl<R: BufRead> TriggerSource for ManualTrigger<R> {
    fn wait_for_trigger(&mut self) -> Result<TriggerEvent, TriggerError> {
        if self.stop.load(Ordering::Relaxed) {
            return Ok(TriggerEvent::Stop);
        }

        print!("[press Enter to speak, q + Enter to quit] ");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 || self.stop.load(Ordering::Relaxed) {
            return Ok(TriggerEvent::Stop);
        }

        match line.trim() {
            "q" | "quit" => Ok(TriggerEvent::Stop),
            _ => Ok(TriggerEvent::Ready),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn make_trigger(input: &str) -> ManualTrigger<Cursor<Vec<u8>>> {
        ManualTrigger::new(
            Cursor::new(input.as_bytes().to_vec()),
            Arc::new(AtomicBool::new(false)),
        )
    }

    #[test]
    fn test_empty_line_is_ready() {
        let mut trigger = make_trigger("\n");
        assert!(matches!(
            trigger.wait_for_trigger().unwrap(),
            TriggerEvent::Ready
        ));
    }

    #[test]
    fn test_q_is_stop() {
        let mut trigger = make_trigger("q\n");
        assert!(matches!(
            trigger.wait_for_trigger().unwrap(),
            TriggerEvent::Stop
        ));
    }

    #[test]
    fn test_quit_is_stop() {
        let mut trigger = make_trigger("quit\n");
        assert!(matches!(
            trigger.wait_for_trigger().unwrap(),
            TriggerEvent::Stop
        ));
    }

    #[test]
    fn test_eof_is_stop() {
        let mut trigger = make_trigger("");
        assert!(matches!(
            trigger.wait_for_trigger().unwrap(),
            TriggerEvent::Stop
        ));
    }

    #[test]
    fn test_stop_flag_wins_over_pending_input() {
        let stop = Arc::new(AtomicBool::new(true));
        let mut trigger = ManualTrigger::new(Cursor::new(b"\n".to_vec()), stop);
        assert!(matches!(
            trigger.wait_for_trigger().unwrap(),
            TriggerEvent::Stop
        ));
    }

    #[test]
    fn test_sequence_of_triggers() {
        let mut trigger = make_trigger("\n\nq\n");
        assert!(matches!(
            trigger.wait_for_trigger().unwrap(),
            TriggerEvent::Ready
        ));
        assert!(matches!(
            trigger.wait_for_trigger().unwrap(),
            TriggerEvent::Ready
        ));
        assert!(matches!(
            trigger.wait_for_trigger().unwrap(),
            TriggerEvent::Stop
        ));
    }
}
