use heapless::{Deque, Vec};
use usbd_human_interface_device::page::Keyboard as Kc;

use crate::conf::{REPORT_KEYS_MAX, TAP_QUEUE_LEN};
use crate::key::Chord;
use crate::keypad::Host;
use crate::logging::warn;

pub type Report = Vec<Kc, REPORT_KEYS_MAX>;

/// Turns queued chord taps into a press report followed by a release report.
pub struct Typer {
    queue: Deque<Chord, TAP_QUEUE_LEN>,
    pressed: bool,
    reset_requested: bool,
}

impl Default for Typer {
    fn default() -> Self {
        Self::new()
    }
}

impl Typer {
    pub fn new() -> Self {
        Typer {
            queue: Deque::new(),
            pressed: false,
            reset_requested: false,
        }
    }

    pub fn push(&mut self, chord: Chord) {
        if self.queue.push_back(chord).is_err() {
            warn!("tap queue overflow, dropping chord");
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.pressed && self.queue.is_empty()
    }

    /// The next report to hand to the keyboard interface. Call again only
    /// after the previous report was accepted.
    pub fn next_report(&mut self) -> Option<Report> {
        if self.pressed {
            self.pressed = false;
            return Some(Report::new());
        }
        let chord = self.queue.pop_front()?;
        self.pressed = true;
        Some(chord.keys().take(REPORT_KEYS_MAX).collect())
    }

    /// Bootloader entry waits until every queued tap has been released.
    pub fn take_reset_request(&mut self) -> bool {
        if self.reset_requested && self.is_idle() {
            self.reset_requested = false;
            true
        } else {
            false
        }
    }
}

impl Host for Typer {
    fn tap(&mut self, chord: Chord) {
        self.push(chord);
    }

    fn reset_to_bootloader(&mut self) {
        self.reset_requested = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{Key, Os};

    #[test]
    fn tap_is_press_then_release() {
        let mut typer = Typer::new();
        typer.tap(Key::Chat(Os::Windows).chord().unwrap());
        assert!(!typer.is_idle());

        let press = typer.next_report().unwrap();
        assert_eq!(press.as_slice(), &[Kc::LeftAlt, Kc::H]);
        let release = typer.next_report().unwrap();
        assert!(release.is_empty());
        assert!(typer.is_idle());
        assert_eq!(typer.next_report(), None);
    }

    #[test]
    fn repeated_chords_are_released_in_between() {
        let mut typer = Typer::new();
        let mic = Key::MicMute(Os::Mac).chord().unwrap();
        typer.tap(mic);
        typer.tap(mic);
        let reports: std::vec::Vec<Report> = core::iter::from_fn(|| typer.next_report()).collect();
        assert_eq!(reports.len(), 4);
        assert_eq!(reports[0], reports[2]);
        assert!(reports[1].is_empty());
        assert!(reports[3].is_empty());
    }

    #[test]
    fn overflow_drops_newest() {
        let mut typer = Typer::new();
        for _ in 0..TAP_QUEUE_LEN {
            typer.tap(Chord::key(Kc::PageUp));
        }
        typer.tap(Chord::key(Kc::PageDown));
        let presses = core::iter::from_fn(|| typer.next_report())
            .filter(|r| !r.is_empty())
            .inspect(|r| assert_eq!(r.as_slice(), &[Kc::PageUp]))
            .count();
        assert_eq!(presses, TAP_QUEUE_LEN);
    }

    #[test]
    fn reset_waits_for_pending_taps() {
        let mut typer = Typer::new();
        typer.tap(Chord::key(Kc::PageUp));
        typer.reset_to_bootloader();
        assert!(!typer.take_reset_request());
        typer.next_report();
        assert!(!typer.take_reset_request());
        typer.next_report();
        assert!(typer.take_reset_request());
        assert!(!typer.take_reset_request());
    }
}
