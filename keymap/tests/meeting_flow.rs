use usbd_human_interface_device::page::Keyboard as Kc;
use zoomer_keymap::{Instant, Keypad, Layer, Matrix, Status, Typer};

const MIC: u16 = 1 << 0;
const SHARE: u16 = 1 << 2;
const FULL: u16 = 1 << 6;
const CHAT: u16 = 1 << 7;

/// Matrix scans in, USB reports out, the same way the firmware idle loop does it.
struct Pad {
    matrix: Matrix,
    keypad: Keypad,
    typer: Typer,
    now: u32,
}

impl Pad {
    fn new() -> Self {
        Pad {
            matrix: Matrix::new(),
            keypad: Keypad::new(),
            typer: Typer::new(),
            now: 0,
        }
    }

    fn scan(&mut self, bits: u16) {
        let now = Instant::from_ticks(self.now);
        for event in self.matrix.update(bits) {
            self.keypad.key_event(event, now, &mut self.typer);
        }
        self.keypad.poll(now, &mut self.typer);
    }

    fn hold(&mut self, bits: u16, ms: u32) {
        for _ in 0..ms {
            self.now += 1;
            self.scan(bits);
        }
    }

    fn reports(&mut self) -> Vec<Vec<Kc>> {
        core::iter::from_fn(|| self.typer.next_report())
            .map(|r| r.iter().copied().collect())
            .collect()
    }
}

#[test]
fn a_meeting_on_a_mac() {
    let mut pad = Pad::new();

    // companion says the mic is live and the camera is on
    pad.keypad.raw_hid_receive(&Status::new(false, false).encode());
    assert!(!pad.keypad.mic_muted());

    // mute
    pad.scan(MIC);
    pad.scan(0);
    assert_eq!(
        pad.reports(),
        vec![vec![Kc::LeftShift, Kc::LeftGUI, Kc::A], vec![]]
    );
    assert!(pad.keypad.mic_muted());

    // hold share for two seconds
    pad.hold(SHARE, 2000);
    pad.scan(0);
    assert_eq!(
        pad.reports(),
        vec![vec![Kc::LeftShift, Kc::LeftGUI, Kc::S], vec![]]
    );
    assert!(pad.keypad.screen_sharing());

    // open chat
    pad.scan(CHAT);
    pad.scan(0);
    assert_eq!(pad.reports().len(), 2);
    assert!(pad.keypad.chat_open(zoomer_keymap::Os::Mac));

    let frame = pad.keypad.take_frame().unwrap();
    assert_ne!(frame[7], frame[4]);
}

#[test]
fn hopping_to_windows_and_back() {
    let mut pad = Pad::new();

    // fullscreen + minimal window: over to the Windows layer
    pad.scan(FULL);
    pad.scan(FULL | (1 << 8));
    pad.scan(FULL);
    pad.scan(0);
    assert_eq!(pad.keypad.layer(), Layer::Pc);
    assert!(pad.reports().is_empty());

    // Windows mute is Alt+A
    pad.scan(MIC);
    pad.scan(0);
    assert_eq!(pad.reports(), vec![vec![Kc::LeftAlt, Kc::A], vec![]]);

    // fullscreen + chat: back to the Mac layer
    pad.scan(FULL);
    pad.scan(FULL | CHAT);
    pad.scan(0);
    assert_eq!(pad.keypad.layer(), Layer::Mac);
    assert!(pad.reports().is_empty());
}
