use crate::conf::{KEY_COUNT, SHARE_HOLD};
use crate::key::{Chord, Key, Os};
use crate::layers::{Layer, FLASH_COLOR};
use crate::leds::{Frame, Indicator, Lighting};
use crate::logging::{debug, info, warn};
use crate::matrix::KeyEvent;
use crate::status::Status;
use crate::Instant;

/// Whatever sits between the keypad and the USB stack.
pub trait Host {
    fn tap(&mut self, chord: Chord);
    fn reset_to_bootloader(&mut self);
}

/// A key that is physically down, resolved on the layer it went down on.
#[derive(Clone, Copy)]
struct Held {
    key: Key,
    since: Instant,
    /// Set once the key has done its job on press (a layer move, a fired
    /// share hold, a spent shift) so its release action is skipped.
    consumed: bool,
    /// A shift key that already gated a layer move or a chat press; it no
    /// longer counts as shift while it stays down.
    spent: bool,
}

pub struct Keypad {
    layer: Layer,
    mic_muted: bool,
    video_muted: bool,
    chat_open: [bool; 2],
    screen_sharing: bool,
    held: [Option<Held>; KEY_COUNT],
    lighting: Lighting,
    flashing: bool,
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}

impl Keypad {
    pub fn new() -> Self {
        let mut keypad = Keypad {
            layer: Layer::Mac,
            mic_muted: true,
            video_muted: true,
            chat_open: [false; 2],
            screen_sharing: false,
            held: [None; KEY_COUNT],
            lighting: Lighting::new(Layer::Mac.color()),
            flashing: false,
        };
        keypad.show_layer();
        info!("keypad ready on {:?} layer", keypad.layer);
        keypad
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn mic_muted(&self) -> bool {
        self.mic_muted
    }

    pub fn video_muted(&self) -> bool {
        self.video_muted
    }

    pub fn chat_open(&self, os: Os) -> bool {
        self.chat_open[os.index()]
    }

    pub fn screen_sharing(&self) -> bool {
        self.screen_sharing
    }

    pub fn is_flashing(&self) -> bool {
        self.flashing
    }

    #[cfg(test)]
    fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    pub fn take_frame(&mut self) -> Option<Frame> {
        self.lighting.take_frame()
    }

    pub fn key_event<H: Host>(&mut self, event: KeyEvent, now: Instant, host: &mut H) {
        if self.flashing {
            return;
        }
        let pos = event.pos();
        if pos >= KEY_COUNT {
            warn!("key event outside the matrix: {}", pos as u8);
            return;
        }
        match event {
            KeyEvent::Press(_) => self.press(pos, now, host),
            KeyEvent::Release(_) => self.release(pos, host),
        }
    }

    /// Runs every pass of the idle loop; fires share holds that outlived
    /// `SHARE_HOLD`.
    pub fn poll<H: Host>(&mut self, now: Instant, host: &mut H) {
        if self.flashing {
            return;
        }
        for held in self.held.iter_mut().flatten() {
            let Key::ShareScreen(os) = held.key else {
                continue;
            };
            if held.consumed {
                continue;
            }
            let long_enough = now
                .checked_duration_since(held.since)
                .map_or(false, |elapsed| elapsed > SHARE_HOLD);
            if long_enough {
                held.consumed = true;
                self.screen_sharing = !self.screen_sharing;
                info!("{:?} screen share toggled, sharing: {}", os, self.screen_sharing);
                if let Some(chord) = held.key.chord() {
                    host.tap(chord);
                }
            }
        }
    }

    /// Meeting state pushed by the companion; malformed reports are dropped.
    pub fn raw_hid_receive(&mut self, data: &[u8]) {
        if self.flashing {
            return;
        }
        match Status::decode(data) {
            Ok(status) => {
                info!("{}", status.describe());
                self.mic_muted = status.mic_muted;
                self.video_muted = status.video_muted;
                self.lighting.set(Indicator::Mic, self.mic_muted);
                self.lighting.set(Indicator::Video, self.video_muted);
            }
            Err(e) => warn!("ignoring raw hid report: {:?}", e),
        }
    }

    fn press<H: Host>(&mut self, pos: usize, now: Instant, host: &mut H) {
        let Some(key) = self.layer.key(pos) else {
            return;
        };
        debug!("pressed {:?}", key);
        let mut held = Held {
            key,
            since: now,
            consumed: false,
            spent: false,
        };

        match key {
            Key::MinimalWindow(Os::Mac) if self.shift_held() => {
                self.consume_shift();
                held.consumed = true;
                self.move_to(Layer::Pc);
            }
            Key::Chat(Os::Windows) if self.shift_held() => {
                // the shift stays live so it can take the Mac layer back to Pc
                self.silence_shift();
                held.consumed = true;
                self.move_to(Layer::Mac);
            }
            Key::MinimalWindow(Os::Windows) if self.shift_held() => {
                self.consume_shift();
                held.consumed = true;
                self.move_to(Layer::Util);
            }
            Key::UtilReturn if self.util_shift_held() => {
                // the util key stays down and keeps working as shift on Pc
                self.move_to(Layer::Pc);
            }
            Key::Flash if self.flash_armed() && self.util_shift_held() => {
                info!("entering bootloader");
                self.flashing = true;
                self.lighting.set_base(FLASH_COLOR);
                host.reset_to_bootloader();
            }
            Key::ShareScreen(_) => debug!("share hold started"),
            _ => {}
        }

        if self.held[pos].is_some() {
            warn!("press on a key already down: {}", pos as u8);
        }
        self.held[pos] = Some(held);
    }

    fn release<H: Host>(&mut self, pos: usize, host: &mut H) {
        let Some(held) = self.held[pos].take() else {
            warn!("release without press: {}", pos as u8);
            return;
        };
        debug!("released {:?}", held.key);

        match held.key {
            Key::MicMute(_) => {
                self.mic_muted = !self.mic_muted;
                self.lighting.set(Indicator::Mic, self.mic_muted);
                tap(host, held.key);
            }
            Key::VideoMute(_) => {
                self.video_muted = !self.video_muted;
                self.lighting.set(Indicator::Video, self.video_muted);
                tap(host, held.key);
            }
            Key::GalleryToggle(_) | Key::GalleryPrev(_) | Key::GalleryNext(_) => tap(host, held.key),
            Key::Fullscreen(_) | Key::MinimalWindow(_) => {
                if !held.consumed {
                    tap(host, held.key);
                }
            }
            Key::Chat(_) if held.consumed => {}
            Key::Chat(_) if self.shift_held() => self.consume_shift(),
            Key::Chat(os) => {
                let open = !self.chat_open[os.index()];
                self.chat_open[os.index()] = open;
                if self.layer.os() == Some(os) {
                    self.lighting.set(Indicator::Chat, open);
                }
                tap(host, held.key);
            }
            Key::ShareScreen(_) => {
                if !held.consumed {
                    debug!("share tapped, not held");
                }
            }
            Key::FlashArm | Key::UtilShift(_) | Key::UtilReturn | Key::Flash => {}
        }
    }

    fn shift_held(&self) -> bool {
        self.held
            .iter()
            .flatten()
            .any(|h| h.key.is_shift() && !h.spent)
    }

    fn util_shift_held(&self) -> bool {
        self.held
            .iter()
            .flatten()
            .any(|h| matches!(h.key, Key::UtilShift(_)))
    }

    fn flash_armed(&self) -> bool {
        self.held.iter().flatten().any(|h| h.key == Key::FlashArm)
    }

    fn consume_shift(&mut self) {
        for held in self.held.iter_mut().flatten() {
            if held.key.is_shift() {
                held.consumed = true;
                held.spent = true;
            }
        }
    }

    /// Skips the shift keys' own release taps without spending them.
    fn silence_shift(&mut self) {
        for held in self.held.iter_mut().flatten() {
            if held.key.is_shift() {
                held.consumed = true;
            }
        }
    }

    fn move_to(&mut self, layer: Layer) {
        self.layer = layer;
        info!("on {:?} layer", layer);
        self.show_layer();
    }

    fn show_layer(&mut self) {
        self.lighting.set_base(self.layer.color());
        self.lighting.set(Indicator::Mic, self.mic_muted);
        self.lighting.set(Indicator::Video, self.video_muted);
        let chat = self.layer.os().map_or(false, |os| self.chat_open(os));
        self.lighting.set(Indicator::Chat, chat);
    }
}

fn tap<H: Host>(host: &mut H, key: Key) {
    if let Some(chord) = key.chord() {
        host.tap(chord);
    }
}
