use usbd_human_interface_device::page::Keyboard as Kc;

/// Host operating system a shortcut targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Os {
    Mac,
    Windows,
}

impl Os {
    pub(crate) fn index(self) -> usize {
        match self {
            Os::Mac => 0,
            Os::Windows => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    MicMute(Os),
    VideoMute(Os),
    ShareScreen(Os),
    GalleryToggle(Os),
    GalleryPrev(Os),
    GalleryNext(Os),
    Fullscreen(Os),
    Chat(Os),
    MinimalWindow(Os),
    /// Util 1, first half of the flash combo.
    FlashArm,
    /// Util 2 to 7.
    UtilShift(u8),
    /// Util 8, back to the Windows layer while a util shift is held.
    UtilReturn,
    Flash,
}

impl Key {
    /// Keys whose hold state gates layer moves.
    pub fn is_shift(&self) -> bool {
        matches!(self, Key::Fullscreen(_) | Key::UtilShift(_))
    }

    /// The shortcut this key sends to the meeting app, if any.
    pub fn chord(&self) -> Option<Chord> {
        use Kc::*;
        const MAC: &[Kc] = &[LeftShift, LeftGUI];
        const CTRL: &[Kc] = &[LeftControl];
        const ALT: &[Kc] = &[LeftAlt];
        const ALT_SHIFT: &[Kc] = &[LeftAlt, LeftShift];

        let chord = match *self {
            Key::MicMute(Os::Mac) => Chord::new(MAC, A),
            Key::VideoMute(Os::Mac) => Chord::new(MAC, V),
            Key::ShareScreen(Os::Mac) => Chord::new(MAC, S),
            Key::GalleryToggle(Os::Mac) => Chord::new(MAC, W),
            Key::GalleryPrev(Os::Mac) => Chord::new(CTRL, P),
            Key::GalleryNext(Os::Mac) => Chord::new(CTRL, N),
            Key::Fullscreen(Os::Mac) => Chord::new(MAC, F),
            Key::Chat(Os::Mac) => Chord::new(MAC, H),
            Key::MinimalWindow(Os::Mac) => Chord::new(MAC, M),

            Key::MicMute(Os::Windows) => Chord::new(ALT, A),
            Key::VideoMute(Os::Windows) => Chord::new(ALT, V),
            Key::ShareScreen(Os::Windows) => Chord::new(ALT_SHIFT, S),
            Key::GalleryToggle(Os::Windows) => Chord::new(ALT, F2),
            Key::GalleryPrev(Os::Windows) => Chord::key(PageDown),
            Key::GalleryNext(Os::Windows) => Chord::key(PageUp),
            Key::Fullscreen(Os::Windows) => Chord::new(ALT, F),
            Key::Chat(Os::Windows) => Chord::new(ALT, H),
            Key::MinimalWindow(Os::Windows) => return None,

            Key::FlashArm | Key::UtilShift(_) | Key::UtilReturn | Key::Flash => return None,
        };
        Some(chord)
    }
}

/// Modifiers and a key pressed together and released together.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chord {
    pub modifiers: &'static [Kc],
    pub key: Kc,
}

impl Chord {
    pub const fn new(modifiers: &'static [Kc], key: Kc) -> Self {
        Chord { modifiers, key }
    }

    pub const fn key(key: Kc) -> Self {
        Chord { modifiers: &[], key }
    }

    /// Every usage that is down while the chord is held, modifiers first.
    pub fn keys(&self) -> impl Iterator<Item = Kc> + '_ {
        self.modifiers.iter().copied().chain(core::iter::once(self.key))
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Chord {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "chord(");
        for m in self.modifiers {
            defmt::write!(f, "{}+", *m as u8);
        }
        defmt::write!(f, "{})", self.key as u8)
    }
}
