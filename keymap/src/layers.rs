use smart_leds::hsv::Hsv;

use crate::conf::{KEY_COUNT, LAYERS};
use crate::key::{Key, Os};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Layer {
    Mac,
    Pc,
    Util,
}

const fn hsv(hue: u8, sat: u8, val: u8) -> Hsv {
    Hsv { hue, sat, val }
}

/// Shown while the pad reboots into the bootloader.
pub const FLASH_COLOR: Hsv = hsv(0, 0, 255);

impl Layer {
    pub const ALL: [Layer; LAYERS] = [Layer::Mac, Layer::Pc, Layer::Util];

    pub fn index(self) -> usize {
        match self {
            Layer::Mac => 0,
            Layer::Pc => 1,
            Layer::Util => 2,
        }
    }

    pub fn os(self) -> Option<Os> {
        match self {
            Layer::Mac => Some(Os::Mac),
            Layer::Pc => Some(Os::Windows),
            Layer::Util => None,
        }
    }

    pub fn color(self) -> Hsv {
        match self {
            // gunmetal grey
            Layer::Mac => hsv(60, 80, 145),
            // windows blue
            Layer::Pc => hsv(144, 216, 237),
            Layer::Util => hsv(85, 255, 127),
        }
    }

    pub fn keys(self) -> &'static [Key; KEY_COUNT] {
        &KEYMAPS[self.index()]
    }

    pub fn key(self, pos: usize) -> Option<Key> {
        self.keys().get(pos).copied()
    }
}

/*
  Mac / Pc:
  mic mute      video mute     share (hold)
  gallery view  gallery prev   gallery next
  fullscreen    chat           minimal window

  Util:
  arm   2     3
  4     5     6
  7     back  flash
*/
#[rustfmt::skip]
pub static KEYMAPS: [[Key; KEY_COUNT]; LAYERS] = [
    [
        Key::MicMute(Os::Mac),       Key::VideoMute(Os::Mac),   Key::ShareScreen(Os::Mac),
        Key::GalleryToggle(Os::Mac), Key::GalleryPrev(Os::Mac), Key::GalleryNext(Os::Mac),
        Key::Fullscreen(Os::Mac),    Key::Chat(Os::Mac),        Key::MinimalWindow(Os::Mac),
    ],
    [
        Key::MicMute(Os::Windows),       Key::VideoMute(Os::Windows),   Key::ShareScreen(Os::Windows),
        Key::GalleryToggle(Os::Windows), Key::GalleryPrev(Os::Windows), Key::GalleryNext(Os::Windows),
        Key::Fullscreen(Os::Windows),    Key::Chat(Os::Windows),        Key::MinimalWindow(Os::Windows),
    ],
    [
        Key::FlashArm,     Key::UtilShift(2), Key::UtilShift(3),
        Key::UtilShift(4), Key::UtilShift(5), Key::UtilShift(6),
        Key::UtilShift(7), Key::UtilReturn,   Key::Flash,
    ],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_layers_share_a_shape() {
        for pos in 0..KEY_COUNT {
            let mac = Layer::Mac.key(pos).unwrap();
            let pc = Layer::Pc.key(pos).unwrap();
            assert_eq!(mac.is_shift(), pc.is_shift());
            assert_eq!(core::mem::discriminant(&mac), core::mem::discriminant(&pc));
        }
    }

    #[test]
    fn util_layer_corners() {
        assert_eq!(Layer::Util.key(0), Some(Key::FlashArm));
        assert_eq!(Layer::Util.key(7), Some(Key::UtilReturn));
        assert_eq!(Layer::Util.key(8), Some(Key::Flash));
        assert_eq!(Layer::Util.key(9), None);
    }

    #[test]
    fn layer_os() {
        assert_eq!(Layer::Mac.os(), Some(Os::Mac));
        assert_eq!(Layer::Pc.os(), Some(Os::Windows));
        assert_eq!(Layer::Util.os(), None);
        for (i, layer) in Layer::ALL.iter().enumerate() {
            assert_eq!(layer.index(), i);
        }
    }
}
