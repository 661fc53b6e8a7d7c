use smart_leds::hsv::{hsv2rgb, Hsv};
use smart_leds::RGB8;

use crate::conf::{KEY_COUNT, LED_COUNT};

/// LED index under each key position. The strip runs right to left:
///
/// ```text
/// 2 1 0
/// 5 4 3
/// 8 7 6
/// ```
pub const LED_FOR_KEY: [usize; KEY_COUNT] = [2, 1, 0, 5, 4, 3, 8, 7, 6];

pub type Frame = [RGB8; LED_COUNT];

/// Single-LED segments drawn over the base colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Indicator {
    Mic,
    Video,
    Chat,
}

impl Indicator {
    pub const ALL: [Indicator; 3] = [Indicator::Mic, Indicator::Video, Indicator::Chat];

    fn index(self) -> usize {
        match self {
            Indicator::Mic => 0,
            Indicator::Video => 1,
            Indicator::Chat => 2,
        }
    }

    /// Sits under the key that controls it.
    pub fn led(self) -> usize {
        match self {
            Indicator::Mic => LED_FOR_KEY[0],
            Indicator::Video => LED_FOR_KEY[1],
            Indicator::Chat => LED_FOR_KEY[7],
        }
    }

    pub fn color(self) -> Hsv {
        match self {
            Indicator::Mic | Indicator::Video => Hsv { hue: 0, sat: 255, val: 255 },
            Indicator::Chat => Hsv { hue: 43, sat: 255, val: 255 },
        }
    }
}

/// Static base colour plus indicator overlays, re-rendered only when
/// something changed.
pub struct Lighting {
    base: Hsv,
    indicators: [bool; 3],
    dirty: bool,
}

impl Lighting {
    pub fn new(base: Hsv) -> Self {
        Lighting {
            base,
            indicators: [false; 3],
            dirty: true,
        }
    }

    pub fn set_base(&mut self, base: Hsv) {
        self.base = base;
        self.dirty = true;
    }

    pub fn set(&mut self, indicator: Indicator, on: bool) {
        let slot = &mut self.indicators[indicator.index()];
        if *slot != on {
            *slot = on;
            self.dirty = true;
        }
    }

    pub fn is_on(&self, indicator: Indicator) -> bool {
        self.indicators[indicator.index()]
    }

    pub fn frame(&self) -> Frame {
        let mut frame = [hsv2rgb(self.base); LED_COUNT];
        for indicator in Indicator::ALL {
            if self.is_on(indicator) {
                frame[indicator.led()] = hsv2rgb(indicator.color());
            }
        }
        frame
    }

    /// The frame to push to the strip, if it changed since the last call.
    pub fn take_frame(&mut self) -> Option<Frame> {
        if self.dirty {
            self.dirty = false;
            Some(self.frame())
        } else {
            None
        }
    }
}
