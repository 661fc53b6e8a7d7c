use heapless::Vec;

use crate::conf::KEY_COUNT;

/// A key going down or up, by matrix position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEvent {
    Press(u8),
    Release(u8),
}

impl KeyEvent {
    pub fn pos(&self) -> usize {
        match self {
            KeyEvent::Press(p) | KeyEvent::Release(p) => *p as usize,
        }
    }

    pub fn is_press(&self) -> bool {
        matches!(self, KeyEvent::Press(_))
    }
}

/// Last scanned matrix, one bit per position.
#[derive(Default)]
pub struct Matrix {
    state: u16,
}

impl Matrix {
    pub fn new() -> Self {
        Matrix { state: 0 }
    }

    #[cfg(test)]
    fn is_down(&self, pos: usize) -> bool {
        pos < KEY_COUNT && self.state & (1 << pos) != 0
    }

    /// Diffs a fresh scan against the previous one.
    pub fn update(&mut self, scan: u16) -> Vec<KeyEvent, KEY_COUNT> {
        let scan = scan & ((1 << KEY_COUNT) - 1);
        let changed = scan ^ self.state;
        let mut events = Vec::new();
        for pos in 0..KEY_COUNT {
            if changed & (1 << pos) == 0 {
                continue;
            }
            let event = if scan & (1 << pos) != 0 {
                KeyEvent::Press(pos as u8)
            } else {
                KeyEvent::Release(pos as u8)
            };
            // at most one event per position
            let _ = events.push(event);
        }
        self.state = scan;
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_edges_only() {
        let mut matrix = Matrix::new();
        assert_eq!(matrix.update(0b0_0000_0101).as_slice(), &[KeyEvent::Press(0), KeyEvent::Press(2)]);
        assert!(matrix.update(0b0_0000_0101).is_empty());
        assert_eq!(matrix.update(0b1_0000_0001).as_slice(), &[KeyEvent::Release(2), KeyEvent::Press(8)]);
        assert!(matrix.is_down(0));
        assert!(matrix.is_down(8));
        assert!(!matrix.is_down(2));
    }

    #[test]
    fn ignores_bits_outside_the_matrix() {
        let mut matrix = Matrix::new();
        assert!(matrix.update(0b1110_0000_0000).is_empty());
        assert!(!matrix.is_down(9));
    }

    #[test]
    fn event_accessors() {
        assert_eq!(KeyEvent::Release(4).pos(), 4);
        assert!(KeyEvent::Press(1).is_press());
        assert!(!KeyEvent::Release(1).is_press());
    }
}
