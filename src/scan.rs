use stm32f1xx_hal::gpio::{ErasedPin, Input, Output, PullUp, PushPull};
use zoomer_keymap::conf::{COLS, ROWS};

pub type Rows = [ErasedPin<Input<PullUp>>; ROWS];
pub type Cols = [ErasedPin<Output<PushPull>>; COLS];

/// Column-driven key matrix, rows read back through pull-ups.
pub struct Scanner {
    rows: Rows,
    cols: Cols,
    settle_cycles: u32,
}

impl Scanner {
    pub fn new(rows: Rows, mut cols: Cols, settle_cycles: u32) -> Self {
        for col in cols.iter_mut() {
            col.set_high();
        }
        Scanner {
            rows,
            cols,
            settle_cycles,
        }
    }

    /// One pass over the matrix, bit `row * COLS + col` set for every closed switch.
    pub fn scan(&mut self) -> u16 {
        let mut bits = 0u16;
        for col in 0..COLS {
            self.cols[col].set_low();
            cortex_m::asm::delay(self.settle_cycles);
            for row in 0..ROWS {
                if self.rows[row].is_low() {
                    bits |= 1 << (row * COLS + col);
                }
            }
            self.cols[col].set_high();
        }
        bits
    }
}
