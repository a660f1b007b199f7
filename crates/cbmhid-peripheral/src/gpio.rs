//! Concrete `MatrixIO` over STM32 GPIO pins (§6 expansion). Grounded on the
//! teacher's `dxkb-lily58l-stemcell::config` pin-type conventions, but fixed
//! at the spec's 8 columns / 8 rows / 1 RESTORE line rather than the
//! teacher's per-side generic matrix, since this board's matrix size is not
//! configurable.

use stm32f4xx_hal::gpio::{ErasedPin, Input, Output, PushPull};

use crate::matrix_io::MatrixIO;

/// Active-low key matrix wired to erased GPIO pins: one push-pull output
/// per column, one pull-up input per row, plus a dedicated pull-up RESTORE
/// input outside the matrix.
pub struct GpioMatrixIO {
    columns: [ErasedPin<Output<PushPull>>; 8],
    rows: [ErasedPin<Input>; 8],
    restore: ErasedPin<Input>,
}

impl GpioMatrixIO {
    pub fn new(
        columns: [ErasedPin<Output<PushPull>>; 8],
        rows: [ErasedPin<Input>; 8],
        restore: ErasedPin<Input>,
    ) -> Self {
        let mut io = Self {
            columns,
            rows,
            restore,
        };
        for col in &mut io.columns {
            col.set_high();
        }
        io
    }
}

impl MatrixIO for GpioMatrixIO {
    fn drive_column(&mut self, col: u8) {
        self.columns[col as usize].set_low();
    }

    fn release_column(&mut self, col: u8) {
        self.columns[col as usize].set_high();
    }

    fn read_rows(&mut self) -> u8 {
        let mut bits = 0u8;
        for (row, pin) in self.rows.iter().enumerate() {
            if pin.is_high() {
                bits |= 1 << row;
            }
        }
        bits
    }

    fn read_restore(&mut self) -> bool {
        self.restore.is_high()
    }
}
