//! Board pin assignment (§2 expansion, component C0). Fixed at compile
//! time, in the same shape as the teacher's `dxkb-lily58l-stemcell::config`
//! pin-type aliases — this is board configuration, not the runtime key
//! remapping the spec's Non-goals exclude.

use cbmhid_peripheral::gpio::GpioMatrixIO;
use stm32f4xx_hal::gpio::{ErasedPin, Input, Output, Pin, PushPull};

pub const USB_VID: u16 = 0x16c0;
pub const USB_PID: u16 = 0x27db;
pub const USB_MANUFACTURER: &str = "cbmhid";
pub const USB_PRODUCT: &str = "Commodore Matrix Keyboard";
pub const USB_POLL_MS: u8 = 1;

/// Eight column-drive lines, port B pins 0 through 7.
pub type ColumnPins = (
    Pin<'B', 0>,
    Pin<'B', 1>,
    Pin<'B', 2>,
    Pin<'B', 3>,
    Pin<'B', 4>,
    Pin<'B', 5>,
    Pin<'B', 6>,
    Pin<'B', 7>,
);

/// Eight row-read lines, port A pins 0 through 7.
pub type RowPins = (
    Pin<'A', 0>,
    Pin<'A', 1>,
    Pin<'A', 2>,
    Pin<'A', 3>,
    Pin<'A', 4>,
    Pin<'A', 5>,
    Pin<'A', 6>,
    Pin<'A', 7>,
);

/// RESTORE's dedicated input, outside the matrix.
pub type RestorePin = Pin<'A', 8>;

/// Builds the matrix I/O from the board's fixed pin assignment.
pub fn init_matrix_io(columns: ColumnPins, rows: RowPins, restore: RestorePin) -> GpioMatrixIO {
    let columns: [ErasedPin<Output<PushPull>>; 8] = [
        columns.0.into_push_pull_output().erase(),
        columns.1.into_push_pull_output().erase(),
        columns.2.into_push_pull_output().erase(),
        columns.3.into_push_pull_output().erase(),
        columns.4.into_push_pull_output().erase(),
        columns.5.into_push_pull_output().erase(),
        columns.6.into_push_pull_output().erase(),
        columns.7.into_push_pull_output().erase(),
    ];

    let rows: [ErasedPin<Input>; 8] = [
        rows.0.into_pull_up_input().erase(),
        rows.1.into_pull_up_input().erase(),
        rows.2.into_pull_up_input().erase(),
        rows.3.into_pull_up_input().erase(),
        rows.4.into_pull_up_input().erase(),
        rows.5.into_pull_up_input().erase(),
        rows.6.into_pull_up_input().erase(),
        rows.7.into_pull_up_input().erase(),
    ];

    let restore: ErasedPin<Input> = restore.into_pull_up_input().erase();

    GpioMatrixIO::new(columns, rows, restore)
}
