/// Column-drive / row-read access to the key matrix's GPIO lines.
///
/// The physical matrix is 8 columns by 8 rows, active low, plus one
/// RESTORE key wired to its own dedicated input pin outside the
/// matrix. A scan drives one column low at a time and reads back
/// which rows pulled low with it.
pub trait MatrixIO {
    /// Drives the given column (0..8) low and lets the line settle.
    fn drive_column(&mut self, col: u8);

    /// Releases the given column back to its idle high state.
    fn release_column(&mut self, col: u8);

    /// Reads all 8 row inputs for the currently driven column as a
    /// bitmask; bit N set means row N is open (not pulled low).
    fn read_rows(&mut self) -> u8;

    /// Reads the dedicated RESTORE key input; `true` means open.
    fn read_restore(&mut self) -> bool;
}
