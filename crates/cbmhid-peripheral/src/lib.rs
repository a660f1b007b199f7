#![no_std]

pub mod matrix_io;

#[cfg(feature = "stm32f4")]
pub mod gpio;

#[cfg(feature = "stm32f4")]
pub mod clock;
