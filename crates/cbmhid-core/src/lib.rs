#![no_std]

pub mod debounce;
pub mod keyboard;
pub mod keys;
pub mod report;
pub mod scan;
mod timing;
pub mod translate;

pub use debounce::KeyState;
pub use keyboard::Keyboard;
pub use keys::Modifier;
