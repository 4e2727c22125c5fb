#![no_std]

pub mod gps;
pub mod hardware;
pub mod macros;
pub mod rtc;

pub use gps::*;
pub use rtc::*;
