#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod fmt;

mod bridge;
pub mod config;
mod divisor;
pub mod platform;
pub mod registers;

pub use bridge::{RxSink, SerialBridge, TxSource};
pub use config::{BridgeConfig, CONFIG};
pub use divisor::BaudDivisor;
pub use platform::{IrqHandler, Platform};
pub use registers::{Usart, UsartPeripheral};
