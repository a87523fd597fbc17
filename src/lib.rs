//! VEML6075 Rust Driver
//!
//! Driver for the Vishay VEML6075 UVA/UVB light sensor on I2C. Register
//! reads are cached for [`READ_DELAY_SECS`] seconds so that calling several
//! accessors in a row only polls the bus once; statistics on cached,
//! uncached and failed polls are kept in [`Stats`].
//!
//! Blocking by default, `async` feature for `embedded-hal-async` buses,
//! `defmt` feature for logging and `defmt::Format` derives.
//!
//! ```no_run
//! # fn demo<I: embedded_hal::i2c::I2c>(i2c: I, now: impl Fn() -> f64) {
//! use veml6075_rs::Veml6075;
//!
//! let mut slot = Veml6075::new_default(i2c, now).ok();
//! if let Some(sensor) = slot.as_mut() {
//!     let _index = sensor.uv_index();
//!     let _level = sensor.uv_index_level();
//! }
//! Veml6075::destroy(&mut slot);
//! # }
//! ```

#![no_std]

#[macro_use]
mod fmt;

pub mod clock;
pub mod data_types;
pub mod driver;
pub mod error;
pub mod registers;

pub use clock::Clock;
pub use data_types::{RawCounts, Stats, UvIndexLevel};
pub use driver::{READ_DELAY_SECS, Veml6075};
pub use error::Error;
pub use registers::DEFAULT_I2C_ADDRESS;
