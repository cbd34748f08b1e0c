#![cfg_attr(not(any(test, feature = "std")), no_std)]
//! Ra-02 LoRa Radio Driver
//!
//! This crate drives the Ai-Thinker Ra-02 module, a Semtech SX1278 transceiver wired for the
//! 433 MHz band, through its 8-bit register interface over SPI.
//!
//! # Features
//! - LoRa modem only
//! - Frequency set in kHz, power in dB, bandwidth in Hz, OCP in mA
//! - Blocking single-packet send and receive with bounded busy-polling of the IRQ flags
//! - RSSI captured on every valid header
//! - `no_std`, no allocation; all buffers belong to the caller
//!
//! # Architecture
//! The driver is organized into several modules:
//!
//! - [`device`]: Register access over an embedded-hal [`SpiDevice`](embedded_hal::spi::SpiDevice)
//!   - Single register reads and writes, FIFO burst writes
//!   - Typed access to the definitions in [`registers`]
//!
//! - [`registers`]: Register definitions for direct hardware access
//!
//! - [`radio`]: The [`Ra02`] driver context
//!   - Initialization and operating mode transitions
//!   - RF and modem parameters
//!   - Transmit and receive sequences
//!
//! - [`table`]: Range tables translating power and bandwidth into register codes
//! - [`timeout`]: The [`Timeout`] bounding the poll loops
//! - [`config`]: The [`Config`] applied by [`Ra02::init`]
//!
//! # Usage
//! Create a [`Ra02`] with an SPI device, a delay and a timer, call [`Ra02::init`] once, then
//! call [`Ra02::send`] and [`Ra02::recv`] as often as needed. Each of them returns with the
//! radio in SLEEP.
//!
//! # Important Notes
//! - Nothing but the accessors is meaningful before `init` succeeded
//! - One packet is at most [`MAX_PACKET_SIZE`] bytes, the size of one SPI burst
//! - The driver never caches the operating mode; the chip is the only source of truth
//! - The reset line is not driven
//!
//! # Logging
//! Enable the `log` or `defmt` feature to route the driver's log output to that crate.
//!
//! # Example
//! ```no_run
//! use embedded_hal::{delay::DelayNs, spi::SpiDevice};
//! use ra02::{Config, Error, Ra02, Timeout};
//!
//! fn echo<SPI, DELAY, TIMER, T>(
//!     spi: SPI,
//!     delay: DELAY,
//!     timer: TIMER,
//!     rx_timeout: &mut T,
//! ) -> Result<(), Error<SPI::Error>>
//! where
//!     SPI: SpiDevice,
//!     DELAY: DelayNs,
//!     TIMER: Timeout,
//!     T: Timeout,
//! {
//!     let mut radio = Ra02::new(spi, delay, timer, Config::default().with_spreading_factor(9));
//!     radio.init()?;
//!
//!     let mut buf = [0u8; ra02::MAX_PACKET_SIZE];
//!     rx_timeout.start(5_000);
//!     let len = radio.recv(&mut buf, rx_timeout)?;
//!     radio.send(&buf[..len])
//! }
//! ```

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod config;
pub mod device;
mod error;
pub mod radio;
pub mod registers;
pub mod table;
pub mod timeout;

pub use config::Config;
pub use device::Device;
pub use error::Error;
pub use radio::{Mode, Ra02, EXPECTED_VERSION, MAX_PACKET_SIZE};
#[cfg(any(test, feature = "std"))]
pub use timeout::StdTimeout;
pub use timeout::Timeout;
