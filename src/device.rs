//! SX1278 Register Access Interface
//!
//! This module provides the lowest layer of the driver: single-register reads and writes and
//! burst writes over an SPI device. Every SX1278 register is 8 bits wide and addressed by a
//! 7-bit address; the top bit of the address byte selects write (set) or read (clear).
//!
//! The interface is built around the `Device<SPI>` struct which wraps an SPI interface and
//! provides methods for:
//! - Reading and writing raw register bytes
//! - Reading and writing typed registers from [`crate::registers`]
//! - Burst writing the FIFO
//!
//! Bus errors are returned unchanged inside [`Error::Bus`]. Nothing in this layer retries.
//!
//! # Example
//! ```no_run
//! use embedded_hal::spi::SpiDevice;
//! use ra02::{device::Device, registers::Version, Error};
//!
//! fn chip_version<SPI: SpiDevice>(spi: SPI) -> Result<u8, Error<SPI::Error>> {
//!     let mut device = Device::new(spi);
//!     let version: Version = device.read_register()?;
//!     Ok(version.value)
//! }
//! ```

use core::convert::Infallible;

use embedded_hal::spi::{Operation, SpiDevice};
use regiface::{ReadableRegister, WritableRegister};

use crate::Error;

/// Address bit marking a register write
pub const WRITE_MARKER: u8 = 0x80;

/// Largest single SPI transaction the chip accepts, including the address byte
pub const MAX_BURST_LEN: usize = 64;

/// Register-level interface to an SX1278.
///
/// This struct wraps an SPI device and provides register reads, writes and burst writes.
pub struct Device<SPI> {
    spi: SPI,
}

impl<SPI> Device<SPI> {
    /// Creates a new Device instance wrapping the provided SPI interface.
    ///
    /// # Arguments
    /// * `spi` - An SPI interface implementing the embedded-hal `SpiDevice` trait
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Releases the underlying SPI device.
    ///
    /// This method consumes the Device instance and returns the wrapped SPI interface.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Device<SPI>
where
    SPI: SpiDevice,
{
    /// Reads a single register.
    ///
    /// Issues one full-duplex 2-byte transfer: the address with the write marker cleared,
    /// followed by a dummy byte. The register value is the second byte clocked in.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn read(&mut self, addr: u8) -> Result<u8, Error<SPI::Error>> {
        let mut frame = [addr & !WRITE_MARKER, 0x00];

        self.spi.transfer_in_place(&mut frame).map_err(Error::Bus)?;

        trace!("read reg={} val={}", addr, frame[1]);
        Ok(frame[1])
    }

    /// Writes a single register.
    ///
    /// Issues one 2-byte write: the address with the write marker set, then the value.
    /// The value is not read back.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn write(&mut self, addr: u8, value: u8) -> Result<(), Error<SPI::Error>> {
        trace!("write reg={} val={}", addr, value);

        self.spi
            .write(&[addr | WRITE_MARKER, value])
            .map_err(Error::Bus)
    }

    /// Writes `bytes` to consecutive accesses of `addr` within a single transaction.
    ///
    /// Used to load the FIFO, whose address does not auto-increment. The transaction, address
    /// byte included, may not exceed [`MAX_BURST_LEN`]; longer payloads are not split.
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - payload does not fit in one transaction
    /// * `Error::Bus` - SPI communication failed
    pub fn write_burst(&mut self, addr: u8, bytes: &[u8]) -> Result<(), Error<SPI::Error>> {
        if bytes.len() >= MAX_BURST_LEN {
            return Err(Error::InvalidArgument);
        }

        trace!("write_burst reg={} len={}", addr, bytes.len());

        self.spi
            .transaction(&mut [
                Operation::Write(&[addr | WRITE_MARKER]),
                Operation::Write(bytes),
            ])
            .map_err(Error::Bus)
    }

    /// Reads a typed register.
    ///
    /// # Type Parameters
    /// * `R` - Single-byte register type with a u8 address
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn read_register<R>(&mut self) -> Result<R, Error<SPI::Error>>
    where
        R: ReadableRegister<IdType = u8, Error = Infallible, Array = [u8; 1]>,
    {
        let value = self.read(R::id())?;

        match R::from_bytes([value]) {
            Ok(register) => Ok(register),
            Err(never) => match never {},
        }
    }

    /// Writes a typed register.
    ///
    /// # Errors
    /// * `Error::Bus` - SPI communication failed
    pub fn write_register<R>(&mut self, register: R) -> Result<(), Error<SPI::Error>>
    where
        R: WritableRegister<IdType = u8, Error = Infallible, Array = [u8; 1]>,
    {
        let [value] = match register.to_bytes() {
            Ok(bytes) => bytes,
            Err(never) => match never {},
        };

        self.write(R::id(), value)
    }

    /// Read-modify-write of a typed register.
    ///
    /// Fields the closure does not touch are written back as they were read.
    pub fn modify_register<R, F>(&mut self, f: F) -> Result<(), Error<SPI::Error>>
    where
        R: ReadableRegister<IdType = u8, Error = Infallible, Array = [u8; 1]>
            + WritableRegister<IdType = u8, Error = Infallible, Array = [u8; 1]>,
        F: FnOnce(R) -> R,
    {
        let register = self.read_register::<R>()?;
        self.write_register(f(register))
    }
}
