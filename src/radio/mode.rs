//! Operating mode transitions
//!
//! A transition is one write of [`OpMode`] with the LoRa bit set. The chip accepts any mode
//! from any other, so there is no transition table and no settle delay: the poll loops in
//! `send`/`recv` absorb the time the chip needs to actually get there.

use embedded_hal::{delay::DelayNs, spi::SpiDevice};

use super::Ra02;
use crate::{registers::OpMode, Error, Timeout};

/// LoRa transceiver mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Lowest power, FIFO not accessible
    Sleep = 0,
    /// Oscillator running, FIFO accessible
    Standby = 1,
    /// Transmit the FIFO payload, then return to STANDBY
    Transmit = 3,
    /// Receive until told otherwise
    ReceiveContinuous = 5,
    /// Receive one packet or time out, then return to STANDBY
    ReceiveSingle = 6,
}

impl Mode {
    /// Mode code in OpMode bits 2-0
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Mode for an OpMode code, `None` for the FSTX/FSRX/CAD codes the driver never uses
    pub const fn from_code(code: u8) -> Option<Self> {
        match code & 0x07 {
            0 => Some(Self::Sleep),
            1 => Some(Self::Standby),
            3 => Some(Self::Transmit),
            5 => Some(Self::ReceiveContinuous),
            6 => Some(Self::ReceiveSingle),
            _ => None,
        }
    }
}

impl<SPI, DELAY, TIMER> Ra02<SPI, DELAY, TIMER>
where
    SPI: SpiDevice,
    DELAY: DelayNs,
    TIMER: Timeout,
{
    /// Switches the LoRa modem to `mode`.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error<SPI::Error>> {
        debug!("mode -> {:?}", mode);

        self.device.write_register(OpMode {
            long_range_mode: true,
            low_frequency_mode: false,
            mode: mode.code(),
        })
    }

    /// Enters SLEEP
    pub fn sleep(&mut self) -> Result<(), Error<SPI::Error>> {
        self.set_mode(Mode::Sleep)
    }

    /// Enters STANDBY
    pub fn standby(&mut self) -> Result<(), Error<SPI::Error>> {
        self.set_mode(Mode::Standby)
    }

    /// Reads the mode the chip is in right now.
    ///
    /// Returns `None` if the chip is in FSK mode or in a mode without a [`Mode`] variant.
    pub fn read_mode(&mut self) -> Result<Option<Mode>, Error<SPI::Error>> {
        let op_mode: OpMode = self.device.read_register()?;
        if !op_mode.long_range_mode {
            return Ok(None);
        }
        Ok(Mode::from_code(op_mode.mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for mode in [
            Mode::Sleep,
            Mode::Standby,
            Mode::Transmit,
            Mode::ReceiveContinuous,
            Mode::ReceiveSingle,
        ] {
            assert_eq!(Mode::from_code(mode.code()), Some(mode));
        }
        assert_eq!(Mode::from_code(2), None);
        assert_eq!(Mode::from_code(7), None);
    }
}
