//! LoRa modem registers
//!
//! This module contains registers that only exist, or only have this meaning, while the
//! LoRa modem is selected in [`OpMode`](super::OpMode):
//! - FIFO pointer management
//! - IRQ flags
//! - Received packet information (length, RSSI)
//! - Modem configuration (bandwidth, coding rate, spreading factor, CRC, header mode)
//! - Preamble, payload length and sync word

use bitflags::bitflags;
use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// FIFO SPI pointer (address: 0x0D)
///
/// Position in the 256-byte FIFO accessed by the next read or write of
/// [`Fifo`](super::Fifo). Incremented automatically on each access.
#[register(0x0Du8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct FifoAddrPtr {
    /// FIFO address
    pub value: u8,
}

/// FIFO TX base address (address: 0x0E)
///
/// Start of the TX area of the FIFO. Default 0x80.
#[register(0x0Eu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct FifoTxBaseAddr {
    /// FIFO address
    pub value: u8,
}

/// FIFO RX base address (address: 0x0F)
///
/// Start of the RX area of the FIFO. Default 0x00.
#[register(0x0Fu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct FifoRxBaseAddr {
    /// FIFO address
    pub value: u8,
}

/// Start address of the last packet received (address: 0x10)
#[register(0x10u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct FifoRxCurrentAddr {
    /// FIFO address
    pub value: u8,
}

bitflags! {
    /// LoRa interrupt flags
    ///
    /// Flags are latched by the hardware until cleared by writing a 1 to the flag bit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IrqFlags: u8 {
        /// No packet was received within the RX single timeout
        const RX_TIMEOUT = 1 << 7;
        /// Packet reception complete
        const RX_DONE = 1 << 6;
        /// Payload CRC error
        const PAYLOAD_CRC_ERROR = 1 << 5;
        /// A valid header was received in explicit header mode
        const VALID_HEADER = 1 << 4;
        /// FIFO payload transmission complete
        const TX_DONE = 1 << 3;
        /// Channel activity detection finished
        const CAD_DONE = 1 << 2;
        /// FHSS change channel
        const FHSS_CHANGE_CHANNEL = 1 << 1;
        /// Channel activity detected during CAD
        const CAD_DETECTED = 1;
    }
}

/// IRQ flags register (address: 0x12)
///
/// Reading returns the latched [`IrqFlags`]. Writing clears every flag whose bit is set in
/// the written value, so writing back the value just read acknowledges everything observed.
#[register(0x12u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct IrqStatus {
    /// Latched flags
    pub flags: IrqFlags,
}

/// Number of payload bytes of the last packet received (address: 0x13)
#[register(0x13u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct RxNbBytes {
    /// Payload length in bytes
    pub value: u8,
}

/// Current RSSI value (address: 0x1B)
///
/// RSSI in dBm is `-164 + value` on the low frequency port (Ra-02, 433 MHz) and
/// `-157 + value` on the high frequency port.
#[register(0x1Bu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct RssiValue {
    /// Raw RSSI
    pub value: u8,
}

/// Error coding rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodingRate {
    /// 4/5
    Cr4_5 = 1,
    /// 4/6
    Cr4_6 = 2,
    /// 4/7
    #[default]
    Cr4_7 = 3,
    /// 4/8
    Cr4_8 = 4,
}

/// Modem configuration register 1 (address: 0x1D)
///
/// # Bandwidth Codes
/// 0 = 7.8 kHz, 1 = 10.4 kHz, 2 = 15.6 kHz, 3 = 20.8 kHz, 4 = 31.25 kHz, 5 = 41.7 kHz,
/// 6 = 62.5 kHz, 7 = 125 kHz, 8 = 250 kHz, 9 = 500 kHz
#[register(0x1Du8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct ModemConfig1 {
    /// Signal bandwidth code (bits 7-4)
    pub bandwidth: u8,
    /// Error coding rate code (bits 3-1), see [`CodingRate`]
    pub coding_rate: u8,
    /// Implicit header mode (bit 0)
    pub implicit_header: bool,
}

impl Default for ModemConfig1 {
    fn default() -> Self {
        Self {
            bandwidth: 7,
            coding_rate: CodingRate::Cr4_5 as u8,
            implicit_header: false,
        }
    }
}

/// Modem configuration register 2 (address: 0x1E)
///
/// # Important Notes
/// - SF6 is only usable in implicit header mode
/// - The two low bits extend [`SymbTimeoutLsb`] to a 10-bit symbol count
#[register(0x1Eu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct ModemConfig2 {
    /// Spreading factor, 6-12 (bits 7-4)
    pub spreading_factor: u8,
    /// Continuous TX mode (bit 3)
    pub tx_continuous: bool,
    /// CRC generation and check on payload (bit 2)
    pub crc_on: bool,
    /// RX timeout bits 9-8 (bits 1-0)
    pub symb_timeout_msb: u8,
}

impl Default for ModemConfig2 {
    fn default() -> Self {
        Self {
            spreading_factor: 7,
            tx_continuous: false,
            crc_on: false,
            symb_timeout_msb: 0,
        }
    }
}

/// RX timeout, low byte (address: 0x1F)
///
/// Timeout of RX single mode in symbols.
#[register(0x1Fu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct SymbTimeoutLsb {
    /// RX timeout bits 7-0
    pub value: u8,
}

/// Preamble length, high byte (address: 0x20)
#[register(0x20u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PreambleMsb {
    /// Preamble length bits 15-8
    pub value: u8,
}

/// Preamble length, low byte (address: 0x21)
///
/// The radio adds 4.25 symbols to the programmed length.
#[register(0x21u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PreambleLsb {
    /// Preamble length bits 7-0
    pub value: u8,
}

/// Payload length (address: 0x22)
///
/// Number of bytes transmitted from the FIFO. Must be non-zero.
#[register(0x22u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PayloadLength {
    /// Payload length in bytes
    pub value: u8,
}

/// LoRa sync word (address: 0x39)
///
/// # Standard Values
/// - Private networks: 0x12 (default)
/// - LoRaWAN public networks: 0x34
#[register(0x39u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct SyncWord {
    /// Sync word value
    pub value: u8,
}

impl Default for SyncWord {
    fn default() -> Self {
        Self { value: 0x12 }
    }
}

impl FromByteArray for IrqStatus {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            flags: IrqFlags::from_bits_retain(bytes[0]),
        })
    }
}

impl ToByteArray for IrqStatus {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.flags.bits()])
    }
}

impl FromByteArray for ModemConfig1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            bandwidth: bytes[0] >> 4,
            coding_rate: (bytes[0] >> 1) & 0x07,
            implicit_header: bytes[0] & 0x01 != 0,
        })
    }
}

impl ToByteArray for ModemConfig1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.bandwidth & 0x0F) << 4)
            | ((self.coding_rate & 0x07) << 1)
            | (self.implicit_header as u8)])
    }
}

impl FromByteArray for ModemConfig2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            spreading_factor: bytes[0] >> 4,
            tx_continuous: bytes[0] & 0x08 != 0,
            crc_on: bytes[0] & 0x04 != 0,
            symb_timeout_msb: bytes[0] & 0x03,
        })
    }
}

impl ToByteArray for ModemConfig2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.spreading_factor & 0x0F) << 4)
            | ((self.tx_continuous as u8) << 3)
            | ((self.crc_on as u8) << 2)
            | (self.symb_timeout_msb & 0x03)])
    }
}

super::byte_value_registers!(
    FifoAddrPtr,
    FifoTxBaseAddr,
    FifoRxBaseAddr,
    FifoRxCurrentAddr,
    RxNbBytes,
    RssiValue,
    SymbTimeoutLsb,
    PreambleMsb,
    PreambleLsb,
    PayloadLength,
    SyncWord,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn irq_flags_keep_unknown_bits() {
        let status = IrqStatus::from_bytes([0x58]).unwrap();
        assert!(status.flags.contains(IrqFlags::RX_DONE | IrqFlags::VALID_HEADER));
        assert!(status.flags.contains(IrqFlags::TX_DONE));
        assert_eq!(status.to_bytes().unwrap(), [0x58]);
    }

    #[test]
    fn modem_config_1_layout() {
        let cfg = ModemConfig1 {
            bandwidth: 7,
            coding_rate: CodingRate::Cr4_7 as u8,
            implicit_header: false,
        };
        assert_eq!(cfg.to_bytes().unwrap(), [0x76]);
        assert_eq!(ModemConfig1::from_bytes([0x76]).unwrap(), cfg);
    }

    #[test]
    fn modem_config_2_layout() {
        let cfg = ModemConfig2::from_bytes([0xC7]).unwrap();
        assert_eq!(cfg.spreading_factor, 12);
        assert!(!cfg.tx_continuous);
        assert!(cfg.crc_on);
        assert_eq!(cfg.symb_timeout_msb, 3);
        assert_eq!(cfg.to_bytes().unwrap(), [0xC7]);
    }
}
