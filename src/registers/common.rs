//! Registers shared by the FSK/OOK and LoRa modems
//!
//! This module contains registers that keep the same address and meaning in both modem modes:
//! - FIFO data access
//! - Operating mode
//! - RF carrier frequency
//! - Power amplifier and over-current protection
//! - LNA gain
//! - DIO pin mapping
//! - Silicon version

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// FIFO data register (address: 0x00)
///
/// Reading or writing this address accesses the FIFO byte at the position held in
/// [`FifoAddrPtr`](super::FifoAddrPtr), which then advances by one. The address itself does
/// not advance, so a burst on this register streams through the FIFO.
#[register(0x00u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Fifo {
    /// FIFO data byte
    pub value: u8,
}

/// Operating mode register (address: 0x01)
///
/// Selects the modem (FSK/OOK or LoRa) and the transceiver mode.
///
/// # Important Notes
/// - The modem can only be switched while the transceiver is in SLEEP
/// - Any mode can be reached from any other mode with a single write
#[register(0x01u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister, Default)]
pub struct OpMode {
    /// LoRa modem selected (bit 7)
    pub long_range_mode: bool,
    /// Low frequency register bank selected (bit 3)
    pub low_frequency_mode: bool,
    /// Transceiver mode code (bits 2-0)
    pub mode: u8,
}

/// RF carrier frequency, most significant byte (address: 0x06)
///
/// The carrier frequency is the 24-bit value `Frf` split over three registers:
/// `f_rf = F_XOSC * Frf / 2^19`, which is 61.035 Hz per step with a 32 MHz crystal.
///
/// The new frequency takes effect once the least significant byte is written.
#[register(0x06u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct FrfMsb {
    /// Frf bits 23-16
    pub value: u8,
}

/// RF carrier frequency, middle byte (address: 0x07)
#[register(0x07u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct FrfMid {
    /// Frf bits 15-8
    pub value: u8,
}

/// RF carrier frequency, least significant byte (address: 0x08)
#[register(0x08u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct FrfLsb {
    /// Frf bits 7-0
    pub value: u8,
}

/// PA configuration register (address: 0x09)
///
/// Selects the PA output pin and the output power. The Ra-02 only routes PA_BOOST to the
/// antenna, so the driver always writes values with bit 7 set.
///
/// # Layout
/// - bit 7: PaSelect (1 = PA_BOOST)
/// - bits 6-4: MaxPower
/// - bits 3-0: OutputPower, `Pout = 17 - (15 - OutputPower)` dBm on PA_BOOST
#[register(0x09u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PaConfig {
    /// Raw register value
    pub value: u8,
}

/// Over-current protection register (address: 0x0B)
///
/// Limits the current drawn by the power amplifier.
///
/// # Current Limit Calculation
/// - `trim <= 15`: Imax = 45 + 5 * trim mA
/// - `15 < trim <= 27`: Imax = -30 + 10 * trim mA
/// - `trim > 27`: Imax = 240 mA
#[register(0x0Bu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Ocp {
    /// OCP enabled (bit 5)
    pub enabled: bool,
    /// Current trim (bits 4-0)
    pub trim: u8,
}

impl Default for Ocp {
    fn default() -> Self {
        Self {
            enabled: true,
            trim: 0x0B,
        }
    }
}

/// LNA settings register (address: 0x0C)
///
/// # Gain Values
/// - 1 = G1 (maximum gain)
/// - 6 = G6 (minimum gain)
/// - 0 and 7 are reserved
#[register(0x0Cu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lna {
    /// LNA gain setting (bits 7-5)
    pub gain: u8,
    /// High frequency LNA current adjustment (bits 1-0)
    /// - 0b00 = default current
    /// - 0b11 = boost on, 150% current
    pub boost_hf: u8,
}

impl Default for Lna {
    fn default() -> Self {
        Self {
            gain: 1,
            boost_hf: 0b11,
        }
    }
}

/// Source routed to the DIO0 pin in LoRa mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dio0Mapping {
    /// RxDone
    #[default]
    RxDone = 0,
    /// TxDone
    TxDone = 1,
    /// CadDone
    CadDone = 2,
    /// No source
    Unused = 3,
}

impl Dio0Mapping {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::RxDone,
            1 => Self::TxDone,
            2 => Self::CadDone,
            _ => Self::Unused,
        }
    }
}

/// DIO mapping register 1 (address: 0x40)
///
/// Routes interrupt sources to DIO0-DIO3. The driver polls the IRQ flags register rather
/// than these pins, but still routes the completion event to DIO0 so boards that wire it
/// up see the same edge.
#[register(0x40u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister, Default)]
pub struct DioMapping1 {
    /// DIO0 source (bits 7-6)
    pub dio0: Dio0Mapping,
    /// DIO1 mapping code (bits 5-4)
    pub dio1: u8,
    /// DIO2 mapping code (bits 3-2)
    pub dio2: u8,
    /// DIO3 mapping code (bits 1-0)
    pub dio3: u8,
}

/// Silicon version register (address: 0x42)
///
/// Reads 0x12 on SX1276/77/78/79 production silicon.
#[register(0x42u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct Version {
    /// Version code: full revision in bits 7-4, metal mask revision in bits 3-0
    pub value: u8,
}

impl FromByteArray for OpMode {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            long_range_mode: bytes[0] & 0x80 != 0,
            low_frequency_mode: bytes[0] & 0x08 != 0,
            mode: bytes[0] & 0x07,
        })
    }
}

impl ToByteArray for OpMode {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.long_range_mode as u8) << 7)
            | ((self.low_frequency_mode as u8) << 3)
            | (self.mode & 0x07)])
    }
}

impl FromByteArray for Ocp {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            enabled: bytes[0] & 0x20 != 0,
            trim: bytes[0] & 0x1F,
        })
    }
}

impl ToByteArray for Ocp {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.enabled as u8) << 5) | (self.trim & 0x1F)])
    }
}

impl FromByteArray for Lna {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            gain: bytes[0] >> 5,
            boost_hf: bytes[0] & 0x03,
        })
    }
}

impl ToByteArray for Lna {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.gain & 0x07) << 5) | (self.boost_hf & 0x03)])
    }
}

impl FromByteArray for DioMapping1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            dio0: Dio0Mapping::from_bits(bytes[0] >> 6),
            dio1: (bytes[0] >> 4) & 0x03,
            dio2: (bytes[0] >> 2) & 0x03,
            dio3: bytes[0] & 0x03,
        })
    }
}

impl ToByteArray for DioMapping1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.dio0 as u8) << 6)
            | ((self.dio1 & 0x03) << 4)
            | ((self.dio2 & 0x03) << 2)
            | (self.dio3 & 0x03)])
    }
}

super::byte_value_registers!(Fifo, FrfMsb, FrfMid, FrfLsb, PaConfig, Version);
