//! Driver error type

use core::fmt;

/// Errors returned by the Ra-02 driver.
///
/// `E` is the error type of the underlying SPI device. Bus failures are
/// carried through unchanged in [`Error::Bus`] so callers can tell a wiring
/// fault apart from a radio-link fault ([`Error::Timeout`]) or a caller bug
/// ([`Error::InvalidArgument`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The SPI transaction failed
    Bus(E),
    /// An argument was outside the range the operation accepts
    InvalidArgument,
    /// The operation is not supported by the SX1278 in LoRa mode
    NotImplemented,
    /// The chip did not identify itself with the expected version byte
    NoResponse,
    /// TX_DONE / RX_DONE was not observed before the timeout expired
    Timeout,
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "SPI bus error: {e:?}"),
            Self::InvalidArgument => f.write_str("invalid argument"),
            Self::NotImplemented => f.write_str("not implemented"),
            Self::NoResponse => f.write_str("no response from radio"),
            Self::Timeout => f.write_str("timed out waiting for radio"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}
