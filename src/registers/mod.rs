//! Register definitions for the SX1278
//!
//! Layouts follow the SX1276/77/78/79 datasheet, rev. 7. Only the registers the driver
//! touches are defined.

mod common;
mod lora;

pub use common::*;
pub use lora::*;

/// Implements the byte codec for registers that hold a single plain `value: u8` field.
macro_rules! byte_value_registers {
    ($($name:ident),* $(,)?) => {
        $(
            impl ::regiface::FromByteArray for $name {
                type Error = ::core::convert::Infallible;
                type Array = [u8; 1];

                fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
                    Ok(Self { value: bytes[0] })
                }
            }

            impl ::regiface::ToByteArray for $name {
                type Error = ::core::convert::Infallible;
                type Array = [u8; 1];

                fn to_bytes(self) -> Result<Self::Array, Self::Error> {
                    Ok([self.value])
                }
            }
        )*
    };
}
pub(crate) use byte_value_registers;
