//! RF and modem parameters
//!
//! Setters translate application units (kHz, dB, Hz, mA) into register encodings. Writes to
//! the frequency bank, the PA and the sync word are followed by a settle delay; the
//! bit-field setters are plain read-modify-writes of the modem configuration registers and
//! only touch their own field.

use embedded_hal::{delay::DelayNs, spi::SpiDevice};

use super::Ra02;
use crate::{
    registers::{
        CodingRate, FrfLsb, FrfMid, FrfMsb, Lna, ModemConfig1, ModemConfig2, Ocp, PaConfig,
        PreambleLsb, PreambleMsb, SymbTimeoutLsb, SyncWord,
    },
    table::{BANDWIDTH_TABLE, POWER_TABLE},
    Error, Timeout,
};

/// Pause after each frequency register write
const FREQ_SETTLE_MS: u32 = 5;
/// Pause after a PA configuration write
const PA_SETTLE_MS: u32 = 10;
/// Pause after a sync word write
const SYNC_WORD_SETTLE_MS: u32 = 10;

/// Highest power accepted by [`Ra02::set_power`]
pub const MAX_POWER_DB: u8 = 20;

/// Spreading factors the LoRa modem supports
const SPREADING_FACTORS: core::ops::RangeInclusive<u8> = 6..=12;

/// Over-current limit range in mA
const OCP_MIN_MA: u16 = 45;
const OCP_MAX_MA: u16 = 240;
/// Limit where the trim switches from 5 mA to 10 mA steps
const OCP_KNEE_MA: u16 = 120;

/// Frf register value for a carrier in kHz.
///
/// One Frf step is `32 MHz / 2^19`, so `Frf = kHz * 16384 / 1000`, rounded to nearest. The
/// result is not range checked; only the low 24 bits reach the chip.
///
/// ```
/// assert_eq!(ra02::radio::frequency_to_frf(433_000), 0x6C_4000);
/// ```
pub const fn frequency_to_frf(khz: u32) -> u32 {
    ((khz as u64 * 16_384 + 500) / 1_000) as u32
}

/// Ocp trim for a current limit in mA.
///
/// The limit is clamped to 45-240 mA. Up to 120 mA the trim counts 5 mA steps from 45 mA,
/// above that 10 mA steps from -30 mA.
pub const fn ocp_trim(ma: u16) -> u8 {
    let ma = if ma < OCP_MIN_MA {
        OCP_MIN_MA
    } else if ma > OCP_MAX_MA {
        OCP_MAX_MA
    } else {
        ma
    };

    if ma <= OCP_KNEE_MA {
        ((ma - OCP_MIN_MA) / 5) as u8
    } else {
        ((ma + 30) / 10) as u8
    }
}

impl<SPI, DELAY, TIMER> Ra02<SPI, DELAY, TIMER>
where
    SPI: SpiDevice,
    DELAY: DelayNs,
    TIMER: Timeout,
{
    /// Tunes the carrier to `khz`.
    ///
    /// Writes Frf MSB, MID and LSB in that order, pausing after each. The frequency takes
    /// effect on the LSB write.
    pub fn set_frequency(&mut self, khz: u32) -> Result<(), Error<SPI::Error>> {
        let frf = frequency_to_frf(khz);
        debug!("set_frequency: {} kHz, frf={}", khz, frf);

        self.device.write_register(FrfMsb {
            value: (frf >> 16) as u8,
        })?;
        self.delay.delay_ms(FREQ_SETTLE_MS);
        self.device.write_register(FrfMid {
            value: (frf >> 8) as u8,
        })?;
        self.delay.delay_ms(FREQ_SETTLE_MS);
        self.device.write_register(FrfLsb { value: frf as u8 })?;
        self.delay.delay_ms(FREQ_SETTLE_MS);

        self.config.frequency_khz = khz;
        Ok(())
    }

    /// Sets the output power.
    ///
    /// `db` selects one of four PA_BOOST levels (11, 14, 17, 20). Values below 11 use the
    /// lowest level, the others round down to the level below.
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - `db` is 0 or above [`MAX_POWER_DB`]. Nothing is written.
    /// * `Error::Bus` - SPI communication failed
    pub fn set_power(&mut self, db: u8) -> Result<(), Error<SPI::Error>> {
        if !(1..=MAX_POWER_DB).contains(&db) {
            return Err(Error::InvalidArgument);
        }

        let value = POWER_TABLE.code_for(db.into()).unwrap_or(db);
        debug!("set_power: {} dB, pa_config={}", db, value);

        self.device.write_register(PaConfig { value })?;
        self.delay.delay_ms(PA_SETTLE_MS);

        self.config.power_db = db;
        Ok(())
    }

    /// Reads the output power back.
    ///
    /// Returns the lowest `db` that [`set_power`](Ra02::set_power) maps to the current PA
    /// level, which need not be the value that was set. A PA value the driver never writes
    /// is returned as-is.
    pub fn get_power(&mut self) -> Result<u8, Error<SPI::Error>> {
        let pa_config: PaConfig = self.device.read_register()?;

        Ok(POWER_TABLE
            .value_for(pa_config.value)
            .and_then(|db| u8::try_from(db).ok())
            .unwrap_or(pa_config.value))
    }

    /// Changing the data rate directly is not possible in LoRa mode.
    ///
    /// # Errors
    /// * `Error::NotImplemented` - always
    pub fn set_baudrate(&mut self, baudrate: u32) -> Result<(), Error<SPI::Error>> {
        warn!("set_baudrate: {} not supported in LoRa mode", baudrate);
        Err(Error::NotImplemented)
    }

    /// Sets the signal bandwidth and rewrites the coding rate from the stored config.
    ///
    /// A bandwidth outside every table range keeps the current bandwidth code.
    pub fn set_bandwidth(&mut self, hz: u32) -> Result<(), Error<SPI::Error>> {
        let code = BANDWIDTH_TABLE.code_for(hz);
        let coding_rate = self.config.coding_rate as u8;
        debug!("set_bandwidth: {} Hz, code={:?}", hz, code);

        self.device.modify_register(|cfg: ModemConfig1| ModemConfig1 {
            bandwidth: code.unwrap_or(cfg.bandwidth),
            coding_rate,
            ..cfg
        })?;

        if code.is_some() {
            self.config.bandwidth_hz = hz;
        }
        Ok(())
    }

    /// Sets the error coding rate
    pub fn set_coding_rate(&mut self, coding_rate: CodingRate) -> Result<(), Error<SPI::Error>> {
        debug!("set_coding_rate: {:?}", coding_rate);

        self.device.modify_register(|cfg: ModemConfig1| ModemConfig1 {
            coding_rate: coding_rate as u8,
            ..cfg
        })?;

        self.config.coding_rate = coding_rate;
        Ok(())
    }

    /// Sets the preamble length in symbols
    pub fn set_preamble(&mut self, len: u16) -> Result<(), Error<SPI::Error>> {
        debug!("set_preamble: {}", len);

        let [msb, lsb] = len.to_be_bytes();
        self.device.write_register(PreambleMsb { value: msb })?;
        self.device.write_register(PreambleLsb { value: lsb })?;

        self.config.preamble_len = len;
        Ok(())
    }

    /// Sets the sync word. Only the low byte is kept.
    pub fn set_sync_word(&mut self, sync_word: u32) -> Result<(), Error<SPI::Error>> {
        let value = sync_word as u8;
        debug!("set_sync_word: {}", value);

        self.device.write_register(SyncWord { value })?;
        self.delay.delay_ms(SYNC_WORD_SETTLE_MS);
        Ok(())
    }

    /// Sets the spreading factor, clamped to 6-12
    pub fn set_spreading_factor(&mut self, sf: u8) -> Result<(), Error<SPI::Error>> {
        let sf = sf.clamp(*SPREADING_FACTORS.start(), *SPREADING_FACTORS.end());
        debug!("set_spreading_factor: {}", sf);

        self.device.modify_register(|cfg: ModemConfig2| ModemConfig2 {
            spreading_factor: sf,
            ..cfg
        })?;

        self.config.spreading_factor = sf;
        Ok(())
    }

    /// Enables or disables the payload CRC
    pub fn set_crc(&mut self, enabled: bool) -> Result<(), Error<SPI::Error>> {
        debug!("set_crc: {}", enabled);

        self.device.modify_register(|cfg: ModemConfig2| ModemConfig2 {
            crc_on: enabled,
            ..cfg
        })
    }

    /// Selects implicit (headerless) or explicit header mode
    pub fn set_implicit_header_mode(&mut self, enabled: bool) -> Result<(), Error<SPI::Error>> {
        debug!("set_implicit_header_mode: {}", enabled);

        self.device.modify_register(|cfg: ModemConfig1| ModemConfig1 {
            implicit_header: enabled,
            ..cfg
        })
    }

    /// Sets the RX single timeout in symbols.
    ///
    /// The timeout is 10 bits wide: bits 9-8 go to ModemConfig2, bits 7-0 to
    /// SymbTimeoutLsb. Higher bits are dropped.
    pub fn set_rx_symbol_timeout(&mut self, symbols: u16) -> Result<(), Error<SPI::Error>> {
        debug!("set_rx_symbol_timeout: {}", symbols);

        let msb = ((symbols >> 8) & 0x03) as u8;
        self.device.modify_register(|cfg: ModemConfig2| ModemConfig2 {
            symb_timeout_msb: msb,
            ..cfg
        })?;
        self.device.write_register(SymbTimeoutLsb {
            value: symbols as u8,
        })?;

        self.config.rx_symbol_timeout = symbols & 0x03FF;
        Ok(())
    }

    /// Enables over-current protection at `ma`, see [`ocp_trim`]
    pub fn set_ocp(&mut self, ma: u16) -> Result<(), Error<SPI::Error>> {
        let trim = ocp_trim(ma);
        debug!("set_ocp: {} mA, trim={}", ma, trim);

        self.device.write_register(Ocp {
            enabled: true,
            trim,
        })?;

        self.config.ocp_ma = ma;
        Ok(())
    }

    /// Sets LNA gain and boost
    pub fn set_lna(&mut self, lna: Lna) -> Result<(), Error<SPI::Error>> {
        debug!("set_lna: gain={} boost={}", lna.gain, lna.boost_hf);

        self.device.write_register(lna)?;

        self.config.lna = lna;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, StdTimeout};
    use embedded_hal_mock::eh1::{
        delay::NoopDelay,
        spi::{Mock as SpiMock, Transaction as SpiTransaction},
    };

    fn write(addr: u8, value: u8) -> [SpiTransaction<u8>; 3] {
        [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![addr | 0x80, value]),
            SpiTransaction::transaction_end(),
        ]
    }

    fn radio(
        expectations: &[SpiTransaction<u8>],
    ) -> Ra02<SpiMock<u8>, NoopDelay, StdTimeout> {
        Ra02::new(
            SpiMock::new(expectations),
            NoopDelay::new(),
            StdTimeout::default(),
            Config::default(),
        )
    }

    #[test]
    fn frf_for_common_carriers() {
        assert_eq!(frequency_to_frf(433_000), 0x6C_4000);
        assert_eq!(frequency_to_frf(434_000), 0x6C_8000);
        assert_eq!(frequency_to_frf(868_000), 0xD9_0000);
        // 433.05 MHz is not a whole step away
        assert_eq!(frequency_to_frf(433_050), 0x6C_4333);
    }

    #[test]
    fn ocp_trim_is_piecewise() {
        assert_eq!(ocp_trim(0), 0);
        assert_eq!(ocp_trim(45), 0);
        assert_eq!(ocp_trim(100), 11);
        assert_eq!(ocp_trim(120), 15);
        assert_eq!(ocp_trim(130), 16);
        assert_eq!(ocp_trim(240), 27);
        assert_eq!(ocp_trim(1_000), 27);
    }

    #[test]
    fn frequency_writes_msb_first() {
        let expectations: Vec<_> = [write(0x06, 0x6C), write(0x07, 0x40), write(0x08, 0x00)]
            .into_iter()
            .flatten()
            .collect();
        let mut radio = radio(&expectations);

        radio.set_frequency(433_000).unwrap();

        let (mut spi, _, _) = radio.deinit();
        spi.done();
    }

    #[test]
    fn out_of_range_power_writes_nothing() {
        let mut radio = radio(&[]);

        assert_eq!(radio.set_power(0), Err(Error::InvalidArgument));
        assert_eq!(radio.set_power(21), Err(Error::InvalidArgument));
        assert_eq!(radio.config().power_db, 17);

        let (mut spi, _, _) = radio.deinit();
        spi.done();
    }

    #[test]
    fn ocp_sets_enable_bit() {
        let expectations = write(0x0B, 0x20 | 15);
        let mut radio = radio(&expectations);

        radio.set_ocp(120).unwrap();

        let (mut spi, _, _) = radio.deinit();
        spi.done();
    }

    #[test]
    fn baudrate_is_not_implemented() {
        let mut radio = radio(&[]);

        assert_eq!(radio.set_baudrate(9_600), Err(Error::NotImplemented));

        let (mut spi, _, _) = radio.deinit();
        spi.done();
    }

    #[test]
    fn sync_word_keeps_low_byte() {
        let expectations = write(0x39, 0x34);
        let mut radio = radio(&expectations);

        radio.set_sync_word(0x1234).unwrap();

        let (mut spi, _, _) = radio.deinit();
        spi.done();
    }
}
