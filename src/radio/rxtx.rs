//! IRQ polling and the transmit and receive sequences
//!
//! Both sequences busy-poll [`IrqStatus`] until their completion flag shows up or their
//! [`Timeout`] expires, and both end with the radio in SLEEP whatever happened on the way.

use embedded_hal::{delay::DelayNs, spi::SpiDevice};
use regiface::Register;

use super::{Mode, Ra02, MAX_PACKET_SIZE};
use crate::{
    registers::{
        Dio0Mapping, DioMapping1, Fifo, FifoAddrPtr, FifoRxCurrentAddr, FifoTxBaseAddr,
        IrqFlags, IrqStatus, PayloadLength, RssiValue, RxNbBytes,
    },
    Error, Timeout,
};

impl<SPI, DELAY, TIMER> Ra02<SPI, DELAY, TIMER>
where
    SPI: SpiDevice,
    DELAY: DelayNs,
    TIMER: Timeout,
{
    /// Reads the IRQ flags and acknowledges every flag that was set.
    ///
    /// The flags are also kept for [`irq_flags`](Ra02::irq_flags). Events that arrive
    /// between two polls show up together in the next one.
    pub fn poll_irq_flags(&mut self) -> Result<IrqFlags, Error<SPI::Error>> {
        let status: IrqStatus = self.device.read_register()?;
        self.irq_flags = status.flags;

        self.device.write_register(status)?;

        if !status.flags.is_empty() {
            trace!("irq: {}", status.flags.bits());
        }
        Ok(status.flags)
    }

    /// Transmits `payload` as one LoRa packet and waits for TX_DONE.
    ///
    /// The wait is bounded by [`Config::send_timeout_ms`](crate::Config::send_timeout_ms) on
    /// the driver's own timer. The radio is put back to SLEEP afterwards, also on failure.
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - `payload` is empty or longer than [`MAX_PACKET_SIZE`].
    ///   Nothing is written.
    /// * `Error::Timeout` - TX_DONE did not arrive in time
    /// * `Error::Bus` - SPI communication failed
    pub fn send(&mut self, payload: &[u8]) -> Result<(), Error<SPI::Error>> {
        if payload.is_empty() || payload.len() > MAX_PACKET_SIZE {
            return Err(Error::InvalidArgument);
        }

        debug!("send: [{}] {:?}", payload.len(), payload);

        self.irq_flags = IrqFlags::empty();
        let result = self.transmit(payload);
        self.finish_in_sleep(result)
    }

    /// Receives one packet into `buf` and returns its length.
    ///
    /// `timeout` bounds the wait and is only checked, never started, so one timeout can span
    /// several calls. Expire it from elsewhere to abort a pending receive.
    ///
    /// A packet longer than `buf` is truncated to `buf.len()` bytes; the rest is dropped
    /// without an error. The RSSI is sampled when the header arrives and is available from
    /// [`last_rssi`](Ra02::last_rssi) afterwards. The radio is put back to SLEEP afterwards,
    /// also on failure.
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - `buf` is empty. Nothing is written.
    /// * `Error::Timeout` - no packet arrived before `timeout` expired
    /// * `Error::Bus` - SPI communication failed
    pub fn recv<T: Timeout>(
        &mut self,
        buf: &mut [u8],
        timeout: &mut T,
    ) -> Result<usize, Error<SPI::Error>> {
        if buf.is_empty() {
            return Err(Error::InvalidArgument);
        }

        self.irq_flags = IrqFlags::empty();
        let result = self.receive(buf, timeout);
        let len = self.finish_in_sleep(result)?;

        debug!("recv: [{}] {:?}", len, &buf[..len]);
        Ok(len)
    }

    fn transmit(&mut self, payload: &[u8]) -> Result<(), Error<SPI::Error>> {
        self.set_mode(Mode::Standby)?;
        self.device.write_register(DioMapping1 {
            dio0: Dio0Mapping::TxDone,
            ..Default::default()
        })?;

        let base: FifoTxBaseAddr = self.device.read_register()?;
        self.device.write_register(FifoAddrPtr { value: base.value })?;
        self.device.write_register(PayloadLength {
            value: payload.len() as u8,
        })?;
        self.device.write_burst(Fifo::id(), payload)?;

        self.set_mode(Mode::Transmit)?;

        self.timer.start(self.config.send_timeout_ms);
        loop {
            if self.timer.is_expired() {
                warn!("send: no TX_DONE after {} ms", self.config.send_timeout_ms);
                return Err(Error::Timeout);
            }

            if self.poll_irq_flags()?.contains(IrqFlags::TX_DONE) {
                return Ok(());
            }
        }
    }

    fn receive<T: Timeout>(
        &mut self,
        buf: &mut [u8],
        timeout: &mut T,
    ) -> Result<usize, Error<SPI::Error>> {
        self.set_mode(Mode::Standby)?;
        self.device.write_register(DioMapping1 {
            dio0: Dio0Mapping::RxDone,
            ..Default::default()
        })?;
        self.set_mode(Mode::ReceiveSingle)?;

        loop {
            if timeout.is_expired() {
                debug!("recv: timed out");
                return Err(Error::Timeout);
            }

            let flags = self.poll_irq_flags()?;

            // RSSI is only meaningful while the packet is still coming in
            if flags.contains(IrqFlags::VALID_HEADER) {
                let rssi: RssiValue = self.device.read_register()?;
                self.last_rssi = rssi.value;
            }

            if flags.contains(IrqFlags::RX_DONE) {
                return self.read_packet(buf);
            }
        }
    }

    fn read_packet(&mut self, buf: &mut [u8]) -> Result<usize, Error<SPI::Error>> {
        self.set_mode(Mode::Standby)?;

        let received: RxNbBytes = self.device.read_register()?;
        let len = usize::from(received.value).min(buf.len());
        if len < usize::from(received.value) {
            debug!("recv: dropping {} bytes", usize::from(received.value) - len);
        }

        let start: FifoRxCurrentAddr = self.device.read_register()?;
        self.device.write_register(FifoAddrPtr { value: start.value })?;

        for byte in &mut buf[..len] {
            *byte = self.device.read(Fifo::id())?;
        }
        Ok(len)
    }

    /// Puts the radio to SLEEP after a sequence.
    ///
    /// A failure to do so is returned if the sequence itself succeeded, and only logged if
    /// the sequence already failed.
    fn finish_in_sleep<R>(
        &mut self,
        result: Result<R, Error<SPI::Error>>,
    ) -> Result<R, Error<SPI::Error>> {
        let restored = self.set_mode(Mode::Sleep);

        match result {
            Ok(value) => restored.map(|()| value),
            Err(err) => {
                if restored.is_err() {
                    warn!("failed to restore SLEEP after an aborted sequence");
                }
                Err(err)
            }
        }
    }
}
