//! Simulated SX1278 and test collaborators shared by the integration tests

#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    ops::Range,
    rc::Rc,
};

use embedded_hal::{
    delay::DelayNs,
    spi::{ErrorKind, ErrorType, Operation, SpiDevice},
};
use ra02::{Config, Ra02, Timeout};

pub const LORA_SLEEP: u8 = 0x80;
pub const LORA_STANDBY: u8 = 0x81;
pub const LORA_TX: u8 = 0x83;
pub const LORA_RX_SINGLE: u8 = 0x86;

const REG_FIFO: u8 = 0x00;
const REG_OP_MODE: u8 = 0x01;
const REG_FIFO_ADDR_PTR: u8 = 0x0D;
const REG_FIFO_RX_CURRENT_ADDR: u8 = 0x10;
const REG_IRQ_FLAGS: u8 = 0x12;
const REG_RX_NB_BYTES: u8 = 0x13;
const REG_RSSI_VALUE: u8 = 0x1B;

const IRQ_RX_DONE: u8 = 0x40;
const IRQ_VALID_HEADER: u8 = 0x10;
const IRQ_TX_DONE: u8 = 0x08;

/// One register access as seen on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read { addr: u8, value: u8 },
    Write { addr: u8, value: u8 },
}

/// Packet the simulated chip receives once it is in RX single mode
#[derive(Debug, Clone)]
pub struct RxScript {
    pub payload: Vec<u8>,
    /// FIFO address the packet lands at
    pub at: u8,
    /// IRQ poll that raises VALID_HEADER, counted from entering RX
    pub header_after: Option<usize>,
    /// IRQ poll that raises RX_DONE
    pub done_after: usize,
    pub rssi: u8,
}

struct ChipState {
    regs: [u8; 128],
    fifo: [u8; 256],
    log: Vec<Access>,
    irq_reads: usize,
    polls_in_mode: usize,
    tx_done_after: Option<usize>,
    rx: Option<RxScript>,
    fail_write: Option<(u8, u8)>,
    fail_read: Option<u8>,
}

impl ChipState {
    fn new() -> Self {
        let mut regs = [0u8; 128];
        // power-on values of the registers the driver touches
        regs[0x01] = 0x09;
        regs[0x06] = 0x6C;
        regs[0x07] = 0x80;
        regs[0x09] = 0x4F;
        regs[0x0B] = 0x2B;
        regs[0x0C] = 0x20;
        regs[0x0E] = 0x80;
        regs[0x1D] = 0x72;
        regs[0x1E] = 0x70;
        regs[0x1F] = 0x64;
        regs[0x21] = 0x08;
        regs[0x22] = 0x01;
        regs[0x39] = 0x12;
        regs[0x42] = 0x12;

        Self {
            regs,
            fifo: [0; 256],
            log: Vec::new(),
            irq_reads: 0,
            polls_in_mode: 0,
            tx_done_after: None,
            rx: None,
            fail_write: None,
            fail_read: None,
        }
    }

    fn clock(&mut self, addr: &mut Option<u8>, byte: u8) -> Result<u8, ErrorKind> {
        let Some(current) = *addr else {
            *addr = Some(byte);
            return Ok(0);
        };

        let reg = current & 0x7F;
        let next = if reg == REG_FIFO { current } else { current.wrapping_add(1) };
        *addr = Some(next);

        if current & 0x80 != 0 {
            if self.fail_write == Some((reg, byte)) {
                return Err(ErrorKind::Other);
            }
            self.log.push(Access::Write { addr: reg, value: byte });
            self.write_reg(reg, byte);
            Ok(0)
        } else {
            if self.fail_read == Some(reg) {
                return Err(ErrorKind::Other);
            }
            let value = self.read_reg(reg);
            self.log.push(Access::Read { addr: reg, value });
            Ok(value)
        }
    }

    fn read_reg(&mut self, reg: u8) -> u8 {
        match reg {
            REG_FIFO => {
                let ptr = self.regs[REG_FIFO_ADDR_PTR as usize];
                self.regs[REG_FIFO_ADDR_PTR as usize] = ptr.wrapping_add(1);
                self.fifo[ptr as usize]
            }
            REG_IRQ_FLAGS => {
                self.irq_reads += 1;
                self.tick();
                self.regs[REG_IRQ_FLAGS as usize]
            }
            _ => self.regs[reg as usize],
        }
    }

    fn write_reg(&mut self, reg: u8, value: u8) {
        match reg {
            REG_FIFO => {
                let ptr = self.regs[REG_FIFO_ADDR_PTR as usize];
                self.regs[REG_FIFO_ADDR_PTR as usize] = ptr.wrapping_add(1);
                self.fifo[ptr as usize] = value;
            }
            REG_IRQ_FLAGS => self.regs[REG_IRQ_FLAGS as usize] &= !value,
            REG_OP_MODE => {
                self.polls_in_mode = 0;
                self.regs[REG_OP_MODE as usize] = value;
            }
            _ => self.regs[reg as usize] = value,
        }
    }

    /// Advances the scripted TX/RX events by one IRQ poll
    fn tick(&mut self) {
        let mode = self.regs[REG_OP_MODE as usize];
        self.polls_in_mode += 1;

        if mode == LORA_TX && Some(self.polls_in_mode) == self.tx_done_after {
            self.regs[REG_IRQ_FLAGS as usize] |= IRQ_TX_DONE;
            self.regs[REG_OP_MODE as usize] = LORA_STANDBY;
        }

        if mode == LORA_RX_SINGLE {
            let Some(rx) = self.rx.clone() else {
                return;
            };
            if rx.header_after == Some(self.polls_in_mode) {
                self.regs[REG_IRQ_FLAGS as usize] |= IRQ_VALID_HEADER;
                self.regs[REG_RSSI_VALUE as usize] = rx.rssi;
            }
            if rx.done_after == self.polls_in_mode {
                for (offset, byte) in rx.payload.iter().enumerate() {
                    self.fifo[(rx.at as usize + offset) % 256] = *byte;
                }
                self.regs[REG_FIFO_RX_CURRENT_ADDR as usize] = rx.at;
                self.regs[REG_RX_NB_BYTES as usize] = rx.payload.len() as u8;
                self.regs[REG_IRQ_FLAGS as usize] |= IRQ_RX_DONE;
                self.regs[REG_OP_MODE as usize] = LORA_STANDBY;
            }
        }
    }
}

/// SX1278 register bank behind an [`SpiDevice`].
///
/// Clones share the same chip, so a test can keep one while the driver owns another.
#[derive(Clone)]
pub struct SimChip {
    state: Rc<RefCell<ChipState>>,
}

impl SimChip {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ChipState::new())),
        }
    }

    pub fn reg(&self, addr: u8) -> u8 {
        self.state.borrow().regs[addr as usize]
    }

    /// Sets a register without logging an access
    pub fn set_reg(&self, addr: u8, value: u8) {
        self.state.borrow_mut().regs[addr as usize] = value;
    }

    pub fn fifo(&self, range: Range<usize>) -> Vec<u8> {
        self.state.borrow().fifo[range].to_vec()
    }

    pub fn accesses(&self) -> Vec<Access> {
        self.state.borrow().log.clone()
    }

    pub fn clear_log(&self) {
        self.state.borrow_mut().log.clear();
    }

    /// Every write as `(addr, value)`, in bus order
    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.accesses()
            .into_iter()
            .filter_map(|access| match access {
                Access::Write { addr, value } => Some((addr, value)),
                Access::Read { .. } => None,
            })
            .collect()
    }

    pub fn writes_to(&self, addr: u8) -> Vec<u8> {
        self.writes()
            .into_iter()
            .filter(|(a, _)| *a == addr)
            .map(|(_, value)| value)
            .collect()
    }

    pub fn reads_of(&self, addr: u8) -> usize {
        self.accesses()
            .into_iter()
            .filter(|access| matches!(access, Access::Read { addr: a, .. } if *a == addr))
            .count()
    }

    pub fn irq_reads(&self) -> usize {
        self.state.borrow().irq_reads
    }

    /// Raises TX_DONE on the `polls`-th IRQ read after entering TX
    pub fn script_tx_done_after(&self, polls: usize) {
        self.state.borrow_mut().tx_done_after = Some(polls);
    }

    pub fn script_rx(&self, rx: RxScript) {
        self.state.borrow_mut().rx = Some(rx);
    }

    /// Fails the bus transaction writing `value` to `addr`
    pub fn fail_write(&self, addr: u8, value: u8) {
        self.state.borrow_mut().fail_write = Some((addr, value));
    }

    /// Fails every bus transaction reading `addr`
    pub fn fail_read(&self, addr: u8) {
        self.state.borrow_mut().fail_read = Some(addr);
    }
}

impl ErrorType for SimChip {
    type Error = ErrorKind;
}

impl SpiDevice for SimChip {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), ErrorKind> {
        let mut state = self.state.borrow_mut();
        let mut addr = None;

        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    for byte in bytes.iter() {
                        state.clock(&mut addr, *byte)?;
                    }
                }
                Operation::Read(buf) => {
                    for byte in buf.iter_mut() {
                        *byte = state.clock(&mut addr, 0)?;
                    }
                }
                Operation::TransferInPlace(buf) => {
                    for byte in buf.iter_mut() {
                        *byte = state.clock(&mut addr, *byte)?;
                    }
                }
                Operation::Transfer(read, write) => {
                    for (i, byte) in write.iter().enumerate() {
                        let value = state.clock(&mut addr, *byte)?;
                        if let Some(slot) = read.get_mut(i) {
                            *slot = value;
                        }
                    }
                }
                Operation::DelayNs(_) => {}
            }
        }
        Ok(())
    }
}

/// Delay that records every millisecond pause instead of sleeping
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub ms: Vec<u32>,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.ms.push(ms);
    }
}

/// Timeout that expires after a fixed number of checks instead of wall time.
///
/// Clones share the same state.
#[derive(Clone)]
pub struct PollBudget {
    budget: u32,
    remaining: Rc<Cell<u32>>,
    expired: Rc<Cell<bool>>,
    started_with: Rc<Cell<Option<u32>>>,
}

impl PollBudget {
    /// Reads as not expired for the next `checks` checks
    pub fn new(checks: u32) -> Self {
        Self {
            budget: checks,
            remaining: Rc::new(Cell::new(checks)),
            expired: Rc::new(Cell::new(false)),
            started_with: Rc::new(Cell::new(None)),
        }
    }

    /// Duration passed to the last `start`
    pub fn started_with(&self) -> Option<u32> {
        self.started_with.get()
    }
}

impl Timeout for PollBudget {
    fn start(&mut self, duration_ms: u32) {
        self.started_with.set(Some(duration_ms));
        self.remaining.set(self.budget);
        self.expired.set(false);
    }

    fn restart(&mut self) {
        self.remaining.set(self.budget);
    }

    fn is_expired(&self) -> bool {
        if self.expired.get() {
            return true;
        }
        match self.remaining.get() {
            0 => true,
            n => {
                self.remaining.set(n - 1);
                false
            }
        }
    }

    fn expire(&mut self) {
        self.expired.set(true);
    }
}

pub type TestRadio = Ra02<SimChip, RecordingDelay, PollBudget>;

pub fn radio_with(chip: &SimChip, timer: &PollBudget, config: Config) -> TestRadio {
    Ra02::new(chip.clone(), RecordingDelay::default(), timer.clone(), config)
}

pub fn radio(chip: &SimChip) -> TestRadio {
    radio_with(chip, &PollBudget::new(100), Config::default())
}
