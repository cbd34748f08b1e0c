//! Range lookup tables
//!
//! Translate application values (power in dB, bandwidth in Hz) into register codes and back.
//! A table is an ordered list of inclusive ranges, each bound to one code. Several ranges may
//! share a code, so the reverse direction is lossy: it yields the lower bound of the first
//! range carrying that code.
//!
//! A value that matches no range yields `None`. Call sites keep whatever they already had in
//! that case instead of treating it as an error.

use core::ops::RangeInclusive;

/// One range of a [`RangeTable`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeEntry {
    /// Inclusive range of application values
    pub range: RangeInclusive<u32>,
    /// Register code for the range
    pub code: u8,
}

impl RangeEntry {
    /// Binds `range` to `code`
    pub const fn new(range: RangeInclusive<u32>, code: u8) -> Self {
        Self { range, code }
    }
}

/// Ordered collection of disjoint [`RangeEntry`] values
#[derive(Debug, Clone, Copy)]
pub struct RangeTable {
    entries: &'static [RangeEntry],
}

impl RangeTable {
    /// Creates a table over `entries`, which must be sorted by range
    pub const fn new(entries: &'static [RangeEntry]) -> Self {
        Self { entries }
    }

    /// Code of the first range containing `value`
    pub fn code_for(&self, value: u32) -> Option<u8> {
        self.entries
            .iter()
            .find(|entry| entry.range.contains(&value))
            .map(|entry| entry.code)
    }

    /// Lower bound of the first range whose code is `code`
    pub fn value_for(&self, code: u8) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.code == code)
            .map(|entry| *entry.range.start())
    }

    /// All entries, in lookup order
    pub fn entries(&self) -> &'static [RangeEntry] {
        self.entries
    }
}

/// PA_BOOST with MaxPower 7 and OutputPower 6, roughly 11 dBm
pub const PA_POWER_11: u8 = 0xF6;
/// PA_BOOST with OutputPower 9, roughly 14 dBm
pub const PA_POWER_14: u8 = 0xF9;
/// PA_BOOST with OutputPower 12, roughly 17 dBm
pub const PA_POWER_17: u8 = 0xFC;
/// PA_BOOST with OutputPower 15, roughly 20 dBm
pub const PA_POWER_20: u8 = 0xFF;

static POWER_ENTRIES: [RangeEntry; 5] = [
    RangeEntry::new(1..=10, PA_POWER_11),
    RangeEntry::new(11..=13, PA_POWER_11),
    RangeEntry::new(14..=16, PA_POWER_14),
    RangeEntry::new(17..=19, PA_POWER_17),
    RangeEntry::new(20..=99, PA_POWER_20),
];

/// Output power in dB to [`PaConfig`](crate::registers::PaConfig) value
pub static POWER_TABLE: RangeTable = RangeTable::new(&POWER_ENTRIES);

static BANDWIDTH_ENTRIES: [RangeEntry; 11] = [
    RangeEntry::new(1..=7_799, 0),
    RangeEntry::new(7_800..=10_399, 0),
    RangeEntry::new(10_400..=15_599, 1),
    RangeEntry::new(15_600..=20_799, 2),
    RangeEntry::new(20_800..=31_199, 3),
    RangeEntry::new(31_200..=41_699, 4),
    RangeEntry::new(41_700..=62_499, 5),
    RangeEntry::new(62_500..=124_999, 6),
    RangeEntry::new(125_000..=249_000, 7),
    RangeEntry::new(250_000..=499_000, 8),
    RangeEntry::new(500_000..=999_999, 9),
];

/// Signal bandwidth in Hz to the [`ModemConfig1`](crate::registers::ModemConfig1) bandwidth code
pub static BANDWIDTH_TABLE: RangeTable = RangeTable::new(&BANDWIDTH_ENTRIES);
