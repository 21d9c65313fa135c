// src/domain/changes.rs

use std::fmt;

/// Cumulative record of which monitored numeric fields have drifted since
/// the last explicit reset. Bits are only ever ORed in during a sync; a
/// matching value never clears its bit. Clearing happens through
/// [`ChangeFlags::without`] or the whole-table reset operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangeFlags(i64);

impl ChangeFlags {
    pub const SHIPPING: ChangeFlags = ChangeFlags(1 << 0);
    pub const PRICE: ChangeFlags = ChangeFlags(1 << 1);
    pub const UNITS_SOLD: ChangeFlags = ChangeFlags(1 << 2);

    pub const fn empty() -> Self {
        ChangeFlags(0)
    }

    /// Rebuild from the integer column as stored in SQLite.
    pub const fn from_bits(bits: i64) -> Self {
        ChangeFlags(bits)
    }

    pub const fn bits(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn with(self, flag: ChangeFlags) -> Self {
        ChangeFlags(self.0 | flag.0)
    }

    #[must_use]
    pub const fn without(self, flag: ChangeFlags) -> Self {
        ChangeFlags(self.0 & !flag.0)
    }

    pub const fn contains(self, flag: ChangeFlags) -> bool {
        self.0 & flag.0 == flag.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ChangeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(ChangeFlags::UNITS_SOLD) {
            names.push("units_sold");
        }
        if self.contains(ChangeFlags::PRICE) {
            names.push("price");
        }
        if self.contains(ChangeFlags::SHIPPING) {
            names.push("shipping");
        }
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join("+"))
        }
    }
}
