use std::fmt::{self, Display, Formatter};

pub type Result<T> = std::result::Result<T, Error>;

/// Fatal machine errors. Quirks the original interpreter clamped silently
/// (stack overflow, stack underflow, arithmetic wraparound) are not errors
/// and are handled at their call sites instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// ROM image does not fit between the start address and the end of memory.
    RomTooLarge { size: usize, capacity: usize },
    /// Instruction fetch requires two bytes; the program counter points past
    /// the last safe fetch address.
    FetchOutOfBounds { pc: u16 },
    /// A data access resolved outside the 4096-byte address space.
    AddressOutOfBounds { address: usize },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::RomTooLarge { size, capacity } => write!(
                f,
                "ROM of {} bytes exceeds the {} bytes of program memory",
                size, capacity
            ),
            Self::FetchOutOfBounds { pc } => {
                write!(f, "instruction fetch at {:#05X} is out of memory bounds", pc)
            }
            Self::AddressOutOfBounds { address } => {
                write!(f, "memory access at {:#05X} is out of memory bounds", address)
            }
        }
    }
}

impl std::error::Error for Error {}
