use crate::memory::START_ROM;

/// Chip-8 has 16 general purpose 8-bit registers, referred to as Vx where x
/// is a hexadecimal digit.
pub const NUM_REGISTERS: usize = 16;

/// The call stack holds up to 16 return addresses.
pub const STACK_SIZE: usize = 16;

/// Outcome of a call stack push.
///
/// The original interpreter drops a push beyond capacity without signalling;
/// naming the outcome lets tests assert on the policy instead of inferring it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackPush {
    Pushed,
    /// The stack already held [`STACK_SIZE`] return addresses.
    Dropped,
}

#[derive(Debug)]
pub(crate) struct Registers {
    /// V0-VF. VF doubles as the carry/borrow/collision flag and is
    /// overwritten by the instructions that produce one.
    pub vx: [u8; NUM_REGISTERS],
    /// Index register, used as a base address by memory-referencing
    /// instructions. Only the low 12 bits address memory.
    pub i: u16,
    /// Program counter, always at an instruction start.
    pub pc: u16,
    /// Stack pointer, indexing the next free stack slot.
    pub sp: usize,
    pub delay: u8,
    pub sound: u8,
    pub stack: [u16; STACK_SIZE],
}

impl Default for Registers {
    fn default() -> Self {
        Registers {
            vx: [0; NUM_REGISTERS],
            i: 0,
            pc: START_ROM as u16,
            sp: 0,
            delay: 0,
            sound: 0,
            stack: [0; STACK_SIZE],
        }
    }
}

impl Registers {
    /// Pushes a return address. A push onto a full stack is dropped.
    pub fn push(&mut self, address: u16) -> StackPush {
        if self.sp < STACK_SIZE {
            self.stack[self.sp] = address;
            self.sp += 1;
            StackPush::Pushed
        } else {
            StackPush::Dropped
        }
    }

    /// Pops the most recent return address, or `None` when the stack is
    /// empty. Callers substitute the 0 sentinel to match the original
    /// fail-silent behavior.
    pub fn pop(&mut self) -> Option<u16> {
        if self.sp > 0 {
            self.sp -= 1;
            Some(self.stack[self.sp])
        } else {
            None
        }
    }

    /// Decrements both timers by one tick, floored at zero. Driven
    /// externally at nominally 60 Hz, independent of the instruction rate.
    pub fn tick_timers(&mut self) {
        if self.delay > 0 {
            self.delay -= 1;
        }
        if self.sound > 0 {
            self.sound -= 1;
        }
    }
}
