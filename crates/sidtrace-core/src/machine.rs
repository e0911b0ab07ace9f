//! Machine abstraction driven by the frame driver.
//!
//! A machine is a 6502-family CPU plus its 64 KiB address space. The driver
//! never looks further than this trait, so alternative cores can be plugged
//! in without touching the decoders.

/// Register file visible to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuRegisters {
    /// Accumulator
    pub a: u8,
    /// X index
    pub x: u8,
    /// Y index
    pub y: u8,
    /// Stack pointer (page one offset)
    pub sp: u8,
    /// Program counter
    pub pc: u16,
}

impl CpuRegisters {
    /// Registers for a subroutine call: entry point, accumulator, empty stack.
    pub fn call(pc: u16, a: u8) -> Self {
        Self {
            a,
            x: 0,
            y: 0,
            sp: 0xFF,
            pc,
        }
    }
}

/// CPU + memory seen by the frame driver.
pub trait Machine {
    /// Read one byte from the address space.
    fn load_byte(&self, address: u16) -> u8;

    /// Write one byte to the address space.
    fn store_byte(&mut self, address: u16, value: u8);

    /// Execute exactly one instruction at the current program counter.
    fn step(&mut self);

    /// Current register file.
    fn registers(&self) -> CpuRegisters;

    /// Replace the register file.
    fn set_registers(&mut self, registers: CpuRegisters);

    /// Cycles consumed since the last [`Machine::reset_cycles`].
    fn cycles(&self) -> u64;

    /// Zero the cycle counter.
    fn reset_cycles(&mut self);

    /// Move the program counter, leaving the other registers alone.
    fn set_program_counter(&mut self, pc: u16) {
        let mut registers = self.registers();
        registers.pc = pc;
        self.set_registers(registers);
    }

    /// Little-endian word at `address`.
    fn load_word(&self, address: u16) -> u16 {
        let lo = self.load_byte(address);
        let hi = self.load_byte(address.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }
}
