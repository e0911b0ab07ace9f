//! C64 machine: flat 64 KiB RAM driven by the 6510 core.

use sidtrace::{CpuRegisters, Machine};

use crate::cpu::{Bus, Mos6510};
use crate::error::{PsidError, Result};
use crate::format::PsidFile;

const MEMORY_SIZE: usize = 0x10000;

/// Flat RAM; I/O registers are plain memory cells.
struct FlatMemory {
    bytes: Box<[u8; MEMORY_SIZE]>,
}

impl Bus for FlatMemory {
    fn read(&mut self, address: u16) -> u8 {
        self.bytes[address as usize]
    }

    fn write(&mut self, address: u16, value: u8) {
        self.bytes[address as usize] = value;
    }
}

/// Memory + CPU implementation used by the frame driver.
pub struct C64Machine {
    memory: FlatMemory,
    cpu: Mos6510,
    cycles: u64,
}

impl Default for C64Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl C64Machine {
    /// Machine with zeroed RAM.
    pub fn new() -> Self {
        Self {
            memory: FlatMemory {
                bytes: Box::new([0; MEMORY_SIZE]),
            },
            cpu: Mos6510::new(),
            cycles: 0,
        }
    }

    /// Build a machine with the tune's payload in place.
    pub fn from_psid(file: &PsidFile) -> Result<Self> {
        let mut machine = Self::new();
        machine.load(file.load_address, &file.payload)?;
        Ok(machine)
    }

    /// Copy `payload` to `address`; it must fit below `$10000`.
    pub fn load(&mut self, address: u16, payload: &[u8]) -> Result<()> {
        let start = usize::from(address);
        let end = start + payload.len();
        if end > MEMORY_SIZE {
            return Err(PsidError::PayloadTooLarge {
                load_address: address,
                length: payload.len(),
            });
        }
        self.memory.bytes[start..end].copy_from_slice(payload);
        log::debug!("loaded {} bytes at ${address:04X}", payload.len());
        Ok(())
    }
}

impl Machine for C64Machine {
    fn load_byte(&self, address: u16) -> u8 {
        self.memory.bytes[address as usize]
    }

    fn store_byte(&mut self, address: u16, value: u8) {
        self.memory.bytes[address as usize] = value;
    }

    fn step(&mut self) {
        self.cycles += u64::from(self.cpu.step(&mut self.memory));
    }

    fn registers(&self) -> CpuRegisters {
        CpuRegisters {
            a: self.cpu.a,
            x: self.cpu.x,
            y: self.cpu.y,
            sp: self.cpu.sp,
            pc: self.cpu.pc,
        }
    }

    fn set_registers(&mut self, registers: CpuRegisters) {
        self.cpu.a = registers.a;
        self.cpu.x = registers.x;
        self.cpu.y = registers.y;
        self.cpu.sp = registers.sp;
        self.cpu.pc = registers.pc;
    }

    fn cycles(&self) -> u64 {
        self.cycles
    }

    fn reset_cycles(&mut self) {
        self.cycles = 0;
    }
}
