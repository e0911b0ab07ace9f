//! NMOS 6510 core.
//!
//! Documented opcodes, decimal mode and the undocumented opcodes music
//! routines actually use. Unstable opcodes (ANE, LXA, SHA, SHX, SHY, TAS)
//! follow the common approximations. Cycle counts come from the base
//! table plus page-crossing and branch penalties.

use bitflags::bitflags;
use sidtrace::constants::JAM_OPCODES;

bitflags! {
    /// Processor status register (NV-BDIZC)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        /// Carry
        const CARRY = 0x01;
        /// Zero
        const ZERO = 0x02;
        /// Interrupt disable
        const IRQ_DISABLE = 0x04;
        /// Decimal mode
        const DECIMAL = 0x08;
        /// Break (only exists on the stack copy)
        const BREAK = 0x10;
        /// Unused, reads as 1
        const UNUSED = 0x20;
        /// Overflow
        const OVERFLOW = 0x40;
        /// Negative
        const NEGATIVE = 0x80;
    }
}

/// Memory seen by the CPU.
pub trait Bus {
    /// Read a byte.
    fn read(&mut self, address: u16) -> u8;
    /// Write a byte.
    fn write(&mut self, address: u16, value: u8);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndirectX,
    IndirectY,
    Relative,
}

/// Base cycle counts; JAM opcodes are 0.
#[rustfmt::skip]
const CYCLES: [u8; 256] = [
    7, 6, 0, 8, 3, 3, 5, 5, 3, 2, 2, 2, 4, 4, 6, 6,
    2, 5, 0, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
    6, 6, 0, 8, 3, 3, 5, 5, 4, 2, 2, 2, 4, 4, 6, 6,
    2, 5, 0, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
    6, 6, 0, 8, 3, 3, 5, 5, 3, 2, 2, 2, 3, 4, 6, 6,
    2, 5, 0, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
    6, 6, 0, 8, 3, 3, 5, 5, 4, 2, 2, 2, 5, 4, 6, 6,
    2, 5, 0, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
    2, 6, 2, 6, 3, 3, 3, 3, 2, 2, 2, 2, 4, 4, 4, 4,
    2, 6, 0, 6, 4, 4, 4, 4, 2, 5, 2, 5, 5, 5, 5, 5,
    2, 6, 2, 6, 3, 3, 3, 3, 2, 2, 2, 2, 4, 4, 4, 4,
    2, 5, 0, 5, 4, 4, 4, 4, 2, 4, 2, 4, 4, 4, 4, 4,
    2, 6, 2, 8, 3, 3, 5, 5, 2, 2, 2, 2, 4, 4, 6, 6,
    2, 5, 0, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
    2, 6, 2, 8, 3, 3, 5, 5, 2, 2, 2, 2, 4, 4, 6, 6,
    2, 5, 0, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
];

const STACK_PAGE: u16 = 0x0100;
const IRQ_VECTOR: u16 = 0xFFFE;

fn addressing_mode(opcode: u8) -> Mode {
    let row = opcode >> 4;
    let odd = row & 1 == 1;
    match opcode & 0x0F {
        0x0 => match opcode {
            0x20 => Mode::Absolute,
            0x00 | 0x40 | 0x60 => Mode::Implied,
            _ if odd => Mode::Relative,
            _ => Mode::Immediate,
        },
        0x1 | 0x3 if odd => Mode::IndirectY,
        0x1 | 0x3 => Mode::IndirectX,
        0x2 => match opcode {
            0x82 | 0xA2 | 0xC2 | 0xE2 => Mode::Immediate,
            _ => Mode::Implied,
        },
        0x4 | 0x5 if odd => Mode::ZeroPageX,
        0x4 | 0x5 => Mode::ZeroPage,
        0x6 | 0x7 => match (odd, row) {
            (true, 0x9 | 0xB) => Mode::ZeroPageY,
            (true, _) => Mode::ZeroPageX,
            _ => Mode::ZeroPage,
        },
        0x8 => Mode::Implied,
        0x9 | 0xB if odd => Mode::AbsoluteY,
        0x9 | 0xB => Mode::Immediate,
        0xA if row < 8 && !odd => Mode::Accumulator,
        0xA => Mode::Implied,
        0xC => match opcode {
            0x6C => Mode::Indirect,
            _ if odd => Mode::AbsoluteX,
            _ => Mode::Absolute,
        },
        0xD if odd => Mode::AbsoluteX,
        0xD => Mode::Absolute,
        _ => match (odd, row) {
            (true, 0x9 | 0xB) => Mode::AbsoluteY,
            (true, _) => Mode::AbsoluteX,
            _ => Mode::Absolute,
        },
    }
}

/// 6510 register file and instruction interpreter
#[derive(Debug, Clone)]
pub struct Mos6510 {
    /// Accumulator
    pub a: u8,
    /// X index
    pub x: u8,
    /// Y index
    pub y: u8,
    /// Stack pointer
    pub sp: u8,
    /// Program counter
    pub pc: u16,
    /// Status register
    pub status: Status,
}

impl Default for Mos6510 {
    fn default() -> Self {
        Self::new()
    }
}

impl Mos6510 {
    /// Power-on state: empty stack, interrupts disabled.
    pub fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFF,
            pc: 0,
            status: Status::UNUSED | Status::IRQ_DISABLE,
        }
    }

    /// Execute one instruction and return the cycles it took.
    ///
    /// JAM opcodes leave the program counter on the opcode.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let opcode = self.fetch(bus);
        let mode = addressing_mode(opcode);
        let mut cycles = u32::from(CYCLES[opcode as usize]);

        match opcode {
            // Control flow
            0x00 => {
                self.pc = self.pc.wrapping_add(1);
                self.push_word(bus, self.pc);
                let pushed = self.status | Status::BREAK | Status::UNUSED;
                self.push(bus, pushed.bits());
                self.status.insert(Status::IRQ_DISABLE);
                self.pc = read_word(bus, IRQ_VECTOR);
            }
            0x20 => {
                let target = self.fetch_word(bus);
                self.push_word(bus, self.pc.wrapping_sub(1));
                self.pc = target;
            }
            0x40 => {
                let value = self.pull(bus);
                self.set_status_from_stack(value);
                self.pc = self.pull_word(bus);
            }
            0x60 => {
                self.pc = self.pull_word(bus).wrapping_add(1);
            }
            0x4C => self.pc = self.fetch_word(bus),
            0x6C => {
                let pointer = self.fetch_word(bus);
                let lo = bus.read(pointer);
                let hi = bus.read((pointer & 0xFF00) | (pointer.wrapping_add(1) & 0x00FF));
                self.pc = u16::from_le_bytes([lo, hi]);
            }
            0x10 => cycles += self.branch(bus, !self.status.contains(Status::NEGATIVE)),
            0x30 => cycles += self.branch(bus, self.status.contains(Status::NEGATIVE)),
            0x50 => cycles += self.branch(bus, !self.status.contains(Status::OVERFLOW)),
            0x70 => cycles += self.branch(bus, self.status.contains(Status::OVERFLOW)),
            0x90 => cycles += self.branch(bus, !self.status.contains(Status::CARRY)),
            0xB0 => cycles += self.branch(bus, self.status.contains(Status::CARRY)),
            0xD0 => cycles += self.branch(bus, !self.status.contains(Status::ZERO)),
            0xF0 => cycles += self.branch(bus, self.status.contains(Status::ZERO)),

            // Flags
            0x18 => self.status.remove(Status::CARRY),
            0x38 => self.status.insert(Status::CARRY),
            0x58 => self.status.remove(Status::IRQ_DISABLE),
            0x78 => self.status.insert(Status::IRQ_DISABLE),
            0xB8 => self.status.remove(Status::OVERFLOW),
            0xD8 => self.status.remove(Status::DECIMAL),
            0xF8 => self.status.insert(Status::DECIMAL),

            // Transfers
            0xAA => self.x = self.set_zn(self.a),
            0xA8 => self.y = self.set_zn(self.a),
            0x8A => self.a = self.set_zn(self.x),
            0x98 => self.a = self.set_zn(self.y),
            0xBA => self.x = self.set_zn(self.sp),
            0x9A => self.sp = self.x,

            // Stack
            0x48 => self.push(bus, self.a),
            0x08 => {
                let pushed = self.status | Status::BREAK | Status::UNUSED;
                self.push(bus, pushed.bits());
            }
            0x68 => {
                let value = self.pull(bus);
                self.a = self.set_zn(value);
            }
            0x28 => {
                let value = self.pull(bus);
                self.set_status_from_stack(value);
            }

            // Register increments
            0xE8 => self.x = self.set_zn(self.x.wrapping_add(1)),
            0xC8 => self.y = self.set_zn(self.y.wrapping_add(1)),
            0xCA => self.x = self.set_zn(self.x.wrapping_sub(1)),
            0x88 => self.y = self.set_zn(self.y.wrapping_sub(1)),

            // No-ops
            0xEA | 0x1A | 0x3A | 0x5A | 0x7A | 0xDA | 0xFA => {}
            0x80 | 0x82 | 0x89 | 0xC2 | 0xE2 | 0x04 | 0x44 | 0x64 | 0x14 | 0x34 | 0x54
            | 0x74 | 0xD4 | 0xF4 | 0x0C | 0x1C | 0x3C | 0x5C | 0x7C | 0xDC | 0xFC => {
                self.read_operand(bus, mode, &mut cycles);
            }

            // Lockup
            _ if JAM_OPCODES.contains(&opcode) => {
                self.pc = self.pc.wrapping_sub(1);
            }

            // Index register loads, stores and compares
            0x24 | 0x2C => {
                let value = self.read_operand(bus, mode, &mut cycles);
                self.status.set(Status::ZERO, self.a & value == 0);
                self.status.set(Status::NEGATIVE, value & 0x80 != 0);
                self.status.set(Status::OVERFLOW, value & 0x40 != 0);
            }
            0x84 | 0x94 | 0x8C => {
                let address = self.resolve(bus, mode).0;
                bus.write(address, self.y);
            }
            0x86 | 0x96 | 0x8E => {
                let address = self.resolve(bus, mode).0;
                bus.write(address, self.x);
            }
            0xA0 | 0xA4 | 0xB4 | 0xAC | 0xBC => {
                let value = self.read_operand(bus, mode, &mut cycles);
                self.y = self.set_zn(value);
            }
            0xA2 | 0xA6 | 0xB6 | 0xAE | 0xBE => {
                let value = self.read_operand(bus, mode, &mut cycles);
                self.x = self.set_zn(value);
            }
            0xC0 | 0xC4 | 0xCC => {
                let value = self.read_operand(bus, mode, &mut cycles);
                self.compare(self.y, value);
            }
            0xE0 | 0xE4 | 0xEC => {
                let value = self.read_operand(bus, mode, &mut cycles);
                self.compare(self.x, value);
            }

            // Undocumented immediates
            0x0B | 0x2B => {
                let value = self.read_operand(bus, mode, &mut cycles);
                self.a = self.set_zn(self.a & value);
                self.status.set(Status::CARRY, self.a & 0x80 != 0);
            }
            0x4B => {
                let value = self.read_operand(bus, mode, &mut cycles);
                self.a = self.lsr(self.a & value);
            }
            0x6B => {
                let value = self.read_operand(bus, mode, &mut cycles);
                self.a = self.ror(self.a & value);
                self.status.set(Status::CARRY, self.a & 0x40 != 0);
                self.status
                    .set(Status::OVERFLOW, ((self.a >> 6) ^ (self.a >> 5)) & 0x01 != 0);
            }
            0x8B => {
                let value = self.read_operand(bus, mode, &mut cycles);
                self.a = self.set_zn((self.a | 0xEE) & self.x & value);
            }
            0xAB => {
                let value = self.read_operand(bus, mode, &mut cycles);
                self.a = self.set_zn((self.a | 0xEE) & value);
                self.x = self.a;
            }
            0xCB => {
                let value = self.read_operand(bus, mode, &mut cycles);
                let masked = self.a & self.x;
                self.status.set(Status::CARRY, masked >= value);
                self.x = self.set_zn(masked.wrapping_sub(value));
            }
            0xEB => {
                let value = self.read_operand(bus, mode, &mut cycles);
                self.sbc(value);
            }

            // Unstable stores
            0x93 | 0x9F => {
                let (address, _) = self.resolve(bus, mode);
                let value = self.a & self.x & high_byte_plus_one(address, self.y);
                bus.write(address, value);
            }
            0x9E => {
                let (address, _) = self.resolve(bus, mode);
                bus.write(address, self.x & high_byte_plus_one(address, self.y));
            }
            0x9C => {
                let (address, _) = self.resolve(bus, mode);
                bus.write(address, self.y & high_byte_plus_one(address, self.x));
            }
            0x9B => {
                let (address, _) = self.resolve(bus, mode);
                self.sp = self.a & self.x;
                bus.write(address, self.sp & high_byte_plus_one(address, self.y));
            }
            0xBB => {
                let value = self.read_operand(bus, mode, &mut cycles) & self.sp;
                self.sp = value;
                self.x = value;
                self.a = self.set_zn(value);
            }

            _ => self.execute_group(bus, opcode, mode, &mut cycles),
        }

        cycles
    }

    /// The regular `aaabbbcc` opcode groups.
    fn execute_group<B: Bus>(&mut self, bus: &mut B, opcode: u8, mode: Mode, cycles: &mut u32) {
        let operation = opcode >> 5;
        match opcode & 0x03 {
            0x01 => {
                if operation == 4 {
                    let address = self.resolve(bus, mode).0;
                    bus.write(address, self.a);
                    return;
                }
                let value = self.read_operand(bus, mode, cycles);
                match operation {
                    0 => self.a = self.set_zn(self.a | value),
                    1 => self.a = self.set_zn(self.a & value),
                    2 => self.a = self.set_zn(self.a ^ value),
                    3 => self.adc(value),
                    5 => self.a = self.set_zn(value),
                    6 => self.compare(self.a, value),
                    _ => self.sbc(value),
                }
            }
            0x02 => match operation {
                0 => {
                    self.modify(bus, mode, Self::asl);
                }
                1 => {
                    self.modify(bus, mode, Self::rol);
                }
                2 => {
                    self.modify(bus, mode, Self::lsr);
                }
                3 => {
                    self.modify(bus, mode, Self::ror);
                }
                6 => {
                    self.modify(bus, mode, |cpu, value| cpu.set_zn(value.wrapping_sub(1)));
                }
                7 => {
                    self.modify(bus, mode, |cpu, value| cpu.set_zn(value.wrapping_add(1)));
                }
                _ => {}
            },
            0x03 => match operation {
                0 => {
                    let value = self.modify(bus, mode, Self::asl);
                    self.a = self.set_zn(self.a | value);
                }
                1 => {
                    let value = self.modify(bus, mode, Self::rol);
                    self.a = self.set_zn(self.a & value);
                }
                2 => {
                    let value = self.modify(bus, mode, Self::lsr);
                    self.a = self.set_zn(self.a ^ value);
                }
                3 => {
                    let value = self.modify(bus, mode, Self::ror);
                    self.adc(value);
                }
                4 => {
                    let address = self.resolve(bus, mode).0;
                    bus.write(address, self.a & self.x);
                }
                5 => {
                    let value = self.read_operand(bus, mode, cycles);
                    self.a = self.set_zn(value);
                    self.x = value;
                }
                6 => {
                    let value = self.modify(bus, mode, |_, value| value.wrapping_sub(1));
                    self.compare(self.a, value);
                }
                _ => {
                    let value = self.modify(bus, mode, |_, value| value.wrapping_add(1));
                    self.sbc(value);
                }
            },
            _ => {}
        }
    }

    fn fetch<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    fn fetch_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch(bus);
        let hi = self.fetch(bus);
        u16::from_le_bytes([lo, hi])
    }

    fn push<B: Bus>(&mut self, bus: &mut B, value: u8) {
        bus.write(STACK_PAGE | u16::from(self.sp), value);
        self.sp = self.sp.wrapping_sub(1);
    }

    fn pull<B: Bus>(&mut self, bus: &mut B) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(STACK_PAGE | u16::from(self.sp))
    }

    fn push_word<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.push(bus, hi);
        self.push(bus, lo);
    }

    fn pull_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.pull(bus);
        let hi = self.pull(bus);
        u16::from_le_bytes([lo, hi])
    }

    fn set_status_from_stack(&mut self, value: u8) {
        self.status = Status::from_bits_truncate(value) | Status::UNUSED;
        self.status.remove(Status::BREAK);
    }

    /// Effective address of the operand and whether indexing crossed a page.
    fn resolve<B: Bus>(&mut self, bus: &mut B, mode: Mode) -> (u16, bool) {
        match mode {
            Mode::Immediate => {
                let address = self.pc;
                self.pc = self.pc.wrapping_add(1);
                (address, false)
            }
            Mode::ZeroPage => (u16::from(self.fetch(bus)), false),
            Mode::ZeroPageX => (u16::from(self.fetch(bus).wrapping_add(self.x)), false),
            Mode::ZeroPageY => (u16::from(self.fetch(bus).wrapping_add(self.y)), false),
            Mode::Absolute => (self.fetch_word(bus), false),
            Mode::AbsoluteX => indexed(self.fetch_word(bus), self.x),
            Mode::AbsoluteY => indexed(self.fetch_word(bus), self.y),
            Mode::IndirectX => {
                let pointer = self.fetch(bus).wrapping_add(self.x);
                (read_zero_page_word(bus, pointer), false)
            }
            Mode::IndirectY => {
                let pointer = self.fetch(bus);
                indexed(read_zero_page_word(bus, pointer), self.y)
            }
            Mode::Indirect => {
                let pointer = self.fetch_word(bus);
                (read_word(bus, pointer), false)
            }
            Mode::Implied | Mode::Accumulator | Mode::Relative => (self.pc, false),
        }
    }

    /// Read the operand, adding the page-crossing cycle for indexed reads.
    fn read_operand<B: Bus>(&mut self, bus: &mut B, mode: Mode, cycles: &mut u32) -> u8 {
        let (address, crossed) = self.resolve(bus, mode);
        if crossed {
            *cycles += 1;
        }
        bus.read(address)
    }

    /// Read-modify-write on memory or the accumulator; returns the new value.
    fn modify<B: Bus>(
        &mut self,
        bus: &mut B,
        mode: Mode,
        f: impl FnOnce(&mut Self, u8) -> u8,
    ) -> u8 {
        if mode == Mode::Accumulator {
            let accumulator = self.a;
            let value = f(self, accumulator);
            self.a = value;
            return value;
        }
        let address = self.resolve(bus, mode).0;
        let value = bus.read(address);
        let result = f(self, value);
        bus.write(address, result);
        result
    }

    fn branch<B: Bus>(&mut self, bus: &mut B, condition: bool) -> u32 {
        let offset = self.fetch(bus) as i8;
        if !condition {
            return 0;
        }
        let target = self.pc.wrapping_add(offset as i16 as u16);
        let penalty = if target & 0xFF00 != self.pc & 0xFF00 { 2 } else { 1 };
        self.pc = target;
        penalty
    }

    fn set_zn(&mut self, value: u8) -> u8 {
        self.status.set(Status::ZERO, value == 0);
        self.status.set(Status::NEGATIVE, value & 0x80 != 0);
        value
    }

    fn compare(&mut self, register: u8, value: u8) {
        self.status.set(Status::CARRY, register >= value);
        self.set_zn(register.wrapping_sub(value));
    }

    fn asl(&mut self, value: u8) -> u8 {
        self.status.set(Status::CARRY, value & 0x80 != 0);
        self.set_zn(value << 1)
    }

    fn lsr(&mut self, value: u8) -> u8 {
        self.status.set(Status::CARRY, value & 0x01 != 0);
        self.set_zn(value >> 1)
    }

    fn rol(&mut self, value: u8) -> u8 {
        let carry_in = u8::from(self.status.contains(Status::CARRY));
        self.status.set(Status::CARRY, value & 0x80 != 0);
        self.set_zn((value << 1) | carry_in)
    }

    fn ror(&mut self, value: u8) -> u8 {
        let carry_in = if self.status.contains(Status::CARRY) { 0x80 } else { 0 };
        self.status.set(Status::CARRY, value & 0x01 != 0);
        self.set_zn((value >> 1) | carry_in)
    }

    fn adc(&mut self, value: u8) {
        let a = u16::from(self.a);
        let v = u16::from(value);
        let carry = u16::from(self.status.contains(Status::CARRY));
        let binary = a + v + carry;

        if !self.status.contains(Status::DECIMAL) {
            let result = binary as u8;
            self.status.set(Status::CARRY, binary > 0xFF);
            self.status
                .set(Status::OVERFLOW, (self.a ^ result) & (value ^ result) & 0x80 != 0);
            self.a = self.set_zn(result);
            return;
        }

        let mut low = (a & 0x0F) + (v & 0x0F) + carry;
        if low > 9 {
            low += 6;
        }
        let mut high = (a >> 4) + (v >> 4) + u16::from(low > 0x0F);
        self.status.set(Status::ZERO, binary & 0xFF == 0);
        self.status.set(Status::NEGATIVE, high & 0x08 != 0);
        self.status.set(
            Status::OVERFLOW,
            ((high << 4) ^ a) & 0x80 != 0 && (a ^ v) & 0x80 == 0,
        );
        if high > 9 {
            high += 6;
        }
        self.status.set(Status::CARRY, high > 0x0F);
        self.a = ((high << 4) | (low & 0x0F)) as u8;
    }

    fn sbc(&mut self, value: u8) {
        let a = i16::from(self.a);
        let v = i16::from(value);
        let borrow = i16::from(!self.status.contains(Status::CARRY));
        let binary = a - v - borrow;
        let result = binary as u8;

        self.status.set(Status::CARRY, binary >= 0);
        self.status
            .set(Status::OVERFLOW, (self.a ^ value) & (self.a ^ result) & 0x80 != 0);
        self.set_zn(result);

        if !self.status.contains(Status::DECIMAL) {
            self.a = result;
            return;
        }

        let mut low = (a & 0x0F) - (v & 0x0F) - borrow;
        let mut high = (a >> 4) - (v >> 4);
        if low < 0 {
            low -= 6;
            high -= 1;
        }
        if high < 0 {
            high -= 6;
        }
        self.a = (((high << 4) & 0xF0) | (low & 0x0F)) as u8;
    }
}

fn indexed(base: u16, index: u8) -> (u16, bool) {
    let address = base.wrapping_add(u16::from(index));
    (address, address & 0xFF00 != base & 0xFF00)
}

fn read_word<B: Bus>(bus: &mut B, address: u16) -> u16 {
    let lo = bus.read(address);
    let hi = bus.read(address.wrapping_add(1));
    u16::from_le_bytes([lo, hi])
}

fn read_zero_page_word<B: Bus>(bus: &mut B, pointer: u8) -> u16 {
    let lo = bus.read(u16::from(pointer));
    let hi = bus.read(u16::from(pointer.wrapping_add(1)));
    u16::from_le_bytes([lo, hi])
}

/// `H + 1` term of the unstable SHx stores, from the unindexed base address.
fn high_byte_plus_one(address: u16, index: u8) -> u8 {
    let base = address.wrapping_sub(u16::from(index));
    ((base >> 8) as u8).wrapping_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ram(Vec<u8>);

    impl Bus for Ram {
        fn read(&mut self, address: u16) -> u8 {
            self.0[address as usize]
        }

        fn write(&mut self, address: u16, value: u8) {
            self.0[address as usize] = value;
        }
    }

    fn setup(program: &[u8]) -> (Mos6510, Ram) {
        let mut ram = Ram(vec![0; 0x10000]);
        ram.0[0x0200..0x0200 + program.len()].copy_from_slice(program);
        let mut cpu = Mos6510::new();
        cpu.pc = 0x0200;
        (cpu, ram)
    }

    #[test]
    fn lda_immediate_sets_flags() {
        let (mut cpu, mut ram) = setup(&[0xA9, 0x00, 0xA9, 0x80]);
        assert_eq!(cpu.step(&mut ram), 2);
        assert!(cpu.status.contains(Status::ZERO));
        cpu.step(&mut ram);
        assert_eq!(cpu.a, 0x80);
        assert!(cpu.status.contains(Status::NEGATIVE));
        assert!(!cpu.status.contains(Status::ZERO));
    }

    #[test]
    fn indexed_read_pays_for_page_cross() {
        // LDX #$01; LDA $02FF,X; STA $02FF,X
        let (mut cpu, mut ram) = setup(&[0xA2, 0x01, 0xBD, 0xFF, 0x02, 0x9D, 0xFF, 0x02]);
        ram.0[0x0300] = 0x42;
        cpu.step(&mut ram);
        assert_eq!(cpu.step(&mut ram), 5);
        assert_eq!(cpu.a, 0x42);
        assert_eq!(cpu.step(&mut ram), 5);
    }

    #[test]
    fn jsr_rts_round_trip() {
        // JSR $0300 ... $0300: RTS
        let (mut cpu, mut ram) = setup(&[0x20, 0x00, 0x03, 0xEA]);
        ram.0[0x0300] = 0x60;
        assert_eq!(cpu.step(&mut ram), 6);
        assert_eq!(cpu.pc, 0x0300);
        assert_eq!(cpu.sp, 0xFD);
        assert_eq!(cpu.step(&mut ram), 6);
        assert_eq!(cpu.pc, 0x0203);
        assert_eq!(cpu.sp, 0xFF);
    }

    #[test]
    fn branch_penalties() {
        // BNE +2 (taken, same page); BEQ (not taken)
        let (mut cpu, mut ram) = setup(&[0xD0, 0x02, 0x00, 0x00, 0xF0, 0x10]);
        assert_eq!(cpu.step(&mut ram), 3);
        assert_eq!(cpu.pc, 0x0204);
        assert_eq!(cpu.step(&mut ram), 2);
        assert_eq!(cpu.pc, 0x0206);

        // Taken branch across a page boundary.
        let (mut cpu, mut ram) = setup(&[0xD0, 0x80]);
        cpu.pc = 0x0200;
        ram.0[0x0200] = 0xD0;
        ram.0[0x0201] = 0xFC;
        assert_eq!(cpu.step(&mut ram), 4);
        assert_eq!(cpu.pc, 0x01FE);
    }

    #[test]
    fn indirect_jump_wraps_within_page() {
        let (mut cpu, mut ram) = setup(&[0x6C, 0xFF, 0x03]);
        ram.0[0x03FF] = 0x34;
        ram.0[0x0300] = 0x12;
        ram.0[0x0400] = 0x99;
        cpu.step(&mut ram);
        assert_eq!(cpu.pc, 0x1234);
    }

    #[test]
    fn decimal_adc_and_sbc() {
        // SED; LDA #$09; CLC; ADC #$01; SEC; SBC #$02
        let (mut cpu, mut ram) =
            setup(&[0xF8, 0xA9, 0x09, 0x18, 0x69, 0x01, 0x38, 0xE9, 0x02]);
        for _ in 0..4 {
            cpu.step(&mut ram);
        }
        assert_eq!(cpu.a, 0x10);
        assert!(!cpu.status.contains(Status::CARRY));
        cpu.step(&mut ram);
        cpu.step(&mut ram);
        assert_eq!(cpu.a, 0x08);
        assert!(cpu.status.contains(Status::CARRY));
    }

    #[test]
    fn binary_adc_overflow() {
        // CLC; LDA #$7F; ADC #$01
        let (mut cpu, mut ram) = setup(&[0x18, 0xA9, 0x7F, 0x69, 0x01]);
        for _ in 0..3 {
            cpu.step(&mut ram);
        }
        assert_eq!(cpu.a, 0x80);
        assert!(cpu.status.contains(Status::OVERFLOW));
        assert!(cpu.status.contains(Status::NEGATIVE));
        assert!(!cpu.status.contains(Status::CARRY));
    }

    #[test]
    fn read_modify_write_and_undocumented() {
        // LDA #$0F; STA $10; INC $10; LAX $10; DCP $10; SLO $10
        let (mut cpu, mut ram) = setup(&[
            0xA9, 0x0F, 0x85, 0x10, 0xE6, 0x10, 0xA7, 0x10, 0xC7, 0x10, 0x07, 0x10,
        ]);
        for _ in 0..4 {
            cpu.step(&mut ram);
        }
        assert_eq!(ram.0[0x10], 0x10);
        assert_eq!(cpu.a, 0x10);
        assert_eq!(cpu.x, 0x10);

        assert_eq!(cpu.step(&mut ram), 5);
        assert_eq!(ram.0[0x10], 0x0F);
        assert!(cpu.status.contains(Status::CARRY));

        cpu.step(&mut ram);
        assert_eq!(ram.0[0x10], 0x1E);
        assert_eq!(cpu.a, 0x1E);
    }

    #[test]
    fn jam_freezes_program_counter() {
        let (mut cpu, mut ram) = setup(&[0x02]);
        cpu.step(&mut ram);
        assert_eq!(cpu.pc, 0x0200);
        assert_eq!(cpu.step(&mut ram), 0);
        assert_eq!(cpu.pc, 0x0200);
    }

    #[test]
    fn brk_pushes_state_and_vectors() {
        let (mut cpu, mut ram) = setup(&[0x00]);
        ram.0[0xFFFE] = 0x00;
        ram.0[0xFFFF] = 0x80;
        assert_eq!(cpu.step(&mut ram), 7);
        assert_eq!(cpu.pc, 0x8000);
        assert_eq!(cpu.sp, 0xFC);
        assert_eq!(ram.0[0x01FF], 0x02);
        assert_eq!(ram.0[0x01FE], 0x02);
        assert_eq!(ram.0[0x01FD] & 0x30, 0x30);
    }

    #[test]
    fn every_opcode_has_a_mode() {
        assert_eq!(addressing_mode(0xB1), Mode::IndirectY);
        assert_eq!(addressing_mode(0x96), Mode::ZeroPageY);
        assert_eq!(addressing_mode(0xBE), Mode::AbsoluteY);
        assert_eq!(addressing_mode(0x0A), Mode::Accumulator);
        assert_eq!(addressing_mode(0x8A), Mode::Implied);
        assert_eq!(addressing_mode(0x6C), Mode::Indirect);
        assert_eq!(addressing_mode(0xD0), Mode::Relative);
        assert_eq!(addressing_mode(0xA0), Mode::Immediate);
        assert_eq!(addressing_mode(0x9C), Mode::AbsoluteX);
    }
}
