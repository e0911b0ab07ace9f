//! Driver + decoder pipeline over a machine implemented outside the crate.

use sidtrace::{
    ActiveDecoder, CallOutcome, CpuRegisters, DecoderKind, EntryPoints, FrameDriver,
    FrequencyTable, Machine, Settings,
};

/// Flat RAM understanding only `INC abs` (6 cycles); other opcodes skip one byte.
struct IncMachine {
    memory: Vec<u8>,
    regs: CpuRegisters,
    cycles: u64,
}

impl IncMachine {
    fn with_routine(address: u16, code: &[u8]) -> Self {
        let mut memory = vec![0; 0x10000];
        let start = address as usize;
        memory[start..start + code.len()].copy_from_slice(code);
        Self {
            memory,
            regs: CpuRegisters::default(),
            cycles: 0,
        }
    }
}

impl Machine for IncMachine {
    fn load_byte(&self, address: u16) -> u8 {
        self.memory[address as usize]
    }

    fn store_byte(&mut self, address: u16, value: u8) {
        self.memory[address as usize] = value;
    }

    fn step(&mut self) {
        let pc = self.regs.pc as usize;
        if self.memory[pc] == 0xEE {
            let target = u16::from_le_bytes([self.memory[pc + 1], self.memory[pc + 2]]) as usize;
            self.memory[target] = self.memory[target].wrapping_add(1);
            self.regs.pc = self.regs.pc.wrapping_add(3);
            self.cycles += 6;
        } else {
            self.regs.pc = self.regs.pc.wrapping_add(1);
            self.cycles += 2;
        }
    }

    fn registers(&self) -> CpuRegisters {
        self.regs
    }

    fn set_registers(&mut self, registers: CpuRegisters) {
        self.regs = registers;
    }

    fn cycles(&self) -> u64 {
        self.cycles
    }

    fn reset_cycles(&mut self) {
        self.cycles = 0;
    }
}

fn driver() -> FrameDriver<IncMachine> {
    // INC $D400 / INC $D418 / RTS
    let machine = IncMachine::with_routine(0x1000, &[0xEE, 0x00, 0xD4, 0xEE, 0x18, 0xD4, 0x60]);
    FrameDriver::new(machine, EntryPoints { init: 0x1006, play: 0x1000 })
}

fn trace(kind: DecoderKind, frames: u32, first_frame: u32) -> String {
    let settings = Settings {
        frames,
        first_frame,
        ..Settings::default()
    };
    let mut driver = driver();
    assert_eq!(driver.run_init(0), CallOutcome::Returned);
    let mut decoder = ActiveDecoder::new(kind, settings.clone(), FrequencyTable::pal(), Vec::new());
    driver
        .run(&mut decoder, settings.total_frames(), settings.first_frame)
        .expect("trace runs");
    let bytes = match decoder {
        ActiveDecoder::Registers(inner) => inner.into_inner(),
        ActiveDecoder::Notes(inner) => inner.into_inner(),
        ActiveDecoder::Json(inner) => inner.into_inner(),
        ActiveDecoder::Dump(inner) => inner.into_inner(),
    };
    String::from_utf8(bytes).expect("utf-8 output")
}

#[test]
fn register_trace_shows_only_changes() {
    let output = trace(DecoderKind::Registers, 2, 0);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[2],
        "|     0 | 01 00 00 00 00 00 00 | 00 00 00 00 00 00 00 | 00 00 00 00 00 00 00 | 00 00 00 01 |  4E20 |"
    );
    assert_eq!(
        lines[3],
        "|     1 | 02 .. .. .. .. .. .. | .. .. .. .. .. .. .. | .. .. .. .. .. .. .. | .. .. .. 02 |  4E20 |"
    );
}

#[test]
fn skipped_frames_are_still_simulated() {
    let output = trace(DecoderKind::Registers, 1, 4);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[2].starts_with("|     0 | 05 "));
}

#[test]
fn json_trace_reports_play_cycles() {
    let output = trace(DecoderKind::Json, 3, 0);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[2].contains("\"frame\":2"));
    assert!(lines[2].contains("\"cycles\":12"));
}

#[test]
fn note_trace_is_deterministic() {
    assert_eq!(
        trace(DecoderKind::Notes, 20, 3),
        trace(DecoderKind::Notes, 20, 3)
    );
}
