//! Frame driver: init once, then one play call per PAL frame.

use crate::constants::{
    CPU_PORT, DEFAULT_MEMORY_CONFIG, HARDWARE_IRQ_VECTOR, JAM_OPCODES, KERNAL_IRQ_EXITS,
    KERNAL_IRQ_VECTOR, KERNAL_OFF_CONFIG, MAX_INSTRUCTIONS_PER_CALL,
};
use crate::decoder::FrameDecoder;
use crate::machine::{CpuRegisters, Machine};
use crate::raster;
use crate::snapshot::Snapshot;
use crate::Result;

const OPCODE_BRK: u8 = 0x00;
const OPCODE_RTI: u8 = 0x40;
const OPCODE_RTS: u8 = 0x60;

/// Init and play addresses of a tune.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPoints {
    /// Init routine, called once with the subtune in A
    pub init: u16,
    /// Play routine, called once per frame; 0 means "read the IRQ vector after init"
    pub play: u16,
}

/// How a single init or play call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    /// `BRK`, or `RTS`/`RTI` with an empty stack
    Returned,
    /// Reached the Kernal IRQ exit with the Kernal banked in
    KernalExit,
    /// Hit a JAM opcode
    Jammed(u8),
    /// Ran past the instruction ceiling and was cut off
    BudgetExceeded,
}

/// Totals for a complete run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Play calls executed
    pub frames_simulated: u32,
    /// Frames handed to the decoder
    pub frames_decoded: u32,
    /// Play calls cut off by the instruction ceiling
    pub incomplete_frames: u32,
}

/// Owns the machine and invokes the music routine.
pub struct FrameDriver<M: Machine> {
    machine: M,
    entry: EntryPoints,
}

impl<M: Machine> FrameDriver<M> {
    /// Wrap a machine that already holds the tune.
    pub fn new(machine: M, entry: EntryPoints) -> Self {
        Self { machine, entry }
    }

    /// The driven machine.
    pub fn machine(&self) -> &M {
        &self.machine
    }

    /// Mutable access to the driven machine.
    pub fn machine_mut(&mut self) -> &mut M {
        &mut self.machine
    }

    /// Play address in use (resolved after [`FrameDriver::run_init`]).
    pub fn play_address(&self) -> u16 {
        self.entry.play
    }

    /// Call init with `subtune` in A while emulating the raster counter,
    /// then resolve a zero play address from the IRQ vectors.
    pub fn run_init(&mut self, subtune: u8) -> CallOutcome {
        self.machine.store_byte(CPU_PORT, DEFAULT_MEMORY_CONFIG);
        let outcome = self.call(self.entry.init, subtune, true);
        if outcome == CallOutcome::BudgetExceeded {
            log::warn!("init routine executed too many instructions, breaking");
        }
        log::debug!(
            "init ${:04X} ended with {outcome:?} after {} cycles",
            self.entry.init,
            self.machine.cycles()
        );

        if self.entry.play == 0 {
            log::warn!("play address is 0, reading the interrupt vector instead");
            self.entry.play = if self.machine.load_byte(CPU_PORT) & 0x07 == KERNAL_OFF_CONFIG {
                self.machine.load_word(HARDWARE_IRQ_VECTOR)
            } else {
                self.machine.load_word(KERNAL_IRQ_VECTOR)
            };
            log::warn!("new play address is ${:04X}", self.entry.play);
        }
        outcome
    }

    /// Run one play call. Returns the outcome and the cycles it consumed.
    pub fn play_frame(&mut self) -> (CallOutcome, u64) {
        let outcome = self.call(self.entry.play, 0, false);
        if outcome == CallOutcome::BudgetExceeded {
            log::warn!("play routine executed too many instructions, breaking");
        }
        (outcome, self.machine.cycles())
    }

    /// Simulate `total_frames` frames and decode those from `first_frame` on.
    pub fn run<D: FrameDecoder + ?Sized>(
        &mut self,
        decoder: &mut D,
        total_frames: u32,
        first_frame: u32,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        decoder.pre_steps()?;
        for frame in 0..total_frames {
            let (outcome, cycles) = self.play_frame();
            summary.frames_simulated += 1;
            if outcome == CallOutcome::BudgetExceeded {
                summary.incomplete_frames += 1;
            }

            if frame >= first_frame {
                let snapshot = Snapshot::extract(&self.machine);
                decoder.process_frame(frame, cycles, &snapshot)?;
                summary.frames_decoded += 1;
            }
        }
        decoder.post_steps()?;
        Ok(summary)
    }

    fn call(&mut self, entry: u16, a: u8, emulate_raster: bool) -> CallOutcome {
        self.machine.set_registers(CpuRegisters::call(entry, a));
        self.machine.reset_cycles();

        let mut executed: u32 = 0;
        loop {
            let regs = self.machine.registers();
            if let Some(outcome) = self.halt_reason(regs) {
                return outcome;
            }
            if !emulate_raster && self.at_kernal_exit(regs.pc) {
                return CallOutcome::KernalExit;
            }

            self.machine.step();
            if emulate_raster {
                raster::tick(&mut self.machine);
            }

            executed += 1;
            if executed > MAX_INSTRUCTIONS_PER_CALL {
                return CallOutcome::BudgetExceeded;
            }
        }
    }

    fn halt_reason(&self, regs: CpuRegisters) -> Option<CallOutcome> {
        match self.machine.load_byte(regs.pc) {
            OPCODE_BRK => Some(CallOutcome::Returned),
            OPCODE_RTS | OPCODE_RTI if regs.sp == 0xFF => Some(CallOutcome::Returned),
            opcode if JAM_OPCODES.contains(&opcode) => Some(CallOutcome::Jammed(opcode)),
            _ => None,
        }
    }

    fn at_kernal_exit(&self, pc: u16) -> bool {
        self.machine.load_byte(CPU_PORT) & 0x07 != KERNAL_OFF_CONFIG
            && KERNAL_IRQ_EXITS.contains(&pc)
    }
}
