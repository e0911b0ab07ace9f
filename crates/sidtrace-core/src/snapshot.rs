//! Per-frame SID state extracted from machine memory.

use serde::Serialize;

use crate::constants::{
    CIA1_TIMER_A_HI, CIA1_TIMER_A_LO, RAW_IMAGE_LEN, SID_DATA_REGISTERS, VBI_DELTA_TIME_US,
    VOICE_COUNT,
};
use crate::machine::Machine;
use crate::notes::FILTER_NAMES;
use crate::registers::{FilterMode, SidRegister, Waveform};

/// Decoded state of one SID voice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Channel {
    /// 16-bit oscillator frequency
    pub frequency: u16,
    /// 12-bit pulse width
    pub pulse_width: u16,
    /// Envelope: attack/decay in the high byte, sustain/release in the low byte
    pub adsr: u16,
    /// Raw control register (waveform selectors + gate)
    pub waveform: u8,
    /// Inferred note index into the frequency table, `None` when unknown
    pub note: Option<u8>,
}

impl Channel {
    /// Control register as flags.
    pub fn waveform_flags(&self) -> Waveform {
        Waveform::from_register(self.waveform)
    }

    /// A voice counts as sounding once any waveform selector bit is set.
    pub fn is_active(&self) -> bool {
        self.waveform_flags().has_waveform()
    }
}

/// Decoded filter and master volume state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Filter {
    /// `$D418`: passband bits in the high nybble, volume in the low nybble
    pub mode_volume: u8,
    /// `$D417`: resonance and voice routing
    pub control: u8,
    /// Cutoff as `($D416 << 8) | (($D415 & 7) << 5)`
    pub cutoff: u16,
}

impl Filter {
    /// Passband selector (0-7).
    pub fn passband(&self) -> u8 {
        FilterMode::from_register(self.mode_volume).passband_index()
    }

    /// Master volume (0-15).
    pub fn volume(&self) -> u8 {
        self.mode_volume & 0x0F
    }

    /// Three-character passband label.
    pub fn passband_name(&self) -> &'static str {
        FILTER_NAMES[self.passband() as usize]
    }
}

/// One frame's worth of SID state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// The three voices
    pub channels: [Channel; VOICE_COUNT],
    /// Filter block
    pub filter: Filter,
    /// `$D400-$D418` followed by delta time (high, low)
    pub registers: [u8; RAW_IMAGE_LEN],
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            channels: [Channel::default(); VOICE_COUNT],
            filter: Filter::default(),
            registers: [0; RAW_IMAGE_LEN],
        }
    }
}

impl Snapshot {
    /// Read the SID block and CIA 1 timer A from `machine`.
    ///
    /// Pure read; notes are left unknown for the decoder to infer.
    pub fn extract<M: Machine + ?Sized>(machine: &M) -> Self {
        let mut registers = [0u8; RAW_IMAGE_LEN];
        for (offset, slot) in registers[..SID_DATA_REGISTERS].iter_mut().enumerate() {
            if let Some(register) = SidRegister::from_offset(offset as u8) {
                *slot = machine.load_byte(register.address());
            }
        }

        let timer_lo = machine.load_byte(CIA1_TIMER_A_LO);
        let timer_hi = machine.load_byte(CIA1_TIMER_A_HI);
        let [dt_hi, dt_lo] = if timer_lo == 0 && timer_hi == 0 {
            VBI_DELTA_TIME_US.to_be_bytes()
        } else {
            [timer_hi, timer_lo]
        };
        registers[SID_DATA_REGISTERS] = dt_hi;
        registers[SID_DATA_REGISTERS + 1] = dt_lo;

        let reg = |r: SidRegister| registers[r.offset() as usize];
        let mut channels = [Channel::default(); VOICE_COUNT];
        for (voice, channel) in channels.iter_mut().enumerate() {
            let at = |base: SidRegister| {
                SidRegister::for_voice(base, voice).map_or(0, |r| u16::from(reg(r)))
            };
            *channel = Channel {
                frequency: at(SidRegister::V1FreqLo) | (at(SidRegister::V1FreqHi) << 8),
                pulse_width: (at(SidRegister::V1PulseLo) | (at(SidRegister::V1PulseHi) << 8))
                    & 0x0FFF,
                adsr: at(SidRegister::V1SustainRelease) | (at(SidRegister::V1AttackDecay) << 8),
                waveform: at(SidRegister::V1Control) as u8,
                note: None,
            };
        }

        let filter = Filter {
            mode_volume: reg(SidRegister::ModeVolume),
            control: reg(SidRegister::ResonanceRouting),
            cutoff: (u16::from(reg(SidRegister::CutoffHi)) << 8)
                | (u16::from(reg(SidRegister::CutoffLo) & 0x07) << 5),
        };

        Self {
            channels,
            filter,
            registers,
        }
    }

    /// Delta time in microseconds stored in the raw image.
    pub fn delta_time(&self) -> u16 {
        u16::from_be_bytes([
            self.registers[SID_DATA_REGISTERS],
            self.registers[SID_DATA_REGISTERS + 1],
        ])
    }
}
