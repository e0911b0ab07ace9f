//! SID Register Definitions
//!
//! The 25 writable registers (`$D400-$D418`) of the MOS 6581. Each voice
//! occupies seven consecutive registers; the filter and master volume follow.

use bitflags::bitflags;

use crate::constants::{SID_BASE, VOICE_STRIDE};

/// SID register offset relative to `$D400`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SidRegister {
    /// Voice 1 frequency (low byte) - $00
    V1FreqLo = 0x00,
    /// Voice 1 frequency (high byte) - $01
    V1FreqHi = 0x01,
    /// Voice 1 pulse width (low byte) - $02
    V1PulseLo = 0x02,
    /// Voice 1 pulse width (high nybble) - $03
    V1PulseHi = 0x03,
    /// Voice 1 control (waveform + gate) - $04
    V1Control = 0x04,
    /// Voice 1 attack/decay - $05
    V1AttackDecay = 0x05,
    /// Voice 1 sustain/release - $06
    V1SustainRelease = 0x06,
    /// Voice 2 frequency (low byte) - $07
    V2FreqLo = 0x07,
    /// Voice 2 frequency (high byte) - $08
    V2FreqHi = 0x08,
    /// Voice 2 pulse width (low byte) - $09
    V2PulseLo = 0x09,
    /// Voice 2 pulse width (high nybble) - $0A
    V2PulseHi = 0x0A,
    /// Voice 2 control - $0B
    V2Control = 0x0B,
    /// Voice 2 attack/decay - $0C
    V2AttackDecay = 0x0C,
    /// Voice 2 sustain/release - $0D
    V2SustainRelease = 0x0D,
    /// Voice 3 frequency (low byte) - $0E
    V3FreqLo = 0x0E,
    /// Voice 3 frequency (high byte) - $0F
    V3FreqHi = 0x0F,
    /// Voice 3 pulse width (low byte) - $10
    V3PulseLo = 0x10,
    /// Voice 3 pulse width (high nybble) - $11
    V3PulseHi = 0x11,
    /// Voice 3 control - $12
    V3Control = 0x12,
    /// Voice 3 attack/decay - $13
    V3AttackDecay = 0x13,
    /// Voice 3 sustain/release - $14
    V3SustainRelease = 0x14,
    /// Filter cutoff (low 3 bits) - $15
    CutoffLo = 0x15,
    /// Filter cutoff (high byte) - $16
    CutoffHi = 0x16,
    /// Filter resonance and voice routing - $17
    ResonanceRouting = 0x17,
    /// Filter mode and master volume - $18
    ModeVolume = 0x18,
}

impl SidRegister {
    /// Convert a register offset (0-24) to a register
    pub fn from_offset(offset: u8) -> Option<Self> {
        use SidRegister::*;
        const ALL: [SidRegister; 25] = [
            V1FreqLo,
            V1FreqHi,
            V1PulseLo,
            V1PulseHi,
            V1Control,
            V1AttackDecay,
            V1SustainRelease,
            V2FreqLo,
            V2FreqHi,
            V2PulseLo,
            V2PulseHi,
            V2Control,
            V2AttackDecay,
            V2SustainRelease,
            V3FreqLo,
            V3FreqHi,
            V3PulseLo,
            V3PulseHi,
            V3Control,
            V3AttackDecay,
            V3SustainRelease,
            CutoffLo,
            CutoffHi,
            ResonanceRouting,
            ModeVolume,
        ];
        ALL.get(offset as usize).copied()
    }

    /// Voice-relative register for `voice` (0-2); `base` must be a voice 1 register
    pub fn for_voice(base: SidRegister, voice: usize) -> Option<Self> {
        if base.offset() > SidRegister::V1SustainRelease.offset() {
            return None;
        }
        Self::from_offset(base.offset() + (voice as u8) * VOICE_STRIDE as u8)
    }

    /// Offset from `$D400`
    pub fn offset(&self) -> u8 {
        *self as u8
    }

    /// Absolute C64 address
    pub fn address(&self) -> u16 {
        SID_BASE + u16::from(self.offset())
    }
}

bitflags! {
    /// Voice control register bitflags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Waveform: u8 {
        /// Envelope gate (attack/decay/sustain while set, release when cleared)
        const GATE = 0x01;
        /// Hard sync with the previous voice
        const SYNC = 0x02;
        /// Ring modulation with the previous voice
        const RING = 0x04;
        /// Oscillator test bit
        const TEST = 0x08;
        /// Triangle waveform
        const TRIANGLE = 0x10;
        /// Sawtooth waveform
        const SAWTOOTH = 0x20;
        /// Pulse waveform
        const PULSE = 0x40;
        /// Noise waveform
        const NOISE = 0x80;
    }
}

impl Waveform {
    /// Mask covering the four waveform selector bits
    pub const SELECTORS: Waveform = Waveform::TRIANGLE
        .union(Waveform::SAWTOOTH)
        .union(Waveform::PULSE)
        .union(Waveform::NOISE);

    /// Create flags from a raw control register value
    pub fn from_register(value: u8) -> Self {
        Waveform::from_bits_truncate(value)
    }

    /// Whether the gate bit is set
    pub fn is_gated(&self) -> bool {
        self.contains(Waveform::GATE)
    }

    /// Whether at least one waveform is selected, i.e. the voice produces sound
    pub fn has_waveform(&self) -> bool {
        self.intersects(Waveform::SELECTORS)
    }
}

bitflags! {
    /// Filter mode bits of `$D418` (the low nybble is master volume)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FilterMode: u8 {
        /// Low-pass output
        const LOW_PASS = 0x10;
        /// Band-pass output
        const BAND_PASS = 0x20;
        /// High-pass output
        const HIGH_PASS = 0x40;
        /// Disconnect voice 3 from the output
        const VOICE3_OFF = 0x80;
    }
}

impl FilterMode {
    /// Mask covering the three passband bits
    pub const PASSBANDS: FilterMode = FilterMode::LOW_PASS
        .union(FilterMode::BAND_PASS)
        .union(FilterMode::HIGH_PASS);

    /// Create flags from a raw `$D418` value
    pub fn from_register(value: u8) -> Self {
        FilterMode::from_bits_truncate(value)
    }

    /// Passband selector (0-7): bit 0 low, bit 1 band, bit 2 high
    pub fn passband_index(&self) -> u8 {
        self.intersection(FilterMode::PASSBANDS).bits() >> 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_registers_follow_stride() {
        assert_eq!(
            SidRegister::for_voice(SidRegister::V1Control, 1),
            Some(SidRegister::V2Control)
        );
        assert_eq!(
            SidRegister::for_voice(SidRegister::V1AttackDecay, 2),
            Some(SidRegister::V3AttackDecay)
        );
        assert_eq!(SidRegister::for_voice(SidRegister::CutoffLo, 1), None);
        assert_eq!(SidRegister::ModeVolume.address(), 0xD418);
        assert_eq!(SidRegister::from_offset(25), None);
    }

    #[test]
    fn waveform_gate_and_selector() {
        let wave = Waveform::from_register(0x41);
        assert!(wave.is_gated());
        assert!(wave.has_waveform());

        let test_only = Waveform::from_register(0x09);
        assert!(test_only.is_gated());
        assert!(!test_only.has_waveform());
    }

    #[test]
    fn passband_index_ignores_volume() {
        assert_eq!(FilterMode::from_register(0x1F).passband_index(), 1);
        assert_eq!(FilterMode::from_register(0x7F).passband_index(), 7);
        assert_eq!(FilterMode::from_register(0x8F).passband_index(), 0);
    }
}
