//! Raster Counter Emulation
//!
//! Init routines often busy-wait on `$D011/$D012`. There is no VIC-II in the
//! machine, so the driver advances a fake raster counter after every init
//! instruction: `$D012` counts up, and once it wraps (or passes line `$138`
//! while bit 8 is set) bit 8 in `$D011` flips.

use crate::constants::{RASTER_WRAP_LINE, VIC_CONTROL_1, VIC_RASTER};
use crate::machine::Machine;

/// Raster bit 8 in `$D011`
const RASTER_BIT8: u8 = 0x80;

/// Advance the raster counter by one step
///
/// Returns `true` when the counter wrapped to line 0 of a new half.
pub fn tick<M: Machine + ?Sized>(machine: &mut M) -> bool {
    let line = machine.load_byte(VIC_RASTER).wrapping_add(1);
    machine.store_byte(VIC_RASTER, line);

    let control = machine.load_byte(VIC_CONTROL_1);
    if line == 0 || (control & RASTER_BIT8 != 0 && line >= RASTER_WRAP_LINE) {
        machine.store_byte(VIC_CONTROL_1, control ^ RASTER_BIT8);
        machine.store_byte(VIC_RASTER, 0);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::testing::ScriptedMachine;

    #[test]
    fn test_counter_wraps_into_upper_half() {
        let mut machine = ScriptedMachine::new();
        machine.store_byte(VIC_RASTER, 0xFF);
        assert!(tick(&mut machine));
        assert_eq!(machine.load_byte(VIC_RASTER), 0);
        assert_eq!(machine.load_byte(VIC_CONTROL_1) & RASTER_BIT8, RASTER_BIT8);
    }

    #[test]
    fn test_upper_half_ends_at_line_38() {
        let mut machine = ScriptedMachine::new();
        machine.store_byte(VIC_CONTROL_1, 0x9B);
        machine.store_byte(VIC_RASTER, 0x36);
        assert!(!tick(&mut machine));
        assert_eq!(machine.load_byte(VIC_RASTER), 0x37);
        assert!(tick(&mut machine));
        assert_eq!(machine.load_byte(VIC_RASTER), 0);
        assert_eq!(machine.load_byte(VIC_CONTROL_1), 0x1B);
    }

    #[test]
    fn test_full_frame_period() {
        let mut machine = ScriptedMachine::new();
        let mut wraps = 0;
        for _ in 0..(256 + 0x38) {
            if tick(&mut machine) {
                wraps += 1;
            }
        }
        assert_eq!(wraps, 2);
        assert_eq!(machine.load_byte(VIC_CONTROL_1) & RASTER_BIT8, 0);
    }
}
