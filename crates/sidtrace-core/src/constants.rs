//! C64 Hardware Constants
//!
//! Memory map addresses and PAL timing values shared by the extractor,
//! the driver and the profiling arithmetic.

/// Base address of the SID register block.
pub const SID_BASE: u16 = 0xD400;

/// Number of writable SID data registers (`$D400-$D418`).
pub const SID_DATA_REGISTERS: usize = 25;

/// Size of the raw register image: 25 data registers plus delta time hi/lo.
pub const RAW_IMAGE_LEN: usize = SID_DATA_REGISTERS + 2;

/// Number of voices on one SID.
pub const VOICE_COUNT: usize = 3;

/// Register stride between consecutive voices.
pub const VOICE_STRIDE: u16 = 7;

/// CIA 1 timer A low byte.
pub const CIA1_TIMER_A_LO: u16 = 0xDC04;

/// CIA 1 timer A high byte.
pub const CIA1_TIMER_A_HI: u16 = 0xDC05;

/// VIC-II control register 1 (bit 7 is raster bit 8).
pub const VIC_CONTROL_1: u16 = 0xD011;

/// VIC-II raster line register.
pub const VIC_RASTER: u16 = 0xD012;

/// 6510 on-chip I/O port (memory configuration).
pub const CPU_PORT: u16 = 0x0001;

/// Value stored in the CPU port before init (BASIC, Kernal and I/O visible).
pub const DEFAULT_MEMORY_CONFIG: u8 = 0x37;

/// CPU port configuration with Kernal banked out and I/O visible.
pub const KERNAL_OFF_CONFIG: u8 = 0x05;

/// Hardware IRQ vector.
pub const HARDWARE_IRQ_VECTOR: u16 = 0xFFFE;

/// Kernal RAM IRQ vector.
pub const KERNAL_IRQ_VECTOR: u16 = 0x0314;

/// Kernal IRQ handler exit points; reaching one ends a play call.
pub const KERNAL_IRQ_EXITS: [u16; 2] = [0xEA31, 0xEA81];

/// PAL frame rate.
pub const FRAME_RATE_PAL: u32 = 50;

/// Frames per minute at the PAL frame rate.
pub const FRAMES_PER_MINUTE: u32 = FRAME_RATE_PAL * 60;

/// Delta time reported when no CIA timer drives the player (20000 us).
pub const VBI_DELTA_TIME_US: u16 = 0x4E20;

/// CPU cycles per PAL raster line.
pub const CYCLES_PER_RASTERLINE: u64 = 63;

/// CPU cycles covered by one badline period (8 raster lines).
pub const CYCLES_PER_BADLINE: u64 = 504;

/// CPU cycles stolen by the VIC-II on each badline.
pub const BADLINE_STOLEN_CYCLES: u64 = 40;

/// Raster line at which the emulated counter wraps while bit 8 is set.
pub const RASTER_WRAP_LINE: u8 = 0x38;

/// Instruction ceiling for a single init or play call.
pub const MAX_INSTRUCTIONS_PER_CALL: u32 = 0xFFFF;

/// Opcodes that lock up an NMOS 6502.
pub const JAM_OPCODES: [u8; 12] = [
    0x02, 0x12, 0x22, 0x32, 0x42, 0x52, 0x62, 0x72, 0x92, 0xB2, 0xD2, 0xF2,
];
