//! Register map and constants for VEML6075.
//! Register layout from the datasheet; compensation coefficients and responsivities
//! from Vishay's "Designing the VEML6075 into an Application" note (100 ms integration).

/// Fixed 7-bit I2C address of the VEML6075.
pub const DEFAULT_I2C_ADDRESS: u8 = 0x10;

/// Expected low byte of the ID register. The high byte carries the slave option code.
pub const DEVICE_ID: u8 = 0x26;

/// Command codes. Every register is 16 bits wide, transferred LSB first.
pub mod addr {
    /// Configuration: integration time, dynamic range, trigger and shutdown.
    pub const UV_CONF: u8 = 0x00;
    /// UVA channel counts.
    pub const UVA_DATA: u8 = 0x07;
    /// Dark current (UVD) counts, subtracted from every other channel.
    pub const UVDUMMY: u8 = 0x08;
    /// UVB channel counts.
    pub const UVB_DATA: u8 = 0x09;
    /// Visible compensation channel.
    pub const UVCOMP1: u8 = 0x0A;
    /// Infrared compensation channel.
    pub const UVCOMP2: u8 = 0x0B;
    /// Device ID.
    pub const ID: u8 = 0x0C;
}

bitflags::bitflags! {
    /// UV_CONF register bits (0x00, low byte; high byte reserved).
    pub struct ConfBits: u8 {
        /// Bits 6-4: UV integration time (000 = 50 ms, 001 = 100 ms ... 100 = 800 ms).
        const IT2     = 1 << 6;
        const IT1     = 1 << 5;
        const IT0     = 1 << 4;
        /// Bit 3: High dynamic setting.
        const HD      = 1 << 3;
        /// Bit 2: Trigger one measurement (active force mode only).
        const UV_TRIG = 1 << 2;
        /// Bit 1: Active force mode.
        const UV_AF   = 1 << 1;
        /// Bit 0: Shut down.
        const SD      = 1 << 0;
    }
}

/// Operating configuration written on creation: 100 ms, normal dynamic, continuous, powered on.
pub const CONF_DEFAULT: u8 = ConfBits::IT0.bits();

/// Visible/IR compensation coefficients for UVA (a, b) and UVB (c, d).
pub const UVA_VIS_COEFF: f32 = 2.22;
pub const UVA_IR_COEFF: f32 = 1.33;
pub const UVB_VIS_COEFF: f32 = 2.95;
pub const UVB_IR_COEFF: f32 = 1.74;

/// UV-index responsivity per compensated count (100 ms, normal dynamic).
pub const UVA_RESPONSIVITY: f32 = 0.001461;
pub const UVB_RESPONSIVITY: f32 = 0.002591;

/// Subtract the dark offset and the weighted visible/IR crosstalk from one UV channel.
pub fn compensate(raw: u16, dark: u16, vis: u16, ir: u16, vis_coeff: f32, ir_coeff: f32) -> f32 {
    let dark = dark as f32;
    let band = raw as f32 - dark;
    let vis = vis as f32 - dark;
    let ir = ir as f32 - dark;
    band - vis_coeff * vis - ir_coeff * ir
}

/// Average of the per-band UV-index contributions.
pub fn uv_index_from_compensated(uva: f32, uvb: f32) -> f32 {
    (uva * UVA_RESPONSIVITY + uvb * UVB_RESPONSIVITY) / 2.0
}
