//! Data types for VEML6075 driver.

use crate::registers::{
    UVA_IR_COEFF, UVA_VIS_COEFF, UVB_IR_COEFF, UVB_VIS_COEFF, compensate, uv_index_from_compensated,
};

/// Raw channel counts from one complete poll of the sensor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RawCounts {
    pub uva: u16,
    pub uvb: u16,
    pub dark: u16,
    pub vis_comp: u16,
    pub ir_comp: u16,
}

impl RawCounts {
    /// Dark- and crosstalk-compensated UVA intensity (0.0 = no light).
    pub fn uva(&self) -> f32 {
        compensate(self.uva, self.dark, self.vis_comp, self.ir_comp, UVA_VIS_COEFF, UVA_IR_COEFF)
    }

    /// Dark- and crosstalk-compensated UVB intensity (0.0 = no light).
    pub fn uvb(&self) -> f32 {
        compensate(self.uvb, self.dark, self.vis_comp, self.ir_comp, UVB_VIS_COEFF, UVB_IR_COEFF)
    }

    /// UV index computed from both compensated bands. Not clamped.
    pub fn uv_index(&self) -> f32 {
        uv_index_from_compensated(self.uva(), self.uvb())
    }
}

/// Running statistics on bus interaction.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stats {
    /// Clock value at the last successful uncached poll, 0.0 if none yet.
    pub last_read_time: f64,
    /// Cache refresh requests.
    pub read: u32,
    /// Refreshes that polled the bus and succeeded.
    pub read_success: u32,
    /// Refreshes served from the cache.
    pub read_success_cached: u32,
    /// Microseconds spent in successful uncached polls.
    pub read_success_usecs: f64,
}

impl Stats {
    /// Refreshes that polled the bus and failed.
    pub fn read_errors(&self) -> u32 {
        self.read
            .saturating_sub(self.read_success)
            .saturating_sub(self.read_success_cached)
    }
}

/// Advisory UV-index bands.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum UvIndexLevel {
    /// Below 2.0.
    Low,
    /// Below 5.5.
    Moderate,
    /// Below 7.5.
    High,
    /// Below 10.5.
    VeryHigh,
    /// 10.5 and above.
    Extreme,
}

impl UvIndexLevel {
    /// Band for a UV index value. NaN falls into `Extreme`.
    pub fn from_index(index: f32) -> Self {
        if index < 2.0 {
            UvIndexLevel::Low
        } else if index < 5.5 {
            UvIndexLevel::Moderate
        } else if index < 7.5 {
            UvIndexLevel::High
        } else if index < 10.5 {
            UvIndexLevel::VeryHigh
        } else {
            UvIndexLevel::Extreme
        }
    }
}
