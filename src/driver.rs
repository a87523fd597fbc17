//! Driver for VEML6075.
//! Blocking I2C by default; the async version mirrors this API behind the `async` feature
//! with `_async` suffixed methods.

use crate::clock::Clock;
use crate::data_types::{RawCounts, Stats, UvIndexLevel};
use crate::error::Error;
use crate::registers::{CONF_DEFAULT, DEFAULT_I2C_ADDRESS, DEVICE_ID, addr};

/// Seconds during which a completed poll is served from the cache.
pub const READ_DELAY_SECS: f64 = 2.0;

/// VEML6075 handle: bus, clock, and the counts of the last successful poll.
///
/// The driver does no locking. Share a bus between threads by serializing access
/// externally. To keep ownership of the bus, pass `&mut bus`; `embedded-hal`
/// implements `I2c` for mutable references.
pub struct Veml6075<I2C, CLK> {
    i2c: I2C,
    clock: CLK,
    address: u8,
    raw: RawCounts,
    last_read: Option<f64>,
    stats: Stats,
}

impl<I2C, CLK> Veml6075<I2C, CLK> {
    fn from_parts(i2c: I2C, clock: CLK, address: u8) -> Self {
        Self {
            i2c,
            clock,
            address,
            raw: RawCounts::default(),
            last_read: None,
            stats: Stats::default(),
        }
    }

    /// Return the 7-bit I2C address configured for this instance.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Snapshot of the running statistics. Always available, even if every poll failed.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Statistics of the sensor held in `slot`, `None` if the slot is empty.
    pub fn stats_of(slot: &Option<Self>) -> Option<Stats> {
        slot.as_ref().map(Self::stats)
    }

    /// Clock value at the last successful bus poll.
    pub fn last_read_time(&self) -> Option<f64> {
        self.last_read
    }

    /// Give back the bus and clock.
    pub fn release(self) -> (I2C, CLK) {
        (self.i2c, self.clock)
    }

    /// Drop the sensor held in `slot`, leaving `None` behind.
    ///
    /// Returns the bus and clock so they can be reused. An empty slot is left untouched.
    pub fn destroy(slot: &mut Option<Self>) -> Option<(I2C, CLK)> {
        slot.take().map(Self::release)
    }
}

impl<I2C, CLK> Veml6075<I2C, CLK>
where
    CLK: Clock,
{
    /// Whether the next accessor call will poll the bus. Does not touch the bus or the statistics.
    pub fn is_stale(&self) -> bool {
        match self.last_read {
            Some(last) => self.clock.now() - last >= READ_DELAY_SECS,
            None => true,
        }
    }

    /// Count a refresh request; returns the poll start time if the cache is stale.
    fn begin_refresh(&mut self) -> Option<f64> {
        self.stats.read = self.stats.read.wrapping_add(1);
        let now = self.clock.now();
        if let Some(last) = self.last_read {
            if now - last < READ_DELAY_SECS {
                self.stats.read_success_cached = self.stats.read_success_cached.wrapping_add(1);
                trace!("veml6075: cached read");
                return None;
            }
        }
        Some(now)
    }

    /// Commit a finished poll. On failure the previous counts and timestamp stay in place.
    fn finish_refresh<E>(&mut self, start: f64, polled: Result<RawCounts, Error<E>>) -> Result<(), Error<E>> {
        match polled {
            Ok(raw) => {
                let end = self.clock.now();
                self.raw = raw;
                self.last_read = Some(start);
                self.stats.last_read_time = start;
                self.stats.read_success = self.stats.read_success.wrapping_add(1);
                self.stats.read_success_usecs += (end - start) * 1_000_000.0;
                trace!("veml6075: polled uva={} uvb={} dark={}", raw.uva, raw.uvb, raw.dark);
                Ok(())
            }
            Err(e) => {
                warn!("veml6075: poll failed at 0x{=u8:x}, serving cached counts", self.address);
                Err(e)
            }
        }
    }
}

impl<I2C, CLK> Veml6075<I2C, CLK>
where
    I2C: embedded_hal::i2c::I2c,
    CLK: Clock,
{
    /// Probe the device id at `address`, apply the fixed operating configuration and return a handle.
    ///
    /// Fails with [`Error::DeviceIdMismatch`] if something else answers at that address.
    pub fn new(i2c: I2C, clock: CLK, address: u8) -> Result<Self, Error<I2C::Error>> {
        let mut dev = Self::from_parts(i2c, clock, address);
        let id = match dev.read_word(addr::ID) {
            Ok(word) => (word & 0x00FF) as u8,
            Err(e) => {
                error!("veml6075: no answer at 0x{=u8:x}", address);
                return Err(e);
            }
        };
        if id != DEVICE_ID {
            error!("veml6075: device id 0x{=u8:x} at 0x{=u8:x}", id, address);
            return Err(Error::DeviceIdMismatch(id));
        }
        dev.write_word(addr::UV_CONF, CONF_DEFAULT as u16)?;
        info!("veml6075: created at 0x{=u8:x}", address);
        Ok(dev)
    }

    /// [`new`](Self::new) at the default address (0x10).
    pub fn new_default(i2c: I2C, clock: CLK) -> Result<Self, Error<I2C::Error>> {
        Self::new(i2c, clock, DEFAULT_I2C_ADDRESS)
    }

    /// Read a 16-bit register (LSB first).
    pub fn read_word(&mut self, reg: u8) -> Result<u16, Error<I2C::Error>> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(Error::I2c)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Write a 16-bit register (LSB first).
    pub fn write_word(&mut self, reg: u8, value: u16) -> Result<(), Error<I2C::Error>> {
        let [lo, hi] = value.to_le_bytes();
        self.i2c
            .write(self.address, &[reg, lo, hi])
            .map_err(Error::I2c)
    }

    fn poll(&mut self) -> Result<RawCounts, Error<I2C::Error>> {
        Ok(RawCounts {
            uva: self.read_word(addr::UVA_DATA)?,
            uvb: self.read_word(addr::UVB_DATA)?,
            vis_comp: self.read_word(addr::UVCOMP1)?,
            ir_comp: self.read_word(addr::UVCOMP2)?,
            dark: self.read_word(addr::UVDUMMY)?,
        })
    }

    /// Poll all channels unless the last successful poll is younger than [`READ_DELAY_SECS`].
    ///
    /// A failed poll keeps the previous counts and does not advance the cache timestamp, so the
    /// next call polls again.
    pub fn refresh(&mut self) -> Result<(), Error<I2C::Error>> {
        let Some(start) = self.begin_refresh() else {
            return Ok(());
        };
        let polled = self.poll();
        self.finish_refresh(start, polled)
    }

    /// Refresh (ignoring failures) and return the best available counts.
    pub fn raw_counts(&mut self) -> RawCounts {
        let _ = self.refresh();
        self.raw
    }

    /// Compensated UVA intensity (0.0 = no light).
    pub fn uva(&mut self) -> f32 {
        self.raw_counts().uva()
    }

    /// Compensated UVB intensity (0.0 = no light).
    pub fn uvb(&mut self) -> f32 {
        self.raw_counts().uvb()
    }

    /// UV index from both bands of a single refresh.
    /// <2.0 low, <5.5 moderate, <7.5 high, <10.5 very high, above that extreme.
    pub fn uv_index(&mut self) -> f32 {
        self.raw_counts().uv_index()
    }

    /// Advisory band of [`uv_index`](Self::uv_index).
    pub fn uv_index_level(&mut self) -> UvIndexLevel {
        UvIndexLevel::from_index(self.uv_index())
    }

    /// Raw UVA counts.
    pub fn raw_uva(&mut self) -> u16 {
        self.raw_counts().uva
    }

    /// Raw UVB counts.
    pub fn raw_uvb(&mut self) -> u16 {
        self.raw_counts().uvb
    }

    /// Raw dark (UVD) counts.
    pub fn raw_dark(&mut self) -> u16 {
        self.raw_counts().dark
    }

    /// Raw visible compensation counts.
    pub fn raw_vis_comp(&mut self) -> u16 {
        self.raw_counts().vis_comp
    }

    /// Raw IR compensation counts.
    pub fn raw_ir_comp(&mut self) -> u16 {
        self.raw_counts().ir_comp
    }
}

#[cfg(feature = "async")]
impl<I2C, CLK> Veml6075<I2C, CLK>
where
    I2C: embedded_hal_async::i2c::I2c,
    CLK: Clock,
{
    /// Async version of [`new`](Self::new).
    pub async fn new_async(i2c: I2C, clock: CLK, address: u8) -> Result<Self, Error<I2C::Error>> {
        let mut dev = Self::from_parts(i2c, clock, address);
        let id = match dev.read_word_async(addr::ID).await {
            Ok(word) => (word & 0x00FF) as u8,
            Err(e) => {
                error!("veml6075: no answer at 0x{=u8:x}", address);
                return Err(e);
            }
        };
        if id != DEVICE_ID {
            error!("veml6075: device id 0x{=u8:x} at 0x{=u8:x}", id, address);
            return Err(Error::DeviceIdMismatch(id));
        }
        dev.write_word_async(addr::UV_CONF, CONF_DEFAULT as u16).await?;
        info!("veml6075: created at 0x{=u8:x}", address);
        Ok(dev)
    }

    /// Async version of [`read_word`](Self::read_word).
    pub async fn read_word_async(&mut self, reg: u8) -> Result<u16, Error<I2C::Error>> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .await
            .map_err(Error::I2c)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Async version of [`write_word`](Self::write_word).
    pub async fn write_word_async(&mut self, reg: u8, value: u16) -> Result<(), Error<I2C::Error>> {
        let [lo, hi] = value.to_le_bytes();
        self.i2c
            .write(self.address, &[reg, lo, hi])
            .await
            .map_err(Error::I2c)
    }

    async fn poll_async(&mut self) -> Result<RawCounts, Error<I2C::Error>> {
        Ok(RawCounts {
            uva: self.read_word_async(addr::UVA_DATA).await?,
            uvb: self.read_word_async(addr::UVB_DATA).await?,
            vis_comp: self.read_word_async(addr::UVCOMP1).await?,
            ir_comp: self.read_word_async(addr::UVCOMP2).await?,
            dark: self.read_word_async(addr::UVDUMMY).await?,
        })
    }

    /// Async version of [`refresh`](Self::refresh).
    pub async fn refresh_async(&mut self) -> Result<(), Error<I2C::Error>> {
        let Some(start) = self.begin_refresh() else {
            return Ok(());
        };
        let polled = self.poll_async().await;
        self.finish_refresh(start, polled)
    }

    /// Async version of [`raw_counts`](Self::raw_counts).
    pub async fn raw_counts_async(&mut self) -> RawCounts {
        let _ = self.refresh_async().await;
        self.raw
    }

    /// Async version of [`uva`](Self::uva).
    pub async fn uva_async(&mut self) -> f32 {
        self.raw_counts_async().await.uva()
    }

    /// Async version of [`uvb`](Self::uvb).
    pub async fn uvb_async(&mut self) -> f32 {
        self.raw_counts_async().await.uvb()
    }

    /// Async version of [`uv_index`](Self::uv_index).
    pub async fn uv_index_async(&mut self) -> f32 {
        self.raw_counts_async().await.uv_index()
    }

    /// Async version of [`uv_index_level`](Self::uv_index_level).
    pub async fn uv_index_level_async(&mut self) -> UvIndexLevel {
        UvIndexLevel::from_index(self.uv_index_async().await)
    }

    /// Async version of [`raw_uva`](Self::raw_uva).
    pub async fn raw_uva_async(&mut self) -> u16 {
        self.raw_counts_async().await.uva
    }

    /// Async version of [`raw_uvb`](Self::raw_uvb).
    pub async fn raw_uvb_async(&mut self) -> u16 {
        self.raw_counts_async().await.uvb
    }

    /// Async version of [`raw_dark`](Self::raw_dark).
    pub async fn raw_dark_async(&mut self) -> u16 {
        self.raw_counts_async().await.dark
    }

    /// Async version of [`raw_vis_comp`](Self::raw_vis_comp).
    pub async fn raw_vis_comp_async(&mut self) -> u16 {
        self.raw_counts_async().await.vis_comp
    }

    /// Async version of [`raw_ir_comp`](Self::raw_ir_comp).
    pub async fn raw_ir_comp_async(&mut self) -> u16 {
        self.raw_counts_async().await.ir_comp
    }
}
