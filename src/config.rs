//! Configuration for the reading store and analyzers
//!
//! One explicit value object, owned by the store and read live on every
//! operation. There is no global mutable state; the host application mutates
//! the store's copy through
//! [`ReadingStore::config_mut`](crate::store::ReadingStore::config_mut) and
//! the next operation sees the change.
//!
//! The two `apply_*` flags decide which corrected pressure the analyzers
//! consume (the "default choice"); `apply_smoothing` additionally turns on
//! outlier smoothing at ingest. `retain_all_for_testing` suppresses
//! retention pruning so tests can backfill arbitrarily old readings.

/// Default mean sea-level temperature in Celsius.
pub const DEFAULT_MEAN_SEA_LEVEL_TEMPERATURE_C: f32 = 15.0;

/// Default retention window: 48 hours of readings.
pub const DEFAULT_RETENTION_MINUTES: u32 = 48 * 60;

/// Default standard-deviation multiple above which a reading counts as an
/// outlier during smoothing.
pub const DEFAULT_SMOOTHING_SIGMA: f32 = 1.5;

/// Default exponential-moving-average blend factor for smoothing.
pub const DEFAULT_SMOOTHING_ALPHA: f32 = 0.1;

/// Process-wide settings consumed (not owned) by the core.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Mean sea-level temperature in Celsius, used when a reading arrives
    /// without its own temperature.
    pub mean_sea_level_temperature: f32,

    /// Whole minutes to keep readings for before pruning.
    pub retention_minutes: u32,

    /// Prefer sea-level-adjusted pressure even for readings taken at
    /// altitude 0 (where the adjustment is the identity).
    pub prefer_sea_level: bool,

    /// Use diurnal-rhythm-corrected pressure as the default choice.
    pub apply_diurnal: bool,

    /// Smooth outliers at ingest and feed smoothed values to the analyzers.
    pub apply_smoothing: bool,

    /// Standard-deviation multiple that flags a reading as an outlier.
    pub smoothing_sigma: f32,

    /// EMA blend factor used when an outlier follows the local trend.
    pub smoothing_alpha: f32,

    /// Test-only: keep readings past the retention window and accept
    /// arbitrarily old inserts.
    pub retain_all_for_testing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mean_sea_level_temperature: DEFAULT_MEAN_SEA_LEVEL_TEMPERATURE_C,
            retention_minutes: DEFAULT_RETENTION_MINUTES,
            prefer_sea_level: false,
            apply_diurnal: false,
            apply_smoothing: false,
            smoothing_sigma: DEFAULT_SMOOTHING_SIGMA,
            smoothing_alpha: DEFAULT_SMOOTHING_ALPHA,
            retain_all_for_testing: false,
        }
    }
}

impl Config {
    /// Set the mean sea-level temperature in Celsius.
    pub fn with_mean_sea_level_temperature(mut self, celsius: f32) -> Self {
        self.mean_sea_level_temperature = celsius;
        self
    }

    /// Set the retention window in whole minutes. Zero is ignored.
    pub fn with_retention_minutes(mut self, minutes: u32) -> Self {
        if minutes > 0 {
            self.retention_minutes = minutes;
        }
        self
    }

    /// Prefer sea-level-adjusted pressure as the default choice.
    pub fn with_sea_level_adjustment(mut self, apply: bool) -> Self {
        self.prefer_sea_level = apply;
        self
    }

    /// Prefer diurnal-rhythm-corrected pressure as the default choice.
    pub fn with_diurnal_rhythm(mut self, apply: bool) -> Self {
        self.apply_diurnal = apply;
        self
    }

    /// Enable outlier smoothing at ingest.
    pub fn with_smoothing(mut self, apply: bool) -> Self {
        self.apply_smoothing = apply;
        self
    }

    /// Suppress retention pruning (test support).
    pub fn with_retain_all_for_testing(mut self, retain: bool) -> Self {
        self.retain_all_for_testing = retain;
        self
    }
}
