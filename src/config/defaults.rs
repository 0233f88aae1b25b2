//! Default configuration values.

/// Account used when none is configured.
pub const DEFAULT_USERNAME: &str = "MasterAdmin";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default total tries on connection reset.
pub const DEFAULT_MAX_RETRIES: u8 = 5;

/// Default result cache TTL in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = crate::cache::DEFAULT_TTL.as_secs();

/// Default result cache capacity.
pub const DEFAULT_CACHE_CAPACITY: u64 = crate::cache::DEFAULT_CAPACITY;

/// Default strftime pattern for date/time cells.
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";
