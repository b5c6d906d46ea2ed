/// Principal (public key) size in bytes
pub const PRINCIPAL_SIZE: usize = 32;

/// Fixed rate-limit window in seconds (one day)
pub const RATE_WINDOW_SECS: i64 = 86_400;

/// Maximum rate-limited actions of any kind per window
pub const MAX_DAILY_ACTIONS: u32 = 100;

/// Maximum friend requests (sent or accepted) per window
pub const MAX_FRIEND_REQUESTS: u32 = 20;

/// Maximum profile/status updates per window
pub const MAX_STATUS_UPDATES: u32 = 24;

/// Minimum adaptive batch size
pub const MIN_BATCH_SIZE: u32 = 10;

/// Maximum adaptive batch size
pub const MAX_BATCH_SIZE: u32 = 100;

/// Batch size seeded at registration
pub const DEFAULT_BATCH_SIZE: u32 = 50;

/// A batch left idle longer than this is considered expired (seconds)
pub const BATCH_IDLE_SECS: i64 = 3_600;

/// A principal seen within this window counts as online (seconds)
pub const ONLINE_WINDOW_SECS: i64 = 300;
