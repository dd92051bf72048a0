//! Exit codes for the CLI

/// Success
pub const SUCCESS: u8 = 0;

/// Any fatal condition
pub const ERROR: u8 = 1;
