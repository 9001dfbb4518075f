//! Process exit codes.

pub const SUCCESS: i32 = 0;
/// Signing or I/O failed while running.
pub const RUNTIME_ERROR: i32 = 1;
/// Bad flags, config or key material.
pub const CONFIG_ERROR: i32 = 2;
