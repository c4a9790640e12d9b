//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                                        |
//! |------|----------------------------------------------------------------|
//! | 0    | Success, including "no differences found" (no output written)  |
//! | 1    | Unrecoverable error: unreadable input, missing columns, bad    |
//! |      | config, output write failure                                   |
//! | 2    | CLI usage error (bad args), reported by clap                   |
//!
//! Finding differences is not an error: the differences are the output.

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - any failure that aborts the run.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
/// Emitted by clap itself; listed here for completeness.
#[allow(dead_code)]
pub const EXIT_USAGE: u8 = 2;
