//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of
//! the shell contract — scripts rely on them.
//!
//! | Range   | Domain   | Description                                   |
//! |---------|----------|-----------------------------------------------|
//! | 0       | Universal| Success (audit clean)                         |
//! | 1       | Universal| Audit found discrepancies or lookup errors    |
//! | 2       | Universal| CLI usage error (bad args, missing file)      |
//! | 3       | Universal| IO error                                      |
//! | 10-19   | store    | Document-store client codes                   |
//! | 20-29   | config   | Audit config codes                            |

/// Success - audit completed and every check matched.
pub const EXIT_SUCCESS: u8 = 0;

/// Audit completed but recorded discrepancies or per-identifier errors.
/// Like `diff(1)`, exit 1 means "the stores differ."
pub const EXIT_DISCREPANCIES: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// IO error - cannot read the trail or write the output file.
pub const EXIT_IO: u8 = 3;

/// Auth material missing (env var for a store's auth spec not set).
pub const EXIT_STORE_NOT_AUTH: u8 = 10;

/// A store did not answer the startup reachability probe.
pub const EXIT_STORE_UNREACHABLE: u8 = 11;

/// Config file failed to parse or validate.
pub const EXIT_CONFIG_INVALID: u8 = 20;
