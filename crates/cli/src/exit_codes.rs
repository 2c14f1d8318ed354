//! CLI Exit Code Registry
//!
//! Single source of truth for `fruitdex` exit codes. Scripts and the
//! scheduler that runs `fruitdex build` rely on them.
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success                                                  |
//! | 1    | General error (unspecified)                              |
//! | 2    | Usage error (bad arguments; clap exits with this itself)  |
//! | 3    | I/O error, including a required document missing         |
//! | 4    | Catalog config does not parse or fails validation        |
//! | 5    | A source document is not valid JSON or not the right shape |
//! | 6    | `build --strict` finished with mismatches or unresolved names |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Filesystem error, or a required storage document is absent.
pub const EXIT_IO: u8 = 3;

/// Catalog config parse or validation failure.
pub const EXIT_INVALID_CONFIG: u8 = 4;

/// Source document exists but cannot be used.
pub const EXIT_MALFORMED_SOURCE: u8 = 5;

/// Catalog was written, but the diagnostic report is not clean.
pub const EXIT_STRICT_DIAGNOSTICS: u8 = 6;
