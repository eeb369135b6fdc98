//! Default values for discourse configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Config Locations
// ============================================================================

/// Project-local config file name.
pub const DEFAULT_CONFIG_FILE: &str = "discourse.toml";

/// Directory name under the user config dir.
pub const DEFAULT_CONFIG_DIR_NAME: &str = "discourse";

/// Config file name inside the user config dir.
pub const DEFAULT_USER_CONFIG_FILE: &str = "config.toml";

/// Schema file written by `init`.
pub const DEFAULT_SCHEMA_FILE: &str = "schema.toml";

// ============================================================================
// Query Defaults
// ============================================================================

/// Compiled queries kept in the compile cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

// ============================================================================
// Executor Defaults
// ============================================================================

/// Roam backend API base URL.
pub const DEFAULT_API_URL: &str = "https://api.roamresearch.com";

/// Request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Storage Defaults
// ============================================================================

/// Default data directory.
pub const DEFAULT_DATA_DIR: &str = ".discourse";

/// Saved queries subdirectory.
pub const DEFAULT_QUERIES_DIR: &str = "queries";

/// Scratch query file name.
pub const DEFAULT_SCRATCH_FILE: &str = "scratch.json";

/// Label prefix for saved queries (`Query 1`, `Query 2`, ...).
pub const DEFAULT_QUERY_LABEL_PREFIX: &str = "Query";

// ============================================================================
// Logging Defaults
// ============================================================================

/// Default log filter.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Environment variable holding a log filter.
pub const LOG_ENV_VAR: &str = "DISCOURSE_LOG";
