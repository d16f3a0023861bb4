//! Shared constants.

/// Application name, used for the default configuration file and env overrides.
pub const APP_NAME: &str = "stylepack";

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILENAME: &str = "stylepack.yaml";

/// Environment variable overriding the configured parallelism.
pub const PARALLELISM_ENV: &str = "STYLEPACK_PARALLELISM";

/// Token suffix marking a recursive tree directive (`path/**/*`).
pub const TREE_SUFFIX: &str = "/**/*";

/// Token suffix marking a single-level directory directive (`path/*`).
pub const DIRECTORY_SUFFIX: &str = "/*";

/// Extension given to bundles whose name carries none.
pub const DEFAULT_EXTENSION: &str = "css";

/// File name of the compile record written next to the compiled bundles.
pub const RECORD_FILENAME: &str = "manifest.json";

/// Version of the compile record format.
pub const RECORD_VERSION: u32 = 1;
