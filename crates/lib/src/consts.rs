/// Application name, used for config directory resolution.
pub const APP_NAME: &str = "packsmith";

/// File name of the manifest every module directory must contain.
pub const MODULE_MANIFEST_FILENAME: &str = "module_manifest.json";

/// File name of the user configuration inside the config directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Conventional priority file name inside a module directory.
pub const PRIORITY_FILENAME: &str = "priority.txt";

/// The only `pack_format` accepted for java legacy builds.
pub const JAVA_LEGACY_FORMAT_VERSION: u32 = 3;

/// Default `pack_format` for java normal builds when none is configured.
pub const JAVA_LATEST_FORMAT_VERSION: u32 = 15;

/// Number of hex characters kept when a hash is embedded in a filename.
pub const SHORT_HASH_LEN: usize = 7;

/// Path segment dropped from nested-key patch paths.
pub const PROTO_SENTINEL: &str = "__proto__";
