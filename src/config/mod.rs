//! Configuration module for dcr
//!
//! One stored profile, resolved in this order:
//! 1. CLI flags (`--config-dir`)
//! 2. Environment variables (DCR_*)
//! 3. `<config_dir>/dcr/profile.toml`

mod loader;
mod types;

pub use loader::{
    default_config_dir, expand_tilde, parse_profile, profile_path, render_profile,
    with_env_overrides,
    CONFIG_DIR_ENV, PROFILE_FILE,
};
pub use types::{
    ProfileRecord, TransferSettings, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_PORT,
    MAX_CONNECT_TIMEOUT_SECS,
};
