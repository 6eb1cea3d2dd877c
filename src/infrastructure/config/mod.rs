//! Configuration storage

mod toml_profile;

pub use toml_profile::TomlProfileRepository;
