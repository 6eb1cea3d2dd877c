//! Presentation Layer
//!
//! - `cli` - argument parsing (via clap)
//! - `factory` - creates use cases with their production adapters
//!
//! Rendering lives in the binary's `ui` module.

pub mod cli;
pub mod factory;

pub use cli::{Cli, ColorWhen, Commands};
pub use factory::{create_profile_repository, create_transfer_use_case, ConcreteTransferUseCase};
