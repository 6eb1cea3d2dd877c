//! Transfer Module
//!
//! Orchestrates one package → connect → validate → upload → unpack run.
//!
//! ## Structure
//!
//! - `options` - Configuration types (`TransferOptions`)
//! - `outcome` - Result types (`Outcome`, `StageFailure`)
//! - `progress` - Forwards upload progress to an event sink
//! - `use_case` - Core use case logic (`TransferUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use dcr::application::transfer::{TransferOptions, TransferUseCase};
//!
//! let use_case = TransferUseCase::new(ZipPackager::new(), connector, TransferOptions::default());
//! let outcome = use_case.run(&profile, sink).await;
//! ```

mod options;
mod outcome;
mod progress;
mod use_case;

pub use options::TransferOptions;
pub use outcome::{Outcome, StageFailure};
pub use progress::SinkProgress;
pub use use_case::TransferUseCase;
