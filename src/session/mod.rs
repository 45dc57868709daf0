//! Session Management: protocol, stimulus pools, block planning and logging
//!
//! # Components
//! - `protocol.rs`: per-version constants and JSON overrides
//! - `pools.rs`: word, number and pair pools
//! - `block.rs`: target/distractor sampling and trial order
//! - `state.rs`: the session flow driven through a `Presenter`
//! - `results.rs`: append-only CSV results file
//! - `accuracy.rs`: hit / false-alarm tallies per block
//! - `errors.rs`: error type

pub mod accuracy;
pub mod block;
pub mod errors;
pub mod pools;
pub mod protocol;
pub mod results;
pub mod state;

pub use accuracy::{AccuracyTracker, OutcomeCounts};
pub use errors::{ExperimentError, Result};
pub use pools::ItemPools;
pub use protocol::{Protocol, ProtocolConfig};
pub use results::ResultLog;
pub use state::{Backdrop, Key, Presenter, Session};
