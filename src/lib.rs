//! TUI Match-3 (workspace facade crate).
//!
//! Re-exports the workspace crates as `tui_match3::{core,engine,input,term,types}`
//! and adds the configuration and headless simulation shared by the binary.

pub mod config;
pub mod sim;

pub use tui_match3_core as core;
pub use tui_match3_engine as engine;
pub use tui_match3_input as input;
pub use tui_match3_term as term;
pub use tui_match3_types as types;

pub use config::{parse_kinds, GameConfig};
pub use sim::{run_simulation, SimSummary};
