//! # Resumegen Architecture
//!
//! Resumegen renders one resume per target role from a single tagged data file
//! and a single template. It is a library that happens to have a CLI client.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs)                               │
//! │  - Parses arguments, prints messages, sets the exit code    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Owns the source, the renderer and the output writer      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - build, render, check, roles, init                        │
//! │  - Returns CmdResult with a per-role BatchReport            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Data Layer (source/, model.rs) and Output (output.rs)      │
//! │  - RecordSource trait: YamlSource, InMemorySource           │
//! │  - Atomic writes of rendered documents                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rendering itself is done by the `stencil` crate in this workspace.
//!
//! ## Failure Isolation
//!
//! A batch build renders each role fully in memory before writing it. A role
//! that is unknown, fails to render or fails to write is recorded in the
//! [`commands::BatchReport`] and the batch moves on to the next role. Nothing is
//! written for a failed role, and a previous output for it is left untouched.
//!
//! ## Testing Strategy
//!
//! - **Engine**: unit tests inside `stencil`
//! - **Commands and API**: unit tests against `InMemorySource` and temp dirs
//! - **CLI**: integration tests in `tests/` that run the binary

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod source;
