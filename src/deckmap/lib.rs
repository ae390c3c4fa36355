//! # Deckmap Architecture
//!
//! Deckmap registers **deck configurations** for Anki (which deck a card goes to, what its
//! front and back should hold, an example pair) and creates cards against them through the
//! AnkiConnect bridge, validating each request on the way.
//!
//! Like any UI-agnostic library, it is a library first with a thin CLI client on top.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - Installs the tracing subscriber, starts Anki if asked    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Returns CmdResult / CardOutcome                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Pure business logic, including the card pipeline         │
//! └─────────────────────────────────────────────────────────────┘
//!                  │                           │
//!                  ▼                           ▼
//! ┌───────────────────────────────┐ ┌───────────────────────────┐
//! │  Storage Layer (store/)       │ │  Remote Layer (remote/)   │
//! │  - StorageBackend trait       │ │  - NoteClient trait       │
//! │  - FsBackend, MemBackend      │ │  - AnkiConnectClient      │
//! └───────────────────────────────┘ └───────────────────────────┘
//! ```
//!
//! From `api.rs` inward nothing writes to stdout or stderr, calls `std::process::exit`,
//! or installs a tracing subscriber. The library only emits `tracing` events.
//!
//! ## Testing Strategy
//!
//! 1. **Commands**: thorough unit tests against `store::memory::MemBackend` and
//!    `remote::mock::MockClient`. Most tests live here.
//! 2. **API**: dispatch tests.
//! 3. **CLI**: `assert_cmd` tests of the binary in `tests/`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Business logic for each command
//! - [`store`]: Storage abstraction and implementations
//! - [`remote`]: The Anki client abstraction, AnkiConnect and the launcher
//! - [`model`]: Deck configurations, note types and card requests
//! - [`schema`]: Validation rules for deck configurations
//! - [`config`]: Application settings
//! - [`init`]: Data directory resolution and context wiring
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod remote;
pub mod schema;
pub mod store;
