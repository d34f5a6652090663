//! # State Module
//!
//! Owns everything a session holds between commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Session (one per process, passed as &mut to commands)          │   │
//! │  │                                                                 │   │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────┐  │   │
//! │  │  │   Catalog    │  │    Ledger    │  │    ConfigState       │  │   │
//! │  │  │  read-only   │  │   mutable    │  │  read-only after     │  │   │
//! │  │  │              │  │              │  │  startup             │  │   │
//! │  │  └──────────────┘  └──────────────┘  └──────────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │  + session id, start time, load reports                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  Single-threaded: commands run one at a time, no locking.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;

pub use config::ConfigState;
pub use session::Session;
