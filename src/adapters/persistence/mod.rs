//! Persistence Adapters - Point Ledger Stores
//!
//! Two `PointsLedger` implementations behind the same port:
//! - `MemoryLedger`: plain map, used in tests and dev
//! - `JournalLedger`: JSONL event journal with replay-on-start, no
//!   database dependency — the same append-only format the rest of the
//!   stack uses for audit trails

pub mod journal;
pub mod memory;

pub use journal::JournalLedger;
pub use memory::MemoryLedger;
