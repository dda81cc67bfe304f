//! Outbound adapters implementing domain ports.
//!
//! - **json_file**: results kept in a JSON array on local disk.
//! - **persistence**: results kept in PostgreSQL via Diesel.
//! - **session**: in-process participant session store.
//!
//! Adapters translate between domain types and storage representations and
//! contain no game logic.

pub mod json_file;
pub mod persistence;
pub mod session;
