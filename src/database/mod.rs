//! Storage for the local bookmark service.
//!
//! ```no_run
//! use linkdeck::database::Database;
//!
//! let db = Database::open("linkdeck.db").expect("failed to open database");
//! let conn = db.connection();
//! # let _ = conn;
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
