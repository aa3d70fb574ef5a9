//! SQLite bootstrap for the parcel store.
//!
//! # Responsibility
//! - Open file or in-memory connections owned by the caller.
//! - Bring the `parcel` schema up to date before handing connections out.
//!
//! Stores never depend on this module: any connection holding the `parcel`
//! table works, however it was created.

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory, DbError, DbResult};
