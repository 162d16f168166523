//! pundi-domain
//!
//! Pure domain models (categories, transactions, profile, record sets).
//! No I/O, no network, no storage. Only data types, wire shapes and core enums.

pub mod category;
pub mod common;
pub mod profile;
pub mod records;
pub mod transaction;

pub use category::*;
pub use common::*;
pub use profile::*;
pub use records::*;
pub use transaction::*;
