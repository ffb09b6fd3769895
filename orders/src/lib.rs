//! # Order Domain
//!
//! Pure order logic shared by the server and any future tooling.
//!
//! ## Contents
//!
//! - Status history: the three-checkpoint progress record stored on every
//!   order (accepted → dispatched → completed) and the label derived from it.
//! - Delivery charges: distance-tiered extra charge lookup.
//! - Inventory: paginated purchase rows merged into per-item totals for the
//!   partner dashboard.
//!
//! Everything here is synchronous and in-memory. I/O lives in the `hasura`
//! and `server` crates.

pub mod charges;
pub mod inventory;
pub mod status_history;

pub use charges::ChargePolicy;
pub use inventory::PurchaseStore;
pub use status_history::{SlotError, StatusHistory, StatusLabel, StatusUpdate};
