//! Record schemas stored in the three sales collections.
//!
//! The structs carry data only. Field names are the stored document keys;
//! the internal storage identity lives under `_id` and is assigned by the
//! store on insert.

pub mod customer;
pub mod order;
pub mod product;

pub use customer::Customer;
pub use order::Order;
pub use product::Product;
