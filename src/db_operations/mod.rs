//! Store connector: the document-store abstraction, its sled backend, the
//! shared session handle and the query primitives executed by the store.

pub mod core;
pub mod filter;
pub mod pipeline;
pub mod session;
pub mod sled_store;

pub use self::core::{Collection, DocumentStore, UpsertOutcome};
pub use filter::{Condition, Filter};
pub use pipeline::{Accumulator, Expr, Group, Pipeline, Stage, GROUP_ID};
pub use session::StoreSession;
pub use sled_store::{SledStore, StoreUri};
