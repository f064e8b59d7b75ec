//! # certview-store — Certificate Store Collaborator
//!
//! The only crate in certview that knows how certificate documents are
//! physically stored. Everything above it speaks the store-neutral
//! [`Filter`] and [`certview_core::Document`] types.
//!
//! ## Backends
//!
//! | Backend        | Use                                               |
//! |----------------|---------------------------------------------------|
//! | [`MongoStore`] | Production. MongoDB via the official driver.      |
//! | [`MemoryStore`]| Development mode and tests. Evaluates filters in-process. |
//!
//! ## Seams
//!
//! Query code depends on the [`CertificateStore`] and
//! [`StudentProfileStore`] traits, injected at construction time. Connection
//! lifecycle (pooling, reconnects, release) belongs to the backend, not to
//! callers.

pub mod config;
pub mod error;
pub mod filter;
pub mod memory;
pub mod mongo;
pub mod store;

pub use config::{ConfigError, StoreConfig};
pub use error::StoreError;
pub use filter::{Filter, FilterValue};
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use store::{CertificateStore, StudentProfileStore};
