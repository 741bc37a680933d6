#![forbid(unsafe_code)]

pub mod auth;
pub mod repository;
pub mod rest;

pub use auth::{AuthError, AuthProvider, Identity, MockAuthProvider};
pub use repository::{InMemoryRepository, NewProfileRecord, Storage, StorageError};
pub use rest::{RestConfig, RestInitError};
