//! Service layer: mock storage backends and the resolution facade.
//! - `storage` holds the `MockStore` trait and its two implementations.
//! - `mocks` wraps a store with normalization and method dispatch for the HTTP layer.

pub mod errors;
pub mod storage;
pub mod mocks;
