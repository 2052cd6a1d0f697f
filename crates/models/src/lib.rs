//! Domain model for registered mocks.
//! - `Method`, `Endpoint` and `Mock` are the canonical shapes held by every store.
//! - `normalize` is the only way raw client input becomes a `Mock`.

pub mod errors;
pub mod method;
pub mod mock;
pub mod normalize;

pub use errors::NormalizeError;
pub use method::Method;
pub use mock::{Endpoint, Mock};
pub use normalize::normalize;
