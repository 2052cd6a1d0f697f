pub mod service;

pub use service::{dispatch_method, MockService};
