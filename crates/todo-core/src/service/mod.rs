//! Service Layer
//!
//! The remote task service abstraction and its implementations.

mod traits;
mod http;
mod memory;

pub use traits::TaskService;
pub use http::HttpTaskService;
pub use memory::{InMemoryTaskService, ServiceCall};
