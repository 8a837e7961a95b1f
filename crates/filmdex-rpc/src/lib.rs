//! Server functions for filmdex.
//!
//! A server function is an async callable that can be invoked locally and
//! also reached through a routable URL. [`ServerFunctionRegistry`] creates,
//! registers and dispatches handlers; [`RemoteFunction`] calls a route on
//! another host over HTTP.

mod context;
mod function;
mod handler;
mod registry;
mod remote;
mod transport;

pub use context::EventContext;
pub use function::{LocalServerFunction, ServerFunction, call_typed};
pub use handler::{Handler, HandlerFn};
pub use registry::{LocalFunction, ROUTE_PREFIX, ServerFunctionRegistry};
pub use remote::RemoteFunction;
pub use transport::{RawRequest, RawResponse};
