//! HTTP control surface
//!
//! Routes commands into the engine actor and streams broadcast events to
//! displays over SSE.

pub mod handlers;
pub mod server;
pub mod sse;

pub use server::{build_router, run, AppContext};
