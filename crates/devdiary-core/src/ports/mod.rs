//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod gateway;
mod session;

pub use gateway::{PostGateway, UserGateway};
pub use session::SessionStore;
