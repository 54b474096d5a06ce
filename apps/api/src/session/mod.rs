pub mod controller;
pub mod handlers;
pub mod registry;
pub mod state;

pub use controller::{SessionController, SessionError};
pub use registry::SessionRegistry;
