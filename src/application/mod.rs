// Application layer - use cases and orchestration.
// The service owns the store, the presenter derives what gets rendered,
// and the controller wires both to a view and a confirmation prompt.

pub mod clock;
pub mod controller;
pub mod error;
pub mod presenter;
pub mod service;

pub use clock::*;
pub use controller::*;
pub use error::*;
pub use presenter::*;
pub use service::*;
