//! Signed-token codec, claims model, and the access/refresh lifecycle state machine.

pub mod claims;
pub mod codec;
pub mod lifecycle;
pub mod secret;

pub use claims::*;
pub use codec::*;
pub use lifecycle::*;
pub use secret::*;
