//! xcroute Service
//!
//! The resolution logic on top of the shared models: reserve relationship
//! classification, transfer program construction, channel connectivity
//! validation and the registry build orchestration.

pub mod channels;
pub mod program;
pub mod registry;
pub mod reserve;

pub use channels::ChannelGraph;
pub use program::{ProgramBuilder, ProgramError, ProgramShape, TransferInput, TransferProgram};
pub use registry::{RegistryBuilder, RegistryError};
pub use reserve::classify;
