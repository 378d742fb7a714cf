pub mod error;
pub mod types;

pub use error::{GenerationError, ProviderError};
pub use types::{Angle, Caller, ImagePayload, ImageSource, MediaType};
