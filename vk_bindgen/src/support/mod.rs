//! Runtime linked by generated bindings.
//!
//! Generated code imports this module (by default as `vk_bindgen::support`)
//! for request encoding, the API error envelope, cross-cutting options, the
//! raw holder behind untyped unions, and fixture generation.

pub mod api_error;
pub mod caller;
pub mod options;
pub mod random;
pub mod raw;
pub mod testing;
pub mod wire;

pub use api_error::{ApiError, Captcha, RequestParam};
pub use caller::{Caller, Context, EncodeError, MethodError};
pub use options::{ApiOption, Language};
pub use random::{RandomFill, Rng};
pub use raw::RawJson;
pub use wire::{FormValues, WireScalar};
