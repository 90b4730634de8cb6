//! Bindings generated at build time from the documents in `schema/`.
//!
//! The generated round-trip and binding tests run with this crate's tests,
//! next to hand-written checks of the exact wire values each binding sends.

/// Output of `vk_bindgen::generate` for `schema/`.
pub mod vk {
    include!(concat!(env!("OUT_DIR"), "/vk.rs"));
}
