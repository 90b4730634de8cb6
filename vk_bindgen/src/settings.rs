//! Settings for binding generation.

/// Default module path emitted code uses to reach the support runtime.
pub const DEFAULT_RUNTIME_PATH: &str = "vk_bindgen::support";

/// Settings that control code generation behavior.
#[derive(Debug, Clone)]
pub struct GenerateSettings {
    /// When true, fail before classification if any schema document contains
    /// unknown or unsupported keywords. Collects all issues and returns them
    /// together.
    ///
    /// **Default: false (disabled).** Unknown keywords are ignored otherwise.
    pub deny_invalid_unknown_json_schema: bool,

    /// When true, two `allOf` members declaring the same field abort the run
    /// instead of the later member silently winning.
    ///
    /// **Default: false (disabled).**
    pub deny_merged_collisions: bool,

    /// Path emitted code uses to import the support runtime.
    pub runtime_path: String,

    /// Emit the `*_test.rs` fixture and round-trip files.
    pub emit_tests: bool,
}

impl Default for GenerateSettings {
    fn default() -> Self {
        Self {
            deny_invalid_unknown_json_schema: false,
            deny_merged_collisions: false,
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
            emit_tests: true,
        }
    }
}
