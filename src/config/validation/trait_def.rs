//! The `Validate` trait implemented by every configuration section

/// Validation trait for configuration structures
pub trait Validate {
    /// Check the section, returning a human-readable reason on failure
    fn validate(&self) -> Result<(), String>;
}
