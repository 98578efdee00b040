//! Text transforms applied to each eligible file.
//!
//! The rewriter takes a `&dyn Transform`, so tests can substitute an identity
//! or closure transform for the real script converter.

use thiserror::Error;
use zhconv::{zhconv, Variant};

#[derive(Error, Debug)]
#[error("{transform} transform failed: {message}")]
pub struct TransformError {
    pub transform: String,
    pub message: String,
}

impl TransformError {
    pub fn new(transform: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            transform: transform.into(),
            message: message.into(),
        }
    }
}

/// A deterministic text-to-text conversion.
pub trait Transform {
    fn convert(&self, text: &str) -> Result<String, TransformError>;

    /// Short human-readable profile name, shown in progress output.
    fn name(&self) -> &str;
}

/// Simplified Chinese to Traditional Chinese, Hong Kong standard.
#[derive(Debug, Clone, Copy, Default)]
pub struct HongKongTransform;

impl Transform for HongKongTransform {
    fn convert(&self, text: &str) -> Result<String, TransformError> {
        Ok(zhconv(text, Variant::ZhHK))
    }

    fn name(&self) -> &str {
        "zh-Hans → zh-HK"
    }
}

/// Returns its input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Transform for Identity {
    fn convert(&self, text: &str) -> Result<String, TransformError> {
        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        "identity"
    }
}

/// Adapts a closure into a [`Transform`].
pub struct FnTransform<F> {
    name: String,
    func: F,
}

impl<F> FnTransform<F>
where
    F: Fn(&str) -> Result<String, TransformError>,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Transform for FnTransform<F>
where
    F: Fn(&str) -> Result<String, TransformError>,
{
    fn convert(&self, text: &str) -> Result<String, TransformError> {
        (self.func)(text)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
