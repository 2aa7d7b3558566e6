//! Plan configuration loaded from TOML.
//!
//! ```toml
//! shape = [64, 64]
//! input = "real32"
//! output = "complex64"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dtype::Dtype;
use crate::error::FftError;
use crate::shape::Shape;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanConfig {
    pub shape: Vec<usize>,
    pub input: Dtype,
    pub output: Dtype,
}

impl PlanConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn shape(&self) -> Result<Shape, ConfigError> {
        Ok(Shape::new(&self.shape)?)
    }
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid plan: {0}")]
    Plan(#[from] FftError),
}
