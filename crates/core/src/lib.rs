//! FFT plans and validated execution against accelerator memory.
//!
//! The engine that actually computes transforms and the layer that owns
//! device memory are collaborators behind [`engine::FftEngine`] and
//! [`buffer::DeviceBuffer`]. This crate decides which dtype pairs are legal,
//! owns engine plan handles, and checks every call before it reaches the
//! engine.

pub mod buffer;
pub mod config;
pub mod dispatch;
pub mod dtype;
pub mod engine;
pub mod error;
pub mod executor;
pub mod kind;
pub mod plan;
pub mod shape;

pub use buffer::{BufferDescriptor, DeviceBuffer, DevicePtr};
pub use dispatch::ExecPrimitive;
pub use dtype::{Dtype, Element, Precision, ScaleFactor};
pub use engine::FftEngine;
pub use error::{EngineError, FftError};
pub use executor::{execute, execute_in_place, forward_transform, inverse_transform};
pub use kind::{Direction, TransformKind};
pub use plan::TransformPlan;
pub use shape::Shape;

#[cfg(test)]
mod _tests_config;
#[cfg(test)]
mod _tests_dispatch;
#[cfg(test)]
mod _tests_plan;
#[cfg(test)]
mod _tests_shape;
