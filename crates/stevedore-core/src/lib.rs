//! Core types and configuration for stevedore.
//!
//! This crate defines the `stevedore.toml` schema ([`DeployConfig`]): an
//! ordered list of pipeline steps (images, task definitions, one-off tasks,
//! service updates) plus the image-substitution pass applied to task
//! definitions before registration, and shared error types.

pub mod config;
pub mod error;

pub use config::{
    DeployConfig, ImageConfig, MatchMode, ServiceConfig, StepConfig, TaskConfig,
    TaskDefinitionConfig,
};
pub use error::{Error, Result};
