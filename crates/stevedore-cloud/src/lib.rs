//! ECS-side operations for stevedore, driven through the `aws` CLI.
//!
//! The [`EcsClient`] wraps the CLI behind one method per API operation;
//! [`TaskDefinitionManager`], [`TaskRunner`], and [`ServiceUpdater`] are the
//! pipeline entities built on top of it.

pub mod aws;
pub mod client;
pub mod definition;
pub mod executor;
pub mod service;
pub mod task;

pub use aws::AwsError;
pub use client::{EcsClient, EcsError};
pub use definition::TaskDefinitionManager;
pub use executor::{AwsExecutor, RealExecutor};
pub use service::ServiceUpdater;
pub use task::TaskRunner;
