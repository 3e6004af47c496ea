//! Use-case services over parcel persistence.
//!
//! # Responsibility
//! - Turn store primitives into tracker workflows.
//! - Keep the CLI decoupled from SQL and storage details.

pub mod parcel_service;
