//! Modules layer - Infrastructure components shared by features
//!
//! Contains adapters for request payloads that are not tied to one feature.

pub mod upload;
