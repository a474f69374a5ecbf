//! Domain layer for the dispenser fleet backend.
//!
//! This crate contains:
//! - Domain models (Device, Reading, Notification, PushToken)
//! - Alert classification rules (thresholds, classifier, materializer)
//! - Service seams for delivery and storage, with mock implementations

pub mod alerting;
pub mod models;
pub mod services;
