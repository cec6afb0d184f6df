//! Core library for the Meridian ERP backend.
//!
//! The interesting machinery lives in two subsystems: the YAML-driven module
//! registry (`modules`) that discovers feature packages, merges their
//! declarative configuration, and dispatches named actions, and the
//! country-localization registry (`localization`) that resolves per-country
//! payroll and employee-data strategies with graceful fallback to defaults.

pub mod config;
pub mod error;
pub mod localization;
pub mod modules;
pub mod telemetry;
