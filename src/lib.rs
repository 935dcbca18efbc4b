//! AutoValue Valuation API Library
//!
//! This library provides the core functionality for the AutoValue used-vehicle
//! valuation API: identity resolution (manual overrides, external VIN decode,
//! internal pattern table), the static defect knowledge base, and the
//! deterministic pricing pipeline producing a market estimate and a
//! margin-adjusted trade-in offer.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Core business logic.
//! - `integrations`: External service integrations.
//! - `config`: Configuration management.
//! - `decoder_client`: External VIN decode service client.
//! - `defects`: Defect knowledge base.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Core data models.
//! - `patterns`: Internal VIN-prefix pattern table.
//! - `policy`: Pricing policy constants.
//! - `pricing`: Pricing pipeline stages.
//! - `resolver`: Identity resolution.
//! - `valuation`: Valuation workflow orchestration.

pub mod api;
pub mod core;
pub mod integrations;

// Re-export primary modules for shared use in tests and other binaries
pub mod config;
pub mod decoder_client;
pub mod defects;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod patterns;
pub mod policy;
pub mod pricing;
pub mod resolver;
pub mod valuation;
