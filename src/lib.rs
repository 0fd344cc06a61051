//! floradb - a spreadsheet-snapshot plant database with an advanced JSON
//! query engine
//!
//! The core is the advanced query subsystem: a MongoDB-style filter DSL
//! over three flat tables (plants, locations, containers), executed
//! in-memory against a fresh snapshot per request.

pub mod cli;
pub mod observability;
pub mod query;
pub mod records;
pub mod registry;
pub mod rest_api;
pub mod store;
