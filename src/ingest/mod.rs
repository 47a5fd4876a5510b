//! Feed ingestion.
//!
//! Submodules:
//! - `metno` - client and parser for the met.no Locationforecast
//!   classic (XML) feed.

pub mod metno;
