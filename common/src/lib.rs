//! Shared model types for the contract and legal-document engine.
//!
//! Everything in here is plain data exchanged between the backend and its
//! clients: templates and their block trees, legal document versions, the
//! placeholder catalog, render context records and request payloads.

pub mod model;
pub mod requests;
