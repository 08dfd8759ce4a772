//! API request and response types.
//!
//! Request types keep every field optional so that a missing required field
//! reaches the operation handler and is reported as `missing_field` instead
//! of failing inside the JSON extractor.

pub mod blueprint;
pub mod capabilities;
pub mod common;
pub mod content;
pub mod options;
pub mod plugins;
pub mod site;
