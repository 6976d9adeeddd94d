//! HTTP handlers
//!
//! - `callback`: redirect back from the authorization server
//! - `consent`: consent prompt and form submission

pub mod callback;
pub mod consent;
