// Missing-info flow: audit a parsed resume for gaps, validate the answers the
// collection form gathers, and merge them back into the resume.
// Audit and merge are pure; only `handlers` touches HTTP.

pub mod detector;
pub mod form;
pub mod handlers;
pub mod merge;
pub mod models;
