//! Expose notion-md's internal API for use in unit testing. It is primarily
//! intended for testing purposes.
pub mod cli;
pub mod error;
pub mod output;
