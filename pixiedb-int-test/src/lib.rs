//! Shared helpers for the PixieDB integration tests.

pub mod test_util;
