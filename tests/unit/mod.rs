//! Unit test suite for bfclient.
//!
//! Drives the update checker through each terminal state using the in-memory
//! doubles from `bfclient::test_utils`.
//!
//! ```bash
//! cargo test --test unit
//! ```

mod checker_flow;
