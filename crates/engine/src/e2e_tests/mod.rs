//! Scenario tests driving the whole engine.
//!
//! Each test seeds the Haven world into an in-memory store and talks to
//! [`GameEngine`](crate::GameEngine) the way the WebSocket layer does:
//! connect, send command envelopes, let the combat clock tick.
//!
//! ```bash
//! cargo test -p nightfall-engine --lib e2e_tests
//! ```

mod exploration_tests;
mod harness;

pub use harness::*;
