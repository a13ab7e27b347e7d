//! Recording into and replaying from fixture files.
//!
//! # Overview
//!
//! A [`crate::store::MockStore`] captures data at three boundaries:
//! 1. **data** – payloads handed straight to `record`
//! 2. **sync** – the result of a wrapped synchronous call
//! 3. **async** – the resolved result of a wrapped future
//!
//! Recordings are grouped by context and id and saved as one pretty-printed
//! JSON document per fixture. Replay hands the entries back in recording
//! order, one per call, so a test runs deterministically without the real
//! dependency.

pub mod fixture;
pub mod recorder;
pub mod replayer;
