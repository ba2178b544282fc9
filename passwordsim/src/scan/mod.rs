//! Concurrent scan-and-score pipeline.
//!
//! ```text
//!                 bounded queue (default 512 lines)
//! LineSource ──► [ line │ line │ line │ ... ] ──► Worker 0 ─┐
//!  (reader)                                   ├─► Worker 1 ─┼─► MatchSet ──► sorted Vec ──► ResultSink
//!                                             └─► Worker N ─┘   (DashMap)
//! ```
//!
//! The calling thread is the only producer: it opens the corpus before any worker is
//! spawned, then pushes lines into the queue, blocking whenever the queue is full. Workers
//! block on an empty queue and drain once the producer closes it. The caller joins every
//! worker before the match set is sorted, so no result is emitted until the whole corpus
//! has been scored.
//!
//! Workers process lines in no particular order. That is harmless because the match set is
//! keyed by the raw password bytes and the final order is derived from its contents alone.
pub mod engine;
pub mod source;
pub mod worker;

pub use engine::{check_passwords, find_similar, find_similar_in, scan, scan_source};
pub use source::LineSource;
pub use worker::{Worker, WorkerReport, WorkerState};
