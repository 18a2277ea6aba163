//! ALICE Browser Mobile — Touch Input
//!
//! Raw touch / pointer streams are turned into taps and long-press phases
//! here; the new-tab screen consumes the recognised gestures.

pub mod touch;
