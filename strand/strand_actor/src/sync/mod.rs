//! Synchronization primitives shared by the runtime.

pub mod atomic;

pub use atomic::AtomicSequence;
