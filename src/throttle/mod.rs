// ABOUTME: Display throttling backed by a persisted last-shown timestamp

pub mod clock;
pub mod gate;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use gate::{ThrottleGate, LAST_SHOWN_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore};
