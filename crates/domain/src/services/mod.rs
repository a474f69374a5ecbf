//! Service seams for the alert fan-out pipeline.
//!
//! The engine depends on these traits; production implementations live in
//! the `engine` and `persistence` crates, and the mocks here back the
//! pipeline tests.

pub mod live;
pub mod push;
pub mod store;

pub use live::LiveChannel;
pub use push::{AlertPush, MockPushService, PushResult, PushService};
pub use store::{MemoryTelemetryStore, StoreError, TelemetryStore};
