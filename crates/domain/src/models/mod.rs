//! Domain models for the dispenser fleet backend.

pub mod device;
pub mod fleet;
pub mod notification;
pub mod push_token;
pub mod reading;

pub use device::{Device, DeviceSummary};
pub use fleet::{DeviceStatus, FleetSummary, Status};
pub use notification::{
    AlertSnapshot, Notification, NotificationDraft, NotificationEvent, NotificationType,
};
pub use push_token::PushToken;
pub use reading::{NewReading, RawSample, Reading};
