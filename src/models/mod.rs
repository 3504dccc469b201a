//! Domain models: device identity, CDP neighbor facts, and the queue's
//! durable work-item shape.

pub mod device;
pub mod device_type;
pub mod neighbor;
pub mod queue_entry;

pub use device::{Device, DeviceProjection, DeviceRecord};
pub use device_type::{classify, DeviceFamily, DeviceType};
pub use neighbor::NeighborRecord;
pub use queue_entry::QueueEntry;
