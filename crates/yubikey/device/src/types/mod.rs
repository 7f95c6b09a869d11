mod capability;
mod device_info;
mod mode;
mod product_id;
mod version;

pub use capability::{Capabilities, Capability};
pub use device_info::{DeviceConfig, DeviceIdentity, FormFactor};
pub use mode::{Interface, Mode};
pub use product_id::ProductId;
pub use version::Version;
