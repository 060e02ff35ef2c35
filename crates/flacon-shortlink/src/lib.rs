pub mod memory;
pub mod remote;

pub use flacon_core::shortlink::ShortLinks;
pub use flacon_core::ShortLinkError;
pub use memory::RecordingShortLinks;
pub use remote::{RemoteShortLinks, RemoteShortLinksConfig};
