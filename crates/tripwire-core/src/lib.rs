//! tripwire-core: shared types for tripwire.
//!
//! This crate owns both halves of the data path that the host framework
//! drives through tripwire:
//!
//! ```text
//! RawEvent ──► EventNormalizer ──► NormalizedEvent
//!
//! action failure ──► Notice ──► Notifier
//! ```
//!
//! The channel interception layer lives in `tripwire-channel` and only
//! depends on the notice and notifier types defined here.

pub mod config;
pub mod error;
pub mod event;
pub mod notice;
pub mod notifier;
pub mod status;
pub mod types;

pub use error::{NotifyError, VersionError};
pub use event::{EventNormalizer, Normalizer};
pub use notice::{Notice, NoticeRecord};
pub use notifier::{MemoryNotifier, Notifier, TracingNotifier};
pub use status::{RescueResponses, StatusResolver};
pub use types::{FrameworkVersion, Group, NormalizedEvent, RawEvent};
