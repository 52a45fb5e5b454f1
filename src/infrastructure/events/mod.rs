//! Event source implementations

mod manual;
mod notify_source;

pub use manual::{ManualEventSource, ManualFeed};
pub use notify_source::{translate_event, NotifyEventSource};
