//! jsontv: converts vendor JSON TV guide feeds into one XMLTV document

pub mod channel_map;
pub mod config;
pub mod epg;
pub mod error;
pub mod fetcher;

pub use channel_map::ChannelMap;
pub use error::{GuideError, Result};
