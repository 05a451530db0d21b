//! CD access
//!
//! Reads the MusicBrainz disc ID through libdiscid and the per-track
//! ISRCs through icedax.

pub mod drive;
pub mod icedax;

pub use drive::{CdDrive, CdDriveError, DiscInfo};
pub use icedax::{collect_isrcs, parse_isrc_line, read_isrcs, IcedaxConfig, IcedaxError, TrackIsrcs};
