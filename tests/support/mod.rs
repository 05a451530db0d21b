#![allow(dead_code)]

pub mod mock_musicbrainz;

pub use mock_musicbrainz::MockMusicBrainz;

use isrc_submit::cd::DiscInfo;
use isrc_submit::musicbrainz::{MbRelease, MbTrack};
use uuid::Uuid;

pub const DISC_ID: &str = "Wn8eRBtfLDfM0qjYPdxrz.Zjs_U-";

/// Initialize tracing for tests with proper test output handling
pub fn tracing_init() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn disc() -> DiscInfo {
    DiscInfo {
        disc_id: DISC_ID.to_string(),
        submission_url: format!(
            "https://musicbrainz.org/cdtoc/attach?id={}&tracks=10&toc=1+10+220000",
            DISC_ID
        ),
    }
}

/// A release with `track_count` tracks and fresh IDs
pub fn release(title: &str, track_count: u32) -> MbRelease {
    MbRelease {
        release_id: Uuid::new_v4(),
        title: title.to_string(),
        artist: "Test Artist".to_string(),
        tracks: (1..=track_count)
            .map(|position| MbTrack {
                recording_id: Uuid::new_v4(),
                position,
                title: format!("{} {}", title, position),
            })
            .collect(),
    }
}
