use isrc_submit::musicbrainz::{MbRelease, MetadataService, MusicBrainzError};
use isrc_submit::submission::TrackIsrc;
use std::sync::Mutex;

/// In-memory MusicBrainz that records submissions
pub struct MockMusicBrainz {
    releases: Vec<MbRelease>,
    reject_credentials: bool,
    pub lookups: Mutex<Vec<String>>,
    pub submissions: Mutex<Vec<Vec<TrackIsrc>>>,
}

impl MockMusicBrainz {
    pub fn new(releases: Vec<MbRelease>) -> Self {
        Self {
            releases,
            reject_credentials: false,
            lookups: Mutex::new(Vec::new()),
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Fail every submission with an authentication error
    pub fn rejecting_credentials(mut self) -> Self {
        self.reject_credentials = true;
        self
    }

    pub fn submitted(&self) -> Vec<Vec<TrackIsrc>> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MetadataService for MockMusicBrainz {
    async fn releases_for_disc(&self, disc_id: &str) -> Result<Vec<MbRelease>, MusicBrainzError> {
        self.lookups.lock().unwrap().push(disc_id.to_string());
        Ok(self.releases.clone())
    }

    async fn submit_isrcs(&self, mapping: &[TrackIsrc]) -> Result<(), MusicBrainzError> {
        if self.reject_credentials {
            return Err(MusicBrainzError::Authentication);
        }
        self.submissions.lock().unwrap().push(mapping.to_vec());
        Ok(())
    }
}
