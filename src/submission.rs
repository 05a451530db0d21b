//! Pairing detected ISRCs with release tracks and submitting them

use crate::cd::TrackIsrcs;
use crate::isrc::Isrc;
use crate::musicbrainz::{MbRelease, MetadataService, MusicBrainzError};
use crate::prompt::Prompt;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// One ISRC to attach to the recording at a track position
#[derive(Debug, Clone, PartialEq)]
pub struct TrackIsrc {
    /// 1-based position on the disc
    pub position: usize,
    pub recording_id: Uuid,
    pub isrc: Isrc,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Wrong username or password.")]
    Authentication,
    #[error("None of the {0} tracks of the selected release has an ISRC.")]
    NothingToSubmit(usize),
    #[error("Submission failed: {0}")]
    MusicBrainz(MusicBrainzError),
}

impl From<MusicBrainzError> for SubmitError {
    fn from(e: MusicBrainzError) -> Self {
        match e {
            MusicBrainzError::Authentication => SubmitError::Authentication,
            other => SubmitError::MusicBrainz(other),
        }
    }
}

/// Pair each release track with the ISRC read at the same position.
///
/// Tracks without a detected ISRC are left out, and ISRCs past the end of
/// the release track list are ignored.
pub fn build_mapping(release: &MbRelease, isrcs: &TrackIsrcs) -> Vec<TrackIsrc> {
    release
        .tracks
        .iter()
        .enumerate()
        .filter_map(|(index, track)| {
            let position = index + 1;
            isrcs.get(position).map(|isrc| TrackIsrc {
                position,
                recording_id: track.recording_id,
                isrc: isrc.clone(),
            })
        })
        .collect()
}

/// Submit the ISRCs for `release`, reporting progress through `prompt`.
///
/// Returns the number of tracks submitted.
pub async fn submit<S, P>(
    service: &S,
    release: &MbRelease,
    isrcs: &TrackIsrcs,
    prompt: &mut P,
) -> Result<usize, SubmitError>
where
    S: MetadataService + ?Sized,
    P: Prompt + ?Sized,
{
    let mapping = build_mapping(release, isrcs);
    if isrcs.len() > release.tracks.len() {
        debug!(
            "Disc reported {} tracks, release has {}",
            isrcs.len(),
            release.tracks.len()
        );
    }

    if mapping.is_empty() {
        return Err(SubmitError::NothingToSubmit(release.tracks.len()));
    }

    for entry in &mapping {
        debug!(
            "Track {}: {} -> recording {}",
            entry.position,
            entry.isrc.hyphenated(),
            entry.recording_id
        );
    }

    prompt.say(&format!(
        "Submitting ISRCs for {} tracks to MusicBrainz... ",
        mapping.len()
    ));

    match service.submit_isrcs(&mapping).await {
        Ok(()) => {
            prompt.say("done.");
            info!("Submitted {} ISRCs for release {}", mapping.len(), release.release_id);
            Ok(mapping.len())
        }
        Err(e) => {
            prompt.say("failed.");
            Err(e.into())
        }
    }
}
