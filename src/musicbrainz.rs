use crate::isrc::Isrc;
use crate::submission::TrackIsrc;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, WWW_AUTHENTICATE};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const DEFAULT_HOST: &str = "musicbrainz.org";

/// Client name sent with every submission, `isrc-submit-<version>`
pub fn client_id() -> String {
    format!("isrc-submit-{}", env!("CARGO_PKG_VERSION"))
}

/// MusicBrainz release matching a disc ID
#[derive(Debug, Clone, PartialEq)]
pub struct MbRelease {
    pub release_id: Uuid,
    pub title: String,
    pub artist: String,
    /// Tracks of the medium that carries the looked-up disc, in play order
    pub tracks: Vec<MbTrack>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MbTrack {
    pub recording_id: Uuid,
    pub position: u32,
    pub title: String,
}

impl MbRelease {
    /// Menu label, `'<title>' by '<artist>' (<id>)`
    pub fn label(&self) -> String {
        format!("'{}' by '{}' ({})", self.title, self.artist, self.release_id)
    }
}

#[derive(Debug, Error)]
pub enum MusicBrainzError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Invalid MusicBrainz URL: {0}")]
    Url(String),
    #[error("Wrong username or password")]
    Authentication,
    #[error("Digest authentication failed: {0}")]
    Digest(String),
    #[error("MusicBrainz API returned status {status}: {body}")]
    Api { status: StatusCode, body: String },
}

/// Operations the submission flow needs from MusicBrainz (allows mocking for tests)
#[async_trait::async_trait]
pub trait MetadataService: Send + Sync {
    async fn releases_for_disc(&self, disc_id: &str) -> Result<Vec<MbRelease>, MusicBrainzError>;
    async fn submit_isrcs(&self, mapping: &[TrackIsrc]) -> Result<(), MusicBrainzError>;
}

/// Connection settings for the web service
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Host name, or a full base URL such as `http://localhost:5000`
    pub host: String,
    pub username: String,
    pub password: String,
}

/// Disc ID lookup response
#[derive(Debug, Deserialize)]
struct DiscResponse {
    #[serde(default)]
    releases: Vec<ReleaseResponse>,
}

#[derive(Debug, Deserialize)]
struct ReleaseResponse {
    id: Uuid,
    title: String,
    #[serde(rename = "artist-credit", default)]
    artist_credit: Vec<ArtistCreditResponse>,
    #[serde(default)]
    media: Vec<MediumResponse>,
}

#[derive(Debug, Deserialize)]
struct ArtistCreditResponse {
    name: String,
    #[serde(default)]
    joinphrase: String,
}

#[derive(Debug, Deserialize)]
struct MediumResponse {
    #[serde(default)]
    discs: Vec<DiscRef>,
    #[serde(default)]
    tracks: Vec<TrackResponse>,
}

#[derive(Debug, Deserialize)]
struct DiscRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TrackResponse {
    position: u32,
    #[serde(default)]
    title: String,
    recording: RecordingRef,
}

#[derive(Debug, Deserialize)]
struct RecordingRef {
    id: Uuid,
}

#[derive(Clone)]
pub struct MusicBrainzClient {
    client: Client,
    base_url: Url,
    username: String,
    password: String,
    client_id: String,
}

impl MusicBrainzClient {
    pub fn new(settings: ClientSettings) -> Result<Self, MusicBrainzError> {
        let base = if settings.host.contains("://") {
            settings.host.clone()
        } else {
            format!("https://{}", settings.host)
        };
        let base_url = Url::parse(&base)
            .and_then(|url| url.join("/ws/2/"))
            .map_err(|e| MusicBrainzError::Url(format!("{}: {}", settings.host, e)))?;

        let client = Client::builder()
            .user_agent(format!("isrc-submit/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            username: settings.username,
            password: settings.password,
            client_id: client_id(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, MusicBrainzError> {
        self.base_url
            .join(path)
            .map_err(|e| MusicBrainzError::Url(format!("{}: {}", path, e)))
    }

    /// Answer a digest challenge for a POST of `body` to `url`
    fn digest_authorization(
        &self,
        challenge: &str,
        url: &Url,
        body: &[u8],
    ) -> Result<String, MusicBrainzError> {
        let uri = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        let mut prompt =
            digest_auth::parse(challenge).map_err(|e| MusicBrainzError::Digest(e.to_string()))?;
        let context = digest_auth::AuthContext::new_post(
            self.username.as_str(),
            self.password.as_str(),
            uri.as_str(),
            Some(body),
        );
        let answer = prompt
            .respond(&context)
            .map_err(|e| MusicBrainzError::Digest(e.to_string()))?;

        Ok(answer.to_header_string())
    }

    async fn post_xml(
        &self,
        url: &Url,
        body: &str,
        authorization: Option<String>,
    ) -> Result<reqwest::Response, MusicBrainzError> {
        let mut request = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/xml; charset=UTF-8")
            .body(body.to_string());
        if let Some(authorization) = authorization {
            request = request.header(AUTHORIZATION, authorization);
        }
        Ok(request.send().await?)
    }
}

#[async_trait::async_trait]
impl MetadataService for MusicBrainzClient {
    /// Lookup releases by MusicBrainz DiscID
    async fn releases_for_disc(&self, disc_id: &str) -> Result<Vec<MbRelease>, MusicBrainzError> {
        info!("🎵 MusicBrainz: Looking up DiscID '{}'", disc_id);

        let mut url = self.endpoint(&format!("discid/{}", disc_id))?;
        url.set_query(Some("inc=recordings+artist-credits&fmt=json"));
        debug!("MusicBrainz API request: {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            info!("No MusicBrainz release for DiscID '{}'", disc_id);
            return Ok(Vec::new());
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("MusicBrainz API error response ({}): {}", status, body);
            return Err(MusicBrainzError::Api { status, body });
        }

        let disc: DiscResponse = response.json().await?;
        let releases: Vec<MbRelease> = disc
            .releases
            .into_iter()
            .map(|release| release.into_mb_release(disc_id))
            .collect();

        info!("Found {} releases for DiscID '{}'", releases.len(), disc_id);
        Ok(releases)
    }

    async fn submit_isrcs(&self, mapping: &[TrackIsrc]) -> Result<(), MusicBrainzError> {
        let mut url = self.endpoint("recording/")?;
        url.query_pairs_mut().append_pair("client", &self.client_id);
        let body = isrc_submission_xml(mapping);
        debug!("Submitting to {}:\n{}", url, body);

        let mut response = self.post_xml(&url, &body, None).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let challenge = response
                .headers()
                .get(WWW_AUTHENTICATE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
                .ok_or(MusicBrainzError::Authentication)?;
            let authorization = self.digest_authorization(&challenge, &url, body.as_bytes())?;
            response = self.post_xml(&url, &body, Some(authorization)).await?;
        }

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("MusicBrainz rejected credentials for {}", self.username);
            return Err(MusicBrainzError::Authentication);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("MusicBrainz API error response ({}): {}", status, body);
            return Err(MusicBrainzError::Api { status, body });
        }

        info!("MusicBrainz accepted {} ISRCs", mapping.len());
        Ok(())
    }
}

impl ReleaseResponse {
    fn into_mb_release(self, disc_id: &str) -> MbRelease {
        let artist = join_artist_credit(&self.artist_credit);

        // Multi-disc releases list every medium; only the one holding this disc matters
        let index = self
            .media
            .iter()
            .position(|medium| medium.discs.iter().any(|disc| disc.id == disc_id))
            .unwrap_or(0);

        let mut tracks: Vec<MbTrack> = self
            .media
            .into_iter()
            .nth(index)
            .map(|medium| medium.tracks)
            .unwrap_or_default()
            .into_iter()
            .map(|track| MbTrack {
                recording_id: track.recording.id,
                position: track.position,
                title: track.title,
            })
            .collect();
        tracks.sort_by_key(|track| track.position);

        MbRelease {
            release_id: self.id,
            title: self.title,
            artist,
            tracks,
        }
    }
}

fn join_artist_credit(credits: &[ArtistCreditResponse]) -> String {
    if credits.is_empty() {
        return "Unknown Artist".to_string();
    }
    credits
        .iter()
        .map(|credit| format!("{}{}", credit.name, credit.joinphrase))
        .collect()
}

/// MMD-2.0 request body attaching ISRCs to recordings.
///
/// A recording that appears on several tracks gets one element with all
/// of its ISRCs, in first-seen order.
pub fn isrc_submission_xml(mapping: &[TrackIsrc]) -> String {
    let mut recordings: Vec<(Uuid, Vec<&Isrc>)> = Vec::new();
    for entry in mapping {
        match recordings
            .iter_mut()
            .find(|(recording_id, _)| *recording_id == entry.recording_id)
        {
            Some((_, isrcs)) => {
                if !isrcs.contains(&&entry.isrc) {
                    isrcs.push(&entry.isrc);
                }
            }
            None => recordings.push((entry.recording_id, vec![&entry.isrc])),
        }
    }

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <metadata xmlns=\"http://musicbrainz.org/ns/mmd-2.0#\">\n\
         <recording-list>\n",
    );
    for (recording_id, isrcs) in recordings {
        xml.push_str(&format!(
            "<recording id=\"{}\"><isrc-list count=\"{}\">",
            recording_id,
            isrcs.len()
        ));
        for isrc in isrcs {
            xml.push_str(&format!("<isrc id=\"{}\"/>", isrc));
        }
        xml.push_str("</isrc-list></recording>\n");
    }
    xml.push_str("</recording-list>\n</metadata>\n");
    xml
}
