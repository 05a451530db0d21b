//! The read, select and submit sequence behind the command line

use crate::cd::{read_isrcs, CdDriveError, DiscInfo, IcedaxConfig, IcedaxError, TrackIsrcs};
use crate::config::{Args, Config, ConfigError};
use crate::musicbrainz::{MetadataService, MusicBrainzClient, MusicBrainzError};
use crate::prompt::Prompt;
use crate::select::{select_release, Selection};
use crate::submission::{self, SubmitError};
use thiserror::Error;
use tracing::{debug, warn};

/// Every way the program can stop short of a successful submission
#[derive(Debug, Error)]
pub enum AppError {
    #[error("icedax not found. Please make sure that you have installed icedax.")]
    IcedaxNotFound,
    #[error("Can not read disc in {device}")]
    Disc {
        device: String,
        source: CdDriveError,
    },
    #[error("Failed to read ISRCs: {0}")]
    Icedax(IcedaxError),
    #[error("No ISRCs found, exiting.")]
    NoIsrcs,
    #[error(
        "\nNo release found. Use the following URL to submit the release to MusicBrainz:\n{submission_url}"
    )]
    NoRelease { submission_url: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid MusicBrainz server settings: {0}")]
    Client(MusicBrainzError),
    #[error("MusicBrainz lookup failed: {0}")]
    Lookup(#[from] MusicBrainzError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        1
    }
}

impl From<IcedaxError> for AppError {
    fn from(e: IcedaxError) -> Self {
        match e {
            IcedaxError::NotInstalled => AppError::IcedaxNotFound,
            other => AppError::Icedax(other),
        }
    }
}

async fn icedax_config(config: &Config) -> Result<IcedaxConfig, AppError> {
    match &config.icedax {
        Some(program) if program.exists() => Ok(IcedaxConfig::with_program(program)),
        Some(program) => {
            warn!("Configured icedax {} does not exist", program.display());
            Err(AppError::IcedaxNotFound)
        }
        None => Ok(IcedaxConfig::locate().await?),
    }
}

/// Run the whole program against the real drive and web service.
///
/// Returns the number of tracks whose ISRCs were submitted.
pub async fn run<P>(args: Args, prompt: &mut P) -> Result<usize, AppError>
where
    P: Prompt + ?Sized,
{
    let config = Config::from_args(args);
    let icedax = icedax_config(&config).await?;

    let device = config.drive.device().display().to_string();
    let disc = config.drive.read_disc().map_err(|source| {
        warn!("Reading {} failed: {}", device, source);
        AppError::Disc {
            device: device.clone(),
            source,
        }
    })?;
    prompt.say(&format!("Disc ID: {}", disc.disc_id));

    prompt.say(&format!("Reading ISRCs from {}... ", device));
    let isrcs = read_isrcs(&icedax, &device).await?;
    prompt.say(&format!("{} ISRCs found.", isrcs.found()));
    if isrcs.found() == 0 {
        return Err(AppError::NoIsrcs);
    }

    let client = connect(&config, prompt)?;

    choose_and_submit(&client, &disc, &isrcs, prompt).await
}

/// Build the web service client once credentials are known
fn connect<P>(config: &Config, prompt: &mut P) -> Result<MusicBrainzClient, AppError>
where
    P: Prompt + ?Sized,
{
    let settings = config.credentials(prompt)?;
    MusicBrainzClient::new(settings).map_err(AppError::Client)
}

/// Look up the disc, let the user pick a release and submit its ISRCs
pub async fn choose_and_submit<S, P>(
    service: &S,
    disc: &DiscInfo,
    isrcs: &TrackIsrcs,
    prompt: &mut P,
) -> Result<usize, AppError>
where
    S: MetadataService + ?Sized,
    P: Prompt + ?Sized,
{
    let releases = service.releases_for_disc(&disc.disc_id).await?;
    debug!("{} candidate releases", releases.len());

    let release = match select_release(&releases, prompt) {
        Selection::Release(release) => release,
        Selection::None => {
            return Err(AppError::NoRelease {
                submission_url: disc.submission_url.clone(),
            })
        }
    };

    Ok(submission::submit(service, release, isrcs, prompt).await?)
}
