use crate::cd::CdDrive;
use crate::musicbrainz::{ClientSettings, DEFAULT_HOST};
use crate::prompt::Prompt;
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

/// Submit ISRCs from an audio CD to MusicBrainz
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "isrc-submit", version, about)]
pub struct Args {
    /// CD device
    #[arg(short = 'r', long, value_name = "DEVICE")]
    pub device: Option<PathBuf>,

    /// MusicBrainz username
    #[arg(short, long, value_name = "USERNAME", env = "ISRC_SUBMIT_USERNAME")]
    pub username: Option<String>,

    /// MusicBrainz password
    #[arg(
        short,
        long,
        value_name = "PASSWORD",
        env = "ISRC_SUBMIT_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// MusicBrainz server host, or base URL for a local test server
    #[arg(long, value_name = "HOST", default_value = DEFAULT_HOST)]
    pub server: String,

    /// Path to icedax instead of searching the PATH
    #[arg(long, value_name = "PATH", env = "ISRC_SUBMIT_ICEDAX")]
    pub icedax: Option<PathBuf>,

    /// Log progress to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No {0} entered, exiting.")]
    Aborted(&'static str),
}

/// Settings taken from flags and the environment.
///
/// Credentials may still be missing here; [`Config::credentials`] asks for them.
#[derive(Debug, Clone)]
pub struct Config {
    pub drive: CdDrive,
    pub server: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub icedax: Option<PathBuf>,
}

/// Load a `.env` file in dev mode, so it can supply credentials.
///
/// Runs before argument parsing. Returns whether a file was loaded.
pub fn load_dotenv() -> bool {
    cfg!(debug_assertions) && dotenvy::dotenv().is_ok()
}

impl Args {
    /// Default log filter when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}

impl Config {
    pub fn from_args(args: Args) -> Self {
        // libdiscid's default device when no -r is given
        let drive = match args.device {
            Some(device) => CdDrive::new(device),
            None => CdDrive::default_device(),
        };

        Self {
            drive,
            server: args.server,
            username: non_empty(args.username),
            password: non_empty(args.password),
            icedax: args.icedax,
        }
    }

    /// Web service settings, asking for any missing credential.
    ///
    /// The password is never echoed. Closing the prompt (Ctrl-C or end of
    /// input) aborts with [`ConfigError::Aborted`].
    pub fn credentials<P>(&self, prompt: &mut P) -> Result<ClientSettings, ConfigError>
    where
        P: Prompt + ?Sized,
    {
        let username = match &self.username {
            Some(username) => username.clone(),
            None => prompt
                .ask("Username: ")
                .ok_or(ConfigError::Aborted("username"))?,
        };
        let password = match &self.password {
            Some(password) => password.clone(),
            None => prompt
                .ask_secret("Password: ")
                .ok_or(ConfigError::Aborted("password"))?,
        };

        Ok(ClientSettings {
            host: self.server.clone(),
            username,
            password,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
