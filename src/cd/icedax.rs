//! ISRC extraction by running icedax in info-only mode

use crate::isrc::Isrc;
use regex::Regex;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::OnceLock;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio_stream::wrappers::SplitStream;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

pub const ICEDAX_PROGRAM: &str = "icedax";

/// Highest track number a CD can carry
pub const MAX_TRACKS: usize = 99;

static ISRC_LINE: OnceLock<Regex> = OnceLock::new();

fn isrc_line_pattern() -> &'static Regex {
    ISRC_LINE.get_or_init(|| {
        Regex::new(r"T:\s+(\d+)\s+ISRC:\s+([A-Z]{2}-?\w{3}-?\d{2}-?\d{5})$")
            .expect("ISRC line pattern is valid")
    })
}

#[derive(Debug, Error)]
pub enum IcedaxError {
    #[error("icedax not found")]
    NotInstalled,
    #[error("Failed to run {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Location of the icedax program, resolved once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct IcedaxConfig {
    pub program: PathBuf,
}

impl IcedaxConfig {
    /// Use an explicitly configured program path
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Find icedax on the PATH
    pub async fn locate() -> Result<Self, IcedaxError> {
        let output = Command::new("which")
            .arg(ICEDAX_PROGRAM)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await;

        let output = match output {
            Ok(output) if output.status.success() => output,
            Ok(_) => return Err(IcedaxError::NotInstalled),
            Err(e) => {
                debug!("Could not run which: {}", e);
                return Err(IcedaxError::NotInstalled);
            }
        };

        let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if path.is_empty() {
            return Err(IcedaxError::NotInstalled);
        }

        debug!(program = %path, "Found icedax");
        Ok(Self::with_program(path))
    }

    /// Arguments for a track-id info run against `device`
    pub fn command_args(&self, device: &str) -> Vec<String> {
        vec![
            "-device".to_string(),
            device.to_string(),
            "--info-only".to_string(),
            "--no-infofile".to_string(),
            "-v".to_string(),
            "trackid".to_string(),
        ]
    }
}

/// ISRCs indexed by track position, with gaps for tracks icedax did not report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackIsrcs {
    slots: Vec<Option<Isrc>>,
}

impl TrackIsrcs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `isrc` for the 1-based `track`. Track 0 and tracks past
    /// [`MAX_TRACKS`] are ignored.
    pub fn insert(&mut self, track: usize, isrc: Isrc) {
        if track > MAX_TRACKS {
            debug!("Ignoring ISRC for track {} beyond the CD limit", track);
            return;
        }
        let Some(index) = track.checked_sub(1) else {
            return;
        };
        if self.slots.len() <= index {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(isrc);
    }

    /// ISRC for the 1-based track position
    pub fn get(&self, position: usize) -> Option<&Isrc> {
        position
            .checked_sub(1)
            .and_then(|index| self.slots.get(index))
            .and_then(|slot| slot.as_ref())
    }

    /// Highest track number seen
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of tracks with an ISRC
    pub fn found(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Present entries as `(position, isrc)`, in track order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Isrc)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|isrc| (index + 1, isrc)))
    }
}

/// Parse one line of icedax output into `(track, isrc)`
pub fn parse_isrc_line(line: &str) -> Option<(usize, Isrc)> {
    let captures = isrc_line_pattern().captures(line.trim_end_matches(['\r', '\n']))?;
    let track: usize = captures[1].parse().ok()?;
    if track == 0 {
        return None;
    }

    match Isrc::parse(&captures[2]) {
        Ok(isrc) => Some((track, isrc)),
        Err(e) => {
            debug!("Ignoring ISRC on track {}: {}", track, e);
            None
        }
    }
}

pub fn collect_isrcs<I, S>(lines: I) -> TrackIsrcs
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut isrcs = TrackIsrcs::new();
    for line in lines {
        if let Some((track, isrc)) = parse_isrc_line(line.as_ref()) {
            isrcs.insert(track, isrc);
        }
    }
    isrcs
}

/// Run icedax against `device` and collect every ISRC it prints.
///
/// stdout and stderr are read together as one line stream until icedax
/// closes both.
pub async fn read_isrcs(config: &IcedaxConfig, device: &str) -> Result<TrackIsrcs, IcedaxError> {
    let args = config.command_args(device);
    debug!(program = %config.program.display(), ?args, "Starting icedax");

    let mut child = Command::new(&config.program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| IcedaxError::Spawn {
            program: config.program.clone(),
            source,
        })?;

    let stdout = child.stdout.take().ok_or_else(|| {
        IcedaxError::Io(std::io::Error::other("icedax stdout was not captured"))
    })?;
    let stderr = child.stderr.take().ok_or_else(|| {
        IcedaxError::Io(std::io::Error::other("icedax stderr was not captured"))
    })?;

    let out_lines = SplitStream::new(BufReader::new(stdout).split(b'\n'));
    let err_lines = SplitStream::new(BufReader::new(stderr).split(b'\n'));
    let mut lines = out_lines.merge(err_lines);

    let mut isrcs = TrackIsrcs::new();
    while let Some(line) = lines.next().await {
        let line = line?;
        let line = String::from_utf8_lossy(&line);
        if let Some((track, isrc)) = parse_isrc_line(&line) {
            debug!("Track {}: ISRC {}", track, isrc.hyphenated());
            isrcs.insert(track, isrc);
        }
    }

    let status = child.wait().await?;
    if !status.success() {
        warn!("icedax exited with {}", status);
    }

    info!("💿 icedax reported {} ISRCs", isrcs.found());
    Ok(isrcs)
}
