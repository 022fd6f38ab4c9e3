//! # Buoy Observations
//!
//! Station data arrives in one of three shapes:
//!
//! - **NOAA realtime text** (`<station>_5day.txt` from ndbc.noaa.gov): a
//!   whitespace-separated table, newest row first, with a header line and a
//!   units line. Parsed by [`parse_noaa_realtime`].
//! - **Report document** (JSON): `{"stations": [StationReport, ...]}`, each
//!   report already carrying the headline fields and an hourly height profile.
//! - **Headline lines**: one `<+|-><label>` line per station, e.g.
//!   `+Bodega Bay 10.2' @ 13s at 2:50 PM`. No chart data.
//!
//! Wave heights are stored in feet; NOAA publishes metres.

use chrono::{DateTime, Duration, Local, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};
use thiserror::Error;
use tracing::{debug, info};

const METERS_TO_FEET: f32 = 3.28084;

#[derive(Error, Debug)]
pub enum ObservationError {
    #[error("observation IO: {0}")]
    Io(#[from] io::Error),

    #[error("invalid report document: {0}")]
    Json(#[from] serde_json::Error),

    /// The text had no header line
    #[error("missing header line")]
    MissingHeader,

    /// A required column is absent from the header
    #[error("missing column '{0}'")]
    MissingColumn(&'static str),

    /// A headline line without a leading `+` or `-`
    #[error("line {line}: expected '+' or '-' prefix in {content:?}")]
    BadLine { line: usize, content: String },

    #[error("no usable observations for station '{0}'")]
    NoObservations(String),
}

/// One buoy reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub time: DateTime<Local>,
    /// Significant wave height in feet
    pub wave_height: f32,
    /// Dominant wave period in seconds
    pub period: f32,
}

/// Readings for one station, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observations {
    observations: Vec<Observation>,
}

impl Observations {
    /// `observations` must already be ordered newest first.
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn as_slice(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn has_latest(&self) -> bool {
        !self.observations.is_empty()
    }

    pub fn latest(&self) -> Option<&Observation> {
        self.observations.first()
    }

    pub fn latest_time(&self) -> Option<DateTime<Local>> {
        self.latest().map(|o| o.time)
    }

    /// Whether the latest height is at least the one before it. A history
    /// shorter than two readings counts as rising.
    pub fn wave_height_up(&self) -> bool {
        match self.observations.as_slice() {
            [latest, previous, ..] => latest.wave_height >= previous.wave_height,
            _ => true,
        }
    }

    /// True when this history has a reading later than anything in `other`.
    pub fn newer_than(&self, other: &Observations) -> bool {
        match (self.latest_time(), other.latest_time()) {
            (Some(mine), Some(theirs)) => mine > theirs,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// One reading per clock hour for the `n` hours ending with the latest
    /// reading's hour, oldest first.
    ///
    /// Each hour uses its most recent reading. An hour without readings
    /// borrows the nearest newer one, so gaps repeat the value that follows
    /// them.
    pub fn one_per_hour(&self, n: usize) -> Vec<Observation> {
        let Some(latest) = self.latest() else {
            return Vec::new();
        };
        let top = start_of_hour(latest.time);

        let mut hourly: Vec<Observation> = (0..n)
            .map(|k| {
                let start = top - Duration::hours(k as i64);
                let end = start + Duration::hours(1);
                self.observations
                    .iter()
                    .find(|o| o.time >= start && o.time < end)
                    .or_else(|| self.observations.iter().rev().find(|o| o.time >= end))
                    .unwrap_or(latest)
                    .clone()
            })
            .collect();
        hourly.reverse();
        hourly
    }
}

fn start_of_hour(time: DateTime<Local>) -> DateTime<Local> {
    time.with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

/// Column positions of the fields used from a NOAA realtime table.
struct Columns {
    year: usize,
    month: usize,
    day: usize,
    hour: usize,
    minute: usize,
    wave_height: usize,
    period: usize,
}

impl Columns {
    fn from_header(header: &str) -> Result<Self, ObservationError> {
        let names: Vec<&str> = header.split_whitespace().collect();
        let find = |name: &'static str| {
            names
                .iter()
                .position(|n| *n == name)
                .ok_or(ObservationError::MissingColumn(name))
        };
        Ok(Self {
            year: find("#YY")?,
            month: find("MM")?,
            day: find("DD")?,
            hour: find("hh")?,
            minute: find("mm")?,
            wave_height: find("WVHT")?,
            period: find("DPD")?,
        })
    }

    fn parse_row(&self, row: &str) -> Option<Observation> {
        let words: Vec<&str> = row.split_whitespace().collect();

        let year = field::<i32>(&words, self.year, 1970, 2500)?;
        let month = field::<u32>(&words, self.month, 1, 12)?;
        let day = field::<u32>(&words, self.day, 1, 31)?;
        let hour = field::<u32>(&words, self.hour, 0, 23)?;
        let minute = field::<u32>(&words, self.minute, 0, 59)?;
        let wave_height = field::<f32>(&words, self.wave_height, 0.0, 98.0)?;
        let period = field::<f32>(&words, self.period, 0.0, 98.0)?;

        let utc = Utc
            .with_ymd_and_hms(year, month, day, hour, minute, 0)
            .single()?;

        Some(Observation {
            time: utc.with_timezone(&Local),
            wave_height: wave_height * METERS_TO_FEET,
            period,
        })
    }
}

/// Parse `words[index]` and keep it only when it lies in `min..=max`.
/// NOAA marks missing values with `MM`, which fails the parse.
fn field<T>(words: &[&str], index: usize, min: T, max: T) -> Option<T>
where
    T: std::str::FromStr + PartialOrd,
{
    let value = words.get(index)?.parse::<T>().ok()?;
    (min <= value && value <= max).then_some(value)
}

/// Parse a NOAA realtime text table. Rows with a missing or out-of-range
/// field are skipped.
pub fn parse_noaa_realtime(text: &str) -> Result<Observations, ObservationError> {
    let mut lines = text.lines();
    let header = lines
        .next()
        .filter(|l| !l.trim().is_empty())
        .ok_or(ObservationError::MissingHeader)?;
    let columns = Columns::from_header(header)?;

    // units line
    lines.next();

    let mut skipped = 0;
    let observations: Vec<Observation> = lines
        .filter_map(|row| {
            let parsed = columns.parse_row(row);
            if parsed.is_none() {
                skipped += 1;
            }
            parsed
        })
        .collect();

    debug!(kept = observations.len(), skipped, "parsed NOAA rows");
    Ok(Observations::new(observations))
}

pub fn load_noaa_file<P: AsRef<Path>>(path: P) -> Result<Observations, ObservationError> {
    let text = fs::read_to_string(&path)?;
    let observations = parse_noaa_realtime(&text)?;
    info!(
        "Loaded {} observation(s) from {}",
        observations.len(),
        path.as_ref().display()
    );
    Ok(observations)
}

/// Everything shown for one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationReport {
    pub name: String,
    /// Feet
    pub wave_height: f32,
    /// Seconds
    pub period: f32,
    pub rising: bool,
    pub time: DateTime<Local>,
    /// Hourly heights, oldest first, one per chart column
    #[serde(default)]
    pub profile: Vec<f32>,
}

impl StationReport {
    /// Summarise a station history. `None` when there are no readings.
    pub fn from_observations(
        name: &str,
        observations: &Observations,
        columns: usize,
    ) -> Option<Self> {
        let latest = observations.latest()?;
        Some(Self {
            name: name.to_string(),
            wave_height: latest.wave_height,
            period: latest.period,
            rising: observations.wave_height_up(),
            time: latest.time,
            profile: observations
                .one_per_hour(columns)
                .iter()
                .map(|o| o.wave_height)
                .collect(),
        })
    }

    /// e.g. `Bodega Bay 10.2' @ 13s at 2:50 PM`
    pub fn headline(&self) -> String {
        format!(
            "{} {:.1}' @ {:.0}s at {}",
            self.name,
            self.wave_height,
            self.period,
            self.time.format("%-I:%M %p")
        )
    }

    /// Headline with its trend sign, in the line format read by [`Headline::parse`].
    pub fn format_line(&self) -> String {
        let sign = if self.rising { '+' } else { '-' };
        format!("{}{}", sign, self.headline())
    }
}

impl From<&StationReport> for Headline {
    fn from(report: &StationReport) -> Self {
        Headline {
            rising: report.rising,
            label: report.headline(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ReportDocument {
    pub stations: Vec<StationReport>,
}

pub fn load_reports<P: AsRef<Path>>(path: P) -> Result<Vec<StationReport>, ObservationError> {
    let text = fs::read_to_string(&path)?;
    let document: ReportDocument = serde_json::from_str(&text)?;
    info!(
        "Loaded {} station report(s) from {}",
        document.stations.len(),
        path.as_ref().display()
    );
    Ok(document.stations)
}

/// A trend flag and the text to scroll.
#[derive(Debug, Clone, PartialEq)]
pub struct Headline {
    pub rising: bool,
    pub label: String,
}

impl Headline {
    /// Parse one `<+|-><label>` line. `line` is 1-based, for the error.
    pub fn parse(line: usize, content: &str) -> Result<Self, ObservationError> {
        let content = content.trim_end();
        let rising = match content.chars().next() {
            Some('+') => true,
            Some('-') => false,
            _ => {
                return Err(ObservationError::BadLine {
                    line,
                    content: content.to_string(),
                })
            }
        };
        Ok(Self {
            rising,
            label: content[1..].to_string(),
        })
    }

    /// Parse every non-blank line.
    pub fn parse_lines(text: &str) -> Result<Vec<Self>, ObservationError> {
        text.lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty())
            .map(|(i, l)| Self::parse(i + 1, l))
            .collect()
    }
}

pub fn load_headlines<P: AsRef<Path>>(path: P) -> Result<Vec<Headline>, ObservationError> {
    let text = fs::read_to_string(&path)?;
    let headlines = Headline::parse_lines(&text)?;
    info!(
        "Loaded {} headline(s) from {}",
        headlines.len(),
        path.as_ref().display()
    );
    Ok(headlines)
}
