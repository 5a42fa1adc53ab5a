/*!
 * Scene heading (slug line) parsing.
 *
 * A heading is `INT. LOCATION - TIME`. The location may itself contain
 * dashes (`HOUSE - KITCHEN - NIGHT`); the time of day is whatever follows the
 * last dash.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static HEADING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(INT\.?\s*/\s*EXT\.?|EXT\.?\s*/\s*INT\.?|I\s*/\s*E\.?|INT\.?|EXT\.?)\s+(.+)\s+[-–—]+\s+([^-–—]+?)\s*$",
    )
    .expect("valid heading regex")
});

/// Interior/exterior tag of a scene heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Setting {
    Interior,
    Exterior,
    InteriorExterior,
}

impl Setting {
    /// Tag as printed in the heading, without the trailing period
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Interior => "INT",
            Self::Exterior => "EXT",
            Self::InteriorExterior => "INT./EXT",
        }
    }

    fn from_tag(tag: &str) -> Self {
        let tag = tag.to_uppercase();
        if tag.contains('/') {
            Self::InteriorExterior
        } else if tag.starts_with("EXT") {
            Self::Exterior
        } else {
            Self::Interior
        }
    }
}

/// Parsed scene heading
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneHeading {
    /// INT / EXT tag
    pub setting: Setting,
    /// Location as written
    pub location: String,
    /// Time of day as written
    pub time_of_day: String,
}

impl SceneHeading {
    /// Create a heading from its parts
    pub fn new(setting: Setting, location: impl Into<String>, time_of_day: impl Into<String>) -> Self {
        Self {
            setting,
            location: location.into(),
            time_of_day: time_of_day.into(),
        }
    }

    /// Location compared case- and whitespace-insensitively
    pub fn normalized_location(&self) -> String {
        normalize(&self.location)
    }

    /// Time of day compared case- and whitespace-insensitively
    pub fn normalized_time(&self) -> String {
        normalize(&self.time_of_day)
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

impl fmt::Display for SceneHeading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}. {} - {}",
            self.setting.tag(),
            normalize(&self.location),
            normalize(&self.time_of_day)
        )
    }
}

impl FromStr for SceneHeading {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = HEADING_REGEX
            .captures(s)
            .ok_or_else(|| format!("scene heading {:?} is not INT./EXT. LOCATION - TIME", s))?;

        let location = caps[2].trim().trim_start_matches('.').trim();
        let time_of_day = caps[3].trim();
        if location.is_empty() || time_of_day.is_empty() {
            return Err(format!("scene heading {:?} has an empty location or time", s));
        }

        Ok(Self::new(Setting::from_tag(&caps[1]), location, time_of_day))
    }
}
