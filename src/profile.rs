use crate::errors::{ProfileError, ValidationError};
use crate::space::{DEFAULT_LAST_TWO, DEFAULT_MIDDLE_LEN, DEFAULT_PREFIX, NumberSpace};

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

/// Space parameters as they appear in a profile file or on the command line.
/// Missing fields fall back to the next source, then to the built-in defaults.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpaceData {
    pub prefix: Option<String>,
    pub middle_len: Option<u32>,
    pub last_two: Option<String>,
}

impl SpaceData {
    /// Fills every field left unset in `self` from `fallback`.
    pub fn or(self, fallback: SpaceData) -> SpaceData {
        SpaceData {
            prefix: self.prefix.or(fallback.prefix),
            middle_len: self.middle_len.or(fallback.middle_len),
            last_two: self.last_two.or(fallback.last_two),
        }
    }

    pub fn resolve(self) -> (String, u32, String) {
        (
            self.prefix.unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            self.middle_len.unwrap_or(DEFAULT_MIDDLE_LEN),
            self.last_two.unwrap_or_else(|| DEFAULT_LAST_TWO.to_string()),
        )
    }
}

impl TryFrom<SpaceData> for NumberSpace {
    type Error = ValidationError;

    fn try_from(data: SpaceData) -> Result<Self, Self::Error> {
        let (prefix, middle_len, last_two) = data.resolve();
        NumberSpace::new(&prefix, middle_len, &last_two)
    }
}

pub fn default_profile_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("numspace").join("space.json"))
}

/// Loads `explicit`, or the default profile when it exists, or nothing.
pub fn load(explicit: Option<&Path>) -> Result<SpaceData, ProfileError> {
    match explicit {
        Some(path) => read_profile(path),
        None => match default_profile_path() {
            Some(path) if path.is_file() => read_profile(&path),
            _ => Ok(SpaceData::default()),
        },
    }
}

fn read_profile(path: &Path) -> Result<SpaceData, ProfileError> {
    let file = File::open(path)?;

    let data: SpaceData = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| ProfileError::new(format!("could not parse {}: {}", path.display(), e)))?;

    debug!(profile = %path.display(), ?data, "loaded space profile");

    Ok(data)
}
