use super::Error;
use serde::{de, Deserialize, Deserializer};
use std::{fmt, str::FromStr};

/// Data format requested from the API. Selects the extension appended to every url and how the
/// response body is decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// `.json`, bodies are parsed into `serde_json::Value`
    Json,
    /// `.xml`, bodies are returned as unparsed text
    Xml,
    /// No extension, bodies are returned as unparsed text
    None,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
            Format::None => "",
        }
    }
}

impl Default for Format {
    fn default() -> Self {
        Format::Json
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Format::Json),
            "xml" => Ok(Format::Xml),
            "" => Ok(Format::None),
            other => Err(Error::UnknownFormat(other.to_owned())),
        }
    }
}

impl<'de> Deserialize<'de> for Format {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
