//! Build artifact (bitstream) metadata.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Target operating system of a bitstream.
///
/// Unrecognized values are carried through verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Os {
    Mac,
    Win,
    Linux,
    Other(String),
}

impl Os {
    pub fn as_str(&self) -> &str {
        match self {
            Os::Mac => "mac",
            Os::Win => "win",
            Os::Linux => "linux",
            Os::Other(s) => s,
        }
    }
}

impl From<String> for Os {
    fn from(s: String) -> Self {
        match s.as_str() {
            "mac" => Os::Mac,
            "win" => Os::Win,
            "linux" => Os::Linux,
            _ => Os::Other(s),
        }
    }
}

impl From<Os> for String {
    fn from(os: Os) -> Self {
        match os {
            Os::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architecture of a bitstream.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Arch {
    I386,
    Amd64,
    Other(String),
}

impl Arch {
    pub fn as_str(&self) -> &str {
        match self {
            Arch::I386 => "i386",
            Arch::Amd64 => "amd64",
            Arch::Other(s) => s,
        }
    }

    /// Pointer width for the known architectures.
    pub fn bits(&self) -> Option<u8> {
        match self {
            Arch::I386 => Some(32),
            Arch::Amd64 => Some(64),
            Arch::Other(_) => None,
        }
    }
}

impl From<String> for Arch {
    fn from(s: String) -> Self {
        match s.as_str() {
            "i386" => Arch::I386,
            "amd64" => Arch::Amd64,
            _ => Arch::Other(s),
        }
    }
}

impl From<Arch> for String {
    fn from(arch: Arch) -> Self {
        match arch {
            Arch::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the `bitstream` table in the output document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitstreamRecord {
    pub os: Os,
    pub arch: Arch,
    /// Absent for architectures without a known width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bits: Option<u8>,
    /// Up to three dotted components, or empty.
    pub version: String,
    #[serde(with = "int_bool")]
    pub stable: bool,
    /// Checkout (or creation) timestamp, or empty.
    pub checkout: String,
}

/// Booleans travel as `0` / `1` in the document.
mod int_bool {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(u8::deserialize(deserializer)? != 0)
    }
}
