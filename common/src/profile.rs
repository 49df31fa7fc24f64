use std::{
    fs,
    net::IpAddr,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigurationError;

/// The JSON document describing a cluster's desired topology.
///
/// Every field is optional here so that building a `Cluster` can name the
/// exact field that is missing instead of surfacing a generic parse error.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Profile {
    pub cluster: Option<ClusterProfile>,
    pub machines: Option<Vec<MachineProfile>>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ClusterProfile {
    pub name: Option<String>,
    pub token: Option<String>,
    pub bootstrap: Option<bool>,
    pub network: Option<NetworkProfile>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NetworkProfile {
    pub pod_subnet: Option<String>,
    pub service_subnet: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MachineProfile {
    pub name: Option<String>,
    pub role: Option<String>,
    pub ip: Option<IpAddr>,
}

impl Profile {
    pub fn from_json_str(input: &str, path: &Path) -> Result<Self, ConfigurationError> {
        serde_json::from_str(input).map_err(|source| ConfigurationError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.to_owned(),
            source,
        })?;
        let profile = Self::from_json_str(&content, path)?;
        info!("profile {} parsed", path.display());
        Ok(profile)
    }

    /// Resolves `name` and parses the profile it points to.
    pub fn load(name: Option<&str>, profiles_dir: &Path) -> Result<Self, ConfigurationError> {
        Self::from_file(locate(name, profiles_dir)?)
    }
}

/// Finds the profile file for `name`. A path that exists as given wins over a
/// named profile inside `profiles_dir`.
pub fn locate(name: Option<&str>, profiles_dir: &Path) -> Result<PathBuf, ConfigurationError> {
    let name = match name {
        Some(n) if !n.is_empty() => n,
        _ => return Err(ConfigurationError::ProfileNotSet),
    };

    let direct = PathBuf::from(name);
    if direct.is_file() {
        return Ok(direct);
    }

    let candidate = profiles_dir.join(format!("{name}.json"));
    if candidate.is_file() {
        return Ok(candidate);
    }

    Err(ConfigurationError::ProfileNotFound {
        name: name.to_owned(),
        candidate,
    })
}
