use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerImage {
    #[serde(default)]
    pub repository: Option<String>,
    pub name: String,
    pub tag: String,
}

impl ContainerImage {
    /// `[<repository>/]<name>:<tag>`
    pub fn reference(&self) -> String {
        match self.repository.as_deref() {
            Some(repo) if !repo.is_empty() => format!("{repo}/{}:{}", self.name, self.tag),
            _ => format!("{}:{}", self.name, self.tag),
        }
    }
}

/// Catalogue of the container images baked into the base box, keyed by a
/// short name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerImages(BTreeMap<String, ContainerImage>);

impl ContainerImages {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigurationError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    pub fn container_ref(&self, name: &str) -> Option<String> {
        self.0.get(name).map(ContainerImage::reference)
    }

    pub fn refs(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.reference()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogue() -> ContainerImages {
        serde_json::from_str(
            r#"{
                "etcd": {"repository": "k8s.gcr.io", "name": "etcd-amd64", "tag": "3.2.18"},
                "flannel": {"repository": "", "name": "flannel", "tag": "v0.10.0-amd64"},
                "pause": {"name": "pause-amd64", "tag": "3.1"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn references() {
        let images = catalogue();
        assert_eq!(
            images.container_ref("etcd").unwrap(),
            "k8s.gcr.io/etcd-amd64:3.2.18"
        );
        assert_eq!(
            images.container_ref("flannel").unwrap(),
            "flannel:v0.10.0-amd64"
        );
        assert_eq!(images.container_ref("pause").unwrap(), "pause-amd64:3.1");
        assert_eq!(images.container_ref("coredns"), None);
        assert_eq!(images.refs().len(), 3);
    }
}
