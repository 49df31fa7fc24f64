use std::{
    fs,
    path::{Path, PathBuf},
};

use regex::Regex;

use crate::error::CheckError;

const VERSION_DEFS: &str = ".dockerized-kube-version-defs";
const GUEST_KUBERNETES: &str = "/home/vagrant/kubernetes";
const GUEST_KUBEADM_CONFIG: &str = "/home/vagrant/kubeadm/config";
const GUEST_MANIFESTS: &str = "/home/vagrant/manifests";

lazy_static::lazy_static! {
    static ref FULL_VERSION: Regex = Regex::new(r"(?m)^KUBE_GIT_VERSION='([^']+)'$").unwrap();
    static ref SHORT_VERSION: Regex = Regex::new(r"(?m)^KUBE_GIT_VERSION='([^-']+)").unwrap();
}

/// Host side paths inside a Kubernetes checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KubernetesTree {
    root: PathBuf,
}

impl KubernetesTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    pub fn package_path(&self, package: &str) -> PathBuf {
        self.path(&format!("bazel-bin/build/debs/{package}.deb"))
    }

    pub fn image_path(&self, image: &str) -> PathBuf {
        self.path(&format!("_output/release-images/amd64/{image}.tar"))
    }

    /// The complete git version, with `+` replaced so it can be used in
    /// image tags.
    pub fn full_kubernetes_version(&self) -> Result<String, CheckError> {
        let defs = self.version_defs()?;
        capture(&FULL_VERSION, &defs)
            .map(|v| v.replace('+', "_"))
            .ok_or_else(|| self.version_not_found())
    }

    /// The release part of the git version, up to the first `-`.
    pub fn kubernetes_version(&self) -> Result<String, CheckError> {
        let defs = self.version_defs()?;
        capture(&SHORT_VERSION, &defs).ok_or_else(|| self.version_not_found())
    }

    fn version_defs(&self) -> Result<String, CheckError> {
        let path = self.path(VERSION_DEFS);
        fs::read_to_string(&path).map_err(|source| CheckError::Io { path, source })
    }

    fn version_not_found(&self) -> CheckError {
        CheckError::VersionNotFound {
            path: self.path(VERSION_DEFS),
        }
    }
}

fn capture(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_owned())
}

pub fn kubernetes_target_path(path: Option<&str>) -> String {
    match path {
        Some(p) => format!("{GUEST_KUBERNETES}/{p}"),
        None => GUEST_KUBERNETES.to_owned(),
    }
}

pub fn kubeadm_config_target_path(path: &str) -> String {
    format!("{GUEST_KUBEADM_CONFIG}/{path}")
}

pub fn manifests_config_target_path(path: &str) -> String {
    format!("{GUEST_MANIFESTS}/{path}")
}
