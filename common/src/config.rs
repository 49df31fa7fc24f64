use std::path::PathBuf;

use tracing::debug;

use crate::paths::KubernetesTree;

pub const PACKAGES: &[&str] = &["cri-tools", "kubeadm", "kubectl", "kubelet", "kubernetes-cni"];
pub const IMAGES: &[&str] = &[
    "kube-apiserver",
    "kube-controller-manager",
    "kube-proxy",
    "kube-scheduler",
];
pub const MANIFESTS: &[&str] = &["flannel"];

const DEFAULT_MANIFESTS: &str = "flannel";
const DEFAULT_PROFILES_DIR: &str = "profiles";
const DEFAULT_CONTAINER_IMAGES: &str = "base-box/configs/container_images.json";

/// Settings read from the environment once per invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub profile: Option<String>,
    pub profiles_dir: PathBuf,
    pub gopath: PathBuf,
    pub container_images_file: PathBuf,
    pub packages: Option<String>,
    pub images: Option<String>,
    pub manifests: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let gopath = lookup("GOPATH")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| home::home_dir().unwrap_or_default().join("go"));

        let settings = Settings {
            profile: lookup("PROFILE"),
            profiles_dir: lookup("PROFILES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROFILES_DIR)),
            gopath,
            container_images_file: lookup("CONTAINER_IMAGES")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTAINER_IMAGES)),
            packages: lookup("PACKAGES"),
            images: lookup("IMAGES"),
            manifests: lookup("MANIFESTS"),
        };
        debug!("{settings:?}");
        settings
    }

    pub fn kubernetes_dir(&self) -> PathBuf {
        self.gopath.join("src/k8s.io/kubernetes")
    }

    pub fn kubernetes(&self) -> KubernetesTree {
        KubernetesTree::new(self.kubernetes_dir())
    }

    pub fn packages(&self) -> Vec<String> {
        select(self.packages.as_deref(), PACKAGES, "")
    }

    pub fn images(&self) -> Vec<String> {
        select(self.images.as_deref(), IMAGES, "")
    }

    /// Manifests to apply. Without an explicit selection, the default
    /// manifests are only applied when machines are being brought up.
    pub fn manifests(&self, action: &VagrantAction) -> Vec<String> {
        let default = if action.is_up() { DEFAULT_MANIFESTS } else { "" };
        select(self.manifests.as_deref(), MANIFESTS, default)
    }
}

fn select(value: Option<&str>, all: &[&str], default: &str) -> Vec<String> {
    match value {
        Some("all") => all.iter().map(|s| s.to_string()).collect(),
        v => v
            .unwrap_or(default)
            .split(',')
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect(),
    }
}

/// What the surrounding Vagrant invocation is doing, derived from its
/// command line arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VagrantAction {
    args: Vec<String>,
}

impl VagrantAction {
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn has(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }

    /// Machines are being created or rebuilt.
    pub fn is_up(&self) -> bool {
        self.has("up") || (self.has("reload") && self.has("--provision"))
    }

    pub fn is_provisioning(&self) -> bool {
        self.is_up() || self.has("provision")
    }
}
