use std::path::PathBuf;

use thiserror::Error;

/// Raised while locating, reading or interpreting a profile. Construction of a
/// cluster either fully succeeds or fails with one of these.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Please, set PROFILE envvar to point to a JSON profile (some examples can be found inside the profiles directory)")]
    ProfileNotSet,
    #[error("Profile {} does not exist, and {name} wasn't found either", .candidate.display())]
    ProfileNotFound { name: String, candidate: PathBuf },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("missing required field `{0}`")]
    MissingField(String),
    #[error("machine {machine} has unknown role `{role}`, expected one of loadbalancer, master, worker")]
    UnknownRole { machine: String, role: String },
    #[error("machine name {0} is used more than once")]
    DuplicateMachine(String),
}

/// Raised by the host environment checks run before provisioning.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Kubernetes not cloned under {}; please, run `git clone git@github.com:kubernetes/kubernetes.git {}`", .path.display(), .path.display())]
    KubernetesNotCloned { path: PathBuf },
    #[error("Missing packages: {}; please, run `bazel build //build/debs` from {}", .missing.join(", "), .kubernetes.display())]
    MissingPackages {
        missing: Vec<String>,
        kubernetes: PathBuf,
    },
    #[error("Missing images: {}; please, run `KUBE_BUILD_HYPERKUBE=n KUBE_BUILD_CONFORMANCE=n make quick-release-images` from {}", .missing.join(", "), .kubernetes.display())]
    MissingImages {
        missing: Vec<String>,
        kubernetes: PathBuf,
    },
    #[error("could not find KUBE_GIT_VERSION in {}", .path.display())]
    VersionNotFound { path: PathBuf },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
