use std::path::PathBuf;

use tracing::info;

use crate::{error::CheckError, paths::KubernetesTree};

pub fn check_kubernetes(tree: &KubernetesTree) -> Result<(), CheckError> {
    if !tree.root().is_dir() {
        return Err(CheckError::KubernetesNotCloned {
            path: tree.root().to_owned(),
        });
    }
    info!("kubernetes checkout found at {}", tree.root().display());
    Ok(())
}

pub fn check_packages(tree: &KubernetesTree, packages: &[String]) -> Result<(), CheckError> {
    let missing = missing(packages, |p| tree.package_path(p));
    if !missing.is_empty() {
        return Err(CheckError::MissingPackages {
            missing,
            kubernetes: tree.root().to_owned(),
        });
    }
    Ok(())
}

pub fn check_images(tree: &KubernetesTree, images: &[String]) -> Result<(), CheckError> {
    let missing = missing(images, |i| tree.image_path(i));
    if !missing.is_empty() {
        return Err(CheckError::MissingImages {
            missing,
            kubernetes: tree.root().to_owned(),
        });
    }
    Ok(())
}

fn missing(names: &[String], path: impl Fn(&str) -> PathBuf) -> Vec<String> {
    names
        .iter()
        .filter(|n| !path(n).exists())
        .cloned()
        .collect()
}
