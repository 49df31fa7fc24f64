use anyhow::Result;
use common::{
    checks::{check_images, check_kubernetes, check_packages},
    cluster::Cluster,
    config::Settings,
    profile::Profile,
    status::{step, IMAGES, KUBERNETES, PACKAGES, PROFILE},
};
use tracing::info;

pub fn check(settings: &Settings) -> Result<()> {
    let profile_name = settings.profile.clone().unwrap_or_default();
    let cluster = step(PROFILE, &profile_name, || {
        let profile = Profile::load(settings.profile.as_deref(), &settings.profiles_dir)?;
        Cluster::from_profile(&profile)
    })?;
    info!(
        "cluster {} has {} machines",
        cluster.name,
        cluster.machines().len()
    );

    let packages = settings.packages();
    let images = settings.images();
    if packages.is_empty() && images.is_empty() {
        info!("no packages or images selected, skipping kubernetes checks");
        return Ok(());
    }

    let tree = settings.kubernetes();
    let context = tree.root().display().to_string();
    step(KUBERNETES, &context, || check_kubernetes(&tree))?;
    if !packages.is_empty() {
        step(PACKAGES, &packages.join(","), || {
            check_packages(&tree, &packages)
        })?;
    }
    if !images.is_empty() {
        step(IMAGES, &images.join(","), || check_images(&tree, &images))?;
    }
    Ok(())
}
