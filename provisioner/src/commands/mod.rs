use anyhow::Result;
use common::{cluster::Cluster, config::Settings, exit, profile::Profile};

pub mod check;
pub mod context;
pub mod ls;
pub mod version;

/// Loads the profile named by the settings and builds its cluster.
pub fn load_cluster(settings: &Settings) -> Result<Cluster> {
    let profile = match Profile::load(settings.profile.as_deref(), &settings.profiles_dir) {
        Ok(p) => p,
        Err(err) => exit!(err, "Could not load profile"),
    };
    match Cluster::from_profile(&profile) {
        Ok(c) => Ok(c),
        Err(err) => exit!(err, "Invalid profile"),
    }
}
