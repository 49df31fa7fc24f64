use anyhow::Result;
use common::config::Settings;

use super::load_cluster;

pub fn list(settings: &Settings) -> Result<()> {
    let cluster = load_cluster(settings)?;
    for machine in cluster.machines() {
        let view = cluster.view(machine);
        let marker = if view.is_init_master() { " (init)" } else { "" };
        println!(
            "{:<32} {:<13} {}{}",
            view.full_name(),
            machine.role,
            machine.ip,
            marker
        );
    }
    println!(
        "control plane: {}",
        if cluster.is_highly_available() {
            "highly available"
        } else {
            "single master"
        }
    );
    Ok(())
}
