use anyhow::Result;
use common::{
    config::{Settings, VagrantAction},
    context::MachineContext,
    exit,
    images::ContainerImages,
};

use crate::args::{ContextArgs, Format};

use super::load_cluster;

pub fn context(settings: &Settings, args: &ContextArgs) -> Result<()> {
    let cluster = load_cluster(settings)?;
    let machine = match cluster.machine(&args.machine) {
        Some(m) => m,
        None => exit!(
            format!("no machine named {}", args.machine),
            "Unknown machine {} in cluster {}",
            args.machine,
            cluster.name
        ),
    };

    let images = match ContainerImages::from_file(&settings.container_images_file) {
        Ok(i) => i,
        Err(err) => exit!(err, "Could not load container images"),
    };
    let action = VagrantAction::from_args(args.vagrant_args.iter().cloned());
    let ctx = MachineContext::new(cluster.view(machine), settings, &action, &images);

    let out = match args.format {
        Format::Json => serde_json::to_string_pretty(&ctx)?,
        Format::Yaml => serde_yaml::to_string(&ctx)?,
    };
    println!("{out}");
    Ok(())
}
