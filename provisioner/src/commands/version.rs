use anyhow::Result;
use common::{checks::check_kubernetes, config::Settings, exit};

use crate::args::VersionArgs;

pub fn version(settings: &Settings, args: &VersionArgs) -> Result<()> {
    let tree = settings.kubernetes();
    check_kubernetes(&tree)?;
    let version = if args.full {
        tree.full_kubernetes_version()
    } else {
        tree.kubernetes_version()
    };
    match version {
        Ok(v) => println!("{v}"),
        Err(err) => exit!(err, "Could not read kubernetes version"),
    }
    Ok(())
}
