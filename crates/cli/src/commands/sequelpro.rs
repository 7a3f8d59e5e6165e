use std::path::Path;

use anyhow::{bail, Result};
use colored::*;
use ddev_core::registry::ProjectRegistry;
use ddev_core::runtime::DockerRuntime;
use ddev_core::sequelpro::{self, SequelproCommand, SEQUELPRO_UNAVAILABLE};

pub async fn execute(variant: SequelproCommand, projects_root: &Path) -> Result<()> {
    // The stub's diagnostic is fixed, whatever arguments were given. Absent
    // never reaches dispatch; clap rejects the unknown command first.
    match variant {
        SequelproCommand::Functional => {}
        SequelproCommand::Stub | SequelproCommand::Absent => bail!(SEQUELPRO_UNAVAILABLE),
    }

    let runtime = DockerRuntime::connect()?;
    let registry = ProjectRegistry::new(projects_root);

    sequelpro::run_sequelpro(&runtime, &registry, None).await?;
    println!("{}", "sequelpro command finished successfully!".green());
    Ok(())
}
