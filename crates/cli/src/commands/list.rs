use std::path::Path;

use anyhow::Result;
use ddev_core::registry::ProjectRegistry;
use ddev_core::runtime::DockerRuntime;
use ddev_core::{present, status};

pub async fn execute(projects_root: &Path, json: bool) -> Result<()> {
    let runtime = DockerRuntime::connect()?;
    let registry = ProjectRegistry::new(projects_root);

    let projects = registry.list_all(&runtime).await?;
    if projects.is_empty() {
        println!("{}", present::NO_PROJECTS_MESSAGE);
        return Ok(());
    }

    // Single aggregation pass; a describe failure aborts the whole listing
    // attributed to that project, and no table is printed.
    let mut descriptors = Vec::with_capacity(projects.len());
    for project in &projects {
        descriptors.push(status::describe(&runtime, project).await?);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&descriptors)?);
        return Ok(());
    }

    let router = status::router_status(&runtime).await?;
    println!("{}", present::build_table(&descriptors));
    println!("{}", present::render_router_status(&router));
    Ok(())
}
