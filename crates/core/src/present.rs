//! Table and router-status rendering
//!
//! Pure projections over already-aggregated data: the table renders
//! descriptors in the order given, the router line is independent of the
//! project loop. Callers are responsible for the empty case; the table
//! builder is never invoked with zero descriptors.

use crate::runtime::ContainerState;
use crate::status::{ProjectDescriptor, RouterStatus};

const COLUMNS: [&str; 5] = ["NAME", "STATUS", "LOCATION", "URL", "PORTS"];

/// Printed instead of the table when no projects exist; that case exits with
/// success and never reaches the table builder.
pub const NO_PROJECTS_MESSAGE: &str = "There are no running ddev applications.";

/// Render descriptors as a plain-text table, one data row per descriptor,
/// input order preserved.
pub fn build_table(descriptors: &[ProjectDescriptor]) -> String {
    let mut widths: Vec<usize> = COLUMNS.iter().map(|header| header.len()).collect();
    for descriptor in descriptors {
        for (i, (_, value)) in descriptor.fields().iter().enumerate() {
            widths[i] = widths[i].max(value.len());
        }
    }

    let mut lines = Vec::with_capacity(descriptors.len() + 1);
    lines.push(render_row(&COLUMNS, &widths));
    for descriptor in descriptors {
        let cells: Vec<&str> = descriptor
            .fields()
            .iter()
            .map(|(_, value)| *value)
            .collect();
        lines.push(render_row(&cells, &widths));
    }
    lines.join("\n")
}

/// One line summarizing the shared router, appended after the table.
pub fn render_router_status(status: &RouterStatus) -> String {
    match status.state {
        Some(ContainerState::Running) if !status.published_ports.is_empty() => {
            let ports: Vec<String> = status
                .published_ports
                .iter()
                .map(u16::to_string)
                .collect();
            format!("DDEV ROUTER STATUS: running (ports {})", ports.join(", "))
        }
        Some(ContainerState::Running) => "DDEV ROUTER STATUS: running".to_string(),
        Some(ContainerState::Paused) => "DDEV ROUTER STATUS: paused".to_string(),
        Some(ContainerState::Exited) => "DDEV ROUTER STATUS: stopped".to_string(),
        None => "DDEV ROUTER STATUS: not running".to_string(),
    }
}

fn render_row(cells: &[&str], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        if i + 1 < cells.len() {
            for _ in cell.len()..widths[i] {
                line.push(' ');
            }
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str) -> ProjectDescriptor {
        ProjectDescriptor {
            name: name.to_string(),
            status: "running".to_string(),
            location: format!("/projects/{name}"),
            url: format!("http://{name}.ddev.local"),
            ports: "web:80->32768".to_string(),
        }
    }

    #[test]
    fn test_table_has_header_and_one_row_per_descriptor() {
        let descriptors = vec![descriptor("site1"), descriptor("site2")];
        let table = build_table(&descriptors);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("NAME"));
        assert!(lines[1].starts_with("site1"));
        assert!(lines[2].starts_with("site2"));
    }

    #[test]
    fn test_table_preserves_input_order() {
        let descriptors = vec![descriptor("zulu"), descriptor("alpha")];
        let table = build_table(&descriptors);
        let lines: Vec<&str> = table.lines().collect();

        assert!(lines[1].starts_with("zulu"));
        assert!(lines[2].starts_with("alpha"));
    }

    #[test]
    fn test_columns_are_aligned() {
        let mut long = descriptor("a-rather-long-project-name");
        long.status = "stopped".to_string();
        let descriptors = vec![descriptor("s"), long];
        let table = build_table(&descriptors);
        let lines: Vec<&str> = table.lines().collect();

        let status_col = lines[0].find("STATUS").unwrap();
        assert_eq!(&lines[1][status_col..status_col + 7], "running");
        assert_eq!(&lines[2][status_col..status_col + 7], "stopped");
    }

    #[test]
    fn test_no_projects_message_is_fixed() {
        assert_eq!(NO_PROJECTS_MESSAGE, "There are no running ddev applications.");
    }

    #[test]
    fn test_router_status_lines() {
        let running = RouterStatus {
            state: Some(ContainerState::Running),
            published_ports: vec![80, 443],
        };
        assert_eq!(
            render_router_status(&running),
            "DDEV ROUTER STATUS: running (ports 80, 443)"
        );

        let absent = RouterStatus {
            state: None,
            published_ports: Vec::new(),
        };
        assert_eq!(render_router_status(&absent), "DDEV ROUTER STATUS: not running");
    }
}
