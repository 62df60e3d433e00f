//! The `fabric check` subcommand: standalone constraint validation.

use crate::{CheckArgs, ReportFormat};
use fabric_model::Placement;
use fabric_part::{collect_metrics, hop_report, resource_violations};
use std::error::Error;
use std::path::Path;

/// Validates an assignment file against the design; returns the exit code.
///
/// Exit code 0 means both resource and hop constraints hold; any violation
/// yields 1 with the details printed.
pub fn run(args: &CheckArgs, quiet: bool) -> Result<i32, Box<dyn Error>> {
    let input = fabric_io::read_design_dir(Path::new(&args.input_dir))?;
    let content = std::fs::read_to_string(&args.assignment)?;
    let parts = fabric_io::read_assignment(&content, &input.pool_names, &input.unit_names)?;
    let placement = Placement::from_parts(&parts, &input.graph, &input.pools)?;

    let metrics = collect_metrics(&input.graph, &input.pools, &input.topology, &placement);

    match args.format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&metrics)?),
        ReportFormat::Text => {
            if !quiet {
                crate::map::print_metrics("assignment", &metrics);
                for violation in resource_violations(&input.pools, &placement) {
                    println!(
                        "  pool {} over capacity in dimension(s) {:?}",
                        input
                            .pool_names
                            .name_of(violation.pool.as_raw())
                            .unwrap_or(""),
                        violation.dims,
                    );
                }
                let hops = hop_report(
                    &input.graph,
                    placement.assignment(),
                    &input.topology,
                    input.pools.hop_budget(),
                );
                for net in &hops.violations {
                    let source = input.graph.net(*net).source();
                    println!(
                        "  net from {} exceeds hop budget",
                        input.unit_names.name_of(source.as_raw()).unwrap_or(""),
                    );
                }
            }
        }
    }

    if metrics.resource_feasible && metrics.hop_feasible {
        Ok(0)
    } else {
        Ok(1)
    }
}
