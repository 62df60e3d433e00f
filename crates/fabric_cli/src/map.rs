//! The `fabric map` subcommand: full oracle + refinement flow.

use crate::external::ExternalOracle;
use crate::{MapArgs, ReportFormat};
use fabric_config::{load_config, OracleKind, RunConfig};
use fabric_io::DesignInput;
use fabric_part::{
    derive_imbalance, refine, GreedyOracle, OracleRequest, PartitionOracle, RefineOptions,
    RunReport, StageMetrics,
};
use std::error::Error;
use std::path::Path;
use std::time::Instant;

/// Runs the map flow; returns the process exit code.
pub fn run(args: &MapArgs, quiet: bool, config_path: Option<&str>) -> Result<i32, Box<dyn Error>> {
    let start = Instant::now();

    let config = load_run_config(config_path)?;
    let input = fabric_io::read_design_dir(Path::new(&args.input_dir))?;
    if !quiet {
        print_load_stats(&input);
    }

    let imbalance = config.oracle.imbalance.unwrap_or_else(|| {
        derive_imbalance(&input.graph, &input.pools, config.oracle.imbalance_mode)
    });
    let options = RefineOptions {
        oracle: OracleRequest {
            imbalance,
            objective: config.oracle.objective,
            threads: config.oracle.threads,
            seed: config.oracle.seed,
        },
        trim: config.trim,
        hop: config.hop,
    };

    let oracle: Box<dyn PartitionOracle> = match config.oracle.kind {
        OracleKind::Builtin => Box::new(GreedyOracle),
        OracleKind::External => {
            // bin presence is enforced by config validation
            let bin = config.oracle.bin.clone().unwrap_or_default();
            Box::new(ExternalOracle::new(bin, "oracle_work"))
        }
    };

    let (placement, report) = refine(
        &input.graph,
        &input.pools,
        &input.topology,
        &*oracle,
        &options,
    )?;

    let parts: Vec<i64> = placement
        .assignment()
        .iter()
        .map(|p| p.index() as i64)
        .collect();
    fabric_io::write_assignment_file(
        Path::new(&args.output_file),
        &parts,
        &input.pool_names,
        &input.unit_names,
    )?;

    match args.format {
        ReportFormat::Text => {
            if !quiet {
                print_report(&report);
                println!("elapsed: {:.3}s", start.elapsed().as_secs_f64());
            }
        }
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(0)
}

fn load_run_config(config_path: Option<&str>) -> Result<RunConfig, Box<dyn Error>> {
    match config_path {
        Some(path) => Ok(load_config(Path::new(path))?),
        None => {
            let default = Path::new("fabric.toml");
            if default.exists() {
                Ok(load_config(default)?)
            } else {
                Ok(RunConfig::default())
            }
        }
    }
}

fn print_load_stats(input: &DesignInput) {
    println!(
        "loaded {} units, {} nets ({} pins), {} pools, hop budget {}",
        input.graph.unit_count(),
        input.graph.net_count(),
        input.stats.pin_count,
        input.pools.len(),
        input.pools.hop_budget(),
    );
    if input.stats.max_fanout > 0 {
        println!(
            "largest net: {} terminals (source {})",
            input.stats.max_fanout, input.stats.max_fanout_source,
        );
    }
}

/// Prints the per-stage metrics of a run.
pub fn print_report(report: &RunReport) {
    print_metrics("initial", &report.initial);
    if let Some(metrics) = &report.after_resource_repair {
        print_metrics("after resource repair", metrics);
        println!("  resource moves: {}", report.resource_moves);
    }
    if let Some(metrics) = &report.after_hop_repair {
        print_metrics("after hop repair", metrics);
        println!("  hop moves: {}", report.hop_moves);
    }
    print_metrics("final", &report.final_metrics);
}

/// Prints one stage's metrics.
pub fn print_metrics(label: &str, metrics: &StageMetrics) {
    println!(
        "{label}: {} resource violation(s), {} hop violation(s), weighted hops {}",
        metrics.resource_violations, metrics.hop_violations, metrics.total_weighted_hops,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFO: &str = "\
fpga01 16 10
fpga02 16 10
fpga03 16 10
fpga04 16 10
";
    const ARE: &str = "\
u1 7
u2 5
u3 6
";
    const NET: &str = "u1 2 u2 u3\n";
    const TOPO: &str = "\
2
fpga01 fpga02
fpga02 fpga03
fpga03 fpga04
";

    fn write_design(dir: &Path) {
        std::fs::write(dir.join("design.info"), INFO).unwrap();
        std::fs::write(dir.join("design.are"), ARE).unwrap();
        std::fs::write(dir.join("design.net"), NET).unwrap();
        std::fs::write(dir.join("design.topo"), TOPO).unwrap();
    }

    #[test]
    fn map_writes_feasible_assignment() {
        let dir = tempfile::tempdir().unwrap();
        write_design(dir.path());
        let out = dir.path().join("design.fpga.out");

        let args = MapArgs {
            input_dir: dir.path().display().to_string(),
            output_file: out.display().to_string(),
            format: ReportFormat::Text,
        };
        let code = run(&args, true, None).unwrap();
        assert_eq!(code, 0);

        let content = std::fs::read_to_string(&out).unwrap();
        // Every unit appears exactly once across the four pool lines.
        assert_eq!(content.lines().count(), 4);
        for unit in ["u1", "u2", "u3"] {
            assert_eq!(
                content.split_whitespace().filter(|&w| w == unit).count(),
                1,
                "{unit} missing or duplicated in {content}"
            );
        }
    }

    #[test]
    fn map_honors_config_file() {
        let dir = tempfile::tempdir().unwrap();
        write_design(dir.path());
        let out = dir.path().join("out.txt");
        let config = dir.path().join("fabric.toml");
        std::fs::write(&config, "[oracle]\nseed = 3\n[hop]\nenabled = false\n").unwrap();

        let args = MapArgs {
            input_dir: dir.path().display().to_string(),
            output_file: out.display().to_string(),
            format: ReportFormat::Text,
        };
        let code = run(&args, true, Some(config.to_str().unwrap())).unwrap();
        assert_eq!(code, 0);
        assert!(out.exists());
    }

    #[test]
    fn map_missing_design_dir_errors() {
        let dir = tempfile::tempdir().unwrap();
        let args = MapArgs {
            input_dir: dir.path().join("missing").display().to_string(),
            output_file: dir.path().join("out.txt").display().to_string(),
            format: ReportFormat::Text,
        };
        assert!(run(&args, true, None).is_err());
    }
}
