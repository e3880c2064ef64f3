//! shift-runner: headless driver for the shift allocation engine.
//!
//! Usage:
//!   shift-runner --data-dir ./data                    scan seeds, report the best
//!   shift-runner --data-dir ./data --seed-index 417   one verbose run, write tables
//!
//! Options:
//!   --out-dir DIR          where tables are written (default: data dir)
//!   --seeds N              seeds tried by a scan (default: engine.json)
//!   --fallback-tier L      tier for special shifters with no override

use anyhow::{bail, Context, Result};
use shiftalloc_core::{
    config::EngineConfig,
    individual::PriorityTier,
    input::RecordSet,
    report::AllocationOutcome,
    search::SeedSearch,
};
use std::env;
use std::fs;
use std::path::Path;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let seed_index: Option<usize> = find_arg(&args, "--seed-index")
        .map(|v| v.parse::<usize>().with_context(|| format!("invalid --seed-index '{v}'")))
        .transpose()?;

    // Single runs narrate every event; scans only report progress.
    let default_filter = if seed_index.is_some() { "info" } else { "warn,shiftalloc_core::search=info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let data_dir = find_arg(&args, "--data-dir").unwrap_or("./data");
    let out_dir = find_arg(&args, "--out-dir").unwrap_or(data_dir);

    let mut config = EngineConfig::load(data_dir)?;
    config.scan_seeds = parse_arg(&args, "--seeds", config.scan_seeds);

    let fallback = match find_arg(&args, "--fallback-tier") {
        Some(code) => match PriorityTier::from_code(code) {
            Some(tier) => Some(tier),
            None => bail!("unknown priority tier '{code}' (expected one of N, L, M, H, X)"),
        },
        None => None,
    };

    println!("shift-runner");
    println!("  data_dir:  {data_dir}");
    println!("  out_dir:   {out_dir}");
    println!("  master:    {:#x}", config.master_seed);
    println!();

    let records = RecordSet::load(data_dir, &config, fallback)
        .with_context(|| format!("loading records from {data_dir}"))?;
    let search = SeedSearch::new(&records, &config);

    match seed_index {
        Some(index) => {
            let outcome = search.single_run(index);
            write_tables(&outcome, Path::new(out_dir), config.deficiency_reports)?;
            println!("{}", outcome.shift_table());
            println!("{}", outcome.shifter_table());
            println!("{}", outcome.institution_table());
        }
        None => {
            let report = search.scan(config.scan_seeds);
            println!("=== SCAN SUMMARY ===");
            println!("  seeds tried:  {}", report.seeds_tried);
            match report.best {
                Some(best) => {
                    println!("  best index:   {}", best.index);
                    println!("  best seed:    {:#x}", best.seed);
                    println!("  metric:       {}", best.metric);
                    if !report.tied.is_empty() {
                        println!("  tied indices: {:?}", report.tied);
                    }
                }
                None => println!("  (no seeds tried)"),
            }
        }
    }
    Ok(())
}

fn write_tables(outcome: &AllocationOutcome, out_dir: &Path, deficiency_reports: bool) -> Result<()> {
    fs::create_dir_all(out_dir)?;
    fs::write(out_dir.join("ShiftTable.txt"), outcome.shift_table())?;
    fs::write(out_dir.join("ShifterTable.txt"), outcome.shifter_table())?;

    let mut institutions = outcome.institution_table();
    if deficiency_reports {
        for report in outcome.deficiency_reports() {
            institutions.push_str("\n\n");
            institutions.push_str(&report);
        }
    }
    fs::write(out_dir.join("InstitutionTable.txt"), institutions)?;

    let export_path = out_dir.join("ShiftExport.csv");
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&export_path)
        .with_context(|| format!("creating {}", export_path.display()))?;
    for row in outcome.export_rows() {
        writer.serialize(row)?;
    }
    writer.flush()?;

    fs::write(out_dir.join("outcome.json"), serde_json::to_string_pretty(outcome)?)?;
    log::info!("tables written to {}", out_dir.display());
    Ok(())
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    find_arg(args, flag).and_then(|v| v.parse().ok()).unwrap_or(default)
}
