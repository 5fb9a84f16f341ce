use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use crate::config::{DatabaseConfig, RuntimePaths};
use crate::pipeline::extract_or_empty;
use crate::schema::{self, Schema};
use crate::sink::{self, Destination, RunStamp};
use crate::sources::{MysqlSource, QuerySource, queries};

pub const DEFAULT_LAND_USE_OUTPUT: &str = "land_use_data_{timestamp}.json";
pub const DEFAULT_TREATMENT_OUTPUT: &str = "treatment_method_data_{timestamp}.json";

#[derive(Debug, Clone, Args)]
pub struct CalculatorDbArgs {
    /// Output path; `{timestamp}` is replaced by the run stamp
    #[arg(long, default_value = DEFAULT_LAND_USE_OUTPUT, value_name = "TEMPLATE")]
    pub land_use_output: String,

    #[arg(long, default_value = DEFAULT_TREATMENT_OUTPUT, value_name = "TEMPLATE")]
    pub treatment_output: String,
}

struct TableExport {
    label: &'static str,
    sql: &'static str,
    schema: &'static Schema,
    destination: Destination,
}

pub fn run(
    args: &CalculatorDbArgs,
    runtime_paths: &RuntimePaths,
    config: &DatabaseConfig,
) -> Result<()> {
    println!(
        "calculator-db: start target={} out_dir={}",
        config.target(),
        runtime_paths.out_dir.display()
    );

    println!("calculator-db: stage connect");
    let mut source = MysqlSource::connect(config).context("database connection failed")?;
    let stamp = RunStamp::now()?;
    println!("calculator-db: checkpoint run_stamp {}", stamp.as_str());

    let written = export_calculator_tables(&mut source, args, &runtime_paths.out_dir, &stamp)?;
    println!("calculator-db: complete files_written={}", written.len());
    Ok(())
}

/// Exports both calculator tables with one shared run stamp. A failed query
/// still produces its file, holding an empty array.
pub fn export_calculator_tables<S>(
    source: &mut S,
    args: &CalculatorDbArgs,
    out_dir: &Path,
    stamp: &RunStamp,
) -> Result<Vec<PathBuf>>
where
    S: QuerySource + ?Sized,
{
    let exports = [
        TableExport {
            label: "land_use",
            sql: queries::LAND_USE,
            schema: &schema::DB_LAND_USE,
            destination: Destination::json(args.land_use_output.clone()),
        },
        TableExport {
            label: "treatment_method",
            sql: queries::TREATMENT_METHOD,
            schema: &schema::DB_TREATMENT_METHOD,
            destination: Destination::json(args.treatment_output.clone()),
        },
    ];

    let mut written = Vec::with_capacity(exports.len());
    for export in &exports {
        println!("calculator-db: stage query label={}", export.label);
        let records = extract_or_empty(source, export.label, export.sql, export.schema)?;
        let path = sink::write_records(&records, &export.destination, out_dir, stamp)?;
        println!(
            "calculator-db: checkpoint written label={} records={} path={}",
            export.label,
            records.len(),
            path.display()
        );
        written.push(path);
    }
    Ok(written)
}
