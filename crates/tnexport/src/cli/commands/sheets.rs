use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tracing::warn;

use crate::config::{RuntimePaths, SmartsheetConfig};
use crate::mapper;
use crate::schema::{self, Schema};
use crate::sink::{self, Destination, RunStamp};
use crate::sources::{SheetSource, SmartsheetClient};

pub const DEFAULT_LAND_USE_SHEET_ID: &str = "3365837005082500";
pub const DEFAULT_TREATMENT_SHEET_ID: &str = "7586918783995780";
pub const DEFAULT_LAND_USE_OUTPUT: &str = "tn_calculator_land_use.json";
pub const DEFAULT_TREATMENT_OUTPUT: &str = "tn_calculator_treatment_methods.json";

#[derive(Debug, Clone, Args)]
pub struct CalculatorSheetsArgs {
    #[arg(long, default_value = DEFAULT_LAND_USE_SHEET_ID)]
    pub land_use_sheet: String,

    #[arg(long, default_value = DEFAULT_TREATMENT_SHEET_ID)]
    pub treatment_sheet: String,

    #[arg(long, default_value = DEFAULT_LAND_USE_OUTPUT, value_name = "PATH")]
    pub land_use_output: String,

    #[arg(long, default_value = DEFAULT_TREATMENT_OUTPUT, value_name = "PATH")]
    pub treatment_output: String,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,
}

/// One sheet to pull and where its records go.
#[derive(Debug, Clone)]
pub struct SheetExport<'a> {
    pub label: &'static str,
    pub sheet_id: &'a str,
    pub schema: &'static Schema,
    pub destination: Destination,
}

impl CalculatorSheetsArgs {
    #[must_use]
    pub fn exports(&self) -> [SheetExport<'_>; 2] {
        [
            SheetExport {
                label: "land_use",
                sheet_id: &self.land_use_sheet,
                schema: &schema::SHEET_LAND_USE,
                destination: Destination::json(self.land_use_output.clone()),
            },
            SheetExport {
                label: "treatment_method",
                sheet_id: &self.treatment_sheet,
                schema: &schema::SHEET_TREATMENT_METHOD,
                destination: Destination::json(self.treatment_output.clone()),
            },
        ]
    }
}

pub fn run(
    args: &CalculatorSheetsArgs,
    runtime_paths: &RuntimePaths,
    config: &SmartsheetConfig,
) -> Result<()> {
    let config = config
        .clone()
        .with_timeout(Duration::from_secs(args.timeout_secs));
    println!(
        "calculator-sheets: start land_use_sheet={} treatment_sheet={} out_dir={}",
        args.land_use_sheet,
        args.treatment_sheet,
        runtime_paths.out_dir.display()
    );

    let client = SmartsheetClient::new(&config).context("failed to build Smartsheet client")?;
    let stamp = RunStamp::now()?;
    let exports = args.exports();
    let written = export_sheets(&client, &exports, &runtime_paths.out_dir, &stamp)?;

    println!(
        "calculator-sheets: complete exported={} skipped={}",
        written.len(),
        exports.len() - written.len()
    );
    Ok(())
}

/// Fetches, maps and writes each sheet in turn. A sheet whose fetch fails
/// is skipped; mapping and write failures abort.
pub fn export_sheets<S>(
    source: &S,
    exports: &[SheetExport<'_>],
    out_dir: &Path,
    stamp: &RunStamp,
) -> Result<Vec<PathBuf>>
where
    S: SheetSource + ?Sized,
{
    let mut written = Vec::with_capacity(exports.len());
    for export in exports {
        println!(
            "calculator-sheets: stage fetch label={} sheet_id={}",
            export.label, export.sheet_id
        );
        let sheet = match source.fetch_sheet(export.sheet_id) {
            Ok(sheet) => sheet,
            Err(error) => {
                warn!(label = export.label, error = %error, "sheet fetch failed; skipping export");
                println!(
                    "calculator-sheets: checkpoint skipped label={} reason=fetch_failed",
                    export.label
                );
                continue;
            }
        };

        let records = mapper::map_sheet(&sheet, export.schema)
            .with_context(|| format!("failed to map sheet {}", export.sheet_id))?;
        let path = sink::write_records(&records, &export.destination, out_dir, stamp)?;
        println!(
            "calculator-sheets: checkpoint written label={} records={} path={}",
            export.label,
            records.len(),
            path.display()
        );
        written.push(path);
    }
    Ok(written)
}
