use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use super::sheets::{DEFAULT_LAND_USE_OUTPUT, DEFAULT_TREATMENT_OUTPUT};
use crate::calculator::{CalculatorTables, ps_reduction};
use crate::config::RuntimePaths;

#[derive(Debug, Clone, Args)]
pub struct CalculateArgs {
    #[command(subcommand)]
    pub mode: CalculateMode,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CalculateMode {
    /// Non-point source reduction from a land use, a treatment and an area
    Nps(NpsArgs),
    /// Point source reduction from discharge, concentration and attenuation
    Ps(PsArgs),
}

#[derive(Debug, Clone, Args)]
pub struct NpsArgs {
    #[arg(long)]
    pub land_use: String,

    #[arg(long)]
    pub treatment: String,

    /// Treated area in acres
    #[arg(long)]
    pub area: f64,

    /// Land use export to read; relative paths resolve against the output directory
    #[arg(long, default_value = DEFAULT_LAND_USE_OUTPUT, value_name = "PATH")]
    pub land_use_table: PathBuf,

    #[arg(long, default_value = DEFAULT_TREATMENT_OUTPUT, value_name = "PATH")]
    pub treatment_table: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct PsArgs {
    /// Average discharge in MGD
    #[arg(long)]
    pub discharge: f64,

    /// TN concentration in mg/L
    #[arg(long)]
    pub concentration: f64,

    /// Attenuation percent, 0 to 100
    #[arg(long)]
    pub attenuation: f64,
}

pub fn run(args: &CalculateArgs, runtime_paths: &RuntimePaths) -> Result<()> {
    match &args.mode {
        CalculateMode::Nps(nps) => {
            let land_use_table = runtime_paths.out_dir.join(&nps.land_use_table);
            let treatment_table = runtime_paths.out_dir.join(&nps.treatment_table);
            println!(
                "calculate: stage load_tables land_use={} treatment={}",
                land_use_table.display(),
                treatment_table.display()
            );
            let tables = CalculatorTables::load(&land_use_table, &treatment_table)?;
            println!(
                "calculate: checkpoint tables_loaded land_uses={} treatments={}",
                tables.land_uses.len(),
                tables.treatments.len()
            );

            let reduction = tables.nps_reduction(&nps.land_use, &nps.treatment, nps.area);
            println!(
                "calculate: nps land_use={:?} treatment={:?} area={} base_load={} removal_rate={} reduction={reduction}",
                nps.land_use,
                nps.treatment,
                nps.area,
                tables.base_load(&nps.land_use),
                tables.removal_rate(&nps.treatment)
            );
        }
        CalculateMode::Ps(ps) => {
            let reduction = ps_reduction(ps.discharge, ps.concentration, ps.attenuation);
            println!(
                "calculate: ps discharge={} concentration={} attenuation={} reduction={reduction}",
                ps.discharge, ps.concentration, ps.attenuation
            );
        }
    }
    Ok(())
}
