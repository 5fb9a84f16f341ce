use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::commands::{
    calculate::CalculateArgs, contacts::ProjectContactsArgs, database::CalculatorDbArgs,
    projects::ProjectsArgs, sheets::CalculatorSheetsArgs,
};

#[derive(Debug, Parser)]
#[command(
    name = "tnexport",
    version,
    about = "Export TN calculator and project data from MySQL and Smartsheet"
)]
pub struct Cli {
    #[command(flatten)]
    pub runtime: RuntimeArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct RuntimeArgs {
    #[arg(long, global = true, value_name = "PATH")]
    pub home_dir: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub cwd: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Export land use and treatment tables from Smartsheet
    CalculatorSheets(CalculatorSheetsArgs),
    /// Export land use and treatment tables from the database
    CalculatorDb(CalculatorDbArgs),
    /// Export every active project with its entity's primary contact
    ProjectContacts(ProjectContactsArgs),
    /// Export the full project table joined with primary contacts
    Projects(ProjectsArgs),
    /// Compute TN load reductions from exported calculator tables
    Calculate(CalculateArgs),
}

impl Command {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CalculatorSheets(_) => "calculator-sheets",
            Self::CalculatorDb(_) => "calculator-db",
            Self::ProjectContacts(_) => "project-contacts",
            Self::Projects(_) => "projects",
            Self::Calculate(_) => "calculate",
        }
    }
}
