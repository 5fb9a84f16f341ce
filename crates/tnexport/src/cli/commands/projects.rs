use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::warn;

use crate::config::{DatabaseConfig, RuntimePaths};
use crate::merge::left_merge;
use crate::models::RecordSet;
use crate::pipeline::contacts::{PRIMARY_CONTACT_FIELDS, primary_contacts};
use crate::pipeline::extract;
use crate::pipeline::stats::ExportStats;
use crate::schema;
use crate::sink::{self, Destination, RunStamp};
use crate::sources::{MysqlSource, QuerySource, queries};

pub const DEFAULT_OUTPUT: &str = "DB_Projects_Complete_{timestamp}.csv";
pub const PROJECT_JOIN_KEY: &str = "projectid";

/// Contact fields appended to each project row, renamed for the export.
pub const CONTACT_COLUMNS: &[(&str, &str)] = &[
    ("projectid", "projectid"),
    ("first_name", "contact_first_name"),
    ("last_name", "contact_last_name"),
    ("email", "contact_email"),
    ("last_activity", "contact_last_activity"),
];

#[derive(Debug, Clone, Args)]
pub struct ProjectsArgs {
    /// Output path; `{timestamp}` is replaced by the run stamp
    #[arg(long, default_value = DEFAULT_OUTPUT, value_name = "TEMPLATE")]
    pub output: String,
}

pub fn run(args: &ProjectsArgs, runtime_paths: &RuntimePaths, config: &DatabaseConfig) -> Result<()> {
    println!(
        "projects: start target={} out_dir={}",
        config.target(),
        runtime_paths.out_dir.display()
    );

    println!("projects: stage connect");
    let mut source = MysqlSource::connect(config).context("database connection failed")?;
    let stamp = RunStamp::now()?;
    let (path, stats) = export_projects(&mut source, args, &runtime_paths.out_dir, &stamp)?;

    println!(
        "projects: complete total_projects={} projects_with_contacts={} unique_entities={} path={}",
        stats.total,
        stats.with_contact,
        stats.unique_entities,
        path.display()
    );
    Ok(())
}

pub fn export_projects<S>(
    source: &mut S,
    args: &ProjectsArgs,
    out_dir: &Path,
    stamp: &RunStamp,
) -> Result<(PathBuf, ExportStats)>
where
    S: QuerySource + ?Sized,
{
    println!("projects: stage base_query");
    let base = extract(source, "project", queries::PROJECT, &schema::PROJECT)
        .context("project base query failed")?;
    println!("projects: checkpoint base_query_complete records={}", base.len());

    println!("projects: stage primary_contacts");
    let contacts = match primary_contacts(source) {
        Ok(contacts) => contacts,
        Err(error) if error.is_degradable() => {
            warn!(error = %error, "contact lookup failed; contact columns left empty");
            RecordSet::new(PRIMARY_CONTACT_FIELDS.iter().copied())
        }
        Err(error) => return Err(error).context("failed to resolve primary contacts"),
    };
    let contacts = contacts.select(CONTACT_COLUMNS);
    println!(
        "projects: checkpoint primary_contacts_complete records={}",
        contacts.len()
    );

    let merged = left_merge(&base, &contacts, PROJECT_JOIN_KEY)?;
    let path = sink::write_records(&merged, &Destination::csv(args.output.clone()), out_dir, stamp)?;
    println!("projects: checkpoint csv_written {}", path.display());

    Ok((path, ExportStats::collect(&merged, "contact_first_name", "entity_name")))
}
