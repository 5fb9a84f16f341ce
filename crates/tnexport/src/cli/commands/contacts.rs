use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use crate::config::{DatabaseConfig, RuntimePaths};
use crate::pipeline::contacts::primary_contacts;
use crate::pipeline::stats::ExportStats;
use crate::sink::{self, Destination, RunStamp};
use crate::sources::{MysqlSource, QuerySource};

pub const DEFAULT_OUTPUT: &str = "projects_primary_contacts.csv";

/// `(pipeline field, CSV column)` in output order.
pub const OUTPUT_COLUMNS: &[(&str, &str)] = &[
    ("projectid", "ProjectID"),
    ("project_name", "ProjectName"),
    ("entity_name", "EntityName"),
    ("first_name", "ContactFirstName"),
    ("last_name", "ContactLastName"),
    ("email", "ContactEmail"),
    ("last_activity", "LastActivity"),
];

#[derive(Debug, Clone, Args)]
pub struct ProjectContactsArgs {
    #[arg(long, default_value = DEFAULT_OUTPUT, value_name = "TEMPLATE")]
    pub output: String,
}

pub fn run(
    args: &ProjectContactsArgs,
    runtime_paths: &RuntimePaths,
    config: &DatabaseConfig,
) -> Result<()> {
    println!(
        "project-contacts: start target={} out_dir={}",
        config.target(),
        runtime_paths.out_dir.display()
    );

    println!("project-contacts: stage connect");
    let mut source = MysqlSource::connect(config).context("database connection failed")?;
    let stamp = RunStamp::now()?;
    let (path, stats) = export_project_contacts(&mut source, args, &runtime_paths.out_dir, &stamp)?;

    println!(
        "project-contacts: complete total_projects={} projects_with_contacts={} unique_entities={} path={}",
        stats.total,
        stats.with_contact,
        stats.unique_entities,
        path.display()
    );
    Ok(())
}

pub fn export_project_contacts<S>(
    source: &mut S,
    args: &ProjectContactsArgs,
    out_dir: &Path,
    stamp: &RunStamp,
) -> Result<(PathBuf, ExportStats)>
where
    S: QuerySource + ?Sized,
{
    println!("project-contacts: stage primary_contacts");
    let merged = primary_contacts(source).context("failed to resolve primary contacts")?;
    println!(
        "project-contacts: checkpoint primary_contacts_complete projects={}",
        merged.len()
    );

    let records = merged.select(OUTPUT_COLUMNS);
    let path = sink::write_records(&records, &Destination::csv(args.output.clone()), out_dir, stamp)?;
    println!("project-contacts: checkpoint csv_written {}", path.display());

    Ok((path, ExportStats::collect(&records, "ContactFirstName", "EntityName")))
}
