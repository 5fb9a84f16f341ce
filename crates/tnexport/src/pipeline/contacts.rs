use tracing::info;

use super::{PipelineError, extract, extract_or_empty};
use crate::merge::left_merge;
use crate::models::RecordSet;
use crate::ranking::{RankSpec, most_recent_per_group};
use crate::schema;
use crate::sources::{QuerySource, queries};

pub const CONTACT_JOIN_KEY: &str = "lead_entity_id";

/// One contact per entity: the member whose latest change is most recent.
pub const CONTACT_RANKING: RankSpec<'static> = RankSpec {
    group: "lead_entity_id",
    recency: "last_activity",
    tie_break: "changed_by",
};

/// Fields of the set returned by [`primary_contacts`].
pub const PRIMARY_CONTACT_FIELDS: &[&str] = &[
    "projectid",
    "project_name",
    "entity_name",
    "lead_entity_id",
    "changed_by",
    "first_name",
    "last_name",
    "email",
    "last_activity",
];

/// Every active project with its entity's primary contact, contact fields
/// null when the entity has no active members.
///
/// A failed project query is an error. A failed activity query is logged
/// and leaves every contact empty.
pub fn primary_contacts<S>(source: &mut S) -> Result<RecordSet, PipelineError>
where
    S: QuerySource + ?Sized,
{
    let projects = extract(
        source,
        "project_entity",
        queries::PROJECT_ENTITY,
        &schema::PROJECT_ENTITY,
    )?;
    let activity = extract_or_empty(
        source,
        "contact_activity",
        queries::CONTACT_ACTIVITY,
        &schema::CONTACT_ACTIVITY,
    )?;

    let ranked = most_recent_per_group(&activity, CONTACT_RANKING)?;
    info!(
        projects = projects.len(),
        candidates = activity.len(),
        entities_with_contact = ranked.len(),
        "primary contacts ranked"
    );

    Ok(left_merge(&projects, &ranked, CONTACT_JOIN_KEY)?)
}
