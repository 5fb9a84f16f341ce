use std::collections::HashSet;

use crate::merge::JoinKey;
use crate::models::RecordSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportStats {
    pub total: usize,
    pub with_contact: usize,
    pub unique_entities: usize,
}

impl ExportStats {
    #[must_use]
    pub fn collect(records: &RecordSet, contact_field: &str, entity_field: &str) -> Self {
        Self {
            total: records.len(),
            with_contact: count_present(records, contact_field),
            unique_entities: count_distinct(records, entity_field),
        }
    }
}

/// Records whose `field` is non-null.
#[must_use]
pub fn count_present(records: &RecordSet, field: &str) -> usize {
    records
        .records()
        .iter()
        .filter(|record| record.get(field).is_some_and(|value| !value.is_null()))
        .count()
}

/// Distinct non-null values of `field`.
#[must_use]
pub fn count_distinct(records: &RecordSet, field: &str) -> usize {
    records
        .records()
        .iter()
        .filter_map(|record| record.get(field).and_then(JoinKey::from_scalar))
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::ExportStats;
    use crate::models::{RecordSet, Scalar};

    #[test]
    fn counts_contacts_and_distinct_entities() {
        let mut set = RecordSet::new(["entity_name", "contact_first_name"]);
        for (entity, contact) in [
            (Scalar::text("City"), Scalar::text("Ann")),
            (Scalar::text("City"), Scalar::Null),
            (Scalar::text("County"), Scalar::text("Bo")),
            (Scalar::Null, Scalar::Null),
        ] {
            set.push(
                [("entity_name", entity), ("contact_first_name", contact)]
                    .into_iter()
                    .collect(),
            );
        }

        let stats = ExportStats::collect(&set, "contact_first_name", "entity_name");
        assert_eq!(
            stats,
            ExportStats {
                total: 4,
                with_contact: 2,
                unique_entities: 2,
            }
        );
    }
}
