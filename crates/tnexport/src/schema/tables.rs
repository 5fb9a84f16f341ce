use super::{Coercion, DefaultValue, FieldPolicy, Schema};

use super::ColumnRef::{Position, Title};

/// Land use rows from the TN calculator sheet. Rows without a name or a base
/// load are not ready for use and are dropped.
pub const SHEET_LAND_USE: Schema = Schema {
    name: "sheet_land_use",
    fields: &[
        FieldPolicy::required("name", Title("Land Use"), Coercion::Text),
        FieldPolicy::required("base_load", Title("Base Load (TN)"), Coercion::Float),
    ],
};

pub const SHEET_TREATMENT_METHOD: Schema = Schema {
    name: "sheet_treatment_method",
    fields: &[
        FieldPolicy::required("name", Title("Treatment Method"), Coercion::Text),
        FieldPolicy::required(
            "removal_rate",
            Title("Default Removal Rate (TN)"),
            Coercion::Float,
        ),
    ],
};

// Positions follow the column lists in `sources::queries`.

pub const DB_LAND_USE: Schema = Schema {
    name: "db_land_use",
    fields: &[
        FieldPolicy::optional("id", Position(0), DefaultValue::Null, Coercion::AsIs),
        FieldPolicy::optional("name", Position(1), DefaultValue::Null, Coercion::Text),
        FieldPolicy::optional(
            "base_load",
            Position(2),
            DefaultValue::Float(0.0),
            Coercion::Float,
        ),
        FieldPolicy::optional(
            "description",
            Position(3),
            DefaultValue::Text(""),
            Coercion::Text,
        ),
    ],
};

pub const DB_TREATMENT_METHOD: Schema = Schema {
    name: "db_treatment_method",
    fields: &[
        FieldPolicy::optional("id", Position(0), DefaultValue::Null, Coercion::AsIs),
        FieldPolicy::optional("name", Position(1), DefaultValue::Null, Coercion::Text),
        FieldPolicy::optional(
            "removal_rate",
            Position(2),
            DefaultValue::Float(0.0),
            Coercion::Float,
        ),
        FieldPolicy::optional(
            "description",
            Position(3),
            DefaultValue::Text(""),
            Coercion::Text,
        ),
    ],
};

const fn passthrough(field: &'static str, position: usize) -> FieldPolicy {
    FieldPolicy::optional(field, Position(position), DefaultValue::Null, Coercion::AsIs)
}

const fn integer(field: &'static str, position: usize) -> FieldPolicy {
    FieldPolicy::optional(
        field,
        Position(position),
        DefaultValue::Null,
        Coercion::Integer,
    )
}

/// Active projects with their derived type, anomalies and status.
pub const PROJECT: Schema = Schema {
    name: "project",
    fields: &[
        integer("projectid", 0),
        passthrough("project_name", 1),
        passthrough("project_description", 2),
        passthrough("entity_name", 3),
        passthrough("latitude", 4),
        passthrough("longitude", 5),
        passthrough("bay_segment", 6),
        integer("header_nps_flag", 7),
        integer("header_ps_flag", 8),
        passthrough("project_type", 9),
        passthrough("anomalies", 10),
        passthrough("project_status", 11),
        passthrough("initiation_year", 12),
        passthrough("estimated_completion_year", 13),
        passthrough("discontinued_year", 14),
        passthrough("completion_year", 15),
        passthrough("project_costs", 16),
    ],
};

/// Active projects and the lead entity that owns each.
pub const PROJECT_ENTITY: Schema = Schema {
    name: "project_entity",
    fields: &[
        integer("projectid", 0),
        passthrough("project_name", 1),
        passthrough("entity_name", 2),
        integer("lead_entity_id", 3),
    ],
};

/// One row per (entity, user) at the user's latest tracked change.
pub const CONTACT_ACTIVITY: Schema = Schema {
    name: "contact_activity",
    fields: &[
        integer("lead_entity_id", 0),
        passthrough("changed_by", 1),
        passthrough("first_name", 2),
        passthrough("last_name", 3),
        passthrough("email", 4),
        passthrough("last_activity", 5),
    ],
};

#[cfg(test)]
mod tests {
    use super::{
        CONTACT_ACTIVITY, DB_LAND_USE, DB_TREATMENT_METHOD, PROJECT, PROJECT_ENTITY, SHEET_LAND_USE,
    };
    use crate::models::Scalar;
    use crate::schema::{Coercion, ColumnRef, Schema};

    fn assert_positions_are_dense(schema: &Schema) {
        for (index, policy) in schema.fields.iter().enumerate() {
            assert_eq!(
                policy.column,
                ColumnRef::Position(index),
                "{} field `{}` is out of query order",
                schema.name,
                policy.field
            );
        }
    }

    #[test]
    fn database_schemas_follow_query_column_order() {
        for schema in [
            &DB_LAND_USE,
            &DB_TREATMENT_METHOD,
            &PROJECT,
            &PROJECT_ENTITY,
            &CONTACT_ACTIVITY,
        ] {
            assert_positions_are_dense(schema);
        }
    }

    #[test]
    fn database_schemas_never_drop_rows() {
        for schema in [&DB_LAND_USE, &DB_TREATMENT_METHOD, &PROJECT] {
            assert!(
                schema.fields.iter().all(|policy| !policy.required),
                "{}",
                schema.name
            );
        }
    }

    #[test]
    fn calculator_ids_pass_through_as_is() {
        for schema in [&DB_LAND_USE, &DB_TREATMENT_METHOD] {
            let id = &schema.fields[0];
            assert_eq!(id.field, "id");
            assert_eq!(id.coercion, Coercion::AsIs, "{}", schema.name);
        }
    }

    #[test]
    fn only_null_or_an_empty_required_name_is_missing() {
        let [name, base_load] = SHEET_LAND_USE.fields else {
            panic!("land use sheet has two fields");
        };
        assert!(name.is_missing(&Scalar::Null));
        assert!(name.is_missing(&Scalar::text("")));
        assert!(!name.is_missing(&Scalar::text(" ")));
        assert!(base_load.is_missing(&Scalar::Null));
        assert!(!base_load.is_missing(&Scalar::text("")));

        let description = &DB_LAND_USE.fields[3];
        assert!(!description.is_missing(&Scalar::text("")));
        assert!(!description.is_missing(&Scalar::text("  ")));
    }
}
