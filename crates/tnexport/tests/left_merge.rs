use tnexport::merge::{MergeError, left_merge};
use tnexport::models::{RecordSet, Scalar};

fn set(fields: &[&str], rows: Vec<Vec<Scalar>>) -> RecordSet {
    let mut records = RecordSet::new(fields.iter().copied());
    for row in rows {
        records.push(fields.iter().copied().zip(row).collect());
    }
    records
}

fn projects() -> RecordSet {
    set(
        &["projectid", "project_name"],
        vec![
            vec![Scalar::Int(1), Scalar::text("Dredging")],
            vec![Scalar::Int(2), Scalar::text("Oyster Reef")],
            vec![Scalar::Int(3), Scalar::text("Seagrass")],
        ],
    )
}

#[test]
fn keeps_every_primary_record_in_order() {
    let contacts = set(
        &["projectid", "contact_email"],
        vec![
            vec![Scalar::Int(3), Scalar::text("c@example.org")],
            vec![Scalar::Int(1), Scalar::text("a@example.org")],
        ],
    );

    let merged = left_merge(&projects(), &contacts, "projectid").expect("merge should succeed");

    assert_eq!(merged.fields(), ["projectid", "project_name", "contact_email"]);
    assert_eq!(merged.len(), 3);
    let emails = merged
        .records()
        .iter()
        .map(|record| record.get("contact_email").cloned())
        .collect::<Vec<_>>();
    assert_eq!(
        emails,
        vec![
            Some(Scalar::text("a@example.org")),
            Some(Scalar::Null),
            Some(Scalar::text("c@example.org")),
        ]
    );
}

#[test]
fn numeric_and_text_keys_match_by_value() {
    let contacts = set(
        &["projectid", "contact_email"],
        vec![
            vec![Scalar::text(" 2 "), Scalar::text("b@example.org")],
            vec![Scalar::Float(3.0), Scalar::text("c@example.org")],
        ],
    );

    let merged = left_merge(&projects(), &contacts, "projectid").expect("merge should succeed");

    assert_eq!(
        merged.records()[1].get("contact_email"),
        Some(&Scalar::text("b@example.org"))
    );
    assert_eq!(
        merged.records()[2].get("contact_email"),
        Some(&Scalar::text("c@example.org"))
    );
}

#[test]
fn first_secondary_record_wins_on_duplicate_keys() {
    let contacts = set(
        &["projectid", "contact_email"],
        vec![
            vec![Scalar::Int(1), Scalar::text("first@example.org")],
            vec![Scalar::Int(1), Scalar::text("second@example.org")],
        ],
    );

    let merged = left_merge(&projects(), &contacts, "projectid").expect("merge should succeed");

    assert_eq!(merged.len(), 3);
    assert_eq!(
        merged.records()[0].get("contact_email"),
        Some(&Scalar::text("first@example.org"))
    );
}

#[test]
fn null_keys_never_match() {
    let primary = set(
        &["projectid", "project_name"],
        vec![vec![Scalar::Null, Scalar::text("Orphan")]],
    );
    let secondary = set(
        &["projectid", "contact_email"],
        vec![vec![Scalar::Null, Scalar::text("nobody@example.org")]],
    );

    let merged = left_merge(&primary, &secondary, "projectid").expect("merge should succeed");

    assert_eq!(merged.records()[0].get("contact_email"), Some(&Scalar::Null));
}

#[test]
fn primary_field_names_are_not_overwritten() {
    let contacts = set(
        &["projectid", "project_name", "contact_email"],
        vec![vec![
            Scalar::Int(1),
            Scalar::text("Renamed"),
            Scalar::text("a@example.org"),
        ]],
    );

    let merged = left_merge(&projects(), &contacts, "projectid").expect("merge should succeed");

    assert_eq!(merged.fields(), ["projectid", "project_name", "contact_email"]);
    assert_eq!(
        merged.records()[0].get("project_name"),
        Some(&Scalar::text("Dredging"))
    );
}

#[test]
fn empty_secondary_null_fills_its_fields() {
    let contacts = RecordSet::new(["projectid", "contact_email"]);

    let merged = left_merge(&projects(), &contacts, "projectid").expect("merge should succeed");

    assert_eq!(merged.len(), 3);
    assert!(
        merged
            .records()
            .iter()
            .all(|record| record.get("contact_email") == Some(&Scalar::Null))
    );
}

#[test]
fn missing_key_field_is_reported_per_side() {
    let contacts = RecordSet::new(["lead_entity_id", "contact_email"]);

    let error = left_merge(&projects(), &contacts, "projectid").expect_err("missing key must fail");

    assert_eq!(
        error,
        MergeError::MissingKey {
            key: "projectid".to_string(),
            side: "secondary",
        }
    );
}
