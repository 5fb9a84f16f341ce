use serde_json::json;
use tnexport::mapper::{MapError, map_sheet};
use tnexport::models::{Scalar, SheetData};
use tnexport::schema::{SHEET_LAND_USE, SHEET_TREATMENT_METHOD};

fn land_use_sheet(rows: serde_json::Value) -> SheetData {
    serde_json::from_value(json!({
        "columns": [
            {"id": 101, "title": "Land Use"},
            {"id": 102, "title": "Base Load (TN)"},
            {"id": 103, "title": "Notes"}
        ],
        "rows": rows
    }))
    .expect("sheet payload should decode")
}

#[test]
fn emits_only_rows_with_every_required_value() {
    let sheet = land_use_sheet(json!([
        {"cells": [{"columnId": 101, "value": "Commercial"}, {"columnId": 102, "value": "12.5"}]},
        {"cells": [{"columnId": 101, "value": "Residential"}, {"columnId": 102}]}
    ]));

    let records = map_sheet(&sheet, &SHEET_LAND_USE).expect("sheet should map");

    assert_eq!(
        serde_json::to_value(&records).expect("records should serialize"),
        json!([{"name": "Commercial", "base_load": 12.5}])
    );
}

#[test]
fn drops_rows_with_empty_names_and_ignores_unmapped_columns() {
    let sheet = land_use_sheet(json!([
        {"cells": [{"columnId": 101, "value": ""}, {"columnId": 102, "value": 3}]},
        {"cells": [
            {"columnId": 103, "value": "ignored"},
            {"columnId": 102, "value": 4},
            {"columnId": 101, "value": "Forest"}
        ]}
    ]));

    let records = map_sheet(&sheet, &SHEET_LAND_USE).expect("sheet should map");

    assert_eq!(records.len(), 1);
    let record = &records.records()[0];
    assert_eq!(record.get("name"), Some(&Scalar::text("Forest")));
    assert_eq!(record.get("base_load"), Some(&Scalar::Float(4.0)));
    assert_eq!(record.get("Notes"), None);
}

#[test]
fn missing_required_column_maps_to_empty_set() {
    let sheet: SheetData = serde_json::from_value(json!({
        "columns": [{"id": 1, "title": "Treatment Method"}],
        "rows": [{"cells": [{"columnId": 1, "value": "Wet Pond"}]}]
    }))
    .expect("sheet payload should decode");

    let records = map_sheet(&sheet, &SHEET_TREATMENT_METHOD).expect("sheet should map");

    assert!(records.is_empty());
    assert_eq!(records.fields(), ["name", "removal_rate"]);
}

#[test]
fn title_lookup_is_case_sensitive() {
    let sheet: SheetData = serde_json::from_value(json!({
        "columns": [
            {"id": 1, "title": "land use"},
            {"id": 2, "title": "Base Load (TN)"}
        ],
        "rows": [{"cells": [{"columnId": 1, "value": "Commercial"}, {"columnId": 2, "value": 1.5}]}]
    }))
    .expect("sheet payload should decode");

    let records = map_sheet(&sheet, &SHEET_LAND_USE).expect("sheet should map");

    assert!(records.is_empty());
}

#[test]
fn non_numeric_base_load_is_a_coercion_error() {
    let sheet = land_use_sheet(json!([
        {"cells": [{"columnId": 101, "value": "Commercial"}, {"columnId": 102, "value": "12.5"}]},
        {"cells": [{"columnId": 101, "value": "Industrial"}, {"columnId": 102, "value": "n/a"}]}
    ]));

    let error = map_sheet(&sheet, &SHEET_LAND_USE).expect_err("bad number must fail");

    assert_eq!(
        error,
        MapError::Coercion {
            schema: "sheet_land_use",
            row: 2,
            field: "base_load",
            coercion: "float",
            value: "n/a".to_string(),
        }
    );
}

#[test]
fn numeric_names_are_rendered_as_text() {
    let sheet = land_use_sheet(json!([
        {"cells": [{"columnId": 101, "value": 1990}, {"columnId": 102, "value": 0.25}]}
    ]));

    let records = map_sheet(&sheet, &SHEET_LAND_USE).expect("sheet should map");

    assert_eq!(
        serde_json::to_value(&records).expect("records should serialize"),
        json!([{"name": "1990", "base_load": 0.25}])
    );
}

#[test]
fn whitespace_name_is_a_present_value() {
    let sheet = land_use_sheet(json!([
        {"cells": [{"columnId": 101, "value": " "}, {"columnId": 102, "value": 3}]}
    ]));

    let records = map_sheet(&sheet, &SHEET_LAND_USE).expect("sheet should map");

    assert_eq!(
        serde_json::to_value(&records).expect("records should serialize"),
        json!([{"name": " ", "base_load": 3.0}])
    );
}

#[test]
fn empty_base_load_is_a_coercion_error_not_a_drop() {
    let sheet = land_use_sheet(json!([
        {"cells": [{"columnId": 101, "value": "Commercial"}, {"columnId": 102, "value": ""}]}
    ]));

    let error = map_sheet(&sheet, &SHEET_LAND_USE).expect_err("empty number must fail");

    assert!(
        matches!(error, MapError::Coercion { field: "base_load", row: 1, .. }),
        "unexpected error: {error}"
    );
}
