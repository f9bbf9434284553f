use super::*;
use crate::fixtures::{Account, Audit, NoKey, Status, Ticket, Unit};
use chrono::TimeZone;

#[test]
fn field_name_uses_override_then_lowercase() {
    let defs = Account::FIELDS;
    assert_eq!(field_name(&defs[0]).unwrap(), "id");
    assert_eq!(field_name(&defs[1]).unwrap(), "user_name");
    assert!(matches!(
        field_name(&defs[7]),
        Err(OrmError::FieldIgnored(name)) if name == "cache"
    ));
}

#[test]
fn table_name_is_lowercased_type_name() {
    assert_eq!(table_name::<Account>(), "account");
}

#[test]
fn primary_key_scan() {
    assert_eq!(scan_primary_key::<Account>().unwrap(), "id");
    // First in declaration order wins.
    assert_eq!(scan_primary_key::<Audit>().unwrap(), "first_id");
    assert!(matches!(
        scan_primary_key::<Unit>(),
        Err(OrmError::NoPrimaryKey("Unit"))
    ));
}

#[test]
fn encode_skips_ignored_fields() {
    let encoded = encode(&Account::sample()).unwrap();
    assert_eq!(encoded.len(), 7);
    assert!(!encoded.contains("cache"));
    assert_eq!(encoded.get("user_name"), Some(&Value::Text("alice".into())));
    assert_eq!(encoded.get("level"), Some(&Value::Int(-3)));
    assert_eq!(encoded.get("visits"), Some(&Value::UInt(17)));
    let columns: Vec<&str> = encoded.columns().collect();
    assert_eq!(
        columns,
        ["id", "user_name", "active", "score", "level", "visits", "created"]
    );
}

#[test]
fn encode_and_decode_reject_fieldless_records() {
    assert!(matches!(encode(&Unit), Err(OrmError::NotAStruct("Unit"))));
    assert!(matches!(
        decode(&RawRow::new(), &mut Unit),
        Err(OrmError::NotAStruct("Unit"))
    ));
}

#[test]
fn round_trip_through_driver_text() {
    let original = Account::sample();
    let row = encode(&original).unwrap().to_raw_row();

    let mut decoded = Account::default();
    decode(&row, &mut decoded).unwrap();

    assert_eq!(decoded.id, original.id);
    assert_eq!(decoded.name, original.name);
    assert_eq!(decoded.active, original.active);
    assert_eq!(decoded.score, original.score);
    assert_eq!(decoded.level, original.level);
    assert_eq!(decoded.visits, original.visits);
    assert_eq!(decoded.created, original.created);
    // Ignored fields are never written.
    assert_eq!(decoded.cache, "");
}

#[test]
fn round_trip_keeps_sub_second_precision() {
    let base = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    for nanos in [123_000_000, 123_456_000, 123_456_789] {
        let original = Account {
            created: base + chrono::Duration::nanoseconds(nanos),
            ..Account::sample()
        };
        let row = encode(&original).unwrap().to_raw_row();

        let mut decoded = Account::default();
        decode(&row, &mut decoded).unwrap();
        assert_eq!(decoded.created, original.created, "nanos {nanos}");
    }
}

#[test]
fn decode_is_a_partial_merge() {
    let mut record = Account::sample();
    let row: RawRow = [("user_name", "bob")].into_iter().collect();
    decode(&row, &mut record).unwrap();
    assert_eq!(record.name, "bob");
    assert_eq!(record.id, 42);
    assert_eq!(record.cache, "scratch");
}

#[test]
fn decode_never_touches_ignored_column() {
    let mut record = Account::default();
    let row: RawRow = [("cache", "from-db"), ("id", "1")].into_iter().collect();
    decode(&row, &mut record).unwrap();
    assert_eq!(record.cache, "");
    assert_eq!(record.id, 1);
}

#[test]
fn bool_is_true_only_for_one() {
    let mut record = Account::default();
    for (raw, expected) in [("1", true), ("0", false), ("true", false), ("", false)] {
        let row: RawRow = [("active", raw)].into_iter().collect();
        decode(&row, &mut record).unwrap();
        assert_eq!(record.active, expected, "raw {raw:?}");
    }
}

#[test]
fn bad_numbers_are_invalid_type() {
    let mut record = Account::default();
    for (column, raw) in [("id", "abc"), ("visits", "-1"), ("score", "x1"), ("level", "")] {
        let row: RawRow = [(column, raw)].into_iter().collect();
        let err = decode(&row, &mut record).unwrap_err();
        assert!(
            matches!(&err, OrmError::InvalidType { column: c, .. } if c == column),
            "{column}: {err}"
        );
    }
}

#[test]
fn narrow_integer_overflow_is_invalid_type() {
    let mut record = Account::default();
    let row: RawRow = [("level", "300")].into_iter().collect();
    assert!(matches!(
        decode(&row, &mut record),
        Err(OrmError::InvalidType { .. })
    ));
}

#[test]
fn temporal_formats() {
    assert_eq!(
        parse_time("1700000000"),
        Some(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
    );
    assert_eq!(
        parse_time("2024-01-02 03:04:05"),
        Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
    );
    let with_zone = parse_time("2024-01-02 03:04:05.678 +0800").unwrap();
    assert_eq!(
        with_zone,
        Utc.with_ymd_and_hms(2024, 1, 1, 19, 4, 5).unwrap() + chrono::Duration::milliseconds(678)
    );
    assert_eq!(parse_time("yesterday"), None);
}

#[test]
fn unparseable_time_is_unsupported_type() {
    let mut record = Account::default();
    let row: RawRow = [("created", "not a date")].into_iter().collect();
    assert!(matches!(
        decode(&row, &mut record),
        Err(OrmError::UnsupportedType { column, .. }) if column == "created"
    ));
}

#[test]
fn descriptors_are_cached_per_type() {
    let a = descriptors::<Account>();
    let b = descriptors::<Account>();
    assert!(std::ptr::eq(a, b));
    assert!(a[0].primary_key);
    assert!(a[7].ignored);
    assert_eq!(a[1].column, "user_name");
}

#[test]
fn encoded_record_serializes_as_object() {
    assert!(EncodedRecord::new().is_empty());
    let encoded = encode(&Account::sample()).unwrap();
    assert_eq!(encoded.len(), 7);

    let json = encoded.to_json();
    assert_eq!(json["user_name"], "alice");
    assert_eq!(json["id"], 42);
    assert!(json.get("cache").is_none());
}

#[test]
fn no_primary_key_is_reported_by_type_name() {
    assert!(matches!(
        scan_primary_key::<NoKey>(),
        Err(OrmError::NoPrimaryKey("NoKey"))
    ));
}

#[test]
fn write_only_kind_encodes_but_does_not_decode() {
    let ticket = Ticket {
        id: 3,
        status: Status::Closed,
    };
    let encoded = encode(&ticket).unwrap();
    assert_eq!(encoded.get("status"), Some(&Value::Text("closed".into())));

    let mut target = Ticket::default();
    let row: RawRow = [("id", "3"), ("status", "closed")].into_iter().collect();
    let err = decode(&row, &mut target).unwrap_err();
    assert!(matches!(
        &err,
        OrmError::UnsupportedType { column, type_name } if column == "status" && type_name == "Status"
    ));
    // Fields before the failing one were already merged.
    assert_eq!(target.id, 3);
}
