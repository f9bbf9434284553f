use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use tagorm::{FieldKind, OrmError, RawRow, Record, Value, codec};

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct UserProfile {
    #[db("pk")]
    id: u64,
    #[db("field:user_name")]
    name: String,
    age: i32,
    verified: bool,
    balance: f64,
    joined: DateTime<Utc>,
    #[db("ignore")]
    scratch: HashMap<String, String>,
}

#[derive(Debug, Default, Record)]
struct Membership {
    #[db("field: group_id; pk")]
    group: i64,
    #[db("pk")]
    user: i64,
    r#type: String,
}

#[derive(Debug, Default, Record)]
struct Empty {}

#[test]
fn derived_field_table_follows_declaration_order() {
    let idents: Vec<&str> = UserProfile::FIELDS.iter().map(|f| f.ident).collect();
    assert_eq!(
        idents,
        ["id", "name", "age", "verified", "balance", "joined", "scratch"]
    );
    assert_eq!(UserProfile::NAME, "UserProfile");
    assert_eq!(UserProfile::FIELDS[0].kind, FieldKind::UInt64);
    assert_eq!(UserProfile::FIELDS[5].kind, FieldKind::Time);
    assert_eq!(UserProfile::FIELDS[1].tag, "field:user_name");
    assert!(matches!(UserProfile::FIELDS[6].kind, FieldKind::Unsupported(_)));
}

#[test]
fn raw_identifiers_are_unescaped() {
    assert_eq!(Membership::FIELDS[2].ident, "type");
    let encoded = codec::encode(&Membership::default()).unwrap();
    assert!(encoded.contains("type"));
}

#[test]
fn table_and_primary_key() {
    assert_eq!(codec::table_name::<UserProfile>(), "userprofile");
    assert_eq!(codec::scan_primary_key::<UserProfile>().unwrap(), "id");
    // Tag items may come in any order; first pk field wins.
    assert_eq!(codec::scan_primary_key::<Membership>().unwrap(), "group_id");
}

#[test]
fn encode_then_decode_preserves_values() {
    let mut scratch = HashMap::new();
    scratch.insert("k".to_string(), "v".to_string());
    let original = UserProfile {
        id: 7,
        name: "ada".into(),
        age: -1,
        verified: true,
        balance: 12.25,
        joined: Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap(),
        scratch,
    };

    let encoded = codec::encode(&original).unwrap();
    assert_eq!(
        encoded.columns().collect::<Vec<_>>(),
        ["id", "user_name", "age", "verified", "balance", "joined"]
    );
    assert_eq!(encoded.get("verified"), Some(&Value::Bool(true)));

    let mut decoded = UserProfile::default();
    codec::decode(&encoded.to_raw_row(), &mut decoded).unwrap();
    assert_eq!(
        decoded,
        UserProfile {
            scratch: HashMap::new(),
            ..original
        }
    );
}

#[test]
fn sub_second_timestamps_survive_driver_text() {
    let original = UserProfile {
        id: 1,
        joined: Utc.timestamp_opt(1_700_000_000, 123_000_000).unwrap(),
        ..Default::default()
    };
    let row = codec::encode(&original).unwrap().to_raw_row();
    assert_eq!(
        row.get_str("joined").as_deref(),
        Some("2023-11-14 22:13:20.123")
    );

    let mut decoded = UserProfile::default();
    codec::decode(&row, &mut decoded).unwrap();
    assert_eq!(decoded.joined, original.joined);
}

#[test]
fn fieldless_struct_is_rejected_at_runtime() {
    assert!(matches!(
        codec::encode(&Empty {}),
        Err(OrmError::NotAStruct("Empty"))
    ));
}

#[test]
fn decode_with_extra_and_missing_columns() {
    let row: RawRow = [("age", "30"), ("unknown", "x"), ("scratch", "{}")]
        .into_iter()
        .collect();
    let mut profile = UserProfile {
        name: "kept".into(),
        ..Default::default()
    };
    codec::decode(&row, &mut profile).unwrap();
    assert_eq!(profile.age, 30);
    assert_eq!(profile.name, "kept");
    assert!(profile.scratch.is_empty());
}
