//! Hand-written records shared by unit tests.

use chrono::{DateTime, TimeZone, Utc};

use crate::record::{FieldDef, Record, assign};
use crate::value::{Column, FieldKind, Value};

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Account {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) active: bool,
    pub(crate) score: f64,
    pub(crate) level: i8,
    pub(crate) visits: u32,
    pub(crate) created: DateTime<Utc>,
    pub(crate) cache: String,
}

impl Account {
    pub(crate) fn sample() -> Self {
        Self {
            id: 42,
            name: "alice".to_string(),
            active: true,
            score: 9.5,
            level: -3,
            visits: 17,
            created: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            cache: "scratch".to_string(),
        }
    }
}

impl Record for Account {
    const NAME: &'static str = "Account";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::new("Id", "pk", <i64 as Column>::KIND),
        FieldDef::new("name", "field: user_name", <String as Column>::KIND),
        FieldDef::new("active", "", <bool as Column>::KIND),
        FieldDef::new("score", "", <f64 as Column>::KIND),
        FieldDef::new("level", "", <i8 as Column>::KIND),
        FieldDef::new("visits", "", <u32 as Column>::KIND),
        FieldDef::new("created", "", <DateTime<Utc> as Column>::KIND),
        FieldDef::new("cache", "ignore", <String as Column>::KIND),
    ];

    fn value_at(&self, index: usize) -> Option<Value> {
        match index {
            0 => Some(self.id.to_value()),
            1 => Some(self.name.to_value()),
            2 => Some(self.active.to_value()),
            3 => Some(self.score.to_value()),
            4 => Some(self.level.to_value()),
            5 => Some(self.visits.to_value()),
            6 => Some(self.created.to_value()),
            7 => Some(self.cache.to_value()),
            _ => None,
        }
    }

    fn set_value_at(&mut self, index: usize, value: Value) -> bool {
        match index {
            0 => assign(&mut self.id, value),
            1 => assign(&mut self.name, value),
            2 => assign(&mut self.active, value),
            3 => assign(&mut self.score, value),
            4 => assign(&mut self.level, value),
            5 => assign(&mut self.visits, value),
            6 => assign(&mut self.created, value),
            7 => assign(&mut self.cache, value),
            _ => false,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Audit {
    pub(crate) note: String,
    pub(crate) first: i64,
    pub(crate) second: i64,
}

impl Record for Audit {
    const NAME: &'static str = "Audit";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::new("note", "", FieldKind::Text),
        FieldDef::new("first", "pk;field:first_id", FieldKind::Int64),
        FieldDef::new("second", "pk", FieldKind::Int64),
    ];

    fn value_at(&self, index: usize) -> Option<Value> {
        match index {
            0 => Some(self.note.to_value()),
            1 => Some(self.first.to_value()),
            2 => Some(self.second.to_value()),
            _ => None,
        }
    }

    fn set_value_at(&mut self, index: usize, value: Value) -> bool {
        match index {
            0 => assign(&mut self.note, value),
            1 => assign(&mut self.first, value),
            2 => assign(&mut self.second, value),
            _ => false,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Unit;

impl Record for Unit {
    const NAME: &'static str = "Unit";
    const FIELDS: &'static [FieldDef] = &[];

    fn value_at(&self, _index: usize) -> Option<Value> {
        None
    }

    fn set_value_at(&mut self, _index: usize, _value: Value) -> bool {
        false
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct NoKey {
    pub(crate) label: String,
}

impl Record for NoKey {
    const NAME: &'static str = "NoKey";
    const FIELDS: &'static [FieldDef] = &[FieldDef::new("label", "", FieldKind::Text)];

    fn value_at(&self, index: usize) -> Option<Value> {
        (index == 0).then(|| self.label.to_value())
    }

    fn set_value_at(&mut self, index: usize, value: Value) -> bool {
        index == 0 && assign(&mut self.label, value)
    }
}

/// Write-only column type: encodes as text, has no decoder.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) enum Status {
    #[default]
    Open,
    Closed,
}

impl Column for Status {
    const KIND: FieldKind = FieldKind::Unsupported("Status");

    fn to_value(&self) -> Value {
        match self {
            Status::Open => Value::from("open"),
            Status::Closed => Value::from("closed"),
        }
    }

    fn from_value(_value: Value) -> Option<Self> {
        None
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Ticket {
    pub(crate) id: u64,
    pub(crate) status: Status,
}

impl Record for Ticket {
    const NAME: &'static str = "Ticket";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::new("id", "pk", <u64 as Column>::KIND),
        FieldDef::new("status", "", <Status as Column>::KIND),
    ];

    fn value_at(&self, index: usize) -> Option<Value> {
        match index {
            0 => Some(self.id.to_value()),
            1 => Some(self.status.to_value()),
            _ => None,
        }
    }

    fn set_value_at(&mut self, index: usize, value: Value) -> bool {
        match index {
            0 => assign(&mut self.id, value),
            1 => assign(&mut self.status, value),
            _ => false,
        }
    }
}
