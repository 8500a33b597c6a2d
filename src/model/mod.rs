/// Implements [`crate::store::Record`] (and optionally [`ActiveFlag`]) for a
/// struct with an `id: String` field.
macro_rules! record {
    ($ty:ty, $table:literal, $label:literal) => {
        impl crate::store::Record for $ty {
            const TABLE: &'static str = $table;
            const LABEL: &'static str = $label;

            fn id(&self) -> &str {
                &self.id
            }
        }
    };
    ($ty:ty, $table:literal, $label:literal, active) => {
        record!($ty, $table, $label);

        impl crate::model::ActiveFlag for $ty {
            fn active_mut(&mut self) -> &mut bool {
                &mut self.is_active
            }
        }
    };
}

pub mod attendance_regularization;
pub mod camera_device;
pub mod daily_attendance;
pub mod department;
pub mod designation;
pub mod employee;
pub mod employee_assignment;
pub mod face_enrollment;
pub mod face_recognition_log;
pub mod gps_punch;
pub mod leave_application;
pub mod leave_balance;
pub mod leave_policy;
pub mod location;
pub mod project;
pub mod project_category;
pub mod project_document;
pub mod role;
pub mod salary_template;
pub mod shift;
pub mod staff_profile;
pub mod user;

use serde::Deserialize;
use utoipa::IntoParams;

use crate::store::Record;

/// `?is_active=` filter shared by the reference-entity lists.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ActiveQuery {
    pub is_active: Option<bool>,
}

/// Reference entities that can be switched on and off without deletion.
pub trait ActiveFlag: Record {
    fn active_mut(&mut self) -> &mut bool;
}

/// Fixed-width RFC 3339 timestamps (millisecond precision, `Z` suffix) so
/// stored values sort lexicographically.
pub mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

    pub fn format(dt: &DateTime<Utc>) -> String {
        dt.format(FORMAT).to_string()
    }

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc))
    }

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => s.serialize_some(&super::format(dt)),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
            Option::<String>::deserialize(d)?
                .map(|raw| super::parse(&raw).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

/// Serializes a unit-only enum into the JSON value stored in documents, for
/// use in filters.
pub fn enum_value<T: serde::Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::timestamp;
    use chrono::{TimeZone, Utc};

    #[test]
    fn timestamps_are_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        assert_eq!(timestamp::format(&whole), "2025-03-01T08:00:00.000Z");
        assert_eq!(timestamp::parse("2025-03-01T08:00:00.000Z").unwrap(), whole);
    }
}
