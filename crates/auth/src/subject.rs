use core::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

/// Identity of the account a token represents.
///
/// The upstream issuer historically encoded `sub` both as a JSON number and
/// as a numeric string; deserialization accepts either and normalizes to a
/// number.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubjectId(i64);

impl SubjectId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for SubjectId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<SubjectId> for i64 {
    fn from(value: SubjectId) -> Self {
        value.0
    }
}

impl FromStr for SubjectId {
    type Err = core::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl Serialize for SubjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for SubjectId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct SubjectVisitor;

        impl serde::de::Visitor<'_> for SubjectVisitor {
            type Value = SubjectId;

            fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str("an integer or numeric string subject id")
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<SubjectId, E> {
                Ok(SubjectId(v))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<SubjectId, E> {
                i64::try_from(v)
                    .map(SubjectId)
                    .map_err(|_| E::custom("subject id out of range"))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<SubjectId, E> {
                v.parse::<i64>()
                    .map(SubjectId)
                    .map_err(|_| E::custom("subject id is not numeric"))
            }
        }

        deserializer.deserialize_any(SubjectVisitor)
    }
}
