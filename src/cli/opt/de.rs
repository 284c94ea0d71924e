use serde::{
    de::{Error, Visitor},
    Deserializer,
};

pub(super) fn deserialize_opt_usize<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_u64(OptUsizeVisitor)
}

struct OptUsizeVisitor;

impl<'de> Visitor<'de> for OptUsizeVisitor {
    type Value = Option<usize>;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "a non-negative number")
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: Error,
    {
        usize::try_from(v)
            .map(Some)
            .map_err(|_| E::custom("number too large"))
    }
}

pub(super) fn deserialize_opt_u16<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_u16(OptU16Visitor)
}

struct OptU16Visitor;

impl<'de> Visitor<'de> for OptU16Visitor {
    type Value = Option<u16>;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "a number")
    }

    fn visit_u16<E>(self, v: u16) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(Some(v))
    }
}

pub(super) fn deserialize_opt_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_i32(OptI32Visitor)
}

struct OptI32Visitor;

impl<'de> Visitor<'de> for OptI32Visitor {
    type Value = Option<i32>;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "a number")
    }

    fn visit_i32<E>(self, v: i32) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(Some(v))
    }
}
