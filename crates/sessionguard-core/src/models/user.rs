use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role names the backend assigns in `tipo`.
pub mod roles {
    pub const SUPERADMIN: &str = "SUPERADMIN";
    pub const ADMIN: &str = "ADMIN";
    pub const CLIENTE: &str = "CLIENTE";
}

/// Account record as returned by the backend and cached after login.
///
/// Every field is optional and read leniently: whatever JSON object sits in
/// storage is treated as the current user. A field of an unexpected type is
/// read as absent, and a user without `tipo` simply holds no role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, deserialize_with = "deserialize_lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_text", skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text", skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_text", skip_serializing_if = "Option::is_none")]
    pub imagem: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_local_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    #[cfg_attr(feature = "ts", ts(type = "string | null"))]
    pub data_criacao: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_role", skip_serializing_if = "Option::is_none")]
    pub tipo: Option<String>,
}

impl User {
    /// Exact, case-sensitive role comparison
    pub fn has_role(&self, role: &str) -> bool {
        self.tipo.as_deref() == Some(role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(roles::ADMIN) || self.has_role(roles::SUPERADMIN)
    }

    /// Name for display, falling back to email
    pub fn display_name(&self) -> String {
        self.nome
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.email.as_deref())
            .unwrap_or("Unknown")
            .to_string()
    }
}

// Helper to deserialize an id sent as a number or a numeric string.
// Any other value reads as None.
fn deserialize_lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

// Helper to deserialize free text, accepting numbers and bools as their
// string form. Arrays, objects and null read as None.
fn deserialize_lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

// Role names are compared as exact strings, so only a string is a role.
fn deserialize_role<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

// Helper to deserialize a local timestamp sent either as an ISO string
// ("2024-03-01T10:15:30.123") or as a [y, m, d, h, min, s, nanos] array.
// Anything unreadable becomes None instead of failing the whole user.
fn deserialize_local_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    struct LocalDateTimeVisitor;

    impl<'de> de::Visitor<'de> for LocalDateTimeVisitor {
        type Value = Option<NaiveDateTime>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("an ISO local datetime string or a datetime array")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
            Ok(NaiveDateTime::parse_from_str(v, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(v, "%Y-%m-%dT%H:%M"))
                .ok())
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            // Drain the whole array before judging it
            let mut values: Vec<serde_json::Value> = Vec::with_capacity(7);
            while let Some(value) = seq.next_element()? {
                values.push(value);
            }
            let parts: Option<Vec<i64>> = values.iter().map(serde_json::Value::as_i64).collect();
            Ok(parts.and_then(|p| datetime_from_parts(&p)))
        }

        fn visit_i64<E>(self, _v: i64) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_u64<E>(self, _v: u64) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_f64<E>(self, _v: f64) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_bool<E>(self, _v: bool) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: de::MapAccess<'de>,
        {
            while map
                .next_entry::<de::IgnoredAny, de::IgnoredAny>()?
                .is_some()
            {}
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(LocalDateTimeVisitor)
}

fn datetime_from_parts(parts: &[i64]) -> Option<NaiveDateTime> {
    if parts.len() < 3 {
        return None;
    }
    let part = |i: usize| parts.get(i).copied().unwrap_or(0);
    let date = NaiveDate::from_ymd_opt(
        i32::try_from(part(0)).ok()?,
        u32::try_from(part(1)).ok()?,
        u32::try_from(part(2)).ok()?,
    )?;
    date.and_hms_nano_opt(
        u32::try_from(part(3)).ok()?,
        u32::try_from(part(4)).ok()?,
        u32::try_from(part(5)).ok()?,
        u32::try_from(part(6)).ok()?,
    )
}
