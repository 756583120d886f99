use lazy_static::lazy_static;
use std::{borrow::Cow, collections::HashMap, fmt};

/// Column type as reported by the source driver, normalized to the set of
/// shapes the sync knows how to decode.
#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    Short,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    Boolean,
    String,
    VarChar,
    Char,
    /// Postgres' single-byte internal `"char"`.
    SingleChar,
    Json,
    Uuid,
    Bytea,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Null,
    Custom(String),
}

lazy_static! {
    static ref POSTGRES_TYPE_MAP: HashMap<&'static str, DataType> = build_postgres_type_map();
}

impl DataType {
    pub fn from_postgres_type(type_name: &str) -> Result<Self, String> {
        let normalized = Self::normalize_type_name(type_name);
        POSTGRES_TYPE_MAP
            .get(normalized.as_str())
            .cloned()
            .ok_or_else(|| format!("Unknown Postgres column type: {type_name}"))
    }

    /// Resolves a driver type name, keeping unknown names as `Custom`.
    pub fn from_postgres_type_lossy(type_name: &str) -> Self {
        Self::from_postgres_type(type_name)
            .unwrap_or_else(|_| DataType::Custom(type_name.to_string()))
    }

    pub fn name(&self) -> Cow<'_, str> {
        match self {
            DataType::Short => Cow::Borrowed("SMALLINT"),
            DataType::Int => Cow::Borrowed("INTEGER"),
            DataType::Long => Cow::Borrowed("BIGINT"),
            DataType::Float => Cow::Borrowed("REAL"),
            DataType::Double => Cow::Borrowed("DOUBLE PRECISION"),
            DataType::Decimal => Cow::Borrowed("NUMERIC"),
            DataType::Boolean => Cow::Borrowed("BOOLEAN"),
            DataType::String => Cow::Borrowed("TEXT"),
            DataType::VarChar => Cow::Borrowed("VARCHAR"),
            DataType::Char => Cow::Borrowed("CHAR"),
            DataType::SingleChar => Cow::Borrowed("\"CHAR\""),
            DataType::Json => Cow::Borrowed("JSONB"),
            DataType::Uuid => Cow::Borrowed("UUID"),
            DataType::Bytea => Cow::Borrowed("BYTEA"),
            DataType::Date => Cow::Borrowed("DATE"),
            DataType::Time => Cow::Borrowed("TIME"),
            DataType::Timestamp => Cow::Borrowed("TIMESTAMP"),
            DataType::TimestampTz => Cow::Borrowed("TIMESTAMPTZ"),
            DataType::Null => Cow::Borrowed("NULL"),
            DataType::Custom(name) => Cow::Owned(name.to_uppercase()),
        }
    }

    pub fn is_timestamp(&self) -> bool {
        matches!(self, DataType::Timestamp | DataType::TimestampTz)
    }

    fn normalize_type_name(type_name: &str) -> String {
        type_name
            .split('(')
            .next()
            .unwrap_or(type_name)
            .trim()
            .to_uppercase()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn build_postgres_type_map() -> HashMap<&'static str, DataType> {
    use DataType::*;

    let entries = [
        ("BOOLEAN", Boolean),
        ("BOOL", Boolean),
        ("SMALLINT", Short),
        ("INT2", Short),
        ("INTEGER", Int),
        ("INT", Int),
        ("INT4", Int),
        ("INT8", Long),
        ("BIGINT", Long),
        ("FLOAT4", Float),
        ("REAL", Float),
        ("FLOAT8", Double),
        ("DOUBLE PRECISION", Double),
        ("NUMERIC", Decimal),
        ("DECIMAL", Decimal),
        ("JSONB", Json),
        ("JSON", Json),
        ("TEXT", String),
        ("NAME", String),
        ("CHARACTER VARYING", VarChar),
        ("VARCHAR", VarChar),
        ("CHARACTER", Char),
        // Driver names: `char` is the one-byte internal type, `bpchar` is char(n).
        ("CHAR", SingleChar),
        ("\"CHAR\"", SingleChar),
        ("BPCHAR", Char),
        ("UUID", Uuid),
        ("BYTEA", Bytea),
        ("DATE", Date),
        ("TIME", Time),
        ("TIME WITHOUT TIME ZONE", Time),
        ("TIMESTAMP", Timestamp),
        ("TIMESTAMP WITHOUT TIME ZONE", Timestamp),
        ("TIMESTAMP WITH TIME ZONE", TimestampTz),
        ("TIMESTAMPTZ", TimestampTz),
    ];

    let mut map = HashMap::new();
    for (name, data_type) in entries {
        map.insert(name, data_type);
    }
    map
}
