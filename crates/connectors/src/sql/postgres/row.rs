use crate::sql::base::error::DbError;
use chrono::{NaiveDateTime, NaiveTime};
use model::{
    core::{
        data_type::DataType,
        value::{FieldValue, Value},
    },
    records::row::RowData,
};
use rust_decimal::Decimal;
use std::error::Error;
use tokio_postgres::{
    Row as PgRow,
    types::{FromSql, Type},
};
use tracing::warn;

// Sign words of the binary `numeric` header.
const NUMERIC_NEG: u16 = 0x4000;
const NUMERIC_NAN: u16 = 0xC000;
const NUMERIC_PINF: u16 = 0xD000;
const NUMERIC_NINF: u16 = 0xF000;
const NUMERIC_SPECIAL: u16 = 0xC000;

/// Decodes a driver row into `RowData` using the column type metadata the
/// driver reports, without knowing the schema ahead of time.
pub struct PgRowReader<'a> {
    row: &'a PgRow,
}

impl<'a> PgRowReader<'a> {
    pub fn new(row: &'a PgRow) -> Self {
        PgRowReader { row }
    }

    pub fn to_row_data(&self) -> Result<RowData, DbError> {
        let fields = self
            .row
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let data_type = DataType::from_postgres_type_lossy(column.type_().name());
                let value = self.get_value(idx, column.name(), &data_type)?;
                Ok(FieldValue::new(column.name(), value, data_type))
            })
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(RowData::new(fields))
    }

    pub fn get_value(&self, idx: usize, name: &str, data_type: &DataType) -> Result<Value, DbError> {
        let row = self.row;
        match data_type {
            DataType::Short => decode(row, idx, name, |v: i16| Value::Int(v as i64)),
            DataType::Int => decode(row, idx, name, |v: i32| Value::Int(v as i64)),
            DataType::Long => decode(row, idx, name, Value::Int),
            DataType::Float => decode(row, idx, name, |v: f32| Value::Float(v as f64)),
            DataType::Double => decode(row, idx, name, Value::Float),
            DataType::Decimal => decode(row, idx, name, |PgNumeric(v): PgNumeric| {
                finite_or_null(name, v)
            }),
            DataType::Boolean => decode(row, idx, name, Value::Boolean),
            DataType::String | DataType::VarChar | DataType::Char => {
                decode(row, idx, name, Value::String)
            }
            DataType::SingleChar => decode(row, idx, name, |v: i8| {
                Value::String(char::from(v as u8).to_string())
            }),
            DataType::Json => decode(row, idx, name, Value::Json),
            DataType::Uuid => decode(row, idx, name, Value::Uuid),
            DataType::Bytea => decode(row, idx, name, Value::Bytes),
            DataType::Date => decode(row, idx, name, Value::Date),
            DataType::Time => decode(row, idx, name, |v: NaiveTime| Value::String(v.to_string())),
            DataType::Timestamp => decode(row, idx, name, |v: NaiveDateTime| {
                Value::Timestamp(v.and_utc())
            }),
            DataType::TimestampTz => decode(row, idx, name, Value::Timestamp),
            DataType::Null => Ok(Value::Null),
            DataType::Custom(type_name) => Ok(self.custom_as_text(idx, name, type_name)),
        }
    }

    fn custom_as_text(&self, idx: usize, name: &str, type_name: &str) -> Value {
        match self.row.try_get::<_, Option<String>>(idx) {
            Ok(Some(text)) => Value::String(text),
            Ok(None) => Value::Null,
            Err(_) => {
                warn!(column = name, type_name, "Unsupported column type, value dropped");
                Value::Null
            }
        }
    }
}

fn decode<'r, T, F>(row: &'r PgRow, idx: usize, column: &str, wrap: F) -> Result<Value, DbError>
where
    T: FromSql<'r>,
    F: FnOnce(T) -> Value,
{
    match row.try_get::<_, Option<T>>(idx) {
        Ok(Some(value)) => Ok(wrap(value)),
        Ok(None) => Ok(Value::Null),
        Err(source) => Err(DbError::Decode {
            column: column.to_string(),
            source,
        }),
    }
}

fn finite_or_null(column: &str, value: f64) -> Value {
    if value.is_finite() {
        Value::Float(value)
    } else {
        warn!(column, %value, "Non-finite numeric cannot be stored as a field, value dropped");
        Value::Null
    }
}

/// A `numeric` column as `f64`.
///
/// `Decimal` is tried first. NaN, the infinities and anything beyond its
/// 28 significant digits are read straight from the binary wire form.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PgNumeric(f64);

impl<'a> FromSql<'a> for PgNumeric {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        match Decimal::from_sql(ty, raw) {
            Ok(decimal) => Ok(PgNumeric(decimal.as_f64())),
            Err(_) => numeric_from_wire(raw).map(PgNumeric),
        }
    }

    fn accepts(ty: &Type) -> bool {
        <Decimal as FromSql>::accepts(ty)
    }
}

fn numeric_from_wire(raw: &[u8]) -> Result<f64, Box<dyn Error + Sync + Send>> {
    let word = |i: usize| -> Result<u16, Box<dyn Error + Sync + Send>> {
        raw.get(2 * i..2 * i + 2)
            .map(|b| u16::from_be_bytes([b[0], b[1]]))
            .ok_or_else(|| "truncated numeric value".into())
    };

    let groups = usize::from(word(0)?);
    let weight = word(1)? as i16;
    let sign = word(2)?;

    match sign {
        NUMERIC_NAN => return Ok(f64::NAN),
        NUMERIC_PINF => return Ok(f64::INFINITY),
        NUMERIC_NINF => return Ok(f64::NEG_INFINITY),
        s if s & NUMERIC_SPECIAL == NUMERIC_SPECIAL => {
            return Err(format!("unknown special numeric 0x{s:04x}").into());
        }
        _ => {}
    }

    let mut value = 0f64;
    for i in 0..groups {
        // Each group is a base-10000 digit; the first one sits at 10000^weight.
        let group = f64::from(word(4 + i)?);
        value += group * 10_000f64.powi(i32::from(weight) - i as i32);
    }

    Ok(if sign == NUMERIC_NEG { -value } else { value })
}
