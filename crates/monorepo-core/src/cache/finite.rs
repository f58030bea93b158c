//! Walks a serializable value looking for NaN and infinite floats.
//!
//! `serde_json` writes every non-finite float as `null`, which would make `NaN`, `inf`, `-inf`,
//! and `None` encode identically. Cache keys run this check first and refuse such values.

use serde::Serialize;
use serde::ser::{self, Serializer};
use std::fmt;

/// Return the first non-finite float found in `value`, if any.
///
/// Serialization failures unrelated to floats are ignored here; the real encoder reports them.
pub(super) fn find_non_finite<T>(value: &T) -> Option<f64>
where
    T: Serialize + ?Sized,
{
    match value.serialize(FiniteCheck) {
        Err(Found::NonFinite(value)) => Some(value),
        Ok(()) | Err(Found::Other) => None,
    }
}

#[derive(Debug)]
enum Found {
    NonFinite(f64),
    Other,
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite(value) => write!(f, "non-finite float {value}"),
            Self::Other => f.write_str("serialization failed"),
        }
    }
}

impl std::error::Error for Found {}

impl ser::Error for Found {
    fn custom<M: fmt::Display>(_msg: M) -> Self {
        Self::Other
    }
}

#[derive(Clone, Copy)]
struct FiniteCheck;

type Checked = Result<(), Found>;

fn check_float(value: f64) -> Checked {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Found::NonFinite(value))
    }
}

macro_rules! accept {
    ($($method:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method(self, _value: $ty) -> Checked {
                Ok(())
            }
        )*
    };
}

impl Serializer for FiniteCheck {
    type Ok = ();
    type Error = Found;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    accept! {
        serialize_bool: bool,
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_i128: i128,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
        serialize_u128: u128,
        serialize_char: char,
        serialize_str: &str,
        serialize_bytes: &[u8],
        serialize_unit_struct: &'static str,
    }

    fn serialize_f32(self, value: f32) -> Checked {
        check_float(f64::from(value))
    }

    fn serialize_f64(self, value: f64) -> Checked {
        check_float(value)
    }

    fn serialize_none(self) -> Checked {
        Ok(())
    }

    fn serialize_some<T>(self, value: &T) -> Checked
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Checked {
        Ok(())
    }

    fn serialize_unit_variant(self, _name: &'static str, _index: u32, _variant: &'static str) -> Checked {
        Ok(())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Checked
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Checked
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self, Found> {
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self, Found> {
        Ok(self)
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Self, Found> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, Found> {
        Ok(self)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self, Found> {
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self, Found> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, Found> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FiniteCheck {
    type Ok = ();
    type Error = Found;

    fn serialize_element<T>(&mut self, value: &T) -> Checked
    where
        T: ?Sized + Serialize,
    {
        value.serialize(*self)
    }

    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeTuple for FiniteCheck {
    type Ok = ();
    type Error = Found;

    fn serialize_element<T>(&mut self, value: &T) -> Checked
    where
        T: ?Sized + Serialize,
    {
        value.serialize(*self)
    }

    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FiniteCheck {
    type Ok = ();
    type Error = Found;

    fn serialize_field<T>(&mut self, value: &T) -> Checked
    where
        T: ?Sized + Serialize,
    {
        value.serialize(*self)
    }

    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FiniteCheck {
    type Ok = ();
    type Error = Found;

    fn serialize_field<T>(&mut self, value: &T) -> Checked
    where
        T: ?Sized + Serialize,
    {
        value.serialize(*self)
    }

    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeMap for FiniteCheck {
    type Ok = ();
    type Error = Found;

    fn serialize_key<T>(&mut self, key: &T) -> Checked
    where
        T: ?Sized + Serialize,
    {
        key.serialize(*self)
    }

    fn serialize_value<T>(&mut self, value: &T) -> Checked
    where
        T: ?Sized + Serialize,
    {
        value.serialize(*self)
    }

    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeStruct for FiniteCheck {
    type Ok = ();
    type Error = Found;

    fn serialize_field<T>(&mut self, _key: &'static str, value: &T) -> Checked
    where
        T: ?Sized + Serialize,
    {
        value.serialize(*self)
    }

    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FiniteCheck {
    type Ok = ();
    type Error = Found;

    fn serialize_field<T>(&mut self, _key: &'static str, value: &T) -> Checked
    where
        T: ?Sized + Serialize,
    {
        value.serialize(*self)
    }

    fn end(self) -> Checked {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Reading {
        sensor: &'static str,
        value: Option<f32>,
    }

    #[derive(Serialize)]
    enum Shape {
        Circle { radius: f64 },
    }

    #[test]
    fn test_finite_values_pass() {
        assert_eq!(find_non_finite(&(1, "x", 2.5, None::<f64>, ())), None);
        assert_eq!(find_non_finite(&vec![0.0, -0.0, f64::MAX]), None);
    }

    #[test]
    fn test_nested_non_finite_values_are_found() {
        assert!(find_non_finite(&f64::NAN).is_some_and(f64::is_nan));
        assert_eq!(find_non_finite(&(1, vec![f64::INFINITY])), Some(f64::INFINITY));
        assert_eq!(
            find_non_finite(&Reading {
                sensor: "t1",
                value: Some(f32::NEG_INFINITY),
            }),
            Some(f64::NEG_INFINITY)
        );
        assert!(find_non_finite(&Shape::Circle { radius: f64::NAN }).is_some());

        let mut by_name = BTreeMap::new();
        by_name.insert("a", f64::INFINITY);
        assert_eq!(find_non_finite(&by_name), Some(f64::INFINITY));
    }
}
