//! Boxed attribute values.
//!
//! Every attribute read or written through the generic machinery (observer
//! hooks, archives, [`crate::set_property`]) travels as a [`Value`], so hook
//! signatures stay the same whatever the native type of the attribute.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::archive::Archive;
use crate::error::{ModelError, ModelResult};
use crate::model::ModelObject;

/// A 2D point, boxed as [`Value::Point`].
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
pub struct Point {
    #[serde(with = "double")]
    pub x: f64,
    #[serde(with = "double")]
    pub y: f64,
}

/// A 2D extent, boxed as [`Value::Size`].
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
pub struct Size {
    #[serde(with = "double")]
    pub width: f64,
    #[serde(with = "double")]
    pub height: f64,
}

/// An axis-aligned rectangle, boxed as [`Value::Rect`].
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }
}

// NaN equals NaN here so that every value is equal to itself.
fn same_f64(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        same_f64(self.x, other.x) && same_f64(self.y, other.y)
    }
}

impl PartialEq for Size {
    fn eq(&self, other: &Self) -> bool {
        same_f64(self.width, other.width) && same_f64(self.height, other.height)
    }
}

impl PartialEq for Rect {
    fn eq(&self, other: &Self) -> bool {
        self.origin == other.origin && self.size == other.size
    }
}

/// Discriminant of a [`Value`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Double,
    Text,
    Bytes,
    Date,
    Uuid,
    Point,
    Size,
    Rect,
    List,
    Model,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Double => "double",
            ValueKind::Text => "text",
            ValueKind::Bytes => "bytes",
            ValueKind::Date => "date",
            ValueKind::Uuid => "uuid",
            ValueKind::Point => "point",
            ValueKind::Size => "size",
            ValueKind::Rect => "rect",
            ValueKind::List => "list",
            ValueKind::Model => "model",
        };
        f.write_str(name)
    }
}

/// A boxed attribute value.
///
/// `Model` carries a nested model object in archived form, so boxing a nested
/// object is always a deep copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Double(#[serde(with = "double")] f64),
    Text(String),
    Bytes(Vec<u8>),
    Date(DateTime<Utc>),
    Uuid(Uuid),
    Point(Point),
    Size(Size),
    Rect(Rect),
    List(Vec<Value>),
    Model(Box<Archive>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Double(_) => ValueKind::Double,
            Value::Text(_) => ValueKind::Text,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Date(_) => ValueKind::Date,
            Value::Uuid(_) => ValueKind::Uuid,
            Value::Point(_) => ValueKind::Point,
            Value::Size(_) => ValueKind::Size,
            Value::Rect(_) => ValueKind::Rect,
            Value::List(_) => ValueKind::List,
            Value::Model(_) => ValueKind::Model,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Box a nested model object by archiving it.
    pub fn from_model<M: ModelObject>(model: &M) -> Self {
        Value::Model(Box::new(model.encode()))
    }

    /// Unbox a nested model object, decoding its archive.
    pub fn into_model<M: ModelObject>(self, property: &str) -> ModelResult<M> {
        match self {
            Value::Model(archive) => M::decode(&archive),
            other => Err(ModelError::type_mismatch(
                property,
                ValueKind::Model,
                other.kind(),
            )),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => same_f64(*a, *b),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::Point(a), Value::Point(b)) => a == b,
            (Value::Size(a), Value::Size(b)) => a == b,
            (Value::Rect(a), Value::Rect(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Model(a), Value::Model(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

/// Conversion between a native attribute type and its boxed form.
pub trait PropertyValue: Sized {
    /// Kind every non-null boxed value of this type carries.
    const KIND: ValueKind;

    /// Whether `Value::Null` is a legal boxed value.
    const OPTIONAL: bool = false;

    fn into_value(self) -> Value;

    /// Unbox `value`; `property` names the attribute in errors.
    fn from_value(property: &str, value: Value) -> ModelResult<Self>;
}

macro_rules! impl_boxed {
    ($t:ty, $variant:ident) => {
        impl PropertyValue for $t {
            const KIND: ValueKind = ValueKind::$variant;

            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            fn from_value(property: &str, value: Value) -> ModelResult<Self> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(ModelError::type_mismatch(property, Self::KIND, other.kind())),
                }
            }
        }

        impl From<$t> for Value {
            fn from(value: $t) -> Self {
                Value::$variant(value)
            }
        }
    };
}

impl_boxed!(bool, Bool);
impl_boxed!(i64, Int);
impl_boxed!(f64, Double);
impl_boxed!(String, Text);
impl_boxed!(Vec<u8>, Bytes);
impl_boxed!(DateTime<Utc>, Date);
impl_boxed!(Uuid, Uuid);
impl_boxed!(Point, Point);
impl_boxed!(Size, Size);
impl_boxed!(Rect, Rect);
impl_boxed!(Vec<Value>, List);

macro_rules! impl_boxed_int {
    ($($t:ty),*) => {$(
        impl PropertyValue for $t {
            const KIND: ValueKind = ValueKind::Int;

            fn into_value(self) -> Value {
                Value::Int(i64::from(self))
            }

            fn from_value(property: &str, value: Value) -> ModelResult<Self> {
                match value {
                    Value::Int(v) => <$t>::try_from(v).map_err(|_| {
                        ModelError::out_of_range(format!(
                            "{property}: {v} does not fit in {}",
                            stringify!($t)
                        ))
                    }),
                    other => Err(ModelError::type_mismatch(property, Self::KIND, other.kind())),
                }
            }
        }

        impl From<$t> for Value {
            fn from(value: $t) -> Self {
                Value::Int(i64::from(value))
            }
        }
    )*};
}

impl_boxed_int!(i8, i16, i32, u8, u16, u32);

impl PropertyValue for f32 {
    const KIND: ValueKind = ValueKind::Double;

    fn into_value(self) -> Value {
        Value::Double(f64::from(self))
    }

    fn from_value(property: &str, value: Value) -> ModelResult<Self> {
        match value {
            // The stored value must equal the boxed one.
            Value::Double(v) => {
                let narrow = v as f32;
                if same_f64(f64::from(narrow), v) {
                    Ok(narrow)
                } else {
                    Err(ModelError::out_of_range(format!(
                        "{property}: {v} is not representable as f32"
                    )))
                }
            }
            other => Err(ModelError::type_mismatch(property, Self::KIND, other.kind())),
        }
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Double(f64::from(value))
    }
}

impl<T: PropertyValue> PropertyValue for Option<T> {
    const KIND: ValueKind = T::KIND;
    const OPTIONAL: bool = true;

    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }

    fn from_value(property: &str, value: Value) -> ModelResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(property, other).map(Some),
        }
    }
}

impl<T: PropertyValue> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.into_value()
    }
}

/// Doubles as JSON numbers, with the non-finite values spelled out since JSON
/// has no literal for them.
mod double {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_sign_positive() {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(v),
            Repr::Text(text) => match text.as_str() {
                "NaN" => Ok(f64::NAN),
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                other => Err(D::Error::custom(format!("invalid double `{other}`"))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_is_equal_to_itself() {
        let v = Value::Double(f64::NAN);
        assert_eq!(v, v.clone());
        assert_eq!(
            Value::Rect(Rect::new(f64::NAN, 0.0, 1.0, 1.0)),
            Value::Rect(Rect::new(f64::NAN, 0.0, 1.0, 1.0))
        );
    }

    #[test]
    fn values_of_different_kinds_are_not_equal() {
        assert_ne!(Value::Int(1), Value::Double(1.0));
        assert_ne!(Value::Null, Value::Bool(false));
        assert_ne!(Value::from("1"), Value::Int(1));
    }

    #[test]
    fn narrow_integers_reject_out_of_range_values() {
        assert_eq!(u8::from_value("level", Value::Int(255)), Ok(255));
        let err = u8::from_value("level", Value::Int(256)).unwrap_err();
        assert!(matches!(err, ModelError::OutOfRange(_)));
        let err = u32::from_value("count", Value::Int(-1)).unwrap_err();
        assert!(matches!(err, ModelError::OutOfRange(_)));
    }

    #[test]
    fn unboxing_the_wrong_kind_is_a_type_mismatch() {
        let err = String::from_value("title", Value::Bool(true)).unwrap_err();
        assert_eq!(
            err,
            ModelError::type_mismatch("title", ValueKind::Text, ValueKind::Bool)
        );
    }

    #[test]
    fn options_box_none_as_null() {
        assert_eq!(Option::<bool>::None.into_value(), Value::Null);
        assert_eq!(Some(3_i32).into_value(), Value::Int(3));
        assert_eq!(Option::<String>::from_value("t", Value::Null), Ok(None));
        assert!(<Option<String> as PropertyValue>::OPTIONAL);
        assert!(!<String as PropertyValue>::OPTIONAL);
    }

    #[test]
    fn non_finite_doubles_survive_json() {
        for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -0.5] {
            let json = serde_json::to_string(&Value::Double(v)).unwrap();
            let back: Value = serde_json::from_str(&json).unwrap();
            assert_eq!(back, Value::Double(v));
        }
    }

    #[test]
    fn non_finite_geometry_survives_json() {
        let values = [
            Value::Point(Point::new(f64::NAN, f64::NEG_INFINITY)),
            Value::Size(Size::new(f64::INFINITY, 2.5)),
            Value::Rect(Rect::new(f64::NAN, f64::INFINITY, -0.0, f64::NEG_INFINITY)),
        ];
        for v in values {
            let json = serde_json::to_string(&v).unwrap();
            let back: Value = serde_json::from_str(&json).unwrap();
            assert_eq!(back, v);
        }

        let json = serde_json::to_value(Point::new(f64::NAN, 1.5)).unwrap();
        assert_eq!(json, serde_json::json!({ "x": "NaN", "y": 1.5 }));
    }

    #[test]
    fn f32_attributes_reject_doubles_they_cannot_hold() {
        assert_eq!(f32::from_value("level", Value::Double(0.5)), Ok(0.5));
        assert_eq!(
            f32::from_value("level", Value::Double(f64::INFINITY)),
            Ok(f32::INFINITY)
        );
        assert!(f32::from_value("level", Value::Double(f64::NAN)).unwrap().is_nan());

        let err = f32::from_value("level", Value::Double(0.1)).unwrap_err();
        assert!(matches!(err, ModelError::OutOfRange(_)));
        let err = f32::from_value("level", Value::Double(1e300)).unwrap_err();
        assert!(matches!(err, ModelError::OutOfRange(_)));
    }

    #[test]
    fn json_form_is_tagged_by_kind() {
        let json = serde_json::to_value(Value::Int(7)).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "int", "value": 7 }));
        let json = serde_json::to_value(Value::Null).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "null" }));
    }
}
