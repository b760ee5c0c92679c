/*!
Compile-time type reflection.

Documentation is derived from types and sample values. `Reflect` describes a
type's static shape ([`TypeInfo`]) and turns a live value into a [`Value`]
tree. Struct shapes come from `#[derive(Reflect)]`; the impls below cover the
primitive, container and indirection types.

Struct fields point at their types through [`Type`], a lazily evaluated
handle, so recursive and mutually recursive structs can be described without
building an infinite tree.
*/

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value as JsonValue;
use std::any::TypeId;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Types that can be described in the generated document
pub trait Reflect: 'static {
    /// Static shape of the type
    fn type_info() -> TypeInfo;

    /// Runtime value of `self`
    fn reflect(&self) -> Value;
}

/// Lazily evaluated handle to a reflected type
#[derive(Clone, Copy)]
pub struct Type(fn() -> TypeInfo);

impl Type {
    pub fn of<T: Reflect>() -> Self {
        Type(T::type_info)
    }

    pub fn info(&self) -> TypeInfo {
        (self.0)()
    }

    pub fn id(&self) -> TypeId {
        self.info().id
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Type").field(&self.info().name).finish()
    }
}

/// Static shape of a type
#[derive(Debug, Clone)]
pub struct TypeInfo {
    /// Declared name; empty for unnamed containers
    pub name: &'static str,
    pub id: TypeId,
    pub kind: Kind,
}

/// Closed set of semantic kinds
#[derive(Debug, Clone)]
pub enum Kind {
    Bool,
    /// Signed integer of the given bit width
    Int(u32),
    /// Unsigned integer of the given bit width
    Uint(u32),
    Float32,
    Float64,
    String,
    /// The designated timestamp type
    Time,
    /// Dynamically typed JSON
    Interface,
    /// Nullable or boxed indirection
    Pointer(Type),
    Array(Type),
    Map(Type, Type),
    Struct(StructInfo),
}

/// Fields of a struct type
#[derive(Debug, Clone, Default)]
pub struct StructInfo {
    /// Element name used when the struct is serialized as XML
    pub xml_name: Option<&'static str>,
    pub fields: Vec<Field>,
}

/// One declared struct field
#[derive(Debug, Clone)]
pub struct Field {
    pub ident: &'static str,
    pub ty: Type,
    /// Struct tags as (key, value) pairs: `json`, `query`, `form`, `xml`, `swagger`
    pub tags: &'static [(&'static str, &'static str)],
    /// Anonymous field whose members belong to the parent
    pub embedded: bool,
}

impl Field {
    pub fn new(
        ident: &'static str,
        ty: Type,
        tags: &'static [(&'static str, &'static str)],
        embedded: bool,
    ) -> Self {
        Self {
            ident,
            ty,
            tags,
            embedded,
        }
    }

    /// Raw tag text, if the tag is present
    pub fn tag(&self, key: &str) -> Option<&'static str> {
        self.tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

impl TypeInfo {
    pub fn new<T: 'static>(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            id: TypeId::of::<T>(),
            kind,
        }
    }

    /// Shape of a struct type
    pub fn structure<T: 'static>(
        name: &'static str,
        xml_name: Option<&'static str>,
        fields: Vec<Field>,
    ) -> Self {
        Self::new::<T>(name, Kind::Struct(StructInfo { xml_name, fields }))
    }

    /// The zero value of the type
    pub fn zero(&self) -> Value {
        match &self.kind {
            Kind::Bool => Value::Bool(false),
            Kind::Int(_) => Value::Int(0),
            Kind::Uint(_) => Value::Uint(0),
            Kind::Float32 => Value::Float32(0.0),
            Kind::Float64 => Value::Float64(0.0),
            Kind::String => Value::String(String::new()),
            Kind::Time => Value::Time(DateTime::<Utc>::default()),
            Kind::Interface => Value::Interface(JsonValue::Null),
            Kind::Pointer(_) => Value::Pointer(None),
            Kind::Array(_) => Value::Array(Vec::new()),
            Kind::Map(_, _) => Value::Map(Vec::new()),
            Kind::Struct(info) => {
                Value::Struct(info.fields.iter().map(|f| f.ty.info().zero()).collect())
            }
        }
    }

    /// Shape behind any number of pointer levels
    pub fn deref(self) -> TypeInfo {
        let mut info = self;
        while let Kind::Pointer(inner) = info.kind {
            info = inner.info();
        }
        info
    }

    pub fn struct_info(&self) -> Option<&StructInfo> {
        match &self.kind {
            Kind::Struct(info) => Some(info),
            _ => None,
        }
    }
}

/// Runtime value tree
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float32(f32),
    Float64(f64),
    String(String),
    Time(DateTime<Utc>),
    Interface(JsonValue),
    Pointer(Option<Box<Value>>),
    Array(Vec<Value>),
    Map(Vec<(Value, Value)>),
    /// Field values in declaration order
    Struct(Vec<Value>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) => a == b,
            (Value::Float32(a), Value::Float32(b)) => a == b,
            (Value::Float64(a), Value::Float64(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Interface(a), Value::Interface(b)) => a == b,
            (Value::Pointer(a), Value::Pointer(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Struct(a), Value::Struct(b)) => a == b,
            // entry order carries no meaning
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| b.iter().any(|(bk, bv)| k == bk && v == bv))
            }
            _ => false,
        }
    }
}

impl Value {
    /// JSON rendering used for examples
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Int(i) => JsonValue::from(*i),
            Value::Uint(u) => JsonValue::from(*u),
            Value::Float32(f) => float32_to_json(*f),
            Value::Float64(f) => float64_to_json(*f),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Time(t) => JsonValue::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Interface(v) => v.clone(),
            Value::Pointer(None) => JsonValue::Null,
            Value::Pointer(Some(inner)) => inner.to_json(),
            Value::Array(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(entries) => JsonValue::Object(
                entries
                    .iter()
                    .map(|(k, v)| (map_key(k), v.to_json()))
                    .collect(),
            ),
            Value::Struct(fields) => {
                JsonValue::Array(fields.iter().map(Value::to_json).collect())
            }
        }
    }
}

fn map_key(key: &Value) -> String {
    match key.to_json() {
        JsonValue::String(s) => s,
        other => other.to_string(),
    }
}

/// Single precision numbers keep their shortest decimal form
pub(crate) fn float32_to_json(f: f32) -> JsonValue {
    f.to_string()
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

pub(crate) fn float64_to_json(f: f64) -> JsonValue {
    serde_json::Number::from_f64(f)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

/// A live value paired with its type, as passed to response declarations
#[derive(Debug, Clone)]
pub struct Sample {
    pub ty: Type,
    pub value: Value,
}

impl Sample {
    pub fn of<T: Reflect>(value: &T) -> Self {
        Self {
            ty: Type::of::<T>(),
            value: value.reflect(),
        }
    }
}

macro_rules! reflect_int {
    ($($t:ty => $name:literal),* $(,)?) => {$(
        impl Reflect for $t {
            fn type_info() -> TypeInfo {
                TypeInfo::new::<$t>($name, Kind::Int(<$t>::BITS))
            }

            fn reflect(&self) -> Value {
                Value::Int(*self as i64)
            }
        }
    )*};
}

macro_rules! reflect_uint {
    ($($t:ty => $name:literal),* $(,)?) => {$(
        impl Reflect for $t {
            fn type_info() -> TypeInfo {
                TypeInfo::new::<$t>($name, Kind::Uint(<$t>::BITS))
            }

            fn reflect(&self) -> Value {
                Value::Uint(*self as u64)
            }
        }
    )*};
}

reflect_int!(i8 => "i8", i16 => "i16", i32 => "i32", i64 => "i64", isize => "isize");
reflect_uint!(u8 => "u8", u16 => "u16", u32 => "u32", u64 => "u64", usize => "usize");

impl Reflect for bool {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<bool>("bool", Kind::Bool)
    }

    fn reflect(&self) -> Value {
        Value::Bool(*self)
    }
}

impl Reflect for f32 {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<f32>("f32", Kind::Float32)
    }

    fn reflect(&self) -> Value {
        Value::Float32(*self)
    }
}

impl Reflect for f64 {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<f64>("f64", Kind::Float64)
    }

    fn reflect(&self) -> Value {
        Value::Float64(*self)
    }
}

impl Reflect for String {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<String>("String", Kind::String)
    }

    fn reflect(&self) -> Value {
        Value::String(self.clone())
    }
}

impl Reflect for &'static str {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<&'static str>("str", Kind::String)
    }

    fn reflect(&self) -> Value {
        Value::String((*self).to_string())
    }
}

impl Reflect for char {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<char>("char", Kind::String)
    }

    fn reflect(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl Reflect for DateTime<Utc> {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<DateTime<Utc>>("DateTime", Kind::Time)
    }

    fn reflect(&self) -> Value {
        Value::Time(*self)
    }
}

impl Reflect for JsonValue {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<JsonValue>("Value", Kind::Interface)
    }

    fn reflect(&self) -> Value {
        Value::Interface(self.clone())
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<Option<T>>("", Kind::Pointer(Type::of::<T>()))
    }

    fn reflect(&self) -> Value {
        Value::Pointer(self.as_ref().map(|v| Box::new(v.reflect())))
    }
}

macro_rules! reflect_pointer {
    ($($p:ident),*) => {$(
        impl<T: Reflect> Reflect for $p<T> {
            fn type_info() -> TypeInfo {
                TypeInfo::new::<$p<T>>("", Kind::Pointer(Type::of::<T>()))
            }

            fn reflect(&self) -> Value {
                Value::Pointer(Some(Box::new(T::reflect(self))))
            }
        }
    )*};
}

reflect_pointer!(Box, Rc, Arc);

impl<T: Reflect> Reflect for Vec<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<Vec<T>>("", Kind::Array(Type::of::<T>()))
    }

    fn reflect(&self) -> Value {
        Value::Array(self.iter().map(Reflect::reflect).collect())
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<VecDeque<T>>("", Kind::Array(Type::of::<T>()))
    }

    fn reflect(&self) -> Value {
        Value::Array(self.iter().map(Reflect::reflect).collect())
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<[T; N]>("", Kind::Array(Type::of::<T>()))
    }

    fn reflect(&self) -> Value {
        Value::Array(self.iter().map(Reflect::reflect).collect())
    }
}

impl<K: Reflect, V: Reflect, H: 'static> Reflect for HashMap<K, V, H> {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<HashMap<K, V, H>>("", Kind::Map(Type::of::<K>(), Type::of::<V>()))
    }

    fn reflect(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.reflect(), v.reflect())).collect())
    }
}

impl<K: Reflect, V: Reflect> Reflect for BTreeMap<K, V> {
    fn type_info() -> TypeInfo {
        TypeInfo::new::<BTreeMap<K, V>>("", Kind::Map(Type::of::<K>(), Type::of::<V>()))
    }

    fn reflect(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.reflect(), v.reflect())).collect())
    }
}
