//! Type inspection: Swagger type/format classification, route path
//! rewriting and tag-text value conversion.

use crate::reflect::{float32_to_json, float64_to_json, Kind, Type, TypeInfo};
use crate::utils::connect_path;
use regex::Regex;
use serde_json::Value as JsonValue;
use std::sync::OnceLock;

/// Swagger type/format pair of a reflected type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Boolean,
    Int32,
    Int64,
    Float,
    Double,
    String,
    DateTime,
    Array,
    Object,
    Map,
    File,
}

impl Classification {
    /// Swagger `type`
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Int32 | Self::Int64 => "integer",
            Self::Float | Self::Double => "number",
            Self::String | Self::DateTime => "string",
            Self::Array => "array",
            Self::Object | Self::Map => "object",
            Self::File => "file",
        }
    }

    /// Swagger `format`
    pub fn format(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::DateTime => "date-time",
            Self::Array => "array",
            Self::Object => "object",
            Self::Map => "map",
            Self::File => "",
        }
    }
}

/// Classify a type, looking through any number of pointers.
///
/// Never fails: kinds without a dedicated mapping classify as strings.
pub fn classify(ty: Type) -> Classification {
    classify_kind(&ty.info().deref().kind)
}

/// Classify an already resolved shape
pub fn classify_info(info: &TypeInfo) -> Classification {
    classify_kind(&info.kind)
}

fn classify_kind(kind: &Kind) -> Classification {
    match kind {
        Kind::Bool => Classification::Boolean,
        Kind::Int(bits) | Kind::Uint(bits) if *bits <= 32 => Classification::Int32,
        Kind::Int(_) | Kind::Uint(_) => Classification::Int64,
        Kind::Float32 => Classification::Float,
        Kind::Float64 => Classification::Double,
        Kind::String => Classification::String,
        Kind::Time => Classification::DateTime,
        Kind::Struct(_) => Classification::Object,
        Kind::Map(_, _) => Classification::Map,
        Kind::Array(_) => Classification::Array,
        Kind::Pointer(inner) => classify(*inner),
        Kind::Interface => Classification::String,
    }
}

/// Element type of an array, looking through pointers
pub fn element(ty: Type) -> Option<Type> {
    match ty.info().deref().kind {
        Kind::Array(elem) => Some(elem),
        _ => None,
    }
}

fn path_param_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[:*]([^/]+)").ok()).as_ref()
}

/// Rewrite a router path (`/users/:id`, `/files/*rest`) into Swagger form
/// (`/users/{id}`, `/files/{rest}`).
pub fn to_swagger_path(path: &str) -> String {
    let rewritten = match path_param_regex() {
        Some(re) => re.replace_all(path, "{$1}").into_owned(),
        None => path.to_string(),
    };
    connect_path(&[rewritten.as_str()])
}

/// Parses tag text into a JSON value of a field's type
pub type Converter = fn(&str) -> Option<JsonValue>;

/// Converter for a field type. Arrays convert with their element's converter.
pub fn converter(ty: Type) -> Converter {
    match classify(ty) {
        Classification::Int32 | Classification::Int64 => parse_integer,
        Classification::Float => parse_float,
        Classification::Double => parse_double,
        Classification::Boolean => parse_bool,
        Classification::Array => match element(ty) {
            Some(elem) => converter(elem),
            None => parse_string,
        },
        _ => parse_string,
    }
}

fn parse_integer(s: &str) -> Option<JsonValue> {
    s.parse::<i64>().ok().map(JsonValue::from)
}

fn parse_float(s: &str) -> Option<JsonValue> {
    s.parse::<f32>()
        .ok()
        .map(float32_to_json)
        .filter(|v| !v.is_null())
}

fn parse_double(s: &str) -> Option<JsonValue> {
    s.parse::<f64>()
        .ok()
        .map(float64_to_json)
        .filter(|v| !v.is_null())
}

fn parse_bool(s: &str) -> Option<JsonValue> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(JsonValue::Bool(true)),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(JsonValue::Bool(false)),
        _ => None,
    }
}

fn parse_string(s: &str) -> Option<JsonValue> {
    Some(JsonValue::String(s.to_string()))
}
