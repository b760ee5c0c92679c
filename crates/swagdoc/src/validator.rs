//! Declaration-time validity rules for parameter, header and schema types.

use crate::reflect::{Kind, Type};
use std::any::TypeId;

/// Whether `ty` can be expressed as a non-body parameter.
///
/// With `nest` unset, scalars and arrays of scalars are accepted, and a struct
/// is accepted when each of its fields is. With `nest` set, a top-level
/// struct is required: scalars are only accepted one level down. Embedded
/// struct fields do not count as a level.
pub fn is_valid_param(ty: Type, nest: bool, inner: bool) -> bool {
    match ty.info().kind {
        Kind::Bool
        | Kind::Int(_)
        | Kind::Uint(_)
        | Kind::Float32
        | Kind::Float64
        | Kind::String
        | Kind::Time => !nest || inner,
        Kind::Array(elem) => is_valid_param(elem, nest, true),
        Kind::Pointer(target) => is_valid_param(target, nest, inner),
        Kind::Struct(info) => {
            !inner
                && info.fields.iter().all(|field| {
                    let flatten =
                        field.embedded && matches!(field.ty.info().kind, Kind::Struct(_));
                    is_valid_param(field.ty, nest, !flatten)
                })
        }
        Kind::Map(_, _) | Kind::Interface => false,
    }
}

/// Whether `ty` can be described as a body or response schema.
///
/// Dynamic values are accepted; map keys must be basic types. A struct seen
/// further up the current path is accepted, so recursive types validate.
pub fn is_valid_schema(ty: Type, inner: bool) -> bool {
    check_schema(ty, inner, &mut Vec::new())
}

fn check_schema(ty: Type, inner: bool, seen: &mut Vec<TypeId>) -> bool {
    let info = ty.info();
    if seen.contains(&info.id) {
        return true;
    }

    match info.kind {
        Kind::Bool
        | Kind::Int(_)
        | Kind::Uint(_)
        | Kind::Float32
        | Kind::Float64
        | Kind::String
        | Kind::Time
        | Kind::Interface => true,
        Kind::Array(elem) => check_schema(elem, inner, seen),
        Kind::Map(key, value) => is_basic_type(key) && check_schema(value, true, seen),
        Kind::Pointer(target) => check_schema(target, inner, seen),
        Kind::Struct(st) => {
            let depth = seen.len();
            seen.push(info.id);
            let valid = st.fields.iter().all(|field| check_schema(field.ty, true, seen));
            seen.truncate(depth);
            valid
        }
    }
}

/// Scalars, timestamps and pointers to them
pub fn is_basic_type(ty: Type) -> bool {
    match ty.info().kind {
        Kind::Bool
        | Kind::Int(_)
        | Kind::Uint(_)
        | Kind::Float32
        | Kind::Float64
        | Kind::String
        | Kind::Time => true,
        Kind::Pointer(target) => is_basic_type(target),
        _ => false,
    }
}

/// Transfer protocols accepted in the document's `schemes`
pub fn is_valid_scheme(scheme: &str) -> bool {
    matches!(scheme, "http" | "https" | "ws" | "wss")
}
