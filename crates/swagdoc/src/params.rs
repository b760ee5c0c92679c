//! Non-body parameter, item and response header builders.

use crate::converter::{classify, element, Classification};
use crate::reflect::{Field, Type};
use crate::specification::{Header, Items, Parameter, Placement};
use crate::tag::{apply_header_tags, apply_parameter_tags, resolve_name};

/// Array-valued parameters repeat their key once per element
pub const COLLECTION_MULTI: &str = "multi";

impl Items {
    /// Item descriptor for an element type, nesting for arrays of arrays
    pub fn generate(ty: Type) -> Self {
        let class = classify(ty);
        let mut item = Items {
            type_name: class.type_name().to_string(),
            ..Items::default()
        };
        if class == Classification::Array {
            item.items = element(ty).map(|elem| Box::new(Items::generate(elem)));
            item.collection_format = COLLECTION_MULTI.to_string();
        } else {
            item.format = class.format().to_string();
        }
        item
    }
}

impl Parameter {
    /// Parameter for one struct field, or `None` when the field is omitted
    pub fn generate(field: &Field, placement: Placement) -> Option<Self> {
        let (name, _) = resolve_name(field, placement);
        if name == "-" {
            return None;
        }

        let class = classify(field.ty);
        let mut param = Parameter::new(&name, placement);
        param.type_name = class.type_name().to_string();
        if class == Classification::Array {
            param.items = element(field.ty).map(|elem| Box::new(Items::generate(elem)));
            param.collection_format = COLLECTION_MULTI.to_string();
        } else {
            param.format = class.format().to_string();
        }

        apply_parameter_tags(&mut param, field);
        Some(param)
    }
}

impl Header {
    /// Response header for one struct field, or `None` when the field is omitted
    pub fn generate(field: &Field) -> Option<Self> {
        let (name, _) = resolve_name(field, Placement::Header);
        if name == "-" {
            return None;
        }

        let class = classify(field.ty);
        let mut header = Header {
            type_name: class.type_name().to_string(),
            ..Header::default()
        };
        if class == Classification::Array {
            header.items = element(field.ty).map(|elem| Box::new(Items::generate(elem)));
            header.collection_format = COLLECTION_MULTI.to_string();
        } else {
            header.format = class.format().to_string();
        }

        apply_header_tags(&mut header, field);
        Some(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field<T: crate::Reflect>(
        ident: &'static str,
        tags: &'static [(&'static str, &'static str)],
    ) -> Field {
        Field::new(ident, Type::of::<T>(), tags, false)
    }

    #[test]
    fn test_items_for_nested_arrays() {
        let items = Items::generate(Type::of::<Vec<Option<i64>>>());
        assert_eq!(items.type_name, "array");
        assert_eq!(items.collection_format, "multi");
        let inner = items.items.as_deref().map(|i| (i.type_name.as_str(), i.format.as_str()));
        assert_eq!(inner, Some(("integer", "int64")));
    }

    #[test]
    fn test_scalar_parameter() {
        let f = field::<Option<f32>>("Score", &[("query", "score"), ("swagger", "desc(Score),min(0.5)")]);
        let param = Parameter::generate(&f, Placement::Query).unwrap();
        assert_eq!(param.name, "score");
        assert_eq!(param.type_name, "number");
        assert_eq!(param.format, "float");
        assert_eq!(param.description, "Score");
        assert_eq!(param.facets.minimum, serde_json::Number::from_f64(0.5));
        assert!(param.items.is_none());
    }

    #[test]
    fn test_array_parameter_moves_facets_to_items() {
        let f = field::<Vec<Vec<String>>>("Sort", &[("swagger", "default(id),maxLen(8)")]);
        let param = Parameter::generate(&f, Placement::Query).unwrap();
        assert_eq!(param.type_name, "array");
        assert_eq!(param.collection_format, "multi");
        assert!(param.facets.is_empty());

        let inner = param.items.as_deref().and_then(|i| i.items.as_deref()).unwrap();
        assert_eq!(inner.type_name, "string");
        assert_eq!(inner.facets.default, Some(json!("id")));
        assert_eq!(inner.facets.max_length, Some(8));
    }

    #[test]
    fn test_omitted_fields() {
        let f = field::<String>("Secret", &[("form", "-"), ("json", "-")]);
        assert!(Parameter::generate(&f, Placement::FormData).is_none());
        assert!(Header::generate(&f).is_none());
    }

    #[test]
    fn test_header_uses_json_name_and_tags() {
        let f = field::<i64>("Rate", &[("json", "X-Rate-Limit"), ("swagger", "desc(calls per hour)")]);
        let header = Header::generate(&f).unwrap();
        assert_eq!(header.type_name, "integer");
        assert_eq!(header.format, "int64");
        assert_eq!(header.description, "calls per hour");
    }

    #[test]
    fn test_array_header_moves_facets_to_items() {
        let f = field::<Vec<Vec<i32>>>(
            "Codes",
            &[("json", "X-Codes"), ("swagger", "desc(codes),min(1),enum(1|2),default(2)")],
        );
        let header = Header::generate(&f).unwrap();
        assert_eq!(header.type_name, "array");
        assert_eq!(header.description, "codes");
        assert!(header.facets.is_empty());

        let row = header.items.as_deref().unwrap();
        assert!(row.facets.is_empty());
        let inner = row.items.as_deref().unwrap();
        assert_eq!(inner.type_name, "integer");
        assert_eq!(inner.facets.minimum, Some(serde_json::Number::from(1)));
        assert_eq!(inner.facets.enum_values, vec![json!(1), json!(2)]);
        assert_eq!(inner.facets.default, Some(json!(2)));
    }
}
