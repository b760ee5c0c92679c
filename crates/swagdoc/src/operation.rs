//! Per-route operation building: parameters, bodies and responses.

use crate::converter::{classify_info, element, Classification};
use crate::error::{SwagError, SwagResult};
use crate::reflect::{Kind, Sample, StructInfo, Type};
use crate::schema::DefinitionRegistry;
use crate::specification::{Header, Items, Operation, Parameter, Placement, Response};
use crate::tag::resolve_name;
use crate::validator::{is_valid_param, is_valid_schema};
use crate::params::COLLECTION_MULTI;
use std::collections::BTreeMap;

impl Operation {
    /// `name`, with underscores appended until no parameter already uses it
    pub fn rename(&self, name: &str) -> String {
        if self.parameters.iter().any(|p| p.name == name) {
            self.rename(&format!("{}_", name))
        } else {
            name.to_string()
        }
    }

    /// Add one parameter per field of a struct, flattening embedded structs
    pub fn handle_param_struct(&mut self, st: &StructInfo, placement: Placement) {
        for field in &st.fields {
            if field.embedded {
                if let Kind::Struct(inner) = field.ty.info().kind {
                    self.handle_param_struct(&inner, placement);
                    continue;
                }
            }
            if let Some(mut param) = Parameter::generate(field, placement) {
                param.name = self.rename(&param.name);
                self.parameters.push(param);
            }
        }
    }

    /// Add a non-body parameter of type `ty`.
    ///
    /// Struct types expand into one parameter per field, named from their
    /// tags; `name`, `desc` and `required` then go unused.
    pub fn add_params(
        &mut self,
        ty: Type,
        placement: Placement,
        name: &str,
        desc: &str,
        required: bool,
        nest: bool,
    ) -> SwagResult<()> {
        if !is_valid_param(ty, nest, false) {
            return Err(SwagError::invalid_param(placement));
        }

        let info = ty.info().deref();
        if let Kind::Struct(st) = &info.kind {
            self.handle_param_struct(st, placement);
            return Ok(());
        }

        let class = classify_info(&info);
        let mut param = Parameter::new(&self.rename(name), placement);
        param.description = desc.to_string();
        param.required = required;
        param.type_name = class.type_name().to_string();
        if class == Classification::Array {
            param.items = element(ty).map(|elem| Box::new(Items::generate(elem)));
            param.collection_format = COLLECTION_MULTI.to_string();
        } else {
            param.format = class.format().to_string();
        }
        self.parameters.push(param);
        Ok(())
    }

    /// Add the body parameter. A route has at most one.
    pub fn add_body_param(
        &mut self,
        defs: &mut DefinitionRegistry,
        body: &Sample,
        name: &str,
        desc: &str,
        required: bool,
    ) -> SwagResult<()> {
        if !is_valid_schema(body.ty, false) {
            return Err(SwagError::InvalidBody);
        }
        if self
            .parameters
            .iter()
            .any(|p| p.placement == Placement::Body)
        {
            return Err(SwagError::MultipleBody);
        }

        let mut param = Parameter::new(name, Placement::Body);
        param.description = desc.to_string();
        param.required = required;
        param.schema = Some(defs.gen_schema(body.ty, &body.value));
        self.parameters.push(param);
        Ok(())
    }

    /// Add a `formData` file upload parameter
    pub fn add_file_param(&mut self, name: &str, desc: &str, required: bool) {
        let mut param = Parameter::new(&self.rename(name), Placement::FormData);
        param.description = desc.to_string();
        param.required = required;
        param.type_name = Classification::File.type_name().to_string();
        self.parameters.push(param);
    }

    /// Add or replace the response for status `code`
    pub fn add_response(
        &mut self,
        defs: &mut DefinitionRegistry,
        code: u16,
        desc: &str,
        schema: Option<&Sample>,
        header: Option<&Sample>,
    ) -> SwagResult<()> {
        if let Some(schema) = schema {
            if !is_valid_schema(schema.ty, false) {
                return Err(SwagError::InvalidResponseSchema);
            }
        }
        if let Some(header) = header {
            if !is_valid_param(header.ty, true, false) {
                return Err(SwagError::InvalidResponseHeader);
            }
        }

        let response = Response {
            description: desc.to_string(),
            schema: schema.map(|s| defs.gen_schema(s.ty, &s.value)),
            headers: header.map(|h| gen_headers(h.ty)).unwrap_or_default(),
            ..Response::default()
        };
        self.responses.insert(code.to_string(), response);
        Ok(())
    }
}

/// Response headers described by the fields of a struct, keyed by json name
pub fn gen_headers(ty: Type) -> BTreeMap<String, Header> {
    let info = ty.info().deref();
    let Kind::Struct(st) = &info.kind else {
        return BTreeMap::new();
    };
    st.fields
        .iter()
        .filter_map(|field| {
            let header = Header::generate(field)?;
            let (name, _) = resolve_name(field, Placement::Header);
            Some((name, header))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Reflect;
    use serde_json::json;

    #[derive(Reflect, Default)]
    struct Paging {
        #[swag(query = "page")]
        page: i32,
        #[swag(query = "size", swagger = "max(100)")]
        size: i32,
    }

    #[derive(Reflect, Default)]
    struct Search {
        #[swag(embed)]
        paging: Paging,
        #[swag(query = "q", swagger = "required")]
        q: String,
        #[swag(query = "-")]
        internal: bool,
        #[swag(query = "page")]
        page_hint: i64,
    }

    #[derive(Reflect, Default)]
    struct RateHeaders {
        #[swag(json = "X-Rate-Limit")]
        limit: i32,
        #[swag(json = "X-Expires-After")]
        expires: chrono::DateTime<chrono::Utc>,
        #[swag(json = "-")]
        skipped: String,
    }

    #[derive(Reflect, Default)]
    struct Pet {
        id: i64,
    }

    #[test]
    fn test_rename_appends_underscores() {
        let mut op = Operation::default();
        op.parameters.push(Parameter::new("id", Placement::Query));
        op.parameters.push(Parameter::new("id_", Placement::Query));
        assert_eq!(op.rename("id"), "id__");
        assert_eq!(op.rename("name"), "name");
    }

    #[test]
    fn test_scalar_and_array_params() {
        let mut op = Operation::default();
        op.add_params(Type::of::<i64>(), Placement::Path, "id", "Pet id", true, false)
            .unwrap();
        op.add_params(Type::of::<Vec<String>>(), Placement::Query, "id", "", false, false)
            .unwrap();

        assert_eq!(op.parameters[0].format, "int64");
        assert!(op.parameters[0].required);
        assert_eq!(op.parameters[1].name, "id_");
        assert_eq!(op.parameters[1].collection_format, "multi");
        assert_eq!(
            op.parameters[1].items.as_deref().map(|i| i.type_name.as_str()),
            Some("string")
        );
    }

    #[test]
    fn test_nested_params_flatten() {
        let mut op = Operation::default();
        op.add_params(Type::of::<Search>(), Placement::Query, "", "", false, true)
            .unwrap();
        let names: Vec<&str> = op.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["page", "size", "q", "page_"]);
        assert_eq!(op.parameters[1].facets.maximum, Some(serde_json::Number::from(100)));
        assert!(op.parameters[2].required);
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        let mut op = Operation::default();
        assert_eq!(
            op.add_params(Type::of::<i32>(), Placement::Header, "", "", false, true),
            Err(SwagError::InvalidParam(Placement::Header))
        );
        assert_eq!(
            op.add_params(Type::of::<serde_json::Value>(), Placement::Query, "v", "", false, false),
            Err(SwagError::InvalidParam(Placement::Query))
        );
        assert!(op.parameters.is_empty());
    }

    #[test]
    fn test_single_body_param() {
        let mut op = Operation::default();
        let mut defs = DefinitionRegistry::new();
        let body = Sample::of(&Pet::default());
        op.add_body_param(&mut defs, &body, "pet", "Pet object", true).unwrap();
        assert_eq!(
            op.parameters[0].schema.as_ref().map(|s| s.ref_path.as_str()),
            Some("#/definitions/Pet")
        );
        assert_eq!(
            op.add_body_param(&mut defs, &body, "again", "", false),
            Err(SwagError::MultipleBody)
        );
    }

    #[test]
    fn test_invalid_body() {
        let mut op = Operation::default();
        let mut defs = DefinitionRegistry::new();
        let body = Sample::of(&std::collections::HashMap::<Pet, i32>::new());
        assert_eq!(
            op.add_body_param(&mut defs, &body, "bad", "", false),
            Err(SwagError::InvalidBody)
        );
    }

    #[test]
    fn test_file_param() {
        let mut op = Operation::default();
        op.add_file_param("file", "upload", true);
        let value = serde_json::to_value(&op.parameters[0]).unwrap();
        assert_eq!(
            value,
            json!({"name": "file", "in": "formData", "description": "upload", "required": true, "type": "file"})
        );
    }

    #[test]
    fn test_response_with_headers() {
        let mut op = Operation::default();
        let mut defs = DefinitionRegistry::new();
        op.add_response(
            &mut defs,
            200,
            "successful operation",
            Some(&Sample::of(&"token".to_string())),
            Some(&Sample::of(&RateHeaders::default())),
        )
        .unwrap();

        let response = &op.responses["200"];
        assert_eq!(response.schema.as_ref().map(|s| s.type_name.as_str()), Some("string"));
        let names: Vec<&str> = response.headers.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["X-Expires-After", "X-Rate-Limit"]);
        assert_eq!(response.headers["X-Expires-After"].format, "date-time");
    }

    #[test]
    fn test_invalid_response_header() {
        let mut op = Operation::default();
        let mut defs = DefinitionRegistry::new();
        assert_eq!(
            op.add_response(&mut defs, 200, "", None, Some(&Sample::of(&1i32))),
            Err(SwagError::InvalidResponseHeader)
        );
        assert!(op.responses.is_empty());
    }
}
