/*!
Definition registry.

Turns sample values into schema trees. Struct values become named entries of
the document's `definitions` table and are referenced with `$ref`; every
other shape is described inline.

Entries are shared: a struct value deeply equal to one already registered
reuses that entry's key. A new entry is inserted as a placeholder before its
fields are walked, so a field that leads back to a struct under construction
resolves to a reference instead of expanding again.
*/

use crate::converter::classify_info;
use crate::reflect::{Field, Kind, StructInfo, Type, TypeInfo, Value};
use crate::specification::{JsonSchema, Placement, XmlSchema};
use crate::tag::{apply_schema_tags, apply_xml_tags, nested_xml, resolve_name};
use std::any::TypeId;
use std::collections::BTreeMap;
use tracing::debug;

/// One registered definition with the value it was derived from
#[derive(Debug, Clone)]
struct RawDefinition {
    id: TypeId,
    value: Value,
    schema: JsonSchema,
}

/// Deduplicated table of named object definitions
#[derive(Debug, Clone, Default)]
pub struct DefinitionRegistry {
    entries: BTreeMap<String, RawDefinition>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Schema registered under `key`
    pub fn get(&self, key: &str) -> Option<&JsonSchema> {
        self.entries.get(key).map(|entry| &entry.schema)
    }

    /// Consume the registry into the document's `definitions` table
    pub fn into_definitions(self) -> BTreeMap<String, JsonSchema> {
        self.entries
            .into_iter()
            .map(|(key, entry)| (key, entry.schema))
            .collect()
    }

    /// Schema of a value of type `ty`
    pub fn gen_schema(&mut self, ty: Type, value: &Value) -> JsonSchema {
        let (info, value) = indirect(ty.info(), value);
        match info.kind {
            Kind::Array(elem) => {
                let first = match &value {
                    Value::Array(items) if !items.is_empty() => items[0].clone(),
                    _ => elem.info().zero(),
                };
                JsonSchema {
                    type_name: "array".to_string(),
                    items: Some(Box::new(self.gen_schema(elem, &first))),
                    ..JsonSchema::default()
                }
            }
            Kind::Map(_, value_ty) => {
                let first = match &value {
                    Value::Map(entries) => entries.first().map(|(_, v)| v.clone()),
                    _ => None,
                }
                .unwrap_or_else(|| value_ty.info().zero());
                JsonSchema {
                    type_name: "object".to_string(),
                    additional_properties: Some(Box::new(self.gen_schema(value_ty, &first))),
                    ..JsonSchema::default()
                }
            }
            Kind::Struct(_) => JsonSchema::reference(&self.add_definition(info, value)),
            _ => {
                let class = classify_info(&info);
                let example = (value != info.zero()).then(|| value.to_json());
                JsonSchema {
                    type_name: class.type_name().to_string(),
                    format: class.format().to_string(),
                    example,
                    ..JsonSchema::default()
                }
            }
        }
    }

    /// Register a struct value and return its definition key
    pub fn add_definition(&mut self, info: TypeInfo, value: Value) -> String {
        if let Some(key) = self.find(&info, &value) {
            return key;
        }

        let key = self.unique_key(info.name);
        let Kind::Struct(st) = &info.kind else {
            return key;
        };
        debug!(definition = %key, "registering definition");

        self.entries.insert(
            key.clone(),
            RawDefinition {
                id: info.id,
                value: value.clone(),
                schema: JsonSchema::object(),
            },
        );

        let mut schema = JsonSchema::object();
        let values = match value {
            Value::Struct(values) => values,
            _ => Vec::new(),
        };
        self.walk_fields(&mut schema, st, &values);

        if let Some(entry) = self.entries.get_mut(&key) {
            // a hint from an enclosing field may already have named it
            let hinted = entry.schema.xml.take().filter(|xml| !xml.name.is_empty());
            schema.xml = Some(hinted.unwrap_or_else(|| {
                XmlSchema::named(st.xml_name.unwrap_or(info.name))
            }));
            entry.schema = schema;
        }
        key
    }

    fn find(&self, info: &TypeInfo, value: &Value) -> Option<String> {
        self.entries
            .iter()
            .find(|(_, entry)| entry.id == info.id && entry.value == *value)
            .map(|(key, _)| key.clone())
    }

    fn unique_key(&self, name: &str) -> String {
        let mut key = name.to_string();
        while self.entries.contains_key(&key) {
            key.push('_');
        }
        key
    }

    fn walk_fields(&mut self, schema: &mut JsonSchema, st: &StructInfo, values: &[Value]) {
        for (i, field) in st.fields.iter().enumerate() {
            let value = values
                .get(i)
                .cloned()
                .unwrap_or_else(|| field.ty.info().zero());
            let (name, explicit) = resolve_name(field, Placement::Body);
            if name == "-" {
                continue;
            }

            if field.embedded && !explicit {
                if let Kind::Struct(inner) = field.ty.info().kind {
                    let inner_values = match value {
                        Value::Struct(values) => values,
                        _ => Vec::new(),
                    };
                    self.walk_fields(schema, &inner, &inner_values);
                    continue;
                }
            }

            let mut prop = self.gen_schema(field.ty, &value);
            apply_schema_tags(&mut prop, &mut schema.required, &name, field);
            self.apply_xml(&mut prop, field);
            schema.properties.insert(name, prop);
        }
    }

    fn apply_xml(&mut self, prop: &mut JsonSchema, field: &Field) {
        match nested_xml(field) {
            Some((outer, rest)) if prop.items.is_some() => {
                prop.xml = Some(XmlSchema {
                    name: outer.to_string(),
                    wrapped: true,
                    ..XmlSchema::default()
                });
                if let Some(items) = prop.items.as_deref_mut() {
                    self.apply_child_xml(items, rest);
                }
            }
            _ => apply_xml_tags(prop, field),
        }
    }

    /// Name the elements of a wrapped array. `rest` may name deeper levels
    /// separated by `>`.
    fn apply_child_xml(&mut self, schema: &mut JsonSchema, rest: &str) {
        if rest.is_empty() {
            return;
        }

        if let Some(key) = schema.ref_key() {
            if let Some(entry) = self.entries.get_mut(key) {
                entry.schema.xml.get_or_insert_with(XmlSchema::default).name = rest.to_string();
            }
            return;
        }

        match schema.items.as_deref_mut() {
            None => {
                schema.xml.get_or_insert_with(XmlSchema::default).name = rest.to_string();
            }
            Some(items) => {
                let xml = schema.xml.get_or_insert_with(XmlSchema::default);
                xml.wrapped = true;
                match rest.find('>') {
                    Some(i) if i > 0 => {
                        xml.name = rest[..i].to_string();
                        self.apply_child_xml(items, &rest[i + 1..]);
                    }
                    _ => xml.name = rest.to_string(),
                }
            }
        }
    }
}

/// Look through pointers; a null pointer stands for the zero value of its
/// target type.
fn indirect(info: TypeInfo, value: &Value) -> (TypeInfo, Value) {
    if let Kind::Pointer(target) = info.kind {
        let target = target.info();
        return match value {
            Value::Pointer(Some(inner)) => indirect(target, inner),
            _ => {
                let zero = target.zero();
                indirect(target, &zero)
            }
        };
    }
    (info, value.clone())
}
