/*!
Struct tag handling.

Fields carry a `swagger` tag written in a small directive language:
comma-separated entries, each either a bare keyword or `keyword(value)`.

| directive | effect |
|---|---|
| `desc(text)` | description |
| `min(n)`, `max(n)` | numeric bounds |
| `minLen(n)`, `maxLen(n)` | length bounds |
| `allowEmpty` | allow an empty value (parameters only) |
| `required` | required parameter, or listed in the parent's `required` |
| `readOnly` | read-only property (schemas only) |
| `enum(a\|b\|c)` | allowed values, converted to the field's type |
| `default(v)` | default value, converted to the field's type |

Values that fail to convert are dropped one by one. Unknown directives are
kept in the parsed map and ignored.
*/

use crate::converter::converter;
use crate::reflect::{Field, Type};
use crate::specification::{Facets, Header, JsonSchema, Parameter, Placement, XmlSchema};
use serde_json::Number;
use std::collections::HashMap;

/// Parsed `swagger` tag: directive name to raw value
pub type Directives = HashMap<&'static str, &'static str>;

/// Parse the `swagger` tag of a field
pub fn parse_annotations(field: &Field) -> Directives {
    let text = field.tag("swagger").unwrap_or("");
    let mut directives = Directives::new();
    for entry in text.split(',') {
        let left = entry.find('(');
        let right = entry.rfind(')');
        match (left, right) {
            (Some(l), Some(r)) if l > 0 && r > l => {
                directives.insert(&entry[..l], &entry[l + 1..r]);
            }
            _ => {
                directives.insert(entry, "");
            }
        }
    }
    directives
}

/// Comma segment `index` of tag `key`, trimmed. A missing tag reads as empty
/// text, so segment 0 always exists.
pub fn get_tag(field: &Field, key: &str, index: usize) -> Option<&'static str> {
    field
        .tag(key)
        .unwrap_or("")
        .split(',')
        .nth(index)
        .map(str::trim)
}

/// Name of a field in a placement, and whether it came from a tag.
///
/// Query and form placements read their own tag; path, header and body read
/// the first segment of `json`. A name of `-` means the field is omitted.
pub fn resolve_name(field: &Field, placement: Placement) -> (String, bool) {
    let name = match placement {
        Placement::Query => field.tag("query").unwrap_or(""),
        Placement::FormData => field.tag("form").unwrap_or(""),
        Placement::Body | Placement::Header | Placement::Path => {
            get_tag(field, "json", 0).unwrap_or("")
        }
    };
    if name.is_empty() {
        (field.ident.to_string(), false)
    } else {
        (name.to_string(), true)
    }
}

fn read_facets(directives: &Directives, ty: Type) -> Facets {
    let mut facets = Facets::default();
    if let Some(v) = directives.get("min") {
        facets.minimum = parse_bound(v);
    }
    if let Some(v) = directives.get("max") {
        facets.maximum = parse_bound(v);
    }
    if let Some(v) = directives.get("minLen") {
        facets.min_length = v.parse().ok();
    }
    if let Some(v) = directives.get("maxLen") {
        facets.max_length = v.parse().ok();
    }

    let convert = converter(ty);
    if let Some(list) = directives.get("enum") {
        facets.enum_values = list.split('|').filter_map(convert).collect();
    }
    if let Some(v) = directives.get("default") {
        facets.default = convert(v);
    }
    facets
}

/// Numeric bound; whole numbers are kept as integers
fn parse_bound(text: &str) -> Option<Number> {
    let value: f64 = text.trim().parse().ok()?;
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        return Some(Number::from(value as i64));
    }
    Number::from_f64(value)
}

/// Apply tag directives to a non-body parameter built from `field`
pub fn apply_parameter_tags(param: &mut Parameter, field: &Field) {
    let directives = parse_annotations(field);
    if let Some(desc) = directives.get("desc") {
        param.description = desc.to_string();
    }
    if directives.contains_key("allowEmpty") {
        param.allow_empty_value = true;
    }
    if directives.contains_key("required") || param.placement == Placement::Path {
        param.required = true;
    }
    param.facets = read_facets(&directives, field.ty);

    // facets of a collection describe each element
    if param.type_name == "array" {
        if let Some(items) = param.items.as_deref_mut() {
            items.latest().facets = std::mem::take(&mut param.facets);
        }
    }
}

/// Apply tag directives to a response header built from `field`
pub fn apply_header_tags(header: &mut Header, field: &Field) {
    let directives = parse_annotations(field);
    if let Some(desc) = directives.get("desc") {
        header.description = desc.to_string();
    }
    header.facets = read_facets(&directives, field.ty);

    if header.type_name == "array" {
        if let Some(items) = header.items.as_deref_mut() {
            items.latest().facets = std::mem::take(&mut header.facets);
        }
    }
}

/// Apply tag directives to property `name` of a definition. `required` is the
/// parent schema's required list.
pub fn apply_schema_tags(
    prop: &mut JsonSchema,
    required: &mut Vec<String>,
    name: &str,
    field: &Field,
) {
    let directives = parse_annotations(field);
    if let Some(desc) = directives.get("desc") {
        prop.description = desc.to_string();
    }
    if directives.contains_key("required") {
        required.push(name.to_string());
    }
    if directives.contains_key("readOnly") {
        prop.read_only = true;
    }
    prop.facets = read_facets(&directives, field.ty);

    if prop.type_name == "array" {
        if let Some(items) = prop.items.as_deref_mut() {
            items.latest().facets = std::mem::take(&mut prop.facets);
        }
    }
}

/// Wrapper and element names of an `xml:"outer>inner"` tag
pub fn nested_xml(field: &Field) -> Option<(&'static str, &'static str)> {
    let name = field.tag("xml")?.split(',').next()?.trim();
    name.split_once('>').filter(|(outer, _)| !outer.is_empty())
}

/// Apply the `xml` tag of `field` to its property.
///
/// Only fields that carry an `xml` tag get a hint. `,chardata`, `,cdata` and
/// `,comment` fields, `-` and references are skipped.
pub fn apply_xml_tags(prop: &mut JsonSchema, field: &Field) {
    let Some(tag) = field.tag("xml") else {
        return;
    };
    let mut parts = tag.split(',');
    let name = parts.next().map(str::trim).unwrap_or("");
    let option = parts.next().map(str::trim).unwrap_or("");
    if matches!(option, "chardata" | "cdata" | "comment")
        || name == "-"
        || !prop.ref_path.is_empty()
    {
        return;
    }

    let name = if name.is_empty() { field.ident } else { name };
    let xml = prop.xml.get_or_insert_with(XmlSchema::default);
    if option == "attr" {
        xml.attribute = name.to_string();
    } else {
        xml.name = name.to_string();
    }
}
