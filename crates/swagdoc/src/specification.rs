/*!
Swagger 2.0 document model.

Field names follow the wire format; empty collections and unset optional
values are omitted on serialization. Maps are ordered so the emitted document
is stable across runs.
*/

use crate::error::{SwagError, SwagResult};
use axum::http::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value as JsonValue};
use std::collections::BTreeMap;
use std::fmt;

/// Fixed `swagger` version field
pub const SWAGGER_VERSION: &str = "2.0";

/// Prefix of every definition reference
pub const DEF_PREFIX: &str = "#/definitions/";

/// One alternative of a security constraint: scheme name to required scopes.
/// Keys within one requirement are AND'd; requirements in a list are OR'd.
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

fn is_false(b: &bool) -> bool {
    !*b
}

/// Complete Swagger 2.0 document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Swagger {
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub swagger: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub info: Option<Info>,

    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub host: String,

    #[serde(rename = "basePath", skip_serializing_if = "String::is_empty", default)]
    pub base_path: String,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub schemes: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub consumes: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub produces: Vec<String>,

    #[serde(default)]
    pub paths: BTreeMap<String, PathItem>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub definitions: BTreeMap<String, JsonSchema>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub parameters: BTreeMap<String, Parameter>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub responses: BTreeMap<String, Response>,

    #[serde(rename = "securityDefinitions", skip_serializing_if = "BTreeMap::is_empty", default)]
    pub security_definitions: BTreeMap<String, SecurityDefinition>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<Tag>,

    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none", default)]
    pub external_docs: Option<ExternalDocs>,
}

impl Swagger {
    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> SwagResult<String> {
        serde_json::to_string_pretty(self).map_err(SwagError::from)
    }

    /// Serialize as YAML
    pub fn to_yaml(&self) -> SwagResult<String> {
        serde_yaml::to_string(self).map_err(SwagError::from)
    }
}

/// API metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub title: String,

    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub description: String,

    #[serde(rename = "termsOfService", skip_serializing_if = "String::is_empty", default)]
    pub terms_of_service: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub contact: Option<Contact>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub license: Option<License>,

    #[serde(default)]
    pub version: String,
}

impl Info {
    pub fn new(title: &str, version: &str) -> Self {
        Self {
            title: title.to_string(),
            version: version.to_string(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_terms_of_service(mut self, url: &str) -> Self {
        self.terms_of_service = url.to_string();
        self
    }

    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contact = Some(contact);
        self
    }

    pub fn with_license(mut self, license: License) -> Self {
        self.license = Some(license);
        self
    }
}

/// Contact information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub url: String,
}

/// License information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct License {
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub url: String,
}

/// HTTP methods that have an operation slot in a path item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
}

impl HttpMethod {
    pub fn as_method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Put => Method::PUT,
            Self::Post => Method::POST,
            Self::Delete => Method::DELETE,
            Self::Options => Method::OPTIONS,
            Self::Head => Method::HEAD,
            Self::Patch => Method::PATCH,
        }
    }
}

impl TryFrom<&Method> for HttpMethod {
    type Error = SwagError;

    fn try_from(method: &Method) -> SwagResult<Self> {
        match *method {
            Method::GET => Ok(Self::Get),
            Method::PUT => Ok(Self::Put),
            Method::POST => Ok(Self::Post),
            Method::DELETE => Ok(Self::Delete),
            Method::OPTIONS => Ok(Self::Options),
            Method::HEAD => Ok(Self::Head),
            Method::PATCH => Ok(Self::Patch),
            _ => Err(SwagError::UnsupportedMethod(method.to_string())),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_method(), f)
    }
}

/// Operations available on a single path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(rename = "$ref", skip_serializing_if = "String::is_empty", default)]
    pub ref_path: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub options: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub head: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub patch: Option<Operation>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub parameters: Vec<Parameter>,
}

impl PathItem {
    /// Slot holding the operation for `method`
    pub fn operation_mut(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Options => &mut self.options,
            HttpMethod::Head => &mut self.head,
            HttpMethod::Patch => &mut self.patch,
        }
    }

    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
        }
    }
}

/// A single API operation on a path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub summary: String,

    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub description: String,

    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none", default)]
    pub external_docs: Option<ExternalDocs>,

    #[serde(rename = "operationId", skip_serializing_if = "String::is_empty", default)]
    pub operation_id: String,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub consumes: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub produces: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub parameters: Vec<Parameter>,

    /// Keyed by status code, or `default`
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub responses: BTreeMap<String, Response>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub schemes: Vec<String>,

    #[serde(skip_serializing_if = "is_false", default)]
    pub deprecated: bool,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub security: Vec<SecurityRequirement>,
}

/// Where a parameter is read from on an incoming request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Placement {
    #[serde(rename = "query")]
    Query,
    #[serde(rename = "header")]
    Header,
    #[serde(rename = "path")]
    Path,
    #[serde(rename = "formData")]
    FormData,
    #[serde(rename = "body")]
    Body,
}

impl Placement {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Header => "header",
            Self::Path => "path",
            Self::FormData => "formData",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation facets shared by parameters, items, headers and schemas.
///
/// These are exactly the facets that migrate to the innermost item of an
/// array-typed record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Facets {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default: Option<JsonValue>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub maximum: Option<Number>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub minimum: Option<Number>,

    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none", default)]
    pub max_length: Option<i64>,

    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none", default)]
    pub min_length: Option<i64>,

    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty", default)]
    pub enum_values: Vec<JsonValue>,
}

impl Facets {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A single operation parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub placement: Placement,

    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub description: String,

    #[serde(default)]
    pub required: bool,

    /// Only set for body parameters
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub schema: Option<JsonSchema>,

    #[serde(rename = "type", skip_serializing_if = "String::is_empty", default)]
    pub type_name: String,

    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub format: String,

    #[serde(rename = "allowEmptyValue", skip_serializing_if = "is_false", default)]
    pub allow_empty_value: bool,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub items: Option<Box<Items>>,

    #[serde(rename = "collectionFormat", skip_serializing_if = "String::is_empty", default)]
    pub collection_format: String,

    #[serde(flatten)]
    pub facets: Facets,
}

impl Parameter {
    pub fn new(name: &str, placement: Placement) -> Self {
        Self {
            name: name.to_string(),
            placement,
            description: String::new(),
            required: false,
            schema: None,
            type_name: String::new(),
            format: String::new(),
            allow_empty_value: false,
            items: None,
            collection_format: String::new(),
            facets: Facets::default(),
        }
    }
}

/// Item descriptor of an array-typed non-body parameter or header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Items {
    #[serde(rename = "type", skip_serializing_if = "String::is_empty", default)]
    pub type_name: String,

    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub format: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub items: Option<Box<Items>>,

    #[serde(rename = "collectionFormat", skip_serializing_if = "String::is_empty", default)]
    pub collection_format: String,

    #[serde(flatten)]
    pub facets: Facets,
}

impl Items {
    /// Deepest item in the nested chain
    pub fn latest(&mut self) -> &mut Items {
        match self.items {
            Some(ref mut inner) => inner.latest(),
            None => self,
        }
    }
}

/// An operation response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub schema: Option<JsonSchema>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub headers: BTreeMap<String, Header>,

    #[serde(rename = "$ref", skip_serializing_if = "String::is_empty", default)]
    pub ref_path: String,
}

/// A response header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub description: String,

    #[serde(rename = "type", skip_serializing_if = "String::is_empty", default)]
    pub type_name: String,

    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub format: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub items: Option<Box<Items>>,

    #[serde(rename = "collectionFormat", skip_serializing_if = "String::is_empty", default)]
    pub collection_format: String,

    #[serde(flatten)]
    pub facets: Facets,
}

/// Kind of a security scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityType {
    #[serde(rename = "basic")]
    Basic,
    #[serde(rename = "apiKey")]
    ApiKey,
    #[serde(rename = "oauth2")]
    OAuth2,
}

/// Location of an API key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityIn {
    #[serde(rename = "query")]
    Query,
    #[serde(rename = "header")]
    Header,
}

/// OAuth2 flow of a security scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OAuth2Flow {
    #[serde(rename = "implicit")]
    Implicit,
    #[serde(rename = "password")]
    Password,
    #[serde(rename = "application")]
    Application,
    #[serde(rename = "accessCode")]
    AccessCode,
}

/// A security scheme usable by operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityDefinition {
    #[serde(rename = "type")]
    pub scheme_type: SecurityType,

    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub description: String,

    /// Header or query parameter name for `apiKey`
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub name: String,

    #[serde(rename = "in", skip_serializing_if = "Option::is_none", default)]
    pub location: Option<SecurityIn>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub flow: Option<OAuth2Flow>,

    #[serde(rename = "authorizationUrl", skip_serializing_if = "String::is_empty", default)]
    pub authorization_url: String,

    #[serde(rename = "tokenUrl", skip_serializing_if = "String::is_empty", default)]
    pub token_url: String,

    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub scopes: BTreeMap<String, String>,
}

/// Link to external documentation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalDocs {
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub description: String,
    pub url: String,
}

impl ExternalDocs {
    pub fn new(description: &str, url: &str) -> Self {
        Self {
            description: description.to_string(),
            url: url.to_string(),
        }
    }
}

/// Document-level tag, one per route group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub name: String,

    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub description: String,

    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none", default)]
    pub external_docs: Option<ExternalDocs>,
}

/// JSON schema subset used by body parameters, responses and definitions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonSchema {
    #[serde(rename = "type", skip_serializing_if = "String::is_empty", default)]
    pub type_name: String,

    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub format: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub items: Option<Box<JsonSchema>>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub properties: BTreeMap<String, JsonSchema>,

    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub example: Option<JsonValue>,

    #[serde(rename = "readOnly", skip_serializing_if = "is_false", default)]
    pub read_only: bool,

    #[serde(rename = "$ref", skip_serializing_if = "String::is_empty", default)]
    pub ref_path: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub xml: Option<XmlSchema>,

    #[serde(flatten)]
    pub facets: Facets,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub required: Vec<String>,

    #[serde(rename = "additionalProperties", skip_serializing_if = "Option::is_none", default)]
    pub additional_properties: Option<Box<JsonSchema>>,
}

impl JsonSchema {
    /// Empty object shell
    pub fn object() -> Self {
        Self {
            type_name: "object".to_string(),
            ..Self::default()
        }
    }

    /// Reference to a named definition
    pub fn reference(key: &str) -> Self {
        Self {
            ref_path: format!("{}{}", DEF_PREFIX, key),
            ..Self::default()
        }
    }

    /// Definition key this schema points at, if it is a reference
    pub fn ref_key(&self) -> Option<&str> {
        self.ref_path.strip_prefix(DEF_PREFIX)
    }

    /// Deepest schema in the nested `items` chain
    pub fn latest(&mut self) -> &mut JsonSchema {
        match self.items {
            Some(ref mut inner) => inner.latest(),
            None => self,
        }
    }
}

/// XML serialization hints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct XmlSchema {
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub namespace: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub prefix: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub attribute: String,
    #[serde(skip_serializing_if = "is_false", default)]
    pub wrapped: bool,
}

impl XmlSchema {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}
