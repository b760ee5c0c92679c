/*!
# swagdoc

Swagger 2.0 documentation for axum routers.

Routes are registered through a wrapper that mounts them on the router and
records how they are called. Parameter, body and response types are
described by `#[derive(Reflect)]`; struct field attributes carry names,
validation facets and XML hints. The document is assembled on the first
request to the documentation endpoints and served from there on.

## Features

- Swagger 2.0 document generation from route declarations
- Parameters in path, query, header and form data, flattened from structs
- Shared, deduplicated object definitions, recursive types included
- Basic, API key and OAuth2 security schemes with AND/OR requirements
- Interactive Swagger UI page
- No-op wrapper for builds without documentation

## Usage

```rust,no_run
use axum::Router;
use swagdoc::{Api, ApiRoot, ApiRouter, Reflect, Sample, SwaggerRoot};

#[derive(Reflect, Default)]
struct Pet {
    id: i64,
    name: String,
}

async fn get_pet() -> &'static str {
    "{}"
}

# fn main() -> Result<(), swagdoc::SwagError> {
let root = SwaggerRoot::new(Router::<()>::new(), "/doc", None);
root.get("/pet/:id", get_pet)
    .add_param_path::<i64>("id", "ID of pet to return")?
    .add_response(200, "successful operation", Some(Sample::of(&Pet::default())), None)?;
let app: Router = root.into_router();
# let _ = app;
# Ok(())
# }
```
*/

// Lets `#[derive(Reflect)]` expand to `::swagdoc::...` inside this crate
extern crate self as swagdoc;

// Re-export main types
pub use crate::{
    config::{UiSetting, DEFAULT_CDN, DEFAULT_TITLE, SPEC_NAME},
    error::{SwagError, SwagResult},
    generator::DEFAULT_RESPONSE,
    nop::{NopApi, NopGroup, NopRoot},
    reflect::{Field, Kind, Reflect, Sample, StructInfo, Type, TypeInfo, Value},
    specification::{
        Contact, ExternalDocs, HttpMethod, Info, JsonSchema, License, OAuth2Flow, Operation,
        Parameter, PathItem, Placement, Response, SecurityDefinition, SecurityIn,
        SecurityRequirement, SecurityType, Swagger, Tag, XmlSchema,
    },
    wrapper::{Api, ApiGroup, ApiRoot, ApiRouter, Route, SwaggerApi, SwaggerGroup, SwaggerRoot},
};

// Re-export the derive macro from the proc-macro crate
pub use swagdoc_derive::Reflect;

// Core modules
pub mod config;
pub mod error;
pub mod specification;

// Type inspection
pub mod converter;
pub mod reflect;
pub mod validator;

// Document building
pub mod generator;
pub mod operation;
pub mod params;
pub mod schema;
pub mod security;
pub mod tag;

// Registration surface
pub mod nop;
pub mod wrapper;

// Documentation endpoints
pub mod swagger;

// Utilities
pub mod utils;
