use crate::converter::to_swagger_path;
use crate::error::SwagResult;
use crate::schema::DefinitionRegistry;
use crate::specification::*;
use std::collections::BTreeMap;
use tracing::debug;

/// Description given to the synthesized response of routes that declare none
pub const DEFAULT_RESPONSE: &str = "successful operation";

/// A documented route and its pending operation
#[derive(Debug, Clone)]
pub struct ApiEntry {
    pub method: HttpMethod,
    /// Full router path, group prefix included
    pub path: String,
    /// Requirements declared on the route itself
    pub security: Vec<SecurityRequirement>,
    pub operation: Operation,
}

impl ApiEntry {
    pub fn new(method: HttpMethod, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            security: Vec::new(),
            operation: Operation::default(),
        }
    }
}

/// A route group: one document tag and security shared by its routes
#[derive(Debug, Clone)]
pub struct GroupEntry {
    pub tag: Tag,
    pub security: Vec<SecurityRequirement>,
    pub apis: Vec<ApiEntry>,
}

impl GroupEntry {
    pub fn new(name: &str) -> Self {
        Self {
            tag: Tag {
                name: name.to_string(),
                ..Tag::default()
            },
            security: Vec::new(),
            apis: Vec::new(),
        }
    }
}

/// Everything declared before the document is assembled
#[derive(Debug, Clone)]
pub struct Registry {
    /// Document skeleton: info, content types, schemes, security schemes
    pub spec: Swagger,
    pub apis: Vec<ApiEntry>,
    pub groups: Vec<GroupEntry>,
    pub defs: DefinitionRegistry,
}

impl Registry {
    pub fn new(info: Info) -> Self {
        Self {
            spec: Swagger {
                info: Some(info),
                ..Swagger::default()
            },
            apis: Vec::new(),
            groups: Vec::new(),
            defs: DefinitionRegistry::new(),
        }
    }

    /// Fold every declaration into the final document.
    ///
    /// Group security is merged into each of the group's routes ahead of the
    /// routes' own. Fails on the first requirement that names an unregistered
    /// security scheme.
    pub fn assemble(self) -> SwagResult<Swagger> {
        let Registry {
            mut spec,
            apis,
            groups,
            defs,
        } = self;

        spec.swagger = SWAGGER_VERSION.to_string();
        spec.paths = BTreeMap::new();

        for group in groups {
            spec.tags.push(group.tag);
            for mut api in group.apis {
                api.operation
                    .add_security(&spec.security_definitions, &group.security)?;
                transfer(&mut spec, api)?;
            }
        }
        for api in apis {
            transfer(&mut spec, api)?;
        }

        spec.definitions.extend(defs.into_definitions());
        debug!(
            paths = spec.paths.len(),
            definitions = spec.definitions.len(),
            "assembled swagger document"
        );
        Ok(spec)
    }
}

fn transfer(spec: &mut Swagger, api: ApiEntry) -> SwagResult<()> {
    let ApiEntry {
        method,
        path,
        security,
        mut operation,
    } = api;

    operation.add_security(&spec.security_definitions, &security)?;
    if operation.responses.is_empty() {
        operation.responses.insert(
            "default".to_string(),
            Response {
                description: DEFAULT_RESPONSE.to_string(),
                ..Response::default()
            },
        );
    }

    let item = spec.paths.entry(to_swagger_path(&path)).or_default();
    *item.operation_mut(method) = Some(operation);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SwagError;
    use crate::security::set_security;
    use serde_json::json;

    fn registry() -> Registry {
        Registry::new(Info::new("Project APIs", ""))
    }

    #[test]
    fn test_empty_registry() {
        let spec = registry().assemble().unwrap();
        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            json!({"swagger": "2.0", "info": {"title": "Project APIs", "version": ""}, "paths": {}})
        );
    }

    #[test]
    fn test_groups_and_default_response() {
        let mut reg = registry();
        let mut users = GroupEntry::new("Users");
        let mut delete = ApiEntry::new(HttpMethod::Delete, "users/:id");
        delete.operation.tags = vec!["Users".to_string()];
        users.apis.push(delete);
        reg.groups.push(users);
        reg.apis.push(ApiEntry::new(HttpMethod::Get, "/ping"));

        let spec = reg.assemble().unwrap();
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["tags"], json!([{"name": "Users"}]));
        assert_eq!(
            value["paths"]["/ping"]["get"]["responses"],
            json!({"default": {"description": "successful operation"}})
        );
        assert_eq!(value["paths"]["/users/{id}"]["delete"]["tags"], json!(["Users"]));
    }

    #[test]
    fn test_methods_share_a_path() {
        let mut reg = registry();
        for method in [HttpMethod::Get, HttpMethod::Post, HttpMethod::Patch] {
            reg.apis.push(ApiEntry::new(method, "/"));
        }
        let spec = reg.assemble().unwrap();
        let item = &spec.paths["/"];
        assert!(item.get.is_some());
        assert!(item.post.is_some());
        assert!(item.patch.is_some());
        assert!(item.put.is_none());
    }

    #[test]
    fn test_group_security_comes_first() {
        let mut reg = registry();
        for name in ["JWT", "Basic"] {
            reg.spec
                .security_definitions
                .insert(name.to_string(), SecurityDefinition::basic(""));
        }
        let mut group = GroupEntry::new("Users");
        set_security(&mut group.security, &["JWT"]);
        let mut api = ApiEntry::new(HttpMethod::Get, "/users");
        set_security(&mut api.security, &["Basic"]);
        set_security(&mut api.security, &["JWT"]);
        group.apis.push(api);
        reg.groups.push(group);

        let spec = reg.assemble().unwrap();
        let security = serde_json::to_value(&spec.paths["/users"].get.as_ref().unwrap().security)
            .unwrap();
        assert_eq!(security, json!([{"JWT": []}, {"Basic": []}]));
    }

    #[test]
    fn test_unknown_security_fails() {
        let mut reg = registry();
        let mut api = ApiEntry::new(HttpMethod::Get, "/");
        set_security(&mut api.security, &["JWT"]);
        reg.apis.push(api);
        assert_eq!(
            reg.assemble(),
            Err(SwagError::UnknownSecurity("JWT".to_string()))
        );
    }
}
