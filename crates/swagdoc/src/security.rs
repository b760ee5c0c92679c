//! Security schemes and per-operation security requirements.

use crate::error::{SwagError, SwagResult};
use crate::specification::{
    OAuth2Flow, Operation, SecurityDefinition, SecurityIn, SecurityRequirement, SecurityType,
};
use std::collections::BTreeMap;
use tracing::warn;

impl SecurityDefinition {
    fn empty(scheme_type: SecurityType, description: &str) -> Self {
        Self {
            scheme_type,
            description: description.to_string(),
            name: String::new(),
            location: None,
            flow: None,
            authorization_url: String::new(),
            token_url: String::new(),
            scopes: BTreeMap::new(),
        }
    }

    /// HTTP basic authentication
    pub fn basic(description: &str) -> Self {
        Self::empty(SecurityType::Basic, description)
    }

    /// API key sent in a header or query parameter called `name`
    pub fn api_key(name: &str, description: &str, location: SecurityIn) -> Self {
        Self {
            name: name.to_string(),
            location: Some(location),
            ..Self::empty(SecurityType::ApiKey, description)
        }
    }

    /// OAuth2 with one flow and its scope descriptions
    pub fn oauth2(
        description: &str,
        flow: OAuth2Flow,
        authorization_url: &str,
        token_url: &str,
        scopes: BTreeMap<String, String>,
    ) -> Self {
        Self {
            flow: Some(flow),
            authorization_url: authorization_url.to_string(),
            token_url: token_url.to_string(),
            scopes,
            ..Self::empty(SecurityType::OAuth2, description)
        }
    }
}

/// Whether a scheme may be registered under `name`. Empty and already
/// registered names are refused.
pub fn check_security(defs: &BTreeMap<String, SecurityDefinition>, name: &str) -> bool {
    if name.is_empty() {
        warn!("ignoring security definition without a name");
        return false;
    }
    if defs.contains_key(name) {
        warn!(security = name, "ignoring duplicate security definition");
        return false;
    }
    true
}

/// Append one requirement that needs every scheme in `names`
pub fn set_security(list: &mut Vec<SecurityRequirement>, names: &[&str]) {
    if names.is_empty() {
        return;
    }
    list.push(
        names
            .iter()
            .map(|name| (name.to_string(), Vec::new()))
            .collect(),
    );
}

/// Append one requirement with explicit scopes
pub fn set_security_with_scope(list: &mut Vec<SecurityRequirement>, scopes: SecurityRequirement) {
    if scopes.is_empty() {
        return;
    }
    list.push(scopes);
}

/// Whether `list` holds a requirement with the same schemes and scope sets
pub fn contains_requirement(list: &[SecurityRequirement], req: &SecurityRequirement) -> bool {
    list.iter().any(|existing| {
        existing.len() == req.len()
            && existing.iter().all(|(name, scopes)| {
                req.get(name)
                    .is_some_and(|other| same_scopes(scopes, other))
            })
    })
}

fn same_scopes(a: &[String], b: &[String]) -> bool {
    a.len() == b.len() && a.iter().all(|scope| b.contains(scope))
}

impl Operation {
    /// Merge `list` into the operation's security, skipping duplicates.
    /// Every scheme must be registered in `defs`.
    pub fn add_security(
        &mut self,
        defs: &BTreeMap<String, SecurityDefinition>,
        list: &[SecurityRequirement],
    ) -> SwagResult<()> {
        for req in list {
            if let Some(name) = req.keys().find(|name| !defs.contains_key(*name)) {
                return Err(SwagError::unknown_security(name));
            }
            if contains_requirement(&self.security, req) {
                continue;
            }
            self.security.push(req.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn requirement(entries: Vec<(&str, Vec<&str>)>) -> SecurityRequirement {
        entries
            .into_iter()
            .map(|(name, scopes)| {
                (
                    name.to_string(),
                    scopes.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect()
    }

    fn registered() -> BTreeMap<String, SecurityDefinition> {
        let mut defs = BTreeMap::new();
        defs.insert("JWT".to_string(), SecurityDefinition::api_key("JWT", "", SecurityIn::Header));
        defs.insert("Basic".to_string(), SecurityDefinition::basic(""));
        defs
    }

    #[test]
    fn test_definition_shapes() {
        let key = serde_json::to_value(SecurityDefinition::api_key(
            "api_key",
            "key",
            SecurityIn::Header,
        ))
        .unwrap();
        assert_eq!(
            key,
            json!({"type": "apiKey", "description": "key", "name": "api_key", "in": "header"})
        );

        let mut scopes = BTreeMap::new();
        scopes.insert("write:pets".to_string(), "modify pets".to_string());
        let oauth = serde_json::to_value(SecurityDefinition::oauth2(
            "",
            OAuth2Flow::Implicit,
            "http://petstore.swagger.io/oauth/dialog",
            "",
            scopes,
        ))
        .unwrap();
        assert_eq!(
            oauth,
            json!({
                "type": "oauth2",
                "flow": "implicit",
                "authorizationUrl": "http://petstore.swagger.io/oauth/dialog",
                "scopes": {"write:pets": "modify pets"}
            })
        );
    }

    #[test]
    fn test_check_security() {
        let defs = registered();
        assert!(check_security(&defs, "OAuth2"));
        assert!(!check_security(&defs, "JWT"));
        assert!(!check_security(&defs, ""));
    }

    #[test]
    fn test_and_versus_or() {
        let mut and = Vec::new();
        set_security(&mut and, &["JWT", "Basic"]);
        assert_eq!(and, vec![requirement(vec![("JWT", vec![]), ("Basic", vec![])])]);

        let mut or = Vec::new();
        set_security(&mut or, &["JWT"]);
        set_security(&mut or, &["Basic"]);
        set_security(&mut or, &[]);
        assert_eq!(
            or,
            vec![requirement(vec![("JWT", vec![])]), requirement(vec![("Basic", vec![])])]
        );
    }

    #[test]
    fn test_scoped_security_skips_empty_maps() {
        let mut list = Vec::new();
        set_security_with_scope(&mut list, SecurityRequirement::new());
        set_security_with_scope(&mut list, requirement(vec![("OAuth2", vec!["read", "write"])]));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_contains_requirement_ignores_scope_order() {
        let list = vec![requirement(vec![("OAuth2", vec!["read", "write"])])];
        assert!(contains_requirement(&list, &requirement(vec![("OAuth2", vec!["write", "read"])])));
        assert!(!contains_requirement(&list, &requirement(vec![("OAuth2", vec!["read"])])));
        assert!(!contains_requirement(
            &list,
            &requirement(vec![("OAuth2", vec!["read", "write"]), ("JWT", vec![])])
        ));
    }

    #[test]
    fn test_add_security_merges_and_validates() {
        let defs = registered();
        let mut op = Operation::default();
        let group = vec![requirement(vec![("JWT", vec![])])];
        let own = vec![requirement(vec![("JWT", vec![])]), requirement(vec![("Basic", vec![])])];
        op.add_security(&defs, &group).unwrap();
        op.add_security(&defs, &own).unwrap();
        assert_eq!(op.security.len(), 2);

        let unknown = vec![requirement(vec![("OAuth2", vec![])])];
        assert_eq!(
            op.add_security(&defs, &unknown),
            Err(SwagError::UnknownSecurity("OAuth2".to_string()))
        );
    }
}
