/*!
Route registration wrapper.

[`SwaggerRoot`] wraps an `axum::Router`. Routes registered through it, or
through one of its groups, are mounted on the router as usual and also
recorded for the document. The returned [`Api`] handle describes the
route's operation.

The traits are the seam between the documenting implementation and the
no-op one in [`crate::nop`], so documentation can be compiled out of a build
without touching route declarations.
*/

use crate::config::{UiSetting, DEFAULT_TITLE, SPEC_NAME};
use crate::error::{SwagError, SwagResult};
use crate::generator::{ApiEntry, GroupEntry, Registry};
use crate::reflect::{Reflect, Sample, Type};
use crate::schema::DefinitionRegistry;
use crate::security::{check_security, set_security, set_security_with_scope};
use crate::specification::{
    ExternalDocs, HttpMethod, Info, OAuth2Flow, Placement, SecurityDefinition, SecurityIn,
    SecurityRequirement, Swagger,
};
use crate::swagger::DocState;
use crate::utils::{connect_path, join_route};
use crate::validator::is_valid_scheme;
use axum::{
    extract::OriginalUri,
    handler::Handler,
    http::{HeaderMap, Method},
    routing::{get, on, MethodFilter, MethodRouter},
    Router,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Method and full path of a registered route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: HttpMethod,
    pub path: String,
}

/// Anything routes can be registered on
pub trait ApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    type Api: Api;

    /// Mount `handler` for `method` at `path` and return its documentation handle
    fn on<H, T>(&self, method: HttpMethod, path: &str, handler: H) -> Self::Api
    where
        H: Handler<T, S>,
        T: 'static;

    /// Like [`ApiRouter::on`] for an arbitrary HTTP method. Methods without a
    /// slot in a Swagger path item are rejected.
    fn add<H, T>(&self, method: Method, path: &str, handler: H) -> SwagResult<Self::Api>
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let method = HttpMethod::try_from(&method)?;
        Ok(self.on(method, path, handler))
    }

    fn get<H, T>(&self, path: &str, handler: H) -> Self::Api
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.on(HttpMethod::Get, path, handler)
    }

    fn post<H, T>(&self, path: &str, handler: H) -> Self::Api
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.on(HttpMethod::Post, path, handler)
    }

    fn put<H, T>(&self, path: &str, handler: H) -> Self::Api
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.on(HttpMethod::Put, path, handler)
    }

    fn delete<H, T>(&self, path: &str, handler: H) -> Self::Api
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.on(HttpMethod::Delete, path, handler)
    }

    fn options<H, T>(&self, path: &str, handler: H) -> Self::Api
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.on(HttpMethod::Options, path, handler)
    }

    fn head<H, T>(&self, path: &str, handler: H) -> Self::Api
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.on(HttpMethod::Head, path, handler)
    }

    fn patch<H, T>(&self, path: &str, handler: H) -> Self::Api
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.on(HttpMethod::Patch, path, handler)
    }
}

/// Top-level registration surface: document-wide settings and groups
pub trait ApiRoot<S>: ApiRouter<S> + Sized
where
    S: Clone + Send + Sync + 'static,
{
    type Group: ApiGroup<S>;

    /// Create a group of routes under `prefix`, documented under the tag `name`
    fn group(&self, name: &str, prefix: &str) -> SwagResult<Self::Group>;

    fn set_request_content_type(&self, types: &[&str]) -> &Self;

    fn set_response_content_type(&self, types: &[&str]) -> &Self;

    fn set_external_docs(&self, desc: &str, url: &str) -> &Self;

    fn add_security_basic(&self, name: &str, desc: &str) -> &Self;

    fn add_security_api_key(&self, name: &str, desc: &str, location: SecurityIn) -> &Self;

    fn add_security_oauth2(
        &self,
        name: &str,
        desc: &str,
        flow: OAuth2Flow,
        authorization_url: &str,
        token_url: &str,
        scopes: BTreeMap<String, String>,
    ) -> &Self;

    fn set_ui(&self, ui: UiSetting) -> &Self;

    /// Transfer protocols; only `http`, `https`, `ws` and `wss` are accepted
    fn set_scheme(&self, schemes: &[&str]) -> SwagResult<&Self>;

    /// Current document skeleton
    fn raw(&self) -> Swagger;

    /// Replace the document skeleton
    fn set_raw(&self, spec: Swagger) -> &Self;

    /// The wrapped router with every registered route mounted
    fn into_router(self) -> Router<S>;
}

/// A route group: one document tag and security shared by its routes
pub trait ApiGroup<S>: ApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn set_description(&self, desc: &str) -> &Self;

    fn set_external_docs(&self, desc: &str, url: &str) -> &Self;

    /// Require every scheme in `names` on all routes of the group
    fn set_security(&self, names: &[&str]) -> &Self;

    fn set_security_with_scope(&self, scopes: SecurityRequirement) -> &Self;
}

/// Documentation handle of one route
pub trait Api: Sized {
    fn route(&self) -> &Route;

    /// Add a non-body parameter of type `ty`. With `nest`, a struct type
    /// expands into one parameter per field.
    fn add_param(
        &mut self,
        ty: Type,
        placement: Placement,
        name: &str,
        desc: &str,
        required: bool,
        nest: bool,
    ) -> SwagResult<&mut Self>;

    /// Add the request body, described by a sample value
    fn add_param_body<T: Reflect>(
        &mut self,
        body: &T,
        name: &str,
        desc: &str,
        required: bool,
    ) -> SwagResult<&mut Self>;

    fn add_param_file(&mut self, name: &str, desc: &str, required: bool) -> &mut Self;

    /// Describe the response for status `code`. `schema` and `header` are
    /// sample values of the body and of a flat struct of response headers.
    fn add_response(
        &mut self,
        code: u16,
        desc: &str,
        schema: Option<Sample>,
        header: Option<Sample>,
    ) -> SwagResult<&mut Self>;

    fn set_request_content_type(&mut self, types: &[&str]) -> &mut Self;

    fn set_response_content_type(&mut self, types: &[&str]) -> &mut Self;

    fn set_operation_id(&mut self, id: &str) -> &mut Self;

    fn set_deprecated(&mut self) -> &mut Self;

    fn set_description(&mut self, desc: &str) -> &mut Self;

    fn set_external_docs(&mut self, desc: &str, url: &str) -> &mut Self;

    fn set_summary(&mut self, summary: &str) -> &mut Self;

    /// Append one requirement needing every scheme in `names`
    fn set_security(&mut self, names: &[&str]) -> &mut Self;

    fn set_security_with_scope(&mut self, scopes: SecurityRequirement) -> &mut Self;

    /// Path parameters are always required
    fn add_param_path<T: Reflect>(&mut self, name: &str, desc: &str) -> SwagResult<&mut Self> {
        self.add_param(Type::of::<T>(), Placement::Path, name, desc, true, false)
    }

    fn add_param_path_nested<T: Reflect>(&mut self) -> SwagResult<&mut Self> {
        self.add_param(Type::of::<T>(), Placement::Path, "", "", true, true)
    }

    fn add_param_query<T: Reflect>(
        &mut self,
        name: &str,
        desc: &str,
        required: bool,
    ) -> SwagResult<&mut Self> {
        self.add_param(Type::of::<T>(), Placement::Query, name, desc, required, false)
    }

    fn add_param_query_nested<T: Reflect>(&mut self) -> SwagResult<&mut Self> {
        self.add_param(Type::of::<T>(), Placement::Query, "", "", false, true)
    }

    fn add_param_form<T: Reflect>(
        &mut self,
        name: &str,
        desc: &str,
        required: bool,
    ) -> SwagResult<&mut Self> {
        self.add_param(Type::of::<T>(), Placement::FormData, name, desc, required, false)
    }

    fn add_param_form_nested<T: Reflect>(&mut self) -> SwagResult<&mut Self> {
        self.add_param(Type::of::<T>(), Placement::FormData, "", "", false, true)
    }

    fn add_param_header<T: Reflect>(
        &mut self,
        name: &str,
        desc: &str,
        required: bool,
    ) -> SwagResult<&mut Self> {
        self.add_param(Type::of::<T>(), Placement::Header, name, desc, required, false)
    }

    fn add_param_header_nested<T: Reflect>(&mut self) -> SwagResult<&mut Self> {
        self.add_param(Type::of::<T>(), Placement::Header, "", "", false, true)
    }
}

fn method_filter(method: HttpMethod) -> MethodFilter {
    match method {
        HttpMethod::Get => MethodFilter::GET,
        HttpMethod::Put => MethodFilter::PUT,
        HttpMethod::Post => MethodFilter::POST,
        HttpMethod::Delete => MethodFilter::DELETE,
        HttpMethod::Options => MethodFilter::OPTIONS,
        HttpMethod::Head => MethodFilter::HEAD,
        HttpMethod::Patch => MethodFilter::PATCH,
    }
}

/// Router shared between a root and its groups until `into_router`
pub(crate) struct RouterCell<S>(Mutex<Option<Router<S>>>);

impl<S> RouterCell<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(router: Router<S>) -> Self {
        Self(Mutex::new(Some(router)))
    }

    pub(crate) fn route(&self, path: &str, method_router: MethodRouter<S>) {
        let mut guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.take() {
            Some(router) => *guard = Some(router.route(path, method_router)),
            None => warn!(path, "router was already taken, route not mounted"),
        }
    }

    /// Mount `handler` and return the route as documented
    pub(crate) fn mount<H, T>(&self, method: HttpMethod, path: &str, handler: H) -> Route
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let path = join_route("", path);
        self.route(&path, on(method_filter(method), handler));
        Route { method, path }
    }

    pub(crate) fn take(&self) -> Router<S> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or_else(Router::new)
    }
}

struct Shared<S> {
    router: RouterCell<S>,
    docs: Arc<DocState>,
}

/// Documenting wrapper around an `axum::Router`
pub struct SwaggerRoot<S = ()> {
    shared: Arc<Shared<S>>,
}

impl<S> SwaggerRoot<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Wrap `router` and mount the UI at `doc_path` and the JSON document at
    /// `<doc_path>/swagger.json`. Without `info` the title is `Project APIs`.
    pub fn new(router: Router<S>, doc_path: &str, info: Option<Info>) -> Self {
        let info = info.unwrap_or_else(|| Info::new(DEFAULT_TITLE, ""));
        let docs = Arc::new(DocState::new(Registry::new(info), doc_path));
        let router = RouterCell::new(router);

        let ui_path = connect_path(&[doc_path]);
        let spec_path = connect_path(&[doc_path, SPEC_NAME]);
        let ui_docs = Arc::clone(&docs);
        router.route(
            &ui_path,
            get(move |headers: HeaderMap, OriginalUri(uri): OriginalUri| {
                let docs = Arc::clone(&ui_docs);
                async move { docs.ui_response(&headers, &uri) }
            }),
        );
        let spec_docs = Arc::clone(&docs);
        router.route(
            &spec_path,
            get(move |headers: HeaderMap, OriginalUri(uri): OriginalUri| {
                let docs = Arc::clone(&spec_docs);
                async move { docs.spec_response(&headers, &uri) }
            }),
        );
        debug!(ui = %ui_path, spec = %spec_path, "mounted documentation endpoints");

        Self {
            shared: Arc::new(Shared { router, docs }),
        }
    }

    /// The assembled document, assembling it if no request has yet
    pub fn document(&self) -> SwagResult<Swagger> {
        self.shared.docs.document()
    }

    fn update(&self, action: &str, f: impl FnOnce(&mut Registry)) -> &Self {
        self.shared.docs.update(action, f);
        self
    }
}

impl<S> ApiRouter<S> for SwaggerRoot<S>
where
    S: Clone + Send + Sync + 'static,
{
    type Api = SwaggerApi;

    fn on<H, T>(&self, method: HttpMethod, path: &str, handler: H) -> SwaggerApi
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let route = self.shared.router.mount(method, path, handler);
        debug!(method = %route.method, path = %route.path, "documented route");
        let slot = self.shared.docs.update("register route", |registry| {
            registry.apis.push(ApiEntry::new(route.method, &route.path));
            Slot::Root(registry.apis.len() - 1)
        });
        SwaggerApi {
            docs: Arc::clone(&self.shared.docs),
            slot,
            route,
        }
    }
}

impl<S> ApiRoot<S> for SwaggerRoot<S>
where
    S: Clone + Send + Sync + 'static,
{
    type Group = SwaggerGroup<S>;

    fn group(&self, name: &str, prefix: &str) -> SwagResult<SwaggerGroup<S>> {
        if name.is_empty() {
            return Err(SwagError::InvalidGroupName);
        }
        let index = self.shared.docs.update("register group", |registry| {
            registry.groups.push(GroupEntry::new(name));
            registry.groups.len() - 1
        });
        Ok(SwaggerGroup {
            shared: Arc::clone(&self.shared),
            index,
            name: name.to_string(),
            prefix: prefix.to_string(),
        })
    }

    fn set_request_content_type(&self, types: &[&str]) -> &Self {
        self.update("set request content type", |registry| {
            registry.spec.consumes = types.iter().map(|t| t.to_string()).collect();
        })
    }

    fn set_response_content_type(&self, types: &[&str]) -> &Self {
        self.update("set response content type", |registry| {
            registry.spec.produces = types.iter().map(|t| t.to_string()).collect();
        })
    }

    fn set_external_docs(&self, desc: &str, url: &str) -> &Self {
        self.update("set external docs", |registry| {
            registry.spec.external_docs = Some(ExternalDocs::new(desc, url));
        })
    }

    fn add_security_basic(&self, name: &str, desc: &str) -> &Self {
        self.update("add security", |registry| {
            let defs = &mut registry.spec.security_definitions;
            if check_security(defs, name) {
                defs.insert(name.to_string(), SecurityDefinition::basic(desc));
            }
        })
    }

    fn add_security_api_key(&self, name: &str, desc: &str, location: SecurityIn) -> &Self {
        self.update("add security", |registry| {
            let defs = &mut registry.spec.security_definitions;
            if check_security(defs, name) {
                defs.insert(
                    name.to_string(),
                    SecurityDefinition::api_key(name, desc, location),
                );
            }
        })
    }

    fn add_security_oauth2(
        &self,
        name: &str,
        desc: &str,
        flow: OAuth2Flow,
        authorization_url: &str,
        token_url: &str,
        scopes: BTreeMap<String, String>,
    ) -> &Self {
        self.update("add security", |registry| {
            let defs = &mut registry.spec.security_definitions;
            if check_security(defs, name) {
                defs.insert(
                    name.to_string(),
                    SecurityDefinition::oauth2(desc, flow, authorization_url, token_url, scopes),
                );
            }
        })
    }

    fn set_ui(&self, ui: UiSetting) -> &Self {
        self.shared.docs.set_ui(ui);
        self
    }

    fn set_scheme(&self, schemes: &[&str]) -> SwagResult<&Self> {
        if let Some(invalid) = schemes.iter().find(|s| !is_valid_scheme(s)) {
            return Err(SwagError::invalid_scheme(invalid));
        }
        Ok(self.update("set scheme", |registry| {
            registry.spec.schemes = schemes.iter().map(|s| s.to_string()).collect();
        }))
    }

    fn raw(&self) -> Swagger {
        match self.shared.docs.registry().as_ref() {
            Some(registry) => registry.spec.clone(),
            None => self.shared.docs.document().unwrap_or_default(),
        }
    }

    fn set_raw(&self, spec: Swagger) -> &Self {
        self.update("set raw document", |registry| registry.spec = spec)
    }

    fn into_router(self) -> Router<S> {
        self.shared.router.take()
    }
}

/// Documenting route group
pub struct SwaggerGroup<S = ()> {
    shared: Arc<Shared<S>>,
    /// Position in the registry; `None` for groups created after assembly
    index: Option<usize>,
    name: String,
    prefix: String,
}

impl<S> SwaggerGroup<S> {
    fn update(&self, action: &str, f: impl FnOnce(&mut GroupEntry)) -> &Self {
        if let Some(index) = self.index {
            self.shared.docs.update(action, |registry| {
                if let Some(group) = registry.groups.get_mut(index) {
                    f(group);
                }
            });
        }
        self
    }
}

impl<S> ApiRouter<S> for SwaggerGroup<S>
where
    S: Clone + Send + Sync + 'static,
{
    type Api = SwaggerApi;

    fn on<H, T>(&self, method: HttpMethod, path: &str, handler: H) -> SwaggerApi
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let full = join_route(&self.prefix, path);
        let route = self.shared.router.mount(method, &full, handler);
        debug!(method = %route.method, path = %route.path, group = %self.name, "documented route");

        let slot = self.index.and_then(|g| {
            self.shared.docs.update("register route", |registry| {
                let group = registry.groups.get_mut(g)?;
                let mut entry = ApiEntry::new(route.method, &route.path);
                entry.operation.tags = vec![self.name.clone()];
                group.apis.push(entry);
                Some(Slot::Group(g, group.apis.len() - 1))
            })
            .flatten()
        });
        SwaggerApi {
            docs: Arc::clone(&self.shared.docs),
            slot,
            route,
        }
    }
}

impl<S> ApiGroup<S> for SwaggerGroup<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn set_description(&self, desc: &str) -> &Self {
        self.update("set group description", |group| {
            group.tag.description = desc.to_string();
        })
    }

    fn set_external_docs(&self, desc: &str, url: &str) -> &Self {
        self.update("set group external docs", |group| {
            group.tag.external_docs = Some(ExternalDocs::new(desc, url));
        })
    }

    fn set_security(&self, names: &[&str]) -> &Self {
        self.update("set group security", |group| {
            set_security(&mut group.security, names);
        })
    }

    fn set_security_with_scope(&self, scopes: SecurityRequirement) -> &Self {
        self.update("set group security", |group| {
            set_security_with_scope(&mut group.security, scopes);
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Root(usize),
    Group(usize, usize),
}

/// Documentation handle of a route registered on a [`SwaggerRoot`] or group
pub struct SwaggerApi {
    docs: Arc<DocState>,
    /// Position in the registry; `None` for routes registered after assembly
    slot: Option<Slot>,
    route: Route,
}

impl SwaggerApi {
    fn edit<R>(
        &self,
        action: &str,
        f: impl FnOnce(&mut ApiEntry, &mut DefinitionRegistry) -> R,
    ) -> Option<R> {
        let slot = self.slot?;
        self.docs
            .update(action, |registry| {
                let Registry {
                    apis, groups, defs, ..
                } = registry;
                let entry = match slot {
                    Slot::Root(i) => apis.get_mut(i),
                    Slot::Group(g, i) => groups.get_mut(g).and_then(|group| group.apis.get_mut(i)),
                };
                entry.map(|entry| f(entry, defs))
            })
            .flatten()
    }

    fn try_edit(
        &mut self,
        action: &str,
        f: impl FnOnce(&mut ApiEntry, &mut DefinitionRegistry) -> SwagResult<()>,
    ) -> SwagResult<&mut Self> {
        self.edit(action, f).unwrap_or(Ok(()))?;
        Ok(self)
    }

    fn set(&mut self, action: &str, f: impl FnOnce(&mut ApiEntry)) -> &mut Self {
        self.edit(action, |entry, _| f(entry));
        self
    }
}

impl Api for SwaggerApi {
    fn route(&self) -> &Route {
        &self.route
    }

    fn add_param(
        &mut self,
        ty: Type,
        placement: Placement,
        name: &str,
        desc: &str,
        required: bool,
        nest: bool,
    ) -> SwagResult<&mut Self> {
        self.try_edit("add param", |entry, _| {
            entry
                .operation
                .add_params(ty, placement, name, desc, required, nest)
        })
    }

    fn add_param_body<T: Reflect>(
        &mut self,
        body: &T,
        name: &str,
        desc: &str,
        required: bool,
    ) -> SwagResult<&mut Self> {
        let sample = Sample::of(body);
        self.try_edit("add body param", |entry, defs| {
            entry
                .operation
                .add_body_param(defs, &sample, name, desc, required)
        })
    }

    fn add_param_file(&mut self, name: &str, desc: &str, required: bool) -> &mut Self {
        self.set("add file param", |entry| {
            entry.operation.add_file_param(name, desc, required)
        })
    }

    fn add_response(
        &mut self,
        code: u16,
        desc: &str,
        schema: Option<Sample>,
        header: Option<Sample>,
    ) -> SwagResult<&mut Self> {
        self.try_edit("add response", |entry, defs| {
            entry
                .operation
                .add_response(defs, code, desc, schema.as_ref(), header.as_ref())
        })
    }

    fn set_request_content_type(&mut self, types: &[&str]) -> &mut Self {
        self.set("set request content type", |entry| {
            entry.operation.consumes = types.iter().map(|t| t.to_string()).collect();
        })
    }

    fn set_response_content_type(&mut self, types: &[&str]) -> &mut Self {
        self.set("set response content type", |entry| {
            entry.operation.produces = types.iter().map(|t| t.to_string()).collect();
        })
    }

    fn set_operation_id(&mut self, id: &str) -> &mut Self {
        self.set("set operation id", |entry| {
            entry.operation.operation_id = id.to_string();
        })
    }

    fn set_deprecated(&mut self) -> &mut Self {
        self.set("set deprecated", |entry| entry.operation.deprecated = true)
    }

    fn set_description(&mut self, desc: &str) -> &mut Self {
        self.set("set description", |entry| {
            entry.operation.description = desc.to_string();
        })
    }

    fn set_external_docs(&mut self, desc: &str, url: &str) -> &mut Self {
        self.set("set external docs", |entry| {
            entry.operation.external_docs = Some(ExternalDocs::new(desc, url));
        })
    }

    fn set_summary(&mut self, summary: &str) -> &mut Self {
        self.set("set summary", |entry| {
            entry.operation.summary = summary.to_string();
        })
    }

    fn set_security(&mut self, names: &[&str]) -> &mut Self {
        self.set("set security", |entry| set_security(&mut entry.security, names))
    }

    fn set_security_with_scope(&mut self, scopes: SecurityRequirement) -> &mut Self {
        self.set("set security", |entry| {
            set_security_with_scope(&mut entry.security, scopes)
        })
    }
}
