//! Registration surface that mounts routes and records nothing.
//!
//! Swap [`NopRoot`] in for [`crate::SwaggerRoot`] to ship a build without
//! documentation endpoints. Route declarations compile unchanged.

use crate::config::UiSetting;
use crate::error::{SwagError, SwagResult};
use crate::reflect::{Reflect, Sample, Type};
use crate::specification::{
    HttpMethod, OAuth2Flow, Placement, SecurityIn, SecurityRequirement, Swagger,
};
use crate::utils::join_route;
use crate::wrapper::{Api, ApiGroup, ApiRoot, ApiRouter, Route, RouterCell};
use axum::{handler::Handler, Router};
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct NopRoot<S = ()> {
    router: Arc<RouterCell<S>>,
}

impl<S> NopRoot<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(router: Router<S>) -> Self {
        Self {
            router: Arc::new(RouterCell::new(router)),
        }
    }
}

impl<S> ApiRouter<S> for NopRoot<S>
where
    S: Clone + Send + Sync + 'static,
{
    type Api = NopApi;

    fn on<H, T>(&self, method: HttpMethod, path: &str, handler: H) -> NopApi
    where
        H: Handler<T, S>,
        T: 'static,
    {
        NopApi {
            route: self.router.mount(method, path, handler),
        }
    }
}

impl<S> ApiRoot<S> for NopRoot<S>
where
    S: Clone + Send + Sync + 'static,
{
    type Group = NopGroup<S>;

    fn group(&self, name: &str, prefix: &str) -> SwagResult<NopGroup<S>> {
        if name.is_empty() {
            return Err(SwagError::InvalidGroupName);
        }
        Ok(NopGroup {
            router: Arc::clone(&self.router),
            prefix: prefix.to_string(),
        })
    }

    fn set_request_content_type(&self, _types: &[&str]) -> &Self {
        self
    }

    fn set_response_content_type(&self, _types: &[&str]) -> &Self {
        self
    }

    fn set_external_docs(&self, _desc: &str, _url: &str) -> &Self {
        self
    }

    fn add_security_basic(&self, _name: &str, _desc: &str) -> &Self {
        self
    }

    fn add_security_api_key(&self, _name: &str, _desc: &str, _location: SecurityIn) -> &Self {
        self
    }

    fn add_security_oauth2(
        &self,
        _name: &str,
        _desc: &str,
        _flow: OAuth2Flow,
        _authorization_url: &str,
        _token_url: &str,
        _scopes: BTreeMap<String, String>,
    ) -> &Self {
        self
    }

    fn set_ui(&self, _ui: UiSetting) -> &Self {
        self
    }

    fn set_scheme(&self, _schemes: &[&str]) -> SwagResult<&Self> {
        Ok(self)
    }

    fn raw(&self) -> Swagger {
        Swagger::default()
    }

    fn set_raw(&self, _spec: Swagger) -> &Self {
        self
    }

    fn into_router(self) -> Router<S> {
        self.router.take()
    }
}

pub struct NopGroup<S = ()> {
    router: Arc<RouterCell<S>>,
    prefix: String,
}

impl<S> ApiRouter<S> for NopGroup<S>
where
    S: Clone + Send + Sync + 'static,
{
    type Api = NopApi;

    fn on<H, T>(&self, method: HttpMethod, path: &str, handler: H) -> NopApi
    where
        H: Handler<T, S>,
        T: 'static,
    {
        NopApi {
            route: self
                .router
                .mount(method, &join_route(&self.prefix, path), handler),
        }
    }
}

impl<S> ApiGroup<S> for NopGroup<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn set_description(&self, _desc: &str) -> &Self {
        self
    }

    fn set_external_docs(&self, _desc: &str, _url: &str) -> &Self {
        self
    }

    fn set_security(&self, _names: &[&str]) -> &Self {
        self
    }

    fn set_security_with_scope(&self, _scopes: SecurityRequirement) -> &Self {
        self
    }
}

pub struct NopApi {
    route: Route,
}

impl Api for NopApi {
    fn route(&self) -> &Route {
        &self.route
    }

    fn add_param(
        &mut self,
        _ty: Type,
        _placement: Placement,
        _name: &str,
        _desc: &str,
        _required: bool,
        _nest: bool,
    ) -> SwagResult<&mut Self> {
        Ok(self)
    }

    fn add_param_body<T: Reflect>(
        &mut self,
        _body: &T,
        _name: &str,
        _desc: &str,
        _required: bool,
    ) -> SwagResult<&mut Self> {
        Ok(self)
    }

    fn add_param_file(&mut self, _name: &str, _desc: &str, _required: bool) -> &mut Self {
        self
    }

    fn add_response(
        &mut self,
        _code: u16,
        _desc: &str,
        _schema: Option<Sample>,
        _header: Option<Sample>,
    ) -> SwagResult<&mut Self> {
        Ok(self)
    }

    fn set_request_content_type(&mut self, _types: &[&str]) -> &mut Self {
        self
    }

    fn set_response_content_type(&mut self, _types: &[&str]) -> &mut Self {
        self
    }

    fn set_operation_id(&mut self, _id: &str) -> &mut Self {
        self
    }

    fn set_deprecated(&mut self) -> &mut Self {
        self
    }

    fn set_description(&mut self, _desc: &str) -> &mut Self {
        self
    }

    fn set_external_docs(&mut self, _desc: &str, _url: &str) -> &mut Self {
        self
    }

    fn set_summary(&mut self, _summary: &str) -> &mut Self {
        self
    }

    fn set_security(&mut self, _names: &[&str]) -> &mut Self {
        self
    }

    fn set_security_with_scope(&mut self, _scopes: SecurityRequirement) -> &mut Self {
        self
    }
}
