pub mod agents;
pub mod alerts;
pub mod canned;
pub mod companies;
pub mod contacts;
pub mod fields;
pub mod groups;
pub mod solutions;
pub mod tickets;

use crate::client::{ApiRequest, HelpdeskClient};
use crate::validation::check_page;
use fd_dispatch::{
    handler_fn, Arguments, DeclaredType, ParamSpec, RegistryError, ToolDescriptor, ToolError,
    ToolOutput, ToolRegistry,
};
use serde_json::json;
use std::future::Future;

pub(crate) const DEFAULT_PAGE: i64 = 1;
pub(crate) const DEFAULT_PER_PAGE: i64 = 30;

/// Register every helpdesk tool, grouped by resource.
pub fn register_all(registry: &mut ToolRegistry, client: &HelpdeskClient) -> Result<(), RegistryError> {
    tickets::register(registry, client)?;
    agents::register(registry, client)?;
    contacts::register(registry, client)?;
    canned::register(registry, client)?;
    solutions::register(registry, client)?;
    groups::register(registry, client)?;
    fields::register(registry, client)?;
    companies::register(registry, client)?;
    alerts::register(registry, client)?;
    tracing::info!("Registered {} helpdesk tools", registry.len());
    Ok(())
}

/// Build a descriptor whose handler receives its own clone of `client`.
pub(crate) fn tool<F, Fut>(
    client: &HelpdeskClient,
    name: &str,
    description: &str,
    params: Vec<ParamSpec>,
    f: F,
) -> ToolDescriptor
where
    F: Fn(HelpdeskClient, Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ToolOutput, ToolError>> + Send + 'static,
{
    let client = client.clone();
    ToolDescriptor::new(name, handler_fn(move |args| f(client.clone(), args)))
        .with_description(description)
        .with_params(params)
}

pub(crate) fn int(name: &str) -> ParamSpec {
    ParamSpec::required(name, DeclaredType::Int)
}

pub(crate) fn text(name: &str) -> ParamSpec {
    ParamSpec::required(name, DeclaredType::Str)
}

pub(crate) fn object(name: &str) -> ParamSpec {
    ParamSpec::required(name, DeclaredType::Map)
}

/// `page = 1`, `per_page = 30`.
pub(crate) fn page_params() -> [ParamSpec; 2] {
    [
        ParamSpec::with_default("page", DeclaredType::Int.optional(), DEFAULT_PAGE),
        ParamSpec::with_default("per_page", DeclaredType::Int.optional(), DEFAULT_PER_PAGE),
    ]
}

/// Read and bound-check `page`/`per_page`.
pub(crate) fn page_args(args: &Arguments) -> Result<(i64, i64), ToolError> {
    let page = args.opt_i64("page")?.unwrap_or(DEFAULT_PAGE);
    let per_page = args.opt_i64("per_page")?.unwrap_or(DEFAULT_PER_PAGE);
    check_page(page, per_page)?;
    Ok((page, per_page))
}

/// Fetch one page and wrap it as `{<key>: items, pagination: {...}}`.
pub(crate) async fn paged_envelope(
    client: &HelpdeskClient,
    request: ApiRequest,
    key: &str,
    page: i64,
    per_page: i64,
) -> Result<ToolOutput, ToolError> {
    let request = request.query("page", page).query("per_page", per_page);
    let response = client.send(request).await?;
    Ok(json!({
        key: response.body,
        "pagination": {
            "current_page": page,
            "next_page": response.pagination.next,
            "prev_page": response.pagination.prev,
            "per_page": per_page,
        }
    })
    .into())
}

/// Plain paged list, without the envelope.
pub(crate) async fn paged_list(
    client: &HelpdeskClient,
    path: &str,
    args: &Arguments,
) -> Result<ToolOutput, ToolError> {
    let (page, per_page) = page_args(args)?;
    let request = ApiRequest::get(path).query("page", page).query("per_page", per_page);
    Ok(client.send(request).await?.body.into())
}
