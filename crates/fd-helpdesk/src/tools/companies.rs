use super::{int, page_args, page_params, paged_envelope, text, tool};
use crate::client::{ApiRequest, HelpdeskClient};
use fd_dispatch::{RegistryError, ToolRegistry};

pub fn register(registry: &mut ToolRegistry, client: &HelpdeskClient) -> Result<(), RegistryError> {
    registry.register(tool(
        client,
        "list_companies",
        "List all companies in Freshdesk with pagination support.",
        page_params().into(),
        |c, args| async move {
            let (page, per_page) = page_args(&args)?;
            paged_envelope(&c, ApiRequest::get("/companies"), "companies", page, per_page).await
        },
    ))?;

    registry.register(tool(
        client,
        "view_company",
        "Get a company in Freshdesk.",
        vec![int("company_id")],
        |c, args| async move {
            let id = args.i64("company_id")?;
            Ok(c.get(format!("/companies/{id}")).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "search_companies",
        "Search for companies in Freshdesk.",
        vec![text("query")],
        |c, args| async move {
            let request = ApiRequest::get("/companies/autocomplete").query("name", args.str("query")?);
            Ok(c.send(request).await?.body.into())
        },
    ))?;

    registry.register(tool(
        client,
        "find_company_by_name",
        "Find a company by name in Freshdesk.",
        vec![text("name")],
        |c, args| async move {
            let request = ApiRequest::get("/companies/autocomplete").query("name", args.str("name")?);
            Ok(c.send(request).await?.body.into())
        },
    ))?;

    registry.register(tool(
        client,
        "list_company_fields",
        "List all company fields in Freshdesk.",
        vec![],
        |c, _| async move { Ok(c.get("/company_fields").await?.into()) },
    ))?;

    Ok(())
}
