use super::{int, object, page_params, paged_list, text, tool};
use crate::client::{ApiRequest, HelpdeskClient};
use crate::validation::check_agent_fields;
use fd_dispatch::{RegistryError, ToolRegistry};
use serde_json::Value;

pub fn register(registry: &mut ToolRegistry, client: &HelpdeskClient) -> Result<(), RegistryError> {
    registry.register(tool(
        client,
        "get_agents",
        "Get all agents in Freshdesk with pagination support.",
        page_params().into(),
        |c, args| async move { paged_list(&c, "/agents", &args).await },
    ))?;

    registry.register(tool(
        client,
        "view_agent",
        "View an agent in Freshdesk.",
        vec![int("agent_id")],
        |c, args| async move {
            let id = args.i64("agent_id")?;
            Ok(c.get(format!("/agents/{id}")).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "create_agent",
        "Create an agent in Freshdesk.",
        vec![object("agent_fields")],
        |c, args| async move {
            let fields = args.object("agent_fields")?;
            check_agent_fields(fields)?;
            Ok(c.post("/agents", Value::Object(fields.clone())).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "update_agent",
        "Update an agent in Freshdesk.",
        vec![int("agent_id"), object("agent_fields")],
        |c, args| async move {
            let id = args.i64("agent_id")?;
            let fields = Value::Object(args.object("agent_fields")?.clone());
            Ok(c.put(format!("/agents/{id}"), fields).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "search_agents",
        "Search for agents in Freshdesk.",
        vec![text("query")],
        |c, args| async move {
            let request = ApiRequest::get("/agents/autocomplete").query("term", args.str("query")?);
            Ok(c.send(request).await?.body.into())
        },
    ))?;

    Ok(())
}
