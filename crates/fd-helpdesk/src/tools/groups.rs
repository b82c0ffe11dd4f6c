use super::{int, object, page_params, paged_list, tool};
use crate::client::HelpdeskClient;
use crate::validation::group_payload;
use fd_dispatch::{RegistryError, ToolRegistry};

pub fn register(registry: &mut ToolRegistry, client: &HelpdeskClient) -> Result<(), RegistryError> {
    registry.register(tool(
        client,
        "list_groups",
        "List all groups in Freshdesk.",
        page_params().into(),
        |c, args| async move { paged_list(&c, "/groups", &args).await },
    ))?;

    registry.register(tool(
        client,
        "create_group",
        "Create a group in Freshdesk.",
        vec![object("group_fields")],
        |c, args| async move {
            let body = group_payload(args.object("group_fields")?)?;
            Ok(c.post("/groups", body).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "view_group",
        "View a group in Freshdesk.",
        vec![int("group_id")],
        |c, args| async move {
            let id = args.i64("group_id")?;
            Ok(c.get(format!("/groups/{id}")).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "update_group",
        "Update a group in Freshdesk.",
        vec![int("group_id"), object("group_fields")],
        |c, args| async move {
            let id = args.i64("group_id")?;
            let body = group_payload(args.object("group_fields")?)?;
            Ok(c.put(format!("/groups/{id}"), body).await?.into())
        },
    ))?;

    Ok(())
}
