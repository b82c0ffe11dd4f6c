use super::{int, object, text, tool};
use crate::client::HelpdeskClient;
use crate::validation::canned_response_payload;
use fd_dispatch::{RegistryError, ToolRegistry};
use serde_json::{json, Value};

pub fn register(registry: &mut ToolRegistry, client: &HelpdeskClient) -> Result<(), RegistryError> {
    registry.register(tool(
        client,
        "list_canned_responses",
        "List all canned responses in Freshdesk.",
        vec![int("folder_id")],
        |c, args| async move {
            let id = args.i64("folder_id")?;
            Ok(c.get(format!("/canned_response_folders/{id}/responses")).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "list_canned_response_folders",
        "List all canned response folders in Freshdesk.",
        vec![],
        |c, _| async move { Ok(c.get("/canned_response_folders").await?.into()) },
    ))?;

    registry.register(tool(
        client,
        "view_canned_response",
        "View a canned response in Freshdesk.",
        vec![int("canned_response_id")],
        |c, args| async move {
            let id = args.i64("canned_response_id")?;
            Ok(c.get(format!("/canned_responses/{id}")).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "create_canned_response",
        "Create a canned response in Freshdesk.",
        vec![object("canned_response_fields")],
        |c, args| async move {
            let body = canned_response_payload(args.object("canned_response_fields")?)?;
            Ok(c.post("/canned_responses", body).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "update_canned_response",
        "Update a canned response in Freshdesk.",
        vec![int("canned_response_id"), object("canned_response_fields")],
        |c, args| async move {
            let id = args.i64("canned_response_id")?;
            let fields = Value::Object(args.object("canned_response_fields")?.clone());
            Ok(c.put(format!("/canned_responses/{id}"), fields).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "create_canned_response_folder",
        "Create a canned response folder in Freshdesk.",
        vec![text("name")],
        |c, args| async move {
            let body = json!({"name": args.str("name")?});
            Ok(c.post("/canned_response_folders", body).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "update_canned_response_folder",
        "Update a canned response folder in Freshdesk.",
        vec![int("folder_id"), text("name")],
        |c, args| async move {
            let id = args.i64("folder_id")?;
            let body = json!({"name": args.str("name")?});
            Ok(c.put(format!("/canned_response_folders/{id}"), body).await?.into())
        },
    ))?;

    Ok(())
}
