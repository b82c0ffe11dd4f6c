//! Admin ticket-field definitions.

use super::{int, object, tool};
use crate::client::HelpdeskClient;
use fd_dispatch::{RegistryError, ToolRegistry};
use serde_json::Value;

pub fn register(registry: &mut ToolRegistry, client: &HelpdeskClient) -> Result<(), RegistryError> {
    registry.register(tool(
        client,
        "create_ticket_field",
        "Create a ticket field in Freshdesk.",
        vec![object("ticket_field_fields")],
        |c, args| async move {
            let fields = Value::Object(args.object("ticket_field_fields")?.clone());
            Ok(c.post("/admin/ticket_fields", fields).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "view_ticket_field",
        "View a ticket field in Freshdesk.",
        vec![int("ticket_field_id")],
        |c, args| async move {
            let id = args.i64("ticket_field_id")?;
            Ok(c.get(format!("/admin/ticket_fields/{id}")).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "update_ticket_field",
        "Update a ticket field in Freshdesk.",
        vec![int("ticket_field_id"), object("ticket_field_fields")],
        |c, args| async move {
            let id = args.i64("ticket_field_id")?;
            let fields = Value::Object(args.object("ticket_field_fields")?.clone());
            Ok(c.put(format!("/admin/ticket_fields/{id}"), fields).await?.into())
        },
    ))?;

    Ok(())
}
