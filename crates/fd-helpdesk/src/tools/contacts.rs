use super::{int, object, page_params, paged_list, text, tool};
use crate::client::{ApiRequest, HelpdeskClient};
use crate::validation::contact_field_payload;
use fd_dispatch::{RegistryError, ToolRegistry};
use serde_json::Value;

pub fn register(registry: &mut ToolRegistry, client: &HelpdeskClient) -> Result<(), RegistryError> {
    registry.register(tool(
        client,
        "list_contacts",
        "List all contacts in Freshdesk with pagination support.",
        page_params().into(),
        |c, args| async move { paged_list(&c, "/contacts", &args).await },
    ))?;

    registry.register(tool(
        client,
        "get_contact",
        "Get a contact in Freshdesk.",
        vec![int("contact_id")],
        |c, args| async move {
            let id = args.i64("contact_id")?;
            Ok(c.get(format!("/contacts/{id}")).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "search_contacts",
        "Search for contacts in Freshdesk.",
        vec![text("query")],
        |c, args| async move {
            let request = ApiRequest::get("/contacts/autocomplete").query("term", args.str("query")?);
            Ok(c.send(request).await?.body.into())
        },
    ))?;

    registry.register(tool(
        client,
        "update_contact",
        "Update a contact in Freshdesk.",
        vec![int("contact_id"), object("contact_fields")],
        |c, args| async move {
            let id = args.i64("contact_id")?;
            let fields = Value::Object(args.object("contact_fields")?.clone());
            Ok(c.put(format!("/contacts/{id}"), fields).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "list_contact_fields",
        "List all contact fields in Freshdesk.",
        vec![],
        |c, _| async move { Ok(c.get("/contact_fields").await?.into()) },
    ))?;

    registry.register(tool(
        client,
        "view_contact_field",
        "View a contact field in Freshdesk.",
        vec![int("contact_field_id")],
        |c, args| async move {
            let id = args.i64("contact_field_id")?;
            Ok(c.get(format!("/contact_fields/{id}")).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "create_contact_field",
        "Create a contact field in Freshdesk.",
        vec![object("contact_field_fields")],
        |c, args| async move {
            let body = contact_field_payload(args.object("contact_field_fields")?)?;
            Ok(c.post("/contact_fields", body).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "update_contact_field",
        "Update a contact field in Freshdesk.",
        vec![int("contact_field_id"), object("contact_field_fields")],
        |c, args| async move {
            let id = args.i64("contact_field_id")?;
            let fields = Value::Object(args.object("contact_field_fields")?.clone());
            Ok(c.put(format!("/contact_fields/{id}"), fields).await?.into())
        },
    ))?;

    Ok(())
}
