use super::{int, object, page_args, page_params, paged_envelope, text, tool};
use crate::client::{ApiRequest, HelpdeskClient};
use crate::validation::{is_truthy, TicketPriority, TicketSource, TicketStatus};
use fd_dispatch::{Arguments, DeclaredType, ParamSpec, RegistryError, ToolError, ToolOutput, ToolRegistry};
use serde_json::{json, Map, Value};

pub fn register(registry: &mut ToolRegistry, client: &HelpdeskClient) -> Result<(), RegistryError> {
    registry.register(tool(
        client,
        "get_ticket_fields",
        "Get ticket fields from Freshdesk.",
        vec![],
        |c, _| async move { Ok(c.get("/ticket_form_fields").await?.into()) },
    ))?;

    registry.register(tool(
        client,
        "get_tickets",
        "Get tickets from Freshdesk with pagination support.",
        page_params().into(),
        |c, args| async move {
            let (page, per_page) = page_args(&args)?;
            paged_envelope(&c, ApiRequest::get("/tickets"), "tickets", page, per_page).await
        },
    ))?;

    registry.register(tool(
        client,
        "create_ticket",
        "Create a ticket in Freshdesk",
        vec![
            text("subject"),
            text("description"),
            ParamSpec::required("source", int_or_str()),
            ParamSpec::required("priority", int_or_str()),
            ParamSpec::required("status", int_or_str()),
            ParamSpec::optional("email", DeclaredType::Str),
            ParamSpec::optional("requester_id", DeclaredType::Int),
            ParamSpec::optional("custom_fields", DeclaredType::Map),
            ParamSpec::optional("additional_fields", DeclaredType::Map),
        ],
        |c, args| async move {
            let body = ticket_body(&args)?;
            let response = c.send(ApiRequest::post("/tickets", body)).await?;
            if response.status == 201 {
                Ok(ToolOutput::from("Ticket created successfully"))
            } else {
                Ok(ToolOutput::Text(format!("Success: {}", response.body)))
            }
        },
    ))?;

    registry.register(tool(
        client,
        "update_ticket",
        "Update a ticket in Freshdesk.",
        vec![int("ticket_id"), object("ticket_fields")],
        |c, args| async move {
            let id = args.i64("ticket_id")?;
            let mut fields = args.object("ticket_fields")?.clone();
            if fields.is_empty() {
                return Err(ToolError::validation("No fields provided for update"));
            }
            if !is_truthy(fields.get("custom_fields")) {
                fields.remove("custom_fields");
            }
            let ticket = c.put(format!("/tickets/{id}"), Value::Object(fields)).await?;
            Ok(json!({
                "success": true,
                "message": "Ticket updated successfully",
                "ticket": ticket,
            })
            .into())
        },
    ))?;

    registry.register(tool(
        client,
        "delete_ticket",
        "Delete a ticket in Freshdesk.",
        vec![int("ticket_id")],
        |c, args| async move {
            let id = args.i64("ticket_id")?;
            let response = c.send(ApiRequest::delete(format!("/tickets/{id}"))).await?;
            if response.is_no_content() {
                Ok(ToolOutput::from("Ticket deleted successfully"))
            } else {
                Ok(response.body.into())
            }
        },
    ))?;

    registry.register(tool(
        client,
        "get_ticket",
        "Get a ticket in Freshdesk.",
        vec![int("ticket_id")],
        |c, args| async move {
            let id = args.i64("ticket_id")?;
            Ok(c.get(format!("/tickets/{id}")).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "search_tickets",
        "Search for tickets in Freshdesk. (subject or title filtering is not supported)",
        vec![text("query")],
        |c, args| async move {
            let request = ApiRequest::get("/search/tickets").query("query", args.str("query")?);
            Ok(c.send(request).await?.body.into())
        },
    ))?;

    registry.register(tool(
        client,
        "get_ticket_conversation",
        "Get a ticket conversation in Freshdesk.",
        vec![int("ticket_id")],
        |c, args| async move {
            let id = args.i64("ticket_id")?;
            Ok(c.get(format!("/tickets/{id}/conversations")).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "create_ticket_reply",
        "Create a reply to a ticket in Freshdesk.",
        vec![int("ticket_id"), text("body")],
        |c, args| async move {
            let id = args.i64("ticket_id")?;
            let body = json!({"body": args.str("body")?});
            Ok(c.post(format!("/tickets/{id}/reply"), body).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "create_ticket_note",
        "Create a note for a ticket in Freshdesk.",
        vec![int("ticket_id"), text("body")],
        |c, args| async move {
            let id = args.i64("ticket_id")?;
            let body = json!({"body": args.str("body")?});
            Ok(c.post(format!("/tickets/{id}/notes"), body).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "update_ticket_conversation",
        "Update a conversation for a ticket in Freshdesk.",
        vec![int("conversation_id"), text("body")],
        |c, args| async move {
            let id = args.i64("conversation_id")?;
            let body = json!({"body": args.str("body")?});
            Ok(c.put(format!("/conversations/{id}"), body).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "get_field_properties",
        "Get properties of a specific field by name.",
        vec![text("field_name")],
        |c, args| async move {
            let name = match args.str("field_name")? {
                "type" => "ticket_type",
                other => other,
            };
            let fields = c.get("/ticket_form_fields").await?;
            let matched = fields
                .as_array()
                .and_then(|all| all.iter().find(|f| f.get("name").and_then(Value::as_str) == Some(name)))
                .cloned()
                .unwrap_or(Value::Null);
            Ok(matched.into())
        },
    ))?;

    Ok(())
}

fn int_or_str() -> DeclaredType {
    DeclaredType::Union(vec![DeclaredType::Int, DeclaredType::Str])
}

/// Request body for `POST /tickets`. `additional_fields` are merged at the
/// top level last, so they may override anything above them.
fn ticket_body(args: &Arguments) -> Result<Value, ToolError> {
    let email = args.opt_str("email")?.filter(|e| !e.is_empty());
    let requester_id = args.opt_i64("requester_id")?.filter(|id| *id != 0);
    if email.is_none() && requester_id.is_none() {
        return Err(ToolError::validation("Either email or requester_id must be provided"));
    }

    let bad_code = || ToolError::validation("Invalid value for source, priority, or status");
    let code = |name: &str| args.i64(name).map_err(|_| bad_code());
    let source = TicketSource::from_code(code("source")?).ok_or_else(bad_code)?;
    let priority = TicketPriority::from_code(code("priority")?).ok_or_else(bad_code)?;
    let status = TicketStatus::from_code(code("status")?).ok_or_else(bad_code)?;

    let mut body = Map::new();
    body.insert("subject".into(), args.str("subject")?.into());
    body.insert("description".into(), args.str("description")?.into());
    body.insert("source".into(), source.code().into());
    body.insert("priority".into(), priority.code().into());
    body.insert("status".into(), status.code().into());
    if let Some(email) = email {
        body.insert("email".into(), email.into());
    }
    if let Some(id) = requester_id {
        body.insert("requester_id".into(), id.into());
    }
    if let Some(custom) = args.opt_object("custom_fields")?.filter(|m| !m.is_empty()) {
        body.insert("custom_fields".into(), Value::Object(custom.clone()));
    }
    if let Some(extra) = args.opt_object("additional_fields")? {
        body.extend(extra.clone());
    }
    Ok(Value::Object(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: Value) -> Arguments {
        Arguments::from_value(v).unwrap()
    }

    #[test]
    fn test_ticket_body_requires_requester() {
        let err = ticket_body(&args(json!({
            "subject": "s", "description": "d", "source": 1, "priority": 1, "status": 2
        })))
        .unwrap_err();
        assert_eq!(err.to_string(), "Either email or requester_id must be provided");
    }

    #[test]
    fn test_ticket_body_coerces_string_codes() {
        let body = ticket_body(&args(json!({
            "subject": "Printer on fire",
            "description": "<p>Send help</p>",
            "source": "2",
            "priority": "4",
            "status": 2,
            "email": "jane@example.com",
            "custom_fields": {},
            "additional_fields": {"type": "Incident", "tags": ["hw"]}
        })))
        .unwrap();
        assert_eq!(
            body,
            json!({
                "subject": "Printer on fire",
                "description": "<p>Send help</p>",
                "source": 2,
                "priority": 4,
                "status": 2,
                "email": "jane@example.com",
                "type": "Incident",
                "tags": ["hw"]
            })
        );
    }

    #[test]
    fn test_ticket_body_rejects_unknown_codes() {
        for (source, priority, status) in [(4, 1, 2), (1, 5, 2), (1, 1, 1), (1, 1, 6)] {
            let err = ticket_body(&args(json!({
                "subject": "s", "description": "d", "requester_id": 7,
                "source": source, "priority": priority, "status": status
            })))
            .unwrap_err();
            assert_eq!(err.to_string(), "Invalid value for source, priority, or status");
        }
    }

    #[test]
    fn test_ticket_body_rejects_non_numeric_code() {
        let err = ticket_body(&args(json!({
            "subject": "s", "description": "d", "requester_id": 7,
            "source": "email", "priority": 1, "status": 2
        })))
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for source, priority, or status");
    }
}
