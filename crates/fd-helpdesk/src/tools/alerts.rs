//! Alert management (AMS) endpoints under `/ams/alerts`.

use super::{int, page_args, page_params, paged_envelope, text, tool};
use crate::client::{ApiRequest, HelpdeskClient};
use fd_dispatch::{
    DeclaredType, ParamSpec, RegistryError, ToolError, ToolOutput, ToolRegistry,
};
use serde_json::json;

pub fn register(registry: &mut ToolRegistry, client: &HelpdeskClient) -> Result<(), RegistryError> {
    registry.register(tool(
        client,
        "view_alert",
        "Get an alert from Freshservice.",
        vec![int("alert_id")],
        |c, args| async move {
            let id = args.i64("alert_id")?;
            Ok(c.get(format!("/ams/alerts/{id}")).await?.into())
        },
    ))?;

    let mut list_params = vec![
        ParamSpec::optional("query", DeclaredType::Str),
        ParamSpec::with_default("order_by", DeclaredType::Str.optional(), "updated_at"),
        ParamSpec::with_default("order_type", DeclaredType::Str.optional(), "desc"),
    ];
    list_params.extend(page_params());
    registry.register(tool(
        client,
        "list_alerts",
        "List alerts from Freshservice with filtering and pagination support.",
        list_params,
        |c, args| async move {
            let (page, per_page) = page_args(&args)?;
            let order_by = args.opt_str("order_by")?.unwrap_or("updated_at");
            let order_type = args.opt_str("order_type")?.unwrap_or("desc");
            let mut request = ApiRequest::get("/ams/alerts")
                .query("order_by", order_by)
                .query("order_type", order_type);
            if let Some(query) = args.opt_str("query")?.filter(|q| !q.is_empty()) {
                request = request.query("query", query);
            }
            paged_envelope(&c, request, "alerts", page, per_page).await
        },
    ))?;

    for (name, action, done) in [
        ("acknowledge_alert", "acknowledge", "Alert acknowledged successfully"),
        ("resolve_alert", "resolve", "Alert resolved successfully"),
        ("suppress_alert", "suppress", "Alert suppressed successfully"),
        ("unsuppress_alert", "unsuppress", "Alert unsuppressed successfully"),
    ] {
        let description = format!("{} an alert in Freshservice.", capitalize(action));
        registry.register(tool(
            client,
            name,
            &description,
            vec![int("alert_id")],
            move |c, args| async move {
                let id = args.i64("alert_id")?;
                let request = ApiRequest::put_empty(format!("/ams/alerts/{id}/{action}"));
                confirm(&c, request, done).await
            },
        ))?;
    }

    registry.register(tool(
        client,
        "delete_alert",
        "Delete an alert in Freshservice.",
        vec![int("alert_id")],
        |c, args| async move {
            let id = args.i64("alert_id")?;
            let request = ApiRequest::delete(format!("/ams/alerts/{id}"));
            confirm(&c, request, "Alert deleted successfully").await
        },
    ))?;

    registry.register(tool(
        client,
        "view_alert_logs",
        "View logs for an alert in Freshservice.",
        vec![int("alert_id"), ParamSpec::optional("start_token", DeclaredType::Int)],
        |c, args| async move {
            let id = args.i64("alert_id")?;
            let mut request = ApiRequest::get(format!("/ams/alerts/{id}/logs"));
            if let Some(token) = args.opt_i64("start_token")?.filter(|t| *t != 0) {
                request = request.query("start_token", token);
            }
            Ok(c.send(request).await?.body.into())
        },
    ))?;

    registry.register(tool(
        client,
        "create_alert_note",
        "Create a note for an alert in Freshservice.",
        vec![int("alert_id"), text("description")],
        |c, args| async move {
            let id = args.i64("alert_id")?;
            let body = json!({"description": args.str("description")?});
            Ok(c.post(format!("/ams/alerts/{id}/notes"), body).await?.into())
        },
    ))?;

    let mut note_list_params = vec![int("alert_id")];
    note_list_params.extend(page_params());
    registry.register(tool(
        client,
        "list_alert_notes",
        "List all notes for an alert in Freshservice.",
        note_list_params,
        |c, args| async move {
            let id = args.i64("alert_id")?;
            let (page, per_page) = page_args(&args)?;
            let request = ApiRequest::get(format!("/ams/alerts/{id}/notes"));
            paged_envelope(&c, request, "alert_notes", page, per_page).await
        },
    ))?;

    registry.register(tool(
        client,
        "view_alert_note",
        "View a specific note for an alert in Freshservice.",
        vec![int("alert_id"), int("note_id")],
        |c, args| async move {
            let (id, note) = (args.i64("alert_id")?, args.i64("note_id")?);
            Ok(c.get(format!("/ams/alerts/{id}/notes/{note}")).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "update_alert_note",
        "Update a note for an alert in Freshservice.",
        vec![int("alert_id"), int("note_id"), text("description")],
        |c, args| async move {
            let (id, note) = (args.i64("alert_id")?, args.i64("note_id")?);
            let body = json!({"description": args.str("description")?});
            Ok(c.put(format!("/ams/alerts/{id}/notes/{note}"), body).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "delete_alert_note",
        "Delete a note for an alert in Freshservice.",
        vec![int("alert_id"), int("note_id")],
        |c, args| async move {
            let (id, note) = (args.i64("alert_id")?, args.i64("note_id")?);
            let request = ApiRequest::delete(format!("/ams/alerts/{id}/notes/{note}"));
            confirm(&c, request, "Alert note deleted successfully").await
        },
    ))?;

    Ok(())
}

/// Send a state change; a 204 answer becomes `{success, message}`.
async fn confirm(
    client: &HelpdeskClient,
    request: ApiRequest,
    message: &str,
) -> Result<ToolOutput, ToolError> {
    let response = client.send(request).await?;
    if response.is_no_content() {
        Ok(json!({"success": true, "message": message}).into())
    } else {
        Ok(response.body.into())
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
