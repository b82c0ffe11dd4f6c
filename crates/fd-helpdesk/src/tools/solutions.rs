use super::{int, object, tool};
use crate::client::HelpdeskClient;
use crate::validation::require_truthy;
use fd_dispatch::{RegistryError, ToolError, ToolRegistry};
use serde_json::Value;

const NAME_REQUIRED: &str = "Name is required";

pub fn register(registry: &mut ToolRegistry, client: &HelpdeskClient) -> Result<(), RegistryError> {
    registry.register(tool(
        client,
        "list_solution_categories",
        "List all solution categories in Freshdesk.",
        vec![],
        |c, _| async move { Ok(c.get("/solutions/categories").await?.into()) },
    ))?;

    registry.register(tool(
        client,
        "view_solution_category",
        "View a solution category in Freshdesk.",
        vec![int("category_id")],
        |c, args| async move {
            let id = args.i64("category_id")?;
            Ok(c.get(format!("/solutions/categories/{id}")).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "create_solution_category",
        "Create a solution category in Freshdesk.",
        vec![object("category_fields")],
        |c, args| async move {
            let fields = args.object("category_fields")?;
            require_truthy(fields, &["name"], NAME_REQUIRED)?;
            Ok(c.post("/solutions/categories", Value::Object(fields.clone())).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "update_solution_category",
        "Update a solution category in Freshdesk.",
        vec![int("category_id"), object("category_fields")],
        |c, args| async move {
            let id = args.i64("category_id")?;
            let fields = args.object("category_fields")?;
            require_truthy(fields, &["name"], NAME_REQUIRED)?;
            let path = format!("/solutions/categories/{id}");
            Ok(c.put(path, Value::Object(fields.clone())).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "list_solution_folders",
        "List all solution folders in Freshdesk.",
        vec![int("category_id")],
        |c, args| async move {
            let id = args.i64("category_id")?;
            if id == 0 {
                return Err(ToolError::validation("Category ID is required"));
            }
            Ok(c.get(format!("/solutions/categories/{id}/folders")).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "create_solution_category_folder",
        "Create a solution category folder in Freshdesk.",
        vec![int("category_id"), object("folder_fields")],
        |c, args| async move {
            let id = args.i64("category_id")?;
            let fields = args.object("folder_fields")?;
            require_truthy(fields, &["name"], NAME_REQUIRED)?;
            let path = format!("/solutions/categories/{id}/folders");
            Ok(c.post(path, Value::Object(fields.clone())).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "view_solution_category_folder",
        "View a solution category folder in Freshdesk.",
        vec![int("folder_id")],
        |c, args| async move {
            let id = args.i64("folder_id")?;
            Ok(c.get(format!("/solutions/folders/{id}")).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "update_solution_category_folder",
        "Update a solution category folder in Freshdesk.",
        vec![int("folder_id"), object("folder_fields")],
        |c, args| async move {
            let id = args.i64("folder_id")?;
            let fields = args.object("folder_fields")?;
            require_truthy(fields, &["name"], NAME_REQUIRED)?;
            let path = format!("/solutions/folders/{id}");
            Ok(c.put(path, Value::Object(fields.clone())).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "list_solution_articles",
        "List all solution articles in Freshdesk.",
        vec![int("folder_id")],
        |c, args| async move {
            let id = args.i64("folder_id")?;
            Ok(c.get(format!("/solutions/folders/{id}/articles")).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "create_solution_article",
        "Create a solution article in Freshdesk.",
        vec![int("folder_id"), object("article_fields")],
        |c, args| async move {
            let id = args.i64("folder_id")?;
            let fields = args.object("article_fields")?;
            require_truthy(
                fields,
                &["title", "status", "description"],
                "Title, status and description are required",
            )?;
            let path = format!("/solutions/folders/{id}/articles");
            Ok(c.post(path, Value::Object(fields.clone())).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "view_solution_article",
        "View a solution article in Freshdesk.",
        vec![int("article_id")],
        |c, args| async move {
            let id = args.i64("article_id")?;
            Ok(c.get(format!("/solutions/articles/{id}")).await?.into())
        },
    ))?;

    registry.register(tool(
        client,
        "update_solution_article",
        "Update a solution article in Freshdesk.",
        vec![int("article_id"), object("article_fields")],
        |c, args| async move {
            let id = args.i64("article_id")?;
            let fields = Value::Object(args.object("article_fields")?.clone());
            Ok(c.put(format!("/solutions/articles/{id}"), fields).await?.into())
        },
    ))?;

    Ok(())
}
