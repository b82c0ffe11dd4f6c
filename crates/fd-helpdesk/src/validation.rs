//! Client-side checks run before a request reaches the API.
//!
//! Every failure is a [`ToolError::Validation`], so the caller sees it as a
//! tool execution error.

use fd_dispatch::ToolError;
use serde_json::{Map, Value};

pub const MAX_PER_PAGE: i64 = 100;

macro_rules! coded_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $code:literal => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn code(self) -> i64 {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            pub fn from_code(code: i64) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.code() == code)
            }
        }
    };
}

coded_enum!(
    /// Channel a ticket came in through.
    TicketSource {
        Email = 1 => "EMAIL",
        Portal = 2 => "PORTAL",
        Phone = 3 => "PHONE",
        Chat = 7 => "CHAT",
        FeedbackWidget = 9 => "FEEDBACK_WIDGET",
        OutboundEmail = 10 => "OUTBOUND_EMAIL",
    }
);

coded_enum!(TicketStatus {
    Open = 2 => "OPEN",
    Pending = 3 => "PENDING",
    Resolved = 4 => "RESOLVED",
    Closed = 5 => "CLOSED",
});

coded_enum!(TicketPriority {
    Low = 1 => "LOW",
    Medium = 2 => "MEDIUM",
    High = 3 => "HIGH",
    Urgent = 4 => "URGENT",
});

coded_enum!(
    /// Which tickets an agent may see.
    AgentTicketScope {
        GlobalAccess = 1 => "GLOBAL_ACCESS",
        GroupAccess = 2 => "GROUP_ACCESS",
        RestrictedAccess = 3 => "RESTRICTED_ACCESS",
    }
);

/// Escalation windows accepted for a group's `unassigned_for`.
pub const UNASSIGNED_FOR: &[&str] = &["30m", "1h", "2h", "4h", "8h", "12h", "1d", "2d", "3d"];

pub const CONTACT_FIELD_TYPES: &[&str] = &[
    "custom_text",
    "custom_paragraph",
    "custom_checkbox",
    "custom_number",
    "custom_dropdown",
    "custom_phone_number",
    "custom_url",
    "custom_date",
];

pub fn check_page(page: i64, per_page: i64) -> Result<(), ToolError> {
    if page < 1 {
        return Err(ToolError::validation("Page number must be greater than 0"));
    }
    if !(1..=MAX_PER_PAGE).contains(&per_page) {
        return Err(ToolError::validation("Page size must be between 1 and 100"));
    }
    Ok(())
}

/// Loose presence test: null, `false`, `0`, `""`, `[]` and `{}` count as absent.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

pub fn require_truthy(fields: &Map<String, Value>, names: &[&str], message: &str) -> Result<(), ToolError> {
    if names.iter().all(|n| is_truthy(fields.get(*n))) {
        Ok(())
    } else {
        Err(ToolError::validation(message))
    }
}

pub fn check_agent_fields(fields: &Map<String, Value>) -> Result<(), ToolError> {
    require_truthy(
        fields,
        &["email", "ticket_scope"],
        "Missing mandatory fields. Both 'email' and 'ticket_scope' are required.",
    )?;
    let scope = fields.get("ticket_scope").and_then(Value::as_i64);
    if scope.and_then(AgentTicketScope::from_code).is_none() {
        let labels: Vec<&str> = AgentTicketScope::ALL.iter().map(|s| s.label()).collect();
        return Err(ToolError::validation(format!(
            "Invalid value for ticket_scope. Must be one of: {}",
            labels.join(", ")
        )));
    }
    Ok(())
}

/// Validated body for creating or updating a group. Unknown keys are dropped.
pub fn group_payload(fields: &Map<String, Value>) -> Result<Value, ToolError> {
    let f = Fields(fields);
    let mut out = Map::new();

    out.insert("name".into(), f.required_str("name")?.into());
    f.copy_opt_str("description", &mut out)?;
    if let Some(ids) = f.opt_int_list("agent_ids")? {
        out.insert("agent_ids".into(), ids.into());
    }

    let auto_assign = f.opt_int("auto_ticket_assign")?.unwrap_or(0);
    if !(0..=1).contains(&auto_assign) {
        return Err(invalid("auto_ticket_assign", "must be 0 or 1"));
    }
    out.insert("auto_ticket_assign".into(), auto_assign.into());

    if let Some(escalate_to) = f.opt_int("escalate_to")? {
        out.insert("escalate_to".into(), escalate_to.into());
    }

    let unassigned_for = f.opt_str("unassigned_for")?.unwrap_or("30m");
    if !UNASSIGNED_FOR.contains(&unassigned_for) {
        return Err(invalid(
            "unassigned_for",
            &format!("must be one of {}", UNASSIGNED_FOR.join(", ")),
        ));
    }
    out.insert("unassigned_for".into(), unassigned_for.into());

    Ok(Value::Object(out))
}

/// Validated body for a new contact field, with defaults filled in.
pub fn contact_field_payload(fields: &Map<String, Value>) -> Result<Value, ToolError> {
    let f = Fields(fields);
    let mut out = Map::new();

    out.insert("label".into(), f.required_str("label")?.into());
    out.insert(
        "label_for_customers".into(),
        f.required_str("label_for_customers")?.into(),
    );

    let field_type = f.required_str("type")?;
    if !CONTACT_FIELD_TYPES.contains(&field_type) {
        return Err(invalid(
            "type",
            &format!("must be one of {}", CONTACT_FIELD_TYPES.join(", ")),
        ));
    }
    out.insert("type".into(), field_type.into());

    out.insert(
        "editable_in_signup".into(),
        f.bool_or("editable_in_signup", false)?.into(),
    );
    out.insert("position".into(), f.opt_int("position")?.unwrap_or(1).into());
    for flag in [
        "required_for_agents",
        "customers_can_edit",
        "required_for_customers",
        "displayed_for_customers",
    ] {
        out.insert(flag.into(), f.bool_or(flag, false)?.into());
    }

    if let Some(choices) = f.opt_array("choices")? {
        if choices.iter().any(|c| !c.is_object()) {
            return Err(invalid("choices", "every choice must be an object"));
        }
        out.insert("choices".into(), Value::Array(choices.to_vec()));
    }

    Ok(Value::Object(out))
}

pub fn canned_response_payload(fields: &Map<String, Value>) -> Result<Value, ToolError> {
    let f = Fields(fields);
    let mut out = Map::new();

    out.insert("title".into(), f.required_str("title")?.into());
    out.insert("content_html".into(), f.required_str("content_html")?.into());
    out.insert("folder_id".into(), f.required_int("folder_id")?.into());

    let visibility = f.required_int("visibility")?;
    if !(0..=2).contains(&visibility) {
        return Err(invalid("visibility", "must be 0, 1 or 2"));
    }
    out.insert("visibility".into(), visibility.into());

    if let Some(ids) = f.opt_int_list("group_ids")? {
        out.insert("group_ids".into(), ids.into());
    }

    Ok(Value::Object(out))
}

fn invalid(field: &str, problem: &str) -> ToolError {
    ToolError::validation(format!("Validation error: {field}: {problem}"))
}

struct Fields<'a>(&'a Map<String, Value>);

impl Fields<'_> {
    fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    fn opt_str(&self, name: &str) -> Result<Option<&str>, ToolError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(invalid(name, "must be a string")),
        }
    }

    fn required_str(&self, name: &str) -> Result<&str, ToolError> {
        self.opt_str(name)?
            .ok_or_else(|| invalid(name, "field required"))
    }

    fn copy_opt_str(&self, name: &str, out: &mut Map<String, Value>) -> Result<(), ToolError> {
        if let Some(s) = self.opt_str(name)? {
            out.insert(name.into(), s.into());
        }
        Ok(())
    }

    fn opt_int(&self, name: &str) -> Result<Option<i64>, ToolError> {
        match self.get(name) {
            None => Ok(None),
            Some(v) => as_int(v).map(Some).ok_or_else(|| invalid(name, "must be an integer")),
        }
    }

    fn required_int(&self, name: &str) -> Result<i64, ToolError> {
        self.opt_int(name)?
            .ok_or_else(|| invalid(name, "field required"))
    }

    fn bool_or(&self, name: &str, default: bool) -> Result<bool, ToolError> {
        match self.get(name) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(invalid(name, "must be a boolean")),
        }
    }

    fn opt_array(&self, name: &str) -> Result<Option<&Vec<Value>>, ToolError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(_) => Err(invalid(name, "must be a list")),
        }
    }

    fn opt_int_list(&self, name: &str) -> Result<Option<Vec<i64>>, ToolError> {
        let Some(items) = self.opt_array(name)? else {
            return Ok(None);
        };
        items
            .iter()
            .map(|v| as_int(v).ok_or_else(|| invalid(name, "must be a list of integers")))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
