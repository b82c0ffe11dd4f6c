use crate::error::ToolError;
use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Longest description surfaced through `tools/list`, in characters.
pub const DESCRIPTION_LIMIT: usize = 200;

/// Parameter type as a tool author declares it.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclaredType {
    Str,
    Int,
    Float,
    Bool,
    Map,
    List,
    Optional(Box<DeclaredType>),
    /// Accepts several types, e.g. an integer code or its string form.
    Union(Vec<DeclaredType>),
    /// A domain type the schema table knows nothing about.
    Named(String),
    Unannotated,
}

impl DeclaredType {
    pub fn optional(self) -> Self {
        Self::Optional(Box::new(self))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub declared: DeclaredType,
    /// `None` means no default, i.e. the parameter is required.
    /// `Some(Value::Null)` is a real default of null.
    pub default: Option<Value>,
}

impl ParamSpec {
    pub fn required(name: impl Into<String>, declared: DeclaredType) -> Self {
        Self {
            name: name.into(),
            declared,
            default: None,
        }
    }

    pub fn with_default(name: impl Into<String>, declared: DeclaredType, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            declared,
            default: Some(default.into()),
        }
    }

    /// `Optional[inner]` defaulting to null.
    pub fn optional(name: impl Into<String>, inner: DeclaredType) -> Self {
        Self::with_default(name, inner.optional(), Value::Null)
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// What a handler hands back: plain text or structured JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Text(String),
    Structured(Value),
}

impl From<String> for ToolOutput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for ToolOutput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Value> for ToolOutput {
    fn from(value: Value) -> Self {
        Self::Structured(value)
    }
}

/// Named arguments passed to a handler, after defaults have been applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Accept a JSON object; `null` (argument list omitted) becomes `{}`.
    pub fn from_value(value: Value) -> Result<Self, ToolError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ToolError::ArgumentsNotObject),
        }
    }

    /// Present and non-null value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn str(&self, name: &str) -> Result<&str, ToolError> {
        self.opt_str(name)?
            .ok_or_else(|| ToolError::MissingArgument(name.to_string()))
    }

    pub fn opt_str(&self, name: &str) -> Result<Option<&str>, ToolError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(invalid(name, "a string")),
        }
    }

    pub fn i64(&self, name: &str) -> Result<i64, ToolError> {
        self.opt_i64(name)?
            .ok_or_else(|| ToolError::MissingArgument(name.to_string()))
    }

    /// Integers are also accepted in their decimal string form.
    pub fn opt_i64(&self, name: &str) -> Result<Option<i64>, ToolError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(|| invalid(name, "an integer")),
            Some(Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| invalid(name, "an integer")),
            Some(_) => Err(invalid(name, "an integer")),
        }
    }

    pub fn object(&self, name: &str) -> Result<&Map<String, Value>, ToolError> {
        self.opt_object(name)?
            .ok_or_else(|| ToolError::MissingArgument(name.to_string()))
    }

    pub fn opt_object(&self, name: &str) -> Result<Option<&Map<String, Value>>, ToolError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(_) => Err(invalid(name, "an object")),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

fn invalid(name: &str, expected: &'static str) -> ToolError {
    ToolError::InvalidArgument {
        name: name.to_string(),
        expected,
    }
}

/// The callable behind a tool.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, args: Arguments) -> Result<ToolOutput, ToolError>;
}

struct FnHandler<F>(F);

#[async_trait::async_trait]
impl<F, Fut> ToolHandler for FnHandler<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ToolOutput, ToolError>> + Send + 'static,
{
    async fn call(&self, args: Arguments) -> Result<ToolOutput, ToolError> {
        (self.0)(args).await
    }
}

/// Wrap an async closure as a [`ToolHandler`].
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn ToolHandler>
where
    F: Fn(Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ToolOutput, ToolError>> + Send + 'static,
{
    Arc::new(FnHandler(f))
}

/// A registered tool: dispatch key, description, declared parameters, handler.
#[derive(Clone)]
pub struct ToolDescriptor {
    name: String,
    description: Option<String>,
    parameters: Vec<ParamSpec>,
    handler: Arc<dyn ToolHandler>,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, handler: Arc<dyn ToolHandler>) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters: Vec::new(),
            handler,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_param(mut self, param: ParamSpec) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn with_params(mut self, params: impl IntoIterator<Item = ParamSpec>) -> Self {
        self.parameters.extend(params);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[ParamSpec] {
        &self.parameters
    }

    pub fn handler(&self) -> Arc<dyn ToolHandler> {
        Arc::clone(&self.handler)
    }

    /// Description as shown to clients: `"Tool: <name>"` when none was given,
    /// cut to [`DESCRIPTION_LIMIT`] characters.
    pub fn surfaced_description(&self) -> String {
        match self.description.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.chars().take(DESCRIPTION_LIMIT).collect(),
            _ => format!("Tool: {}", self.name).chars().take(DESCRIPTION_LIMIT).collect(),
        }
    }

    /// Turn raw `arguments` into handler input: fill declared defaults for
    /// omitted parameters and reject omitted required ones. Undeclared keys
    /// are passed through untouched.
    pub fn bind_arguments(&self, raw: Value) -> Result<Arguments, ToolError> {
        let mut map = Arguments::from_value(raw)?.into_map();

        for param in &self.parameters {
            let supplied = map.get(&param.name).is_some_and(|v| !v.is_null());
            if supplied {
                continue;
            }
            match &param.default {
                Some(default) => {
                    map.insert(param.name.clone(), default.clone());
                }
                None => return Err(ToolError::MissingArgument(param.name.clone())),
            }
        }

        Ok(Arguments::new(map))
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn noop() -> Arc<dyn ToolHandler> {
        handler_fn(|_args| async { Ok(ToolOutput::from("ok")) })
    }

    #[test]
    fn test_default_description() {
        let tool = ToolDescriptor::new("get_ticket", noop());
        assert_eq!(tool.surfaced_description(), "Tool: get_ticket");
    }

    #[test]
    fn test_description_truncated_on_char_boundary() {
        let long = "é".repeat(250);
        let tool = ToolDescriptor::new("t", noop()).with_description(long);
        let surfaced = tool.surfaced_description();
        assert_eq!(surfaced.chars().count(), DESCRIPTION_LIMIT);
    }

    #[test]
    fn test_bind_fills_defaults() {
        let tool = ToolDescriptor::new("get_tickets", noop())
            .with_param(ParamSpec::with_default("page", DeclaredType::Int.optional(), 1))
            .with_param(ParamSpec::optional("query", DeclaredType::Str));
        let args = tool.bind_arguments(json!({})).unwrap();
        assert_eq!(args.as_map().get("page"), Some(&json!(1)));
        assert_eq!(args.as_map().get("query"), Some(&Value::Null));
        assert_eq!(args.opt_str("query").unwrap(), None);
    }

    #[test]
    fn test_bind_rejects_missing_required() {
        let tool = ToolDescriptor::new("get_ticket", noop())
            .with_param(ParamSpec::required("ticket_id", DeclaredType::Int));
        let err = tool.bind_arguments(json!({"other": 1})).unwrap_err();
        assert!(matches!(err, ToolError::MissingArgument(ref n) if n == "ticket_id"));
    }

    #[test]
    fn test_bind_rejects_non_object() {
        let tool = ToolDescriptor::new("t", noop());
        assert!(matches!(
            tool.bind_arguments(json!([1, 2])),
            Err(ToolError::ArgumentsNotObject)
        ));
        assert!(tool.bind_arguments(Value::Null).is_ok());
    }

    #[test]
    fn test_integer_coercion() {
        let args = Arguments::from_value(json!({"a": 5, "b": " 42 ", "c": "x", "d": 1.5})).unwrap();
        assert_eq!(args.i64("a").unwrap(), 5);
        assert_eq!(args.i64("b").unwrap(), 42);
        assert!(matches!(args.i64("c"), Err(ToolError::InvalidArgument { .. })));
        assert!(matches!(args.i64("d"), Err(ToolError::InvalidArgument { .. })));
        assert!(matches!(args.i64("missing"), Err(ToolError::MissingArgument(_))));
    }

    #[tokio::test]
    async fn test_handler_fn_invokes_closure() {
        let handler = handler_fn(|args: Arguments| async move {
            let text = args.str("text")?.to_uppercase();
            Ok(ToolOutput::Text(text))
        });
        let args = Arguments::from_value(json!({"text": "hi"})).unwrap();
        assert_eq!(handler.call(args).await.unwrap(), ToolOutput::Text("HI".into()));
    }
}
