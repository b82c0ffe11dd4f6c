use crate::error::SchemaError;
use crate::tool::{DeclaredType, ToolDescriptor};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Coarse JSON Schema type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub type_tag: TypeTag,
}

/// Parameter schemas keyed by name, serialized in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(Vec<(String, PropertySchema)>);

impl Properties {
    /// Add or replace `name`, keeping its first position.
    pub fn insert(&mut self, name: String, schema: PropertySchema) {
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = schema,
            None => self.0.push((name, schema)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropertySchema> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, schema) in &self.0 {
            map.serialize_entry(name, schema)?;
        }
        map.end()
    }
}

/// `inputSchema` of one tool.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct InputSchema {
    #[serde(rename = "type")]
    pub schema_type: &'static str,
    pub properties: Properties,
    pub required: Vec<String>,
}

/// Map a declared type to its tag. Optional wrappers are peeled first;
/// unions and unannotated parameters are treated as strings.
pub fn map_type(declared: &DeclaredType) -> Result<TypeTag, SchemaError> {
    match declared {
        DeclaredType::Str => Ok(TypeTag::String),
        DeclaredType::Int => Ok(TypeTag::Integer),
        DeclaredType::Float => Ok(TypeTag::Number),
        DeclaredType::Bool => Ok(TypeTag::Boolean),
        DeclaredType::Map => Ok(TypeTag::Object),
        DeclaredType::List => Ok(TypeTag::Array),
        DeclaredType::Optional(inner) => map_type(inner),
        DeclaredType::Union(_) | DeclaredType::Unannotated => Ok(TypeTag::String),
        DeclaredType::Named(type_name) => Err(SchemaError {
            type_name: type_name.clone(),
        }),
    }
}

/// Build the input schema for a tool. Parameters whose type cannot be
/// mapped are logged and advertised as `string`.
pub fn synthesize(descriptor: &ToolDescriptor) -> InputSchema {
    let mut properties = Properties::default();
    let mut required = Vec::new();

    for param in descriptor.parameters() {
        let type_tag = map_type(&param.declared).unwrap_or_else(|e| {
            tracing::error!(
                "Schema for tool '{}', parameter '{}': {e}; advertising as string",
                descriptor.name(),
                param.name
            );
            TypeTag::String
        });
        properties.insert(param.name.clone(), PropertySchema { type_tag });
        if param.is_required() {
            required.push(param.name.clone());
        }
    }

    InputSchema {
        schema_type: "object",
        properties,
        required,
    }
}
