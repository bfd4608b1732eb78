use super::object::Object;

/// A type name written after a colon. Only four names are checked; any other
/// name is accepted as-is and matches every value.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum DeclaredType {
    Int,
    String,
    Bool,
    Function,
    Other(String),
}

impl DeclaredType {
    pub fn parse(name: &str) -> DeclaredType {
        match name {
            "int" => DeclaredType::Int,
            "string" => DeclaredType::String,
            "bool" => DeclaredType::Bool,
            "function" => DeclaredType::Function,
            other => DeclaredType::Other(other.to_owned()),
        }
    }

    pub fn accepts(&self, value: &Object) -> bool {
        match self {
            DeclaredType::Int => matches!(value, Object::Integer(_)),
            DeclaredType::String => matches!(value, Object::Str(_)),
            DeclaredType::Bool => matches!(value, Object::Boolean(_)),
            // Builtins are not user functions.
            DeclaredType::Function => matches!(value, Object::Function(_)),
            DeclaredType::Other(_) => true,
        }
    }
}
