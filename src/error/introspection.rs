use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntrospectionError {
    #[error("type not found: {name}")]
    TypeNotFound { name: String },
}

impl IntrospectionError {
    pub fn type_not_found(name: impl Into<String>) -> Self {
        Self::TypeNotFound { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_not_found_display() {
        let err = IntrospectionError::type_not_found("App\\Models\\User");
        assert_eq!(err.to_string(), "type not found: App\\Models\\User");
    }
}
