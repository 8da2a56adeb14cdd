use thiserror::Error;

/// The only error this object model produces. Every failing path — a bad
/// argument to `to_property_descriptor`, a rejected redefinition, a frozen
/// write, a cyclic prototype chain — surfaces as a `TypeError`, matching the
/// error surface of the ECMAScript internal methods being modeled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("TypeError: {message}")]
pub struct TypeError {
    message: String,
}

impl TypeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type Result<T> = std::result::Result<T, TypeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_message() {
        let err = TypeError::new("x is not a function");
        assert_eq!(format!("{err}"), "TypeError: x is not a function");
        assert_eq!(err.message(), "x is not a function");
    }
}
