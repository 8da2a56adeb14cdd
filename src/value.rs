use std::fmt;
use std::rc::Rc;

use crate::error::{Result, TypeError};
use crate::object::JsObject;

/// A language value as seen by the object model. Property values, getter
/// results, and descriptor fields are all `JsValue`s.
#[derive(Clone, Debug)]
pub enum JsValue {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(JsString),
    BigInt(JsBigInt),
    Object(JsObject),
}

// UTF-16 code unit string per spec §6.1.4
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct JsString {
    pub code_units: Vec<u16>,
}

impl JsString {
    pub fn from_str(s: &str) -> Self {
        Self {
            code_units: s.encode_utf16().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.code_units.is_empty()
    }

    pub fn len(&self) -> usize {
        self.code_units.len()
    }

    pub fn to_rust_string(&self) -> String {
        String::from_utf16_lossy(&self.code_units)
    }
}

impl fmt::Display for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rust_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JsBigInt {
    pub value: num_bigint::BigInt,
}

impl JsBigInt {
    pub fn from_i64(n: i64) -> Self {
        Self {
            value: num_bigint::BigInt::from(n),
        }
    }
}

/// A host-provided callable. Getters and setters are `JsValue::Object`s whose
/// object carries one of these; invocation receives the `this` value and the
/// argument list and may reenter the object model freely.
pub struct JsFunction {
    name: String,
    func: Rc<dyn Fn(&JsValue, &[JsValue]) -> Result<JsValue>>,
}

impl JsFunction {
    pub fn native(
        name: impl Into<String>,
        f: impl Fn(&JsValue, &[JsValue]) -> Result<JsValue> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Rc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, this: &JsValue, args: &[JsValue]) -> Result<JsValue> {
        (self.func)(this, args)
    }
}

impl Clone for JsFunction {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            func: self.func.clone(),
        }
    }
}

impl fmt::Debug for JsFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsFunction({:?})", self.name)
    }
}

impl JsValue {
    pub fn is_undefined(&self) -> bool {
        matches!(self, JsValue::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsValue::Null)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, JsValue::Object(_))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, JsValue::Object(o) if o.is_callable())
    }

    pub fn string(s: &str) -> Self {
        JsValue::String(JsString::from_str(s))
    }

    /// Invoke this value as a function. Fails with `TypeError` when the value
    /// is not callable. The callee is cloned out of the object before the
    /// call, so the callee may reenter and mutate its own holder.
    pub fn call(&self, this: &JsValue, args: &[JsValue]) -> Result<JsValue> {
        let JsValue::Object(obj) = self else {
            return Err(TypeError::new("value is not a function"));
        };
        let func = obj
            .callable_fn()
            .ok_or_else(|| TypeError::new("object is not callable"))?;
        func.call(this, args)
    }
}

// §7.1.3 ToBoolean
pub fn to_boolean(val: &JsValue) -> bool {
    match val {
        JsValue::Undefined | JsValue::Null => false,
        JsValue::Boolean(b) => *b,
        JsValue::Number(n) => *n != 0.0 && !n.is_nan(),
        JsValue::String(s) => !s.is_empty(),
        JsValue::BigInt(b) => b.value.sign() != num_bigint::Sign::NoSign,
        JsValue::Object(_) => true,
    }
}

// §7.2.9 SameValue: NaN equals NaN, +0 and -0 are distinct, objects compare
// by identity.
pub fn same_value(x: &JsValue, y: &JsValue) -> bool {
    match (x, y) {
        (JsValue::Undefined, JsValue::Undefined) => true,
        (JsValue::Null, JsValue::Null) => true,
        (JsValue::Boolean(a), JsValue::Boolean(b)) => a == b,
        (JsValue::Number(a), JsValue::Number(b)) => same_value_number(*a, *b),
        (JsValue::String(a), JsValue::String(b)) => a == b,
        (JsValue::BigInt(a), JsValue::BigInt(b)) => a == b,
        (JsValue::Object(a), JsValue::Object(b)) => a.ptr_eq(b),
        _ => false,
    }
}

fn same_value_number(x: f64, y: f64) -> bool {
    if x.is_nan() && y.is_nan() {
        return true;
    }
    if x == 0.0 && y == 0.0 {
        return x.is_sign_positive() == y.is_sign_positive();
    }
    x == y
}

fn number_to_string(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x == 0.0 {
        return "0".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    // Use ryu for spec-compliant shortest representation
    let mut buf = ryu_js::Buffer::new();
    buf.format(x).to_string()
}

impl fmt::Display for JsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsValue::Undefined => write!(f, "undefined"),
            JsValue::Null => write!(f, "null"),
            JsValue::Boolean(b) => write!(f, "{b}"),
            JsValue::Number(n) => write!(f, "{}", number_to_string(*n)),
            JsValue::String(s) => write!(f, "{s}"),
            JsValue::BigInt(b) => write!(f, "{}n", b.value),
            JsValue::Object(_) => write!(f, "[object Object]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_boolean_basics() {
        assert!(!to_boolean(&JsValue::Undefined));
        assert!(!to_boolean(&JsValue::Null));
        assert!(!to_boolean(&JsValue::Number(0.0)));
        assert!(!to_boolean(&JsValue::Number(f64::NAN)));
        assert!(to_boolean(&JsValue::Number(1.5)));
        assert!(!to_boolean(&JsValue::string("")));
        assert!(to_boolean(&JsValue::string("x")));
        assert!(!to_boolean(&JsValue::BigInt(JsBigInt::from_i64(0))));
        assert!(to_boolean(&JsValue::BigInt(JsBigInt::from_i64(-3))));
        assert!(to_boolean(&JsValue::Object(JsObject::new())));
    }

    #[test]
    fn same_value_numbers() {
        assert!(same_value(
            &JsValue::Number(f64::NAN),
            &JsValue::Number(f64::NAN)
        ));
        assert!(!same_value(&JsValue::Number(0.0), &JsValue::Number(-0.0)));
        assert!(same_value(&JsValue::Number(2.5), &JsValue::Number(2.5)));
    }

    #[test]
    fn same_value_objects_by_identity() {
        let a = JsObject::new();
        let b = JsObject::new();
        assert!(same_value(
            &JsValue::Object(a.clone()),
            &JsValue::Object(a.clone())
        ));
        assert!(!same_value(&JsValue::Object(a), &JsValue::Object(b)));
    }

    #[test]
    fn same_value_mixed_types() {
        assert!(!same_value(&JsValue::Number(0.0), &JsValue::Boolean(false)));
        assert!(!same_value(&JsValue::Undefined, &JsValue::Null));
        assert!(same_value(&JsValue::string("ab"), &JsValue::string("ab")));
    }

    #[test]
    fn call_non_callable_fails() {
        assert!(JsValue::Null.call(&JsValue::Undefined, &[]).is_err());
        let plain = JsValue::Object(JsObject::new());
        assert!(!plain.is_callable());
        assert!(plain.call(&JsValue::Undefined, &[]).is_err());
    }

    #[test]
    fn display_values() {
        assert_eq!(format!("{}", JsValue::Undefined), "undefined");
        assert_eq!(format!("{}", JsValue::Number(42.0)), "42");
        assert_eq!(format!("{}", JsValue::Number(f64::NAN)), "NaN");
        assert_eq!(format!("{}", JsValue::string("hi")), "hi");
    }
}
