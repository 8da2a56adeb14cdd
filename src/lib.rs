//! An ECMAScript object model core: property descriptors, prototype-chain
//! lookup, and the property mutation algorithms of ES5.1 §8.10 and §8.12.
//!
//! Objects hold data properties (a value plus a writable flag) and accessor
//! properties (getter/setter pairs), each with independent enumerable and
//! configurable attributes, behind a single-parent prototype chain. The
//! operations come in throwing and non-throwing flavors selected per call:
//! a rejected mutation is a `TypeError` when `throw` is true and an
//! `Ok(false)` otherwise.
//!
//! ```
//! use jsom::{JsObject, JsValue, PropertyDescriptor};
//!
//! let obj = JsObject::new();
//! obj.define_own_property(
//!     "answer",
//!     &PropertyDescriptor::data(JsValue::Number(42.0), false, true, false),
//!     true,
//! )
//! .unwrap();
//! assert!(obj.put("answer", JsValue::Number(0.0), true).is_err());
//! ```

mod descriptor;
mod error;
mod object;
mod value;

pub use descriptor::{
    OwnProperty, PropertyDescriptor, PropertyIdentifier, PropertyKind, is_accessor_descriptor,
    is_data_descriptor, is_generic_descriptor,
};
pub use error::{Result, TypeError};
pub use object::{JsObject, from_property_descriptor, to_property_descriptor};
pub use value::{JsBigInt, JsFunction, JsString, JsValue, same_value, to_boolean};
