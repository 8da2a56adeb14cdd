use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::descriptor::{OwnProperty, PropertyDescriptor, PropertyIdentifier, PropertyKind};
use crate::error::{Result, TypeError};
use crate::value::{JsFunction, JsValue, same_value, to_boolean};

/// Backing storage of an object: the own-property table (with insertion
/// order kept separately, since the table itself is unordered), the
/// prototype link, and the extensible flag.
struct JsObjectData {
    properties: FxHashMap<String, OwnProperty>,
    property_order: Vec<String>,
    prototype: Option<JsObject>,
    extensible: bool,
    callable: Option<JsFunction>,
}

impl JsObjectData {
    fn new() -> Self {
        Self {
            properties: FxHashMap::default(),
            property_order: Vec::new(),
            prototype: None,
            extensible: true,
            callable: None,
        }
    }
}

/// A shared handle to an object. Cloning the handle aliases the same
/// object; prototype links hold one of these, so a prototype is shared by
/// its children rather than owned by any of them.
#[derive(Clone)]
pub struct JsObject {
    inner: Rc<RefCell<JsObjectData>>,
}

impl fmt::Debug for JsObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Shallow on purpose: prototype links may alias arbitrarily.
        write!(f, "JsObject({:p})", Rc::as_ptr(&self.inner))
    }
}

impl Default for JsObject {
    fn default() -> Self {
        Self::new()
    }
}

fn reject(throw: bool, message: String) -> Result<bool> {
    if throw {
        Err(TypeError::new(message))
    } else {
        Ok(false)
    }
}

impl JsObject {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(JsObjectData::new())),
        }
    }

    pub fn with_prototype(proto: &JsObject) -> Self {
        let obj = Self::new();
        obj.inner.borrow_mut().prototype = Some(proto.clone());
        obj
    }

    /// A callable object wrapping a native function, usable as a getter,
    /// setter, or plain function value.
    pub fn function(
        name: impl Into<String>,
        f: impl Fn(&JsValue, &[JsValue]) -> Result<JsValue> + 'static,
    ) -> Self {
        let obj = Self::new();
        obj.inner.borrow_mut().callable = Some(JsFunction::native(name, f));
        obj
    }

    pub fn ptr_eq(&self, other: &JsObject) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn prototype(&self) -> Option<JsObject> {
        self.inner.borrow().prototype.clone()
    }

    pub fn set_prototype(&self, proto: Option<JsObject>) {
        self.inner.borrow_mut().prototype = proto;
    }

    pub fn is_extensible(&self) -> bool {
        self.inner.borrow().extensible
    }

    /// Clears the extensible flag. One-way: there is no way to make an
    /// object extensible again.
    pub fn prevent_extensions(&self) {
        self.inner.borrow_mut().extensible = false;
    }

    pub fn is_callable(&self) -> bool {
        self.inner.borrow().callable.is_some()
    }

    pub(crate) fn callable_fn(&self) -> Option<JsFunction> {
        self.inner.borrow().callable.clone()
    }

    pub fn has_own_property(&self, key: &str) -> bool {
        self.inner.borrow().properties.contains_key(key)
    }

    /// Own property keys in insertion order.
    pub fn own_property_names(&self) -> Vec<String> {
        self.inner.borrow().property_order.clone()
    }

    /// Enumerable own property keys in insertion order.
    pub fn enumerable_own_property_names(&self) -> Vec<String> {
        let data = self.inner.borrow();
        data.property_order
            .iter()
            .filter(|k| data.properties.get(*k).is_some_and(|p| p.enumerable))
            .cloned()
            .collect()
    }

    /// Insert a writable/enumerable/configurable data property, replacing
    /// any existing one unconditionally. Convenience for building objects;
    /// goes around the reconciliation rules on purpose.
    pub fn insert_value(&self, key: &str, value: JsValue) {
        let data = &mut *self.inner.borrow_mut();
        if !data.properties.contains_key(key) {
            data.property_order.push(key.to_string());
        }
        data.properties.insert(
            key.to_string(),
            OwnProperty::from_descriptor(&PropertyDescriptor::data_default(value)),
        );
    }

    // §8.12.1 [[GetOwnProperty]]: a fully populated snapshot of the own
    // property, or None. Mutating the snapshot never affects the object.
    pub fn get_own_property(&self, key: &str) -> Option<PropertyDescriptor> {
        self.inner
            .borrow()
            .properties
            .get(key)
            .map(OwnProperty::to_descriptor)
    }

    // §8.12.2 [[GetProperty]]: own lookup, then the prototype chain. The
    // chain is assumed acyclic but not trusted: a revisited object is a
    // TypeError rather than an infinite walk.
    pub fn get_property(&self, key: &str) -> Result<Option<PropertyDescriptor>> {
        let mut visited: Vec<*const RefCell<JsObjectData>> = Vec::new();
        let mut obj = self.clone();
        loop {
            let ptr = Rc::as_ptr(&obj.inner);
            if visited.contains(&ptr) {
                return Err(TypeError::new(format!(
                    "cyclic prototype chain while looking up '{key}'"
                )));
            }
            visited.push(ptr);
            if let Some(desc) = obj.get_own_property(key) {
                return Ok(Some(desc));
            }
            let proto = obj.inner.borrow().prototype.clone();
            match proto {
                Some(p) => obj = p,
                None => return Ok(None),
            }
        }
    }

    // §8.12.3 [[Get]]. A getter runs with this object as receiver, even
    // when the accessor lives on a prototype. No borrow is held across the
    // getter call, so the getter may mutate this object, including the
    // property being read.
    pub fn get(&self, key: &str) -> Result<JsValue> {
        let Some(desc) = self.get_property(key)? else {
            return Ok(JsValue::Undefined);
        };
        if desc.is_accessor_descriptor() {
            match desc.get {
                Some(ref getter) if !getter.is_undefined() => {
                    getter.call(&JsValue::Object(self.clone()), &[])
                }
                _ => Ok(JsValue::Undefined),
            }
        } else {
            Ok(desc.value.unwrap_or(JsValue::Undefined))
        }
    }

    // §8.12.6 [[HasProperty]]
    pub fn has_property(&self, key: &str) -> Result<bool> {
        Ok(self.get_property(key)?.is_some())
    }

    // §8.12.4 [[CanPut]]: whether a Put may proceed, without mutating
    // anything. An own property decides alone; otherwise the inherited
    // descriptor and the extensible flag decide together.
    pub fn can_put(&self, key: &str) -> Result<bool> {
        if let Some(own) = self.get_own_property(key) {
            return Ok(if own.is_accessor_descriptor() {
                own.set.as_ref().is_some_and(|s| !s.is_undefined())
            } else {
                own.writable.unwrap_or(false)
            });
        }
        let (proto, extensible) = {
            let data = self.inner.borrow();
            (data.prototype.clone(), data.extensible)
        };
        let Some(proto) = proto else {
            return Ok(extensible);
        };
        match proto.get_property(key)? {
            None => Ok(extensible),
            Some(inherited) if inherited.is_accessor_descriptor() => {
                Ok(inherited.set.as_ref().is_some_and(|s| !s.is_undefined()))
            }
            Some(inherited) => Ok(extensible && inherited.writable.unwrap_or(false)),
        }
    }

    // §8.12.5 [[Put]]. Writing over an own data property goes through the
    // full define_own_property reconciliation with a value-only descriptor,
    // so only [[Value]] changes. An inherited (or own) accessor gets its
    // setter invoked with this object as receiver. Anything else creates a
    // new own data property with all attributes true.
    pub fn put(&self, key: &str, value: JsValue, throw: bool) -> Result<bool> {
        if !self.can_put(key)? {
            return reject(throw, format!("cannot assign to read-only property '{key}'"));
        }
        if let Some(own) = self.get_own_property(key)
            && own.is_data_descriptor()
        {
            return self.define_own_property(key, &PropertyDescriptor::value_only(value), throw);
        }
        if let Some(desc) = self.get_property(key)?
            && desc.is_accessor_descriptor()
        {
            // CanPut already established the setter is defined.
            if let Some(setter) = desc.set.clone().filter(|s| !s.is_undefined()) {
                setter.call(&JsValue::Object(self.clone()), &[value])?;
            }
            return Ok(true);
        }
        self.define_own_property(key, &PropertyDescriptor::data_default(value), throw)
    }

    // §8.12.7 [[Delete]]: removal is gated on [[Configurable]]; a missing
    // property deletes successfully.
    pub fn delete(&self, key: &str, throw: bool) -> Result<bool> {
        let data = &mut *self.inner.borrow_mut();
        let configurable = match data.properties.get(key) {
            None => return Ok(true),
            Some(p) => p.configurable,
        };
        if !configurable {
            return reject(
                throw,
                format!("cannot delete non-configurable property '{key}'"),
            );
        }
        data.properties.remove(key);
        data.property_order.retain(|k| k != key);
        Ok(true)
    }

    // §8.12.9 [[DefineOwnProperty]]: create or reconcile the own property
    // `key` against the (possibly partial) `desc`, honoring configurability
    // locks. Reject means TypeError when `throw`, Ok(false) otherwise.
    pub fn define_own_property(
        &self,
        key: &str,
        desc: &PropertyDescriptor,
        throw: bool,
    ) -> Result<bool> {
        let data = &mut *self.inner.borrow_mut();
        let Some(current) = data.properties.get_mut(key) else {
            if !data.extensible {
                return reject(
                    throw,
                    format!("cannot define property '{key}': object is not extensible"),
                );
            }
            data.property_order.push(key.to_string());
            data.properties
                .insert(key.to_string(), OwnProperty::from_descriptor(desc));
            return Ok(true);
        };

        // Redefinition with no fields, or with every present field equal to
        // the current one, always succeeds, non-configurable or not.
        if desc.is_empty() || current.matches(desc) {
            return Ok(true);
        }

        if !current.configurable {
            if desc.configurable == Some(true) {
                return reject(
                    throw,
                    format!("cannot redefine property '{key}' as configurable"),
                );
            }
            if let Some(e) = desc.enumerable
                && e != current.enumerable
            {
                return reject(
                    throw,
                    format!("cannot change enumerability of non-configurable property '{key}'"),
                );
            }
        }

        if desc.is_generic_descriptor() {
            // Only enumerable/configurable can change; no kind checks apply.
        } else if current.is_data() != desc.is_data_descriptor() {
            // Data <-> accessor conversion. The new kind starts from its
            // attribute defaults; enumerable/configurable carry over.
            if !current.configurable {
                return reject(
                    throw,
                    format!("cannot convert non-configurable property '{key}'"),
                );
            }
            current.kind = if desc.is_accessor_descriptor() {
                PropertyKind::Accessor {
                    get: JsValue::Undefined,
                    set: JsValue::Undefined,
                }
            } else {
                PropertyKind::Data {
                    value: JsValue::Undefined,
                    writable: false,
                }
            };
        } else if let PropertyKind::Data { value, writable } = &current.kind {
            if !current.configurable && !*writable {
                if desc.writable == Some(true) {
                    return reject(
                        throw,
                        format!("cannot make non-writable property '{key}' writable"),
                    );
                }
                if let Some(v) = &desc.value
                    && !same_value(v, value)
                {
                    return reject(
                        throw,
                        format!("cannot change value of non-writable property '{key}'"),
                    );
                }
            }
        } else if let PropertyKind::Accessor { get, set } = &current.kind
            && !current.configurable
        {
            if let Some(s) = &desc.set
                && !same_value(s, set)
            {
                return reject(
                    throw,
                    format!("cannot change setter of non-configurable property '{key}'"),
                );
            }
            if let Some(g) = &desc.get
                && !same_value(g, get)
            {
                return reject(
                    throw,
                    format!("cannot change getter of non-configurable property '{key}'"),
                );
            }
        }

        current.apply(desc);
        Ok(true)
    }

    /// Define several properties in order; the first reject wins and later
    /// identifiers are not attempted.
    pub fn define_own_properties<I>(&self, props: I, throw: bool) -> Result<bool>
    where
        I: IntoIterator<Item = PropertyIdentifier>,
    {
        for prop in props {
            if !self.define_own_property(&prop.name, &prop.descriptor, throw)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

// §8.10.5 ToPropertyDescriptor: read a descriptor out of a property-bag
// object. Field presence is a full [[HasProperty]] check, so inherited
// fields count; the three flag fields are coerced to boolean; value, get,
// and set are taken as-is. Absent fields stay absent.
pub fn to_property_descriptor(val: &JsValue) -> Result<PropertyDescriptor> {
    let JsValue::Object(obj) = val else {
        return Err(TypeError::new("property descriptor must be an object"));
    };
    let mut desc = PropertyDescriptor::default();
    if obj.has_property("enumerable")? {
        desc.enumerable = Some(to_boolean(&obj.get("enumerable")?));
    }
    if obj.has_property("configurable")? {
        desc.configurable = Some(to_boolean(&obj.get("configurable")?));
    }
    if obj.has_property("value")? {
        desc.value = Some(obj.get("value")?);
    }
    if obj.has_property("writable")? {
        desc.writable = Some(to_boolean(&obj.get("writable")?));
    }
    if obj.has_property("get")? {
        let getter = obj.get("get")?;
        if !getter.is_undefined() && !getter.is_callable() {
            return Err(TypeError::new("getter must be callable or undefined"));
        }
        desc.get = Some(getter);
    }
    if obj.has_property("set")? {
        let setter = obj.get("set")?;
        if !setter.is_undefined() && !setter.is_callable() {
            return Err(TypeError::new("setter must be callable or undefined"));
        }
        desc.set = Some(setter);
    }
    if (desc.get.is_some() || desc.set.is_some())
        && (desc.value.is_some() || desc.writable.is_some())
    {
        return Err(TypeError::new(
            "property descriptor cannot mix value or writable with get or set",
        ));
    }
    Ok(desc)
}

// §8.10.4 FromPropertyDescriptor: reify a descriptor as a fresh plain
// object. Exactly one of {value, writable} or {get, set} is installed,
// chosen by the descriptor's kind, plus enumerable and configurable; each
// field is a writable/enumerable/configurable data property. The caller is
// expected to pass a fully populated descriptor.
pub fn from_property_descriptor(desc: Option<&PropertyDescriptor>) -> JsValue {
    let Some(desc) = desc else {
        return JsValue::Undefined;
    };
    let obj = JsObject::new();
    let install = |name: &str, value: JsValue| {
        let _ = obj.define_own_property(name, &PropertyDescriptor::data_default(value), false);
    };
    if desc.is_data_descriptor() {
        install("value", desc.value.clone().unwrap_or(JsValue::Undefined));
        install("writable", JsValue::Boolean(desc.writable.unwrap_or(false)));
    } else {
        install("get", desc.get.clone().unwrap_or(JsValue::Undefined));
        install("set", desc.set.clone().unwrap_or(JsValue::Undefined));
    }
    install(
        "enumerable",
        JsValue::Boolean(desc.enumerable.unwrap_or(false)),
    );
    install(
        "configurable",
        JsValue::Boolean(desc.configurable.unwrap_or(false)),
    );
    JsValue::Object(obj)
}
