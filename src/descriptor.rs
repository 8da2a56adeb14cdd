use crate::value::{JsValue, same_value};

/// §8.10 Property Descriptor: a record of up to six fields, each
/// independently present or absent. Absence (`None`) is not the same thing
/// as a present-but-`undefined` or present-but-`false` field; the
/// reconciliation rules in `define_own_property` depend on the difference.
#[derive(Clone, Debug, Default)]
pub struct PropertyDescriptor {
    pub value: Option<JsValue>,
    pub writable: Option<bool>,
    pub get: Option<JsValue>,
    pub set: Option<JsValue>,
    pub enumerable: Option<bool>,
    pub configurable: Option<bool>,
}

impl PropertyDescriptor {
    pub fn data(value: JsValue, writable: bool, enumerable: bool, configurable: bool) -> Self {
        Self {
            value: Some(value),
            writable: Some(writable),
            get: None,
            set: None,
            enumerable: Some(enumerable),
            configurable: Some(configurable),
        }
    }

    /// Data descriptor with all attributes true, the shape `Put` uses when
    /// creating a property by plain assignment.
    pub fn data_default(value: JsValue) -> Self {
        Self::data(value, true, true, true)
    }

    pub fn accessor(get: JsValue, set: JsValue, enumerable: bool, configurable: bool) -> Self {
        Self {
            value: None,
            writable: None,
            get: Some(get),
            set: Some(set),
            enumerable: Some(enumerable),
            configurable: Some(configurable),
        }
    }

    /// Partial descriptor carrying only `[[Value]]`.
    pub fn value_only(value: JsValue) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    // §8.10.2 IsDataDescriptor
    pub fn is_data_descriptor(&self) -> bool {
        self.value.is_some() || self.writable.is_some()
    }

    // §8.10.1 IsAccessorDescriptor
    pub fn is_accessor_descriptor(&self) -> bool {
        self.get.is_some() || self.set.is_some()
    }

    // §8.10.3 IsGenericDescriptor
    pub fn is_generic_descriptor(&self) -> bool {
        !self.is_data_descriptor() && !self.is_accessor_descriptor()
    }

    /// True when no field at all is present.
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
            && self.writable.is_none()
            && self.get.is_none()
            && self.set.is_none()
            && self.enumerable.is_none()
            && self.configurable.is_none()
    }
}

// The classifier predicates also accept the spec's "undefined descriptor":
// all three are false for `None`.

pub fn is_data_descriptor(desc: Option<&PropertyDescriptor>) -> bool {
    desc.is_some_and(PropertyDescriptor::is_data_descriptor)
}

pub fn is_accessor_descriptor(desc: Option<&PropertyDescriptor>) -> bool {
    desc.is_some_and(PropertyDescriptor::is_accessor_descriptor)
}

pub fn is_generic_descriptor(desc: Option<&PropertyDescriptor>) -> bool {
    desc.is_some_and(PropertyDescriptor::is_generic_descriptor)
}

/// §8.10 Property Identifier: a name paired with a descriptor, used as an
/// argument shape for batch definition.
#[derive(Clone, Debug)]
pub struct PropertyIdentifier {
    pub name: String,
    pub descriptor: PropertyDescriptor,
}

impl PropertyIdentifier {
    pub fn new(name: impl Into<String>, descriptor: PropertyDescriptor) -> Self {
        Self {
            name: name.into(),
            descriptor,
        }
    }
}

/// Kind of an own property. A stored property is always exactly one of the
/// two; a getter or setter slot left vacant holds `JsValue::Undefined`.
#[derive(Clone, Debug)]
pub enum PropertyKind {
    Data { value: JsValue, writable: bool },
    Accessor { get: JsValue, set: JsValue },
}

/// An own property record as stored on an object: fully populated, unlike
/// the transient `PropertyDescriptor` arguments it is reconciled against.
#[derive(Clone, Debug)]
pub struct OwnProperty {
    pub kind: PropertyKind,
    pub enumerable: bool,
    pub configurable: bool,
}

impl OwnProperty {
    /// Create a fresh own property from a (possibly partial) descriptor,
    /// filling absent fields with the attribute defaults: `undefined` values,
    /// false flags.
    pub fn from_descriptor(desc: &PropertyDescriptor) -> Self {
        let kind = if desc.is_accessor_descriptor() {
            PropertyKind::Accessor {
                get: desc.get.clone().unwrap_or(JsValue::Undefined),
                set: desc.set.clone().unwrap_or(JsValue::Undefined),
            }
        } else {
            PropertyKind::Data {
                value: desc.value.clone().unwrap_or(JsValue::Undefined),
                writable: desc.writable.unwrap_or(false),
            }
        };
        Self {
            kind,
            enumerable: desc.enumerable.unwrap_or(false),
            configurable: desc.configurable.unwrap_or(false),
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self.kind, PropertyKind::Data { .. })
    }

    pub fn is_accessor(&self) -> bool {
        matches!(self.kind, PropertyKind::Accessor { .. })
    }

    /// §8.12.1 snapshot: a fully populated descriptor copying this record's
    /// fields. Mutating the result never affects the stored property.
    pub fn to_descriptor(&self) -> PropertyDescriptor {
        let mut desc = PropertyDescriptor::default();
        match &self.kind {
            PropertyKind::Data { value, writable } => {
                desc.value = Some(value.clone());
                desc.writable = Some(*writable);
            }
            PropertyKind::Accessor { get, set } => {
                desc.get = Some(get.clone());
                desc.set = Some(set.clone());
            }
        }
        desc.enumerable = Some(self.enumerable);
        desc.configurable = Some(self.configurable);
        desc
    }

    /// True when every field present in `desc` equals the corresponding
    /// field of this record under SameValue. A field of the opposite kind
    /// (e.g. `value` against an accessor) has no counterpart here and so
    /// never matches.
    pub fn matches(&self, desc: &PropertyDescriptor) -> bool {
        if let Some(e) = desc.enumerable
            && e != self.enumerable
        {
            return false;
        }
        if let Some(c) = desc.configurable
            && c != self.configurable
        {
            return false;
        }
        match &self.kind {
            PropertyKind::Data { value, writable } => {
                if desc.get.is_some() || desc.set.is_some() {
                    return false;
                }
                if let Some(w) = desc.writable
                    && w != *writable
                {
                    return false;
                }
                if let Some(v) = &desc.value
                    && !same_value(v, value)
                {
                    return false;
                }
                true
            }
            PropertyKind::Accessor { get, set } => {
                if desc.value.is_some() || desc.writable.is_some() {
                    return false;
                }
                if let Some(g) = &desc.get
                    && !same_value(g, get)
                {
                    return false;
                }
                if let Some(s) = &desc.set
                    && !same_value(s, set)
                {
                    return false;
                }
                true
            }
        }
    }

    /// Overwrite this record's attributes with every field present in
    /// `desc`. Callers have already handled kind conversion, so a data field
    /// only arrives here when the record is (by now) a data property, and
    /// likewise for accessor fields.
    pub fn apply(&mut self, desc: &PropertyDescriptor) {
        match &mut self.kind {
            PropertyKind::Data { value, writable } => {
                if let Some(v) = &desc.value {
                    *value = v.clone();
                }
                if let Some(w) = desc.writable {
                    *writable = w;
                }
            }
            PropertyKind::Accessor { get, set } => {
                if let Some(g) = &desc.get {
                    *get = g.clone();
                }
                if let Some(s) = &desc.set {
                    *set = s.clone();
                }
            }
        }
        if let Some(e) = desc.enumerable {
            self.enumerable = e;
        }
        if let Some(c) = desc.configurable {
            self.configurable = c;
        }
    }
}
