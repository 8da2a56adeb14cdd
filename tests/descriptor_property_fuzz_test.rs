use jsom::{
    JsObject, JsValue, PropertyDescriptor, from_property_descriptor, same_value,
    to_property_descriptor,
};
use proptest::prelude::*;
use proptest::test_runner::FileFailurePersistence;

const DESCRIPTOR_PROPTEST_CASES: u32 = 256;

fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: DESCRIPTOR_PROPTEST_CASES,
        failure_persistence: Some(Box::new(FileFailurePersistence::Off)),
        ..ProptestConfig::default()
    }
}

fn value_strategy() -> BoxedStrategy<JsValue> {
    prop_oneof![
        Just(JsValue::Undefined),
        Just(JsValue::Null),
        any::<bool>().prop_map(JsValue::Boolean),
        any::<f64>().prop_map(JsValue::Number),
        "[a-z]{0,8}".prop_map(|s| JsValue::string(&s)),
    ]
    .boxed()
}

// Arbitrary well-formed descriptors: data fields or accessor fields, never
// both, each field independently present or absent.
fn descriptor_strategy() -> BoxedStrategy<PropertyDescriptor> {
    prop_oneof![
        (
            proptest::option::of(value_strategy()),
            any::<Option<bool>>(),
            (any::<Option<bool>>(), any::<Option<bool>>()),
        )
            .prop_map(|(value, writable, (enumerable, configurable))| {
                PropertyDescriptor {
                    value,
                    writable,
                    get: None,
                    set: None,
                    enumerable,
                    configurable,
                }
            }),
        (
            any::<bool>(),
            any::<bool>(),
            (any::<Option<bool>>(), any::<Option<bool>>()),
        )
            .prop_map(|(has_get, has_set, (enumerable, configurable))| {
                PropertyDescriptor {
                    value: None,
                    writable: None,
                    get: has_get.then_some(JsValue::Undefined),
                    set: has_set.then_some(JsValue::Undefined),
                    enumerable,
                    configurable,
                }
            }),
    ]
    .boxed()
}

proptest! {
    #![proptest_config(proptest_config())]

    // Exactly one of data/accessor/generic holds for every descriptor.
    #[test]
    fn classifier_partitions_every_descriptor(desc in descriptor_strategy()) {
        let kinds = [
            desc.is_data_descriptor(),
            desc.is_accessor_descriptor(),
            desc.is_generic_descriptor(),
        ];
        prop_assert_eq!(kinds.iter().filter(|k| **k).count(), 1);
    }

    // Redefining with the exact same descriptor is always a no-op success,
    // even when the first definition locked the property down.
    #[test]
    fn define_own_property_is_idempotent(desc in descriptor_strategy()) {
        let obj = JsObject::new();
        prop_assert_eq!(obj.define_own_property("p", &desc, true), Ok(true));
        prop_assert_eq!(obj.define_own_property("p", &desc, true), Ok(true));
    }

    // Once created non-configurable, a property can never be made
    // configurable again, in either error mode.
    #[test]
    fn non_configurable_lock_holds(desc in descriptor_strategy()) {
        let mut desc = desc;
        desc.configurable = Some(false);
        let obj = JsObject::new();
        prop_assert_eq!(obj.define_own_property("p", &desc, true), Ok(true));
        let upgrade = PropertyDescriptor {
            configurable: Some(true),
            ..Default::default()
        };
        prop_assert!(obj.define_own_property("p", &upgrade, true).is_err());
        prop_assert_eq!(obj.define_own_property("p", &upgrade, false), Ok(false));
    }

    // A fully populated data descriptor survives reification and re-reading.
    #[test]
    fn full_data_descriptor_round_trips(
        value in value_strategy(),
        writable in any::<bool>(),
        enumerable in any::<bool>(),
        configurable in any::<bool>(),
    ) {
        let desc = PropertyDescriptor::data(value.clone(), writable, enumerable, configurable);
        let bag = from_property_descriptor(Some(&desc));
        let back = to_property_descriptor(&bag);
        prop_assert!(back.is_ok());
        let back = back.unwrap();
        prop_assert!(same_value(back.value.as_ref().unwrap(), &value));
        prop_assert_eq!(back.writable, Some(writable));
        prop_assert_eq!(back.enumerable, Some(enumerable));
        prop_assert_eq!(back.configurable, Some(configurable));
        prop_assert!(back.get.is_none());
        prop_assert!(back.set.is_none());
    }
}
