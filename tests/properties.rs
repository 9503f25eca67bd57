//! Property tests: round-trip, equality/hash agreement, wrap/unwrap and
//! complexity laws over randomly generated identity trees.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use proptest::prelude::*;

use dotid::prelude::*;

fn options() -> ParseOptions {
    ParseOptions::default()
}

fn hash_of(identity: &TypeIdentity) -> u64 {
    let mut hasher = DefaultHasher::new();
    identity.hash(&mut hasher);
    hasher.finish()
}

fn component_strategy() -> impl Strategy<Value = ComponentIdentity> {
    (
        "[A-Za-z][A-Za-z0-9_.]{0,10}",
        proptest::option::of((any::<u16>(), any::<u16>(), proptest::option::of(any::<u16>()))),
        prop_oneof![
            Just("neutral"),
            Just("en-US"),
            Just("fr"),
            Just("zh-Hans")
        ],
        proptest::option::of(proptest::array::uniform8(any::<u8>())),
    )
        .prop_map(|(name, version, culture, token)| {
            let version = version.map(|(major, minor, build)| match build {
                None => ComponentVersion::new(major, minor),
                Some(build) => ComponentVersion::new_full(major, minor, build, 0),
            });
            ComponentIdentity::from_name(&name, &options())
                .unwrap()
                .with_culture(culture)
                .unwrap()
                .with_version(version)
                .with_key_token(token.map(KeyToken::from_bytes))
        })
}

fn identity_strategy() -> impl Strategy<Value = TypeIdentity> {
    let leaf = (
        "[A-Za-z][A-Za-z0-9_.]{0,10}",
        proptest::option::of(component_strategy()),
    )
        .prop_map(|(name, component)| {
            TypeIdentity::from_name(&name, &options())
                .unwrap()
                .with_component(component)
                .unwrap()
        });

    leaf.prop_recursive(3, 12, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(|t| t.make_sz_array_type().unwrap()),
            (inner.clone(), 1u32..=4).prop_map(|(t, rank)| {
                t.make_variable_bound_array_type(rank).unwrap()
            }),
            inner
                .clone()
                .prop_map(|t| t.make_unmanaged_pointer_type().unwrap()),
            (
                proptest::collection::vec(inner, 1..=3),
                "[A-Za-z][A-Za-z0-9_]{0,8}",
            )
                .prop_map(|(arguments, base)| {
                    let definition = TypeIdentity::from_name(
                        &format!("{}`{}", base, arguments.len()),
                        &options(),
                    )
                    .unwrap();
                    definition.make_generic_type(&arguments).unwrap()
                }),
        ]
    })
}

proptest! {
    #[test]
    fn round_trip_through_text(identity in identity_strategy()) {
        let rendered = identity.assembly_qualified_name();
        let reparsed = TypeIdentity::parse_assembly_qualified_name(&rendered, &options()).unwrap();
        prop_assert_eq!(&reparsed, &identity);

        // Re-rendering the reparsed value is a fixed point.
        prop_assert_eq!(reparsed.assembly_qualified_name(), rendered);
    }

    #[test]
    fn equal_values_hash_alike(identity in identity_strategy()) {
        let rendered = identity.assembly_qualified_name();
        let reparsed = TypeIdentity::parse_assembly_qualified_name(&rendered, &options()).unwrap();
        prop_assert_eq!(hash_of(&reparsed), hash_of(&identity));
    }

    #[test]
    fn wrap_then_unwrap_returns_the_original(identity in identity_strategy()) {
        let sz = identity.make_sz_array_type().unwrap();
        prop_assert_eq!(sz.underlying_type().unwrap(), &identity);

        let md = identity.make_variable_bound_array_type(3).unwrap();
        prop_assert_eq!(md.underlying_type().unwrap(), &identity);

        let pointer = identity.make_unmanaged_pointer_type().unwrap();
        prop_assert_eq!(pointer.underlying_type().unwrap(), &identity);

        let byref = identity.make_managed_pointer_type().unwrap();
        prop_assert_eq!(byref.underlying_type().unwrap(), &identity);
    }

    #[test]
    fn wraps_add_exactly_one_complexity(identity in identity_strategy()) {
        let base = identity.total_complexity();
        prop_assert_eq!(identity.make_sz_array_type().unwrap().total_complexity(), base + 1);
        prop_assert_eq!(
            identity.make_variable_bound_array_type(2).unwrap().total_complexity(),
            base + 1
        );
        prop_assert_eq!(
            identity.make_unmanaged_pointer_type().unwrap().total_complexity(),
            base + 1
        );
    }

    #[test]
    fn generic_complexity_is_two_plus_argument_sum(
        arguments in proptest::collection::vec(identity_strategy(), 1..=4)
    ) {
        let definition = TypeIdentity::from_name(
            &format!("Generic`{}", arguments.len()),
            &options(),
        ).unwrap();
        let constructed = definition.make_generic_type(&arguments).unwrap();
        let expected: usize = 2 + arguments.iter().map(TypeIdentity::total_complexity).sum::<usize>();
        prop_assert_eq!(constructed.total_complexity(), expected);
    }

    #[test]
    fn rewriting_nothing_preserves_the_handle(identity in identity_strategy()) {
        struct Untouched;
        impl TypeIdentityVisitor for Untouched {}

        let visited = Untouched.visit_type(&identity).unwrap();
        prop_assert!(visited.ptr_eq(&identity));
    }
}
