//! Round-trip law: the canonical string of any tree reparses to an equal
//! tree, and canonical inputs are rendered back verbatim.

use proptest::prelude::*;

use pacta_core::{CmpOp, CollectionKind, Contract, Number, Operand};
use pacta_parse::parse_uncached;

fn arb_ext_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "int", "float", "str", "number", "bool", "none", "seq", "container", "foo", "bar_baz",
    ])
    .prop_map(str::to_string)
}

fn arb_var() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["N", "M", "K", "P"]).prop_map(str::to_string)
}

fn arb_cmp_op() -> impl Strategy<Value = CmpOp> {
    prop::sample::select(vec![
        CmpOp::Lt,
        CmpOp::Le,
        CmpOp::Gt,
        CmpOp::Ge,
        CmpOp::Eq,
        CmpOp::Ne,
    ])
}

fn arb_number() -> impl Strategy<Value = Number> {
    prop_oneof![
        (-1000i64..1000).prop_map(Number::Int),
        // Quarters only: the rendering never needs exponent notation.
        (-4000i64..4000).prop_map(|n| Number::Float(n as f64 / 4.0)),
    ]
}

fn arb_operand() -> impl Strategy<Value = Operand> {
    prop_oneof![
        arb_number().prop_map(Operand::Literal),
        arb_var().prop_map(Operand::Variable),
    ]
}

fn arb_comparison() -> impl Strategy<Value = Contract> {
    (prop::option::of(arb_var()), arb_cmp_op(), arb_operand())
        .prop_map(|(lhs, op, rhs)| Contract::Comparison { lhs, op, rhs })
}

fn arb_size() -> impl Strategy<Value = (Option<String>, Option<u64>)> {
    prop_oneof![
        Just((None, None)),
        arb_var().prop_map(|v| (Some(v), None)),
        (0u64..6).prop_map(|n| (None, Some(n))),
    ]
}

fn arb_collection(
    inner: impl Strategy<Value = Contract> + Clone + 'static,
) -> impl Strategy<Value = Contract> {
    let non_map = (
        prop::sample::select(vec![
            CollectionKind::List,
            CollectionKind::Tuple,
            CollectionKind::Set,
        ]),
        prop::option::of(inner.clone()),
        arb_size(),
    )
        .prop_map(|(kind, element, (size_binding, exact_size))| Contract::Collection {
            kind,
            key: None,
            element: element.map(Box::new),
            size_binding,
            exact_size,
        });
    let map = (inner.clone(), inner, arb_size()).prop_map(
        |(key, value, (size_binding, exact_size))| Contract::Collection {
            kind: CollectionKind::Map,
            key: Some(Box::new(key)),
            element: Some(Box::new(value)),
            size_binding,
            exact_size,
        },
    );
    let bare_map = arb_size().prop_map(|(size_binding, exact_size)| Contract::Collection {
        kind: CollectionKind::Map,
        key: None,
        element: None,
        size_binding,
        exact_size,
    });
    prop_oneof![non_map, map, bare_map]
}

fn arb_clause() -> impl Strategy<Value = Contract> {
    let leaf = prop_oneof![
        arb_ext_name().prop_map(|name| Contract::ExtensionRef { name }),
        arb_var().prop_map(|name| Contract::Binding { name }),
        arb_comparison(),
        Just(Contract::extension("*")),
    ];
    leaf.prop_recursive(3, 24, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(Contract::negate),
            prop::collection::vec(inner.clone(), 2..4).prop_map(Contract::and),
            prop::collection::vec(inner.clone(), 2..4).prop_map(Contract::or),
            arb_collection(inner),
        ]
    })
}

fn arb_contract() -> impl Strategy<Value = Contract> {
    prop_oneof![
        arb_clause(),
        prop::collection::vec(arb_clause(), 2..4)
            .prop_map(|clauses| Contract::Composite { clauses }),
    ]
}

proptest! {
    #[test]
    fn canonical_string_reparses_to_an_equal_tree(c in arb_contract()) {
        let rendered = c.to_string();
        let back = parse_uncached(&rendered)
            .unwrap_or_else(|e| panic!("canonical form {:?} did not reparse: {}", rendered, e));
        prop_assert_eq!(back, c);
    }

    #[test]
    fn canonical_string_is_a_fixed_point(c in arb_contract()) {
        let rendered = c.to_string();
        let back = parse_uncached(&rendered).unwrap();
        prop_assert_eq!(back.to_string(), rendered);
    }

    #[test]
    fn arbitrary_input_never_panics(s in "[ -~]{0,24}") {
        let _ = parse_uncached(&s);
    }
}

#[test]
fn exact_subset_roundtrips_verbatim() {
    for input in [
        "int,>0",
        "list[N](int),N>0",
        "map(str:seq)",
        "map(str:list[N](int)),N>0",
        "tuple[3]",
        "!none",
        "int|float",
        "int|str,>=0",
        "list(int,>0)",
        "set(number)",
        "map",
        "seq",
        "*",
        "N>0",
        "=5",
        "!=0",
        "<=2.5",
        "map(str:*)",
        "list[N](list[M](float)),N=M",
    ] {
        let c = parse_uncached(input).unwrap_or_else(|e| panic!("{}: {}", input, e));
        assert_eq!(c.to_string(), input, "not verbatim for {:?}", input);
    }
}

#[test]
fn debug_form_reconstructs_an_equal_tree() {
    for input in ["int,>0", "list[N](int),N>0", "map(str:list(int|none))"] {
        let c = parse_uncached(input).unwrap();
        let back = Contract::from_debug_form(&c.debug_form()).unwrap();
        assert_eq!(back, c);
    }
}
