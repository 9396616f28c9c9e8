use cas_validate::{are_equivalent, parse};
use proptest::prelude::*;

/// Small expressions over two variables, the constants, and a few functions.
fn expression() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        Just("x".to_owned()),
        Just("y".to_owned()),
        Just("pi".to_owned()),
        Just("0.5".to_owned()),
        (0u32..10).prop_map(|n| n.to_string()),
    ];
    leaf.prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a}) + ({b})")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a}) - ({b})")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a})({b})")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a}) / ({b})")),
            inner.clone().prop_map(|a| format!("({a})^2")),
            inner.clone().prop_map(|a| format!("sin({a})")),
            inner.prop_map(|a| format!("sqrt({a})")),
        ]
    })
}

/// An expression or an equation between two expressions.
fn answer() -> impl Strategy<Value = String> {
    prop_oneof![
        expression(),
        (expression(), expression()).prop_map(|(a, b)| format!("{a} = {b}")),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_reflexive(text in answer()) {
        let form = parse(&text).unwrap();
        prop_assert!(are_equivalent(&form, &form));
    }

    #[test]
    fn prop_symmetric_expressions(a in expression(), b in expression()) {
        let (a, b) = (parse(&a).unwrap(), parse(&b).unwrap());
        prop_assert_eq!(are_equivalent(&a, &b), are_equivalent(&b, &a));
    }

    #[test]
    fn prop_symmetric_equations(a in expression(), b in expression(), c in expression(), d in expression()) {
        let student = parse(&format!("{a} = {b}")).unwrap();
        let reference = parse(&format!("{c} = {d}")).unwrap();
        prop_assert_eq!(are_equivalent(&student, &reference), are_equivalent(&reference, &student));
    }
}
