use bayes_core::inference::{Backend, InferenceEngine};
use bayes_core::networks;
use bayes_core::{
    BuildError, Evidence, EvidenceIssue, InferenceError, NetworkBuilder, TabularCpd,
};

#[test]
fn evidence_errors_are_reported_before_any_work() {
    let network = networks::rain_train().expect("builds");
    for backend in Backend::ALL {
        let engine = backend.engine();
        let unknown = engine.query_probability(
            &network,
            "Train",
            "OnTime",
            &Evidence::new().with("Snow", "Yes"),
        );
        assert_eq!(
            unknown,
            Err(InferenceError::UnknownVariable {
                name: "Snow".to_string()
            })
        );

        let bad_value = engine.query_probability(
            &network,
            "Train",
            "OnTime",
            &Evidence::new().with("Rain", "Heavy"),
        );
        assert_eq!(
            bad_value,
            Err(InferenceError::InvalidEvidenceValue {
                variable: "Rain".to_string(),
                value: "Heavy".to_string(),
                issue: EvidenceIssue::NotInDomain,
            })
        );

        let conflicting = engine.query_probability(
            &network,
            "Train",
            "OnTime",
            &Evidence::new().with("Rain", "Yes").with("Rain", "No"),
        );
        assert_eq!(
            conflicting,
            Err(InferenceError::InvalidEvidenceValue {
                variable: "Rain".to_string(),
                value: "No".to_string(),
                issue: EvidenceIssue::Conflicting {
                    observed: "Yes".to_string()
                },
            })
        );
    }
}

#[test]
fn repeated_identical_evidence_is_accepted() {
    let network = networks::rain_train().expect("builds");
    let evidence = Evidence::new().with("Rain", "Yes").with("Rain", "Yes");
    let p = Backend::Enumeration
        .engine()
        .query_probability(&network, "Maintenance", "Yes", &evidence)
        .expect("duplicate observation with same value");
    assert!((p - 0.8).abs() < 1e-12);
}

#[test]
fn fully_observed_network_only_normalizes_the_query() {
    let network = networks::chain().expect("builds");
    let evidence = Evidence::new().with("A", "1").with("C", "0");
    for backend in Backend::ALL {
        let p = backend
            .engine()
            .query_probability(&network, "B", "1", &evidence)
            .expect("query succeeds");
        let expected = (0.3 * 0.8 * 0.1) / (0.3 * 0.8 * 0.1 + 0.3 * 0.2 * 0.9);
        assert!((p - expected).abs() < 1e-12);
    }
}

#[test]
fn missing_row_surfaces_at_query_time_when_unchecked() {
    let network = NetworkBuilder::new("gap")
        .variable("A", ["0", "1"])
        .variable("B", ["0", "1"])
        .prior("A", [0.5, 0.5])
        .row("B", ["A"], ["0"], [0.4, 0.6])
        .build_unchecked()
        .expect("references resolve");
    for backend in Backend::ALL {
        let result = backend
            .engine()
            .query_probability(&network, "B", "1", &Evidence::new());
        assert_eq!(
            result,
            Err(InferenceError::UndefinedCombination {
                variable: "B".to_string(),
                combination: "A=1".to_string(),
            })
        );
    }
    // Evidence that avoids the gap still answers.
    let p = Backend::Enumeration
        .engine()
        .query_probability(&network, "B", "1", &Evidence::new().with("A", "0"))
        .expect("defined row");
    assert!((p - 0.6).abs() < 1e-12);
}

#[test]
fn unchecked_build_still_rejects_malformed_values() {
    let nan = NetworkBuilder::new("nan")
        .variable("A", ["0", "1"])
        .prior("A", [f64::NAN, 0.5])
        .build_unchecked();
    assert!(matches!(
        nan,
        Err(BuildError::ProbabilityOutOfRange { ref variable, value, .. })
            if variable == "A" && value.is_nan()
    ));

    let negative = NetworkBuilder::new("negative")
        .variable("A", ["0", "1"])
        .prior("A", [1.5, -0.5])
        .build_unchecked();
    assert!(matches!(
        negative,
        Err(BuildError::ProbabilityOutOfRange { value, .. }) if value == 1.5
    ));

    let unnormalized = NetworkBuilder::new("unnormalized")
        .variable("A", ["0", "1"])
        .variable("B", ["0", "1"])
        .prior("A", [0.5, 0.5])
        .row("B", ["A"], ["0"], [0.9, 0.9])
        .build_unchecked();
    assert!(matches!(
        unnormalized,
        Err(BuildError::RowSum { ref variable, .. }) if variable == "B"
    ));
}

#[test]
fn unchecked_answers_stay_within_unit_interval() {
    let network = NetworkBuilder::new("gap")
        .variable("A", ["0", "1"])
        .variable("B", ["0", "1"])
        .prior("A", [0.3, 0.7])
        .row("B", ["A"], ["0"], [0.4, 0.6])
        .build_unchecked()
        .expect("defined rows are well formed");
    for backend in Backend::ALL {
        let engine = backend.engine();
        for value in ["0", "1"] {
            let err = engine
                .query_probability(&network, "A", value, &Evidence::new().with("B", "1"))
                .expect_err("A=1 reaches the gap");
            assert_eq!(err.kind(), "UndefinedCombination");

            let p = engine
                .query_probability(&network, "B", value, &Evidence::new().with("A", "0"))
                .expect("defined row");
            assert!(p.is_finite() && (0.0..=1.0).contains(&p), "{backend}: {p}");
        }
    }
}

#[test]
fn distribution_lookup_errors() {
    let network = NetworkBuilder::new("lookup")
        .variable("A", ["0", "1"])
        .variable("B", ["x", "y"])
        .variable("C", ["lo", "hi"])
        .prior("A", [0.5, 0.5])
        .prior("B", [0.5, 0.5])
        .cpd(
            TabularCpd::new("C", vec![vec![0.1, 0.2, 0.3, 0.4], vec![0.9, 0.8, 0.7, 0.6]])
                .with_parents(["A", "B"]),
        )
        .build()
        .expect("builds");

    assert_eq!(
        network.distribution_of("C", &["1", "x"]).expect("row").get("lo"),
        Some(0.3)
    );
    assert_eq!(
        network.distribution_of("C", &["1"]).unwrap_err(),
        InferenceError::MissingParentValue {
            variable: "C".to_string(),
            parent: "B".to_string(),
        }
    );
    assert_eq!(
        network.distribution_of("C", &["1", "x", "y"]).unwrap_err(),
        InferenceError::ParentArity {
            variable: "C".to_string(),
            expected: 2,
            found: 3,
        }
    );
    assert_eq!(
        network.distribution_of("C", &["1", "z"]).unwrap_err(),
        InferenceError::InvalidStateValue {
            variable: "B".to_string(),
            value: "z".to_string(),
        }
    );
    assert_eq!(
        network.distribution_of("D", &[]).unwrap_err(),
        InferenceError::UnknownVariable {
            name: "D".to_string()
        }
    );
}
