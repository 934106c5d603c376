use bayes_core::inference::{Backend, EnumerationEngine, InferenceEngine};
use bayes_core::networks;
use bayes_core::{Evidence, InferenceError};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn chain_marginal_without_evidence() {
    let network = networks::chain().expect("chain builds");
    for backend in Backend::ALL {
        let p = backend
            .engine()
            .query_probability(&network, "C", "0", &Evidence::new())
            .expect("query succeeds");
        assert_close(p, 0.652);
    }
}

#[test]
fn rain_train_appointment_given_rain_without_maintenance() {
    let network = networks::rain_train().expect("rain_train builds");
    let evidence = Evidence::new().with("Rain", "Yes").with("Maintenance", "No");
    for backend in Backend::ALL {
        let p = backend
            .engine()
            .query_probability(&network, "Appointment", "Attend", &evidence)
            .expect("query succeeds");
        assert_close(p, 0.81);
    }
}

#[test]
fn twilight_threat_given_volturi() {
    let network = networks::twilight().expect("twilight builds");
    let evidence = Evidence::new().with("Volturi", "Yes");
    for backend in Backend::ALL {
        let p = backend
            .engine()
            .query_probability(&network, "ThreatToBella", "High", &evidence)
            .expect("query succeeds");
        assert_close(p, 0.843);
    }
}

#[test]
fn twilight_independent_root_is_unaffected_by_evidence() {
    let network = networks::twilight().expect("twilight builds");
    let evidence = Evidence::new()
        .with("BellaState", "Vampire")
        .with("Weather", "Cloudy");
    let p = EnumerationEngine
        .query_probability(&network, "WolvesAlliance", "Strong", &evidence)
        .expect("query succeeds");
    assert_close(p, 0.6);
}

#[test]
fn twilight_story_queries() {
    let network = networks::twilight().expect("twilight builds");
    let cases: [(&str, &str, &[(&str, &str)], f64); 5] = [
        (
            "BellaState",
            "Vampire",
            &[("Weather", "Cloudy"), ("Time", "Day"), ("Volturi", "Yes")],
            0.58073,
        ),
        (
            "EdwardDecision",
            "Turn",
            &[("Weather", "Sunny"), ("Time", "Night"), ("Volturi", "No")],
            0.2926,
        ),
        ("ThreatToBella", "High", &[("Volturi", "Yes")], 0.843),
        (
            "HumanSuspicion",
            "High",
            &[("Weather", "Sunny"), ("Time", "Day"), ("Volturi", "No")],
            0.16,
        ),
        (
            "BellaState",
            "Vampire",
            &[("Weather", "Sunny"), ("Time", "Day"), ("Volturi", "No")],
            0.20948,
        ),
    ];
    for backend in Backend::ALL {
        let engine = backend.engine();
        for (variable, value, observed, expected) in cases {
            let evidence: Evidence = observed.iter().copied().collect();
            let p = engine
                .query_probability(&network, variable, value, &evidence)
                .expect("query succeeds");
            assert_close(p, expected);
        }
    }
}

#[test]
fn wolf_alliance_lowers_the_threat() {
    let network = networks::twilight_wolves().expect("twilight_wolves builds");
    let evidence = Evidence::new()
        .with("Weather", "Cloudy")
        .with("Time", "Day")
        .with("Volturi", "Yes")
        .with("WolvesAlliance", "Strong");
    for backend in Backend::ALL {
        let engine = backend.engine();
        let bella = engine
            .query_distribution(&network, "BellaState", &evidence)
            .expect("query succeeds");
        assert_close(bella.probability("Vampire").expect("state"), 0.329414);
        assert_eq!(bella.most_likely(), Some(("Human", bella.probabilities()[1])));

        let strong = engine
            .query_probability(
                &network,
                "ThreatToBella",
                "High",
                &Evidence::new().with("WolvesAlliance", "Strong"),
            )
            .expect("query succeeds");
        let weak = engine
            .query_probability(
                &network,
                "ThreatToBella",
                "High",
                &Evidence::new().with("WolvesAlliance", "Weak"),
            )
            .expect("query succeeds");
        assert_close(strong, 0.56595);
        assert_close(weak, 0.7574);
    }
}

#[test]
fn respiratory_diagnostic_queries() {
    let network = networks::respiratory().expect("respiratory builds");
    let cases: [(&str, &str, &[(&str, &str)], f64); 5] = [
        (
            "Diagnosis",
            "Positive",
            &[("Fever", "High"), ("Cough", "Yes")],
            0.8223487804878048,
        ),
        (
            "Diagnosis",
            "Positive",
            &[("Congestion", "Yes"), ("Saturation", "Low")],
            0.7990742924528301,
        ),
        ("Cough", "Yes", &[("Virus", "Yes")], 0.175),
        ("Congestion", "Yes", &[("Allergy", "Yes")], 0.38),
        ("Saturation", "Low", &[("Fever", "High")], 0.7),
    ];
    for backend in Backend::ALL {
        let engine = backend.engine();
        for (variable, value, observed, expected) in cases {
            let evidence: Evidence = observed.iter().copied().collect();
            let p = engine
                .query_probability(&network, variable, value, &evidence)
                .expect("query succeeds");
            assert_close(p, expected);
        }
    }
}

#[test]
fn respiratory_saturation_given_virus() {
    let network = networks::respiratory().expect("respiratory builds");
    let evidence = Evidence::new().with("Virus", "Yes");
    let p = EnumerationEngine
        .query_probability(&network, "Saturation", "Low", &evidence)
        .expect("query succeeds");
    assert_close(p, 0.2 * 0.7 + 0.8 * 0.1);
}

#[test]
fn road_accident_direct_parent_evidence() {
    let network = networks::road_accident().expect("road_accident builds");
    for backend in Backend::ALL {
        let engine = backend.engine();
        let accident = engine
            .query_probability(
                &network,
                "Accident",
                "Yes",
                &Evidence::new().with("Risk", "High"),
            )
            .expect("query succeeds");
        assert_close(accident, 0.7);
        let speed = engine
            .query_probability(
                &network,
                "Speed",
                "High",
                &Evidence::new().with("TimeOfDay", "Night"),
            )
            .expect("query succeeds");
        assert_close(speed, 0.6);
    }
}

#[test]
fn road_accident_impossible_evidence() {
    let network = networks::road_accident().expect("road_accident builds");
    let evidence = Evidence::new()
        .with("Accident", "No")
        .with("Severity", "Severe");
    for backend in Backend::ALL {
        let result = backend
            .engine()
            .query_distribution(&network, "Risk", &evidence);
        assert_eq!(result, Err(InferenceError::ZeroEvidenceProbability));
    }
}

#[test]
fn posterior_follows_declared_state_order() {
    let network = networks::rain_train().expect("rain_train builds");
    let posterior = EnumerationEngine
        .query_distribution(&network, "Train", &Evidence::new().with("Rain", "Yes"))
        .expect("query succeeds");
    assert_eq!(posterior.variable(), "Train");
    assert_eq!(posterior.states(), ["OnTime", "Delayed"]);
    assert_close(posterior.total(), 1.0);
    // P(OnTime | Rain=Yes) = 0.2 * 0.7 + 0.8 * 0.1
    assert_close(posterior.probabilities()[0], 0.22);
}
