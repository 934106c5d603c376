use crate::error::BuildError;
use crate::model::{BayesNetwork, NetworkBuilder, TabularCpd};

/// Rain affects track maintenance and train punctuality; the train decides the appointment.
pub fn rain_train() -> Result<BayesNetwork, BuildError> {
    NetworkBuilder::new("rain_train")
        .variable("Rain", ["No", "Yes"])
        .variable("Maintenance", ["No", "Yes"])
        .variable("Train", ["OnTime", "Delayed"])
        .variable("Appointment", ["Attend", "Miss"])
        .prior("Rain", [0.7, 0.3])
        .cpd(
            TabularCpd::new("Maintenance", vec![vec![0.9, 0.2], vec![0.1, 0.8]])
                .with_parents(["Rain"]),
        )
        .cpd(
            TabularCpd::new(
                "Train",
                vec![vec![0.95, 0.8, 0.7, 0.1], vec![0.05, 0.2, 0.3, 0.9]],
            )
            .with_parents(["Rain", "Maintenance"]),
        )
        .cpd(
            TabularCpd::new("Appointment", vec![vec![0.9, 0.6], vec![0.1, 0.4]])
                .with_parents(["Train"]),
        )
        .build()
}

/// Story network around vampire activity and the threat it poses. Tables use row layout.
pub fn twilight() -> Result<BayesNetwork, BuildError> {
    let va = ["Weather", "Time"];
    let threat = ["VampireActivity", "Volturi"];
    let decision = ["ThreatToBella", "HumanSuspicion"];
    NetworkBuilder::new("twilight")
        .variable("Weather", ["Sunny", "Cloudy"])
        .variable("Time", ["Day", "Night"])
        .variable("Volturi", ["Yes", "No"])
        .variable("WolvesAlliance", ["Strong", "Weak"])
        .variable("VampireActivity", ["High", "Low"])
        .variable("ThreatToBella", ["High", "Low"])
        .variable("HumanSuspicion", ["High", "Low"])
        .variable("EdwardDecision", ["Turn", "Protect"])
        .variable("BellaState", ["Vampire", "Human"])
        .prior("Weather", [0.3, 0.7])
        .prior("Time", [0.5, 0.5])
        .prior("Volturi", [0.2, 0.8])
        .prior("WolvesAlliance", [0.6, 0.4])
        .row("VampireActivity", va, ["Cloudy", "Day"], [0.8, 0.2])
        .row("VampireActivity", va, ["Cloudy", "Night"], [0.9, 0.1])
        .row("VampireActivity", va, ["Sunny", "Day"], [0.2, 0.8])
        .row("VampireActivity", va, ["Sunny", "Night"], [0.6, 0.4])
        .row("ThreatToBella", threat, ["High", "Yes"], [0.9, 0.1])
        .row("ThreatToBella", threat, ["Low", "Yes"], [0.7, 0.3])
        .row("ThreatToBella", threat, ["High", "No"], [0.6, 0.4])
        .row("ThreatToBella", threat, ["Low", "No"], [0.1, 0.9])
        .row("HumanSuspicion", threat, ["High", "Yes"], [0.8, 0.2])
        .row("HumanSuspicion", threat, ["Low", "Yes"], [0.5, 0.5])
        .row("HumanSuspicion", threat, ["High", "No"], [0.4, 0.6])
        .row("HumanSuspicion", threat, ["Low", "No"], [0.1, 0.9])
        .row("EdwardDecision", decision, ["High", "High"], [0.7, 0.3])
        .row("EdwardDecision", decision, ["High", "Low"], [0.5, 0.5])
        .row("EdwardDecision", decision, ["Low", "High"], [0.3, 0.7])
        .row("EdwardDecision", decision, ["Low", "Low"], [0.05, 0.95])
        .row("BellaState", ["EdwardDecision"], ["Turn"], [0.95, 0.05])
        .row("BellaState", ["EdwardDecision"], ["Protect"], [0.05, 0.95])
        .build()
}

/// Variant of [`twilight`] where a strong wolf alliance lowers both the threat and human
/// suspicion. Column layout, with the first state of each parent listed first.
pub fn twilight_wolves() -> Result<BayesNetwork, BuildError> {
    let pressure = ["VampireActivity", "Volturi", "WolvesAlliance"];
    NetworkBuilder::new("twilight_wolves")
        .variable("Weather", ["Sunny", "Cloudy"])
        .variable("Time", ["Day", "Night"])
        .variable("Volturi", ["No", "Yes"])
        .variable("WolvesAlliance", ["Weak", "Strong"])
        .variable("VampireActivity", ["High", "Low"])
        .variable("ThreatToBella", ["High", "Low"])
        .variable("HumanSuspicion", ["High", "Low"])
        .variable("EdwardDecision", ["Turn", "Protect"])
        .variable("BellaState", ["Vampire", "Human"])
        .prior("Weather", [0.3, 0.7])
        .prior("Time", [0.5, 0.5])
        .prior("Volturi", [0.8, 0.2])
        .prior("WolvesAlliance", [0.4, 0.6])
        .cpd(
            TabularCpd::new(
                "VampireActivity",
                vec![vec![0.2, 0.6, 0.8, 0.9], vec![0.8, 0.4, 0.2, 0.1]],
            )
            .with_parents(["Weather", "Time"]),
        )
        .cpd(
            TabularCpd::new(
                "ThreatToBella",
                vec![
                    vec![0.9, 0.7, 0.7, 0.5, 0.6, 0.4, 0.1, 0.05],
                    vec![0.1, 0.3, 0.3, 0.5, 0.4, 0.6, 0.9, 0.95],
                ],
            )
            .with_parents(pressure),
        )
        .cpd(
            TabularCpd::new(
                "HumanSuspicion",
                vec![
                    vec![0.8, 0.7, 0.5, 0.4, 0.4, 0.3, 0.1, 0.08],
                    vec![0.2, 0.3, 0.5, 0.6, 0.6, 0.7, 0.9, 0.92],
                ],
            )
            .with_parents(pressure),
        )
        .cpd(
            TabularCpd::new(
                "EdwardDecision",
                vec![vec![0.7, 0.5, 0.3, 0.05], vec![0.3, 0.5, 0.7, 0.95]],
            )
            .with_parents(["ThreatToBella", "HumanSuspicion"]),
        )
        .cpd(
            TabularCpd::new("BellaState", vec![vec![0.95, 0.05], vec![0.05, 0.95]])
                .with_parents(["EdwardDecision"]),
        )
        .build()
}

/// Viral infection, allergy and smoking behind the symptoms feeding a diagnosis.
pub fn respiratory() -> Result<BayesNetwork, BuildError> {
    NetworkBuilder::new("respiratory")
        .variable("Virus", ["No", "Yes"])
        .variable("Allergy", ["No", "Yes"])
        .variable("Smoking", ["No", "Yes"])
        .variable("Fever", ["High", "Normal"])
        .variable("Cough", ["Yes", "No"])
        .variable("Congestion", ["Yes", "No"])
        .variable("Saturation", ["Low", "Normal"])
        .variable("Diagnosis", ["Positive", "Negative"])
        .prior("Virus", [0.7, 0.3])
        .prior("Allergy", [0.8, 0.2])
        .prior("Smoking", [0.75, 0.25])
        .cpd(TabularCpd::new("Fever", vec![vec![0.8, 0.2], vec![0.2, 0.8]]).with_parents(["Virus"]))
        .cpd(
            TabularCpd::new("Cough", vec![vec![0.8, 0.6, 0.2, 0.1], vec![0.2, 0.4, 0.8, 0.9]])
                .with_parents(["Virus", "Smoking"]),
        )
        .cpd(
            TabularCpd::new(
                "Congestion",
                vec![vec![0.7, 0.5, 0.2, 0.1], vec![0.3, 0.5, 0.8, 0.9]],
            )
            .with_parents(["Virus", "Allergy"]),
        )
        .cpd(
            TabularCpd::new("Saturation", vec![vec![0.7, 0.1], vec![0.3, 0.9]])
                .with_parents(["Fever"]),
        )
        .cpd(
            TabularCpd::new(
                "Diagnosis",
                vec![
                    vec![0.95, 0.8, 0.7, 0.6, 0.4, 0.3, 0.2, 0.05],
                    vec![0.05, 0.2, 0.3, 0.4, 0.6, 0.7, 0.8, 0.95],
                ],
            )
            .with_parents(["Cough", "Congestion", "Saturation"]),
        )
        .build()
}

/// Driving conditions feeding accident risk, occurrence and severity.
pub fn road_accident() -> Result<BayesNetwork, BuildError> {
    NetworkBuilder::new("road_accident")
        .variable("TimeOfDay", ["Day", "Night"])
        .variable("Alcohol", ["No", "Yes"])
        .variable("Weather", ["Dry", "Rain"])
        .variable("Speed", ["Normal", "High"])
        .variable("Risk", ["Low", "High"])
        .variable("Accident", ["No", "Yes"])
        .variable("Severity", ["Minor", "Severe"])
        .prior("TimeOfDay", [0.6, 0.4])
        .prior("Alcohol", [0.8, 0.2])
        .prior("Weather", [0.7, 0.3])
        .cpd(
            TabularCpd::new("Speed", vec![vec![0.7, 0.4], vec![0.3, 0.6]])
                .with_parents(["TimeOfDay"]),
        )
        .cpd(
            TabularCpd::new(
                "Risk",
                vec![
                    vec![0.9, 0.7, 0.6, 0.3, 0.6, 0.3, 0.2, 0.1],
                    vec![0.1, 0.3, 0.4, 0.7, 0.4, 0.7, 0.8, 0.9],
                ],
            )
            .with_parents(["Alcohol", "Weather", "Speed"]),
        )
        .cpd(
            TabularCpd::new("Accident", vec![vec![0.95, 0.3], vec![0.05, 0.7]])
                .with_parents(["Risk"]),
        )
        .cpd(
            TabularCpd::new("Severity", vec![vec![1.0, 0.6], vec![0.0, 0.4]])
                .with_parents(["Accident"]),
        )
        .build()
}

/// Three binary variables in a chain `A -> B -> C`.
pub fn chain() -> Result<BayesNetwork, BuildError> {
    NetworkBuilder::new("chain")
        .variable("A", ["0", "1"])
        .variable("B", ["0", "1"])
        .variable("C", ["0", "1"])
        .prior("A", [0.7, 0.3])
        .cpd(TabularCpd::new("B", vec![vec![0.9, 0.2], vec![0.1, 0.8]]).with_parents(["A"]))
        .cpd(TabularCpd::new("C", vec![vec![0.9, 0.1], vec![0.1, 0.9]]).with_parents(["B"]))
        .build()
}
