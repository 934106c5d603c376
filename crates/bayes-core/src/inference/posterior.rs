use core::fmt;
use serde::{Deserialize, Serialize};

/// Normalized distribution of a query variable given evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posterior {
    variable: String,
    states: Vec<String>,
    probabilities: Vec<f64>,
}

impl Posterior {
    pub(crate) fn new(variable: String, states: Vec<String>, probabilities: Vec<f64>) -> Self {
        debug_assert_eq!(states.len(), probabilities.len());
        Self {
            variable,
            states,
            probabilities,
        }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn probability(&self, state: &str) -> Option<f64> {
        self.states
            .iter()
            .position(|label| label == state)
            .map(|idx| self.probabilities[idx])
    }

    /// Highest-probability state; the first declared state wins ties.
    pub fn most_likely(&self) -> Option<(&str, f64)> {
        self.iter().fold(None, |best, (state, p)| match best {
            Some((_, best_p)) if best_p >= p => best,
            _ => Some((state, p)),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.states
            .iter()
            .map(String::as_str)
            .zip(self.probabilities.iter().copied())
    }

    pub fn total(&self) -> f64 {
        self.probabilities.iter().sum()
    }
}

impl fmt::Display for Posterior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .states
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max(self.variable.len());
        writeln!(f, "{:<width$}  P({})", self.variable, self.variable)?;
        for (state, p) in self.iter() {
            writeln!(f, "{state:<width$}  {p:.5}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posterior() -> Posterior {
        Posterior::new(
            "Train".to_string(),
            vec!["OnTime".to_string(), "Delayed".to_string()],
            vec![0.4, 0.6],
        )
    }

    #[test]
    fn looks_up_states() {
        let posterior = posterior();
        assert_eq!(posterior.probability("Delayed"), Some(0.6));
        assert_eq!(posterior.probability("Cancelled"), None);
        assert_eq!(posterior.most_likely(), Some(("Delayed", 0.6)));
    }

    #[test]
    fn ties_prefer_first_state() {
        let posterior = Posterior::new(
            "Coin".to_string(),
            vec!["Heads".to_string(), "Tails".to_string()],
            vec![0.5, 0.5],
        );
        assert_eq!(posterior.most_likely(), Some(("Heads", 0.5)));
    }

    #[test]
    fn display_renders_table() {
        let rendered = posterior().to_string();
        assert!(rendered.contains("OnTime   0.40000"));
        assert!(rendered.contains("Delayed  0.60000"));
    }
}
