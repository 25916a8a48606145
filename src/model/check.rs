//! Alternative validation against the model.

use std::fmt;

use super::{Alternative, Model};

/// Outcome of validating alternatives: collected problems, never a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    fn absorb(&mut self, other: CheckReport, prefix: &str) {
        self.errors
            .extend(other.errors.into_iter().map(|e| format!("{prefix}{e}")));
        self.warnings
            .extend(other.warnings.into_iter().map(|w| format!("{prefix}{w}")));
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for e in &self.errors {
            writeln!(f, "error: {e}")?;
        }
        for w in &self.warnings {
            writeln!(f, "warning: {w}")?;
        }
        Ok(())
    }
}

impl Model {
    /// Validates one alternative's values against the model.
    ///
    /// Errors: value ids that name no attribute, stored values that do not
    /// interpret on their attribute's scale (always for basic attributes,
    /// for aggregates when `check_aggregates` is set). Warnings: stored
    /// values on attributes without a scale, and (with `check_aggregates`)
    /// aggregates lacking a function.
    pub fn check_alternative(&self, alt: &Alternative, check_aggregates: bool) -> CheckReport {
        let mut report = CheckReport::default();
        for (id, value) in alt.iter() {
            let Some(idx) = self.att_index(id) else {
                report
                    .errors
                    .push(format!("value assigned to unknown attribute {id:?}"));
                continue;
            };
            let att = self.attribute(idx);
            match &att.scale {
                None => report
                    .warnings
                    .push(format!("attribute {:?} has no scale", att.id())),
                Some(scale) => {
                    if att.is_basic() || check_aggregates {
                        if let Err(e) = scale.interpret(value) {
                            report
                                .errors
                                .push(format!("attribute {:?}: {e}", att.id()));
                        }
                    }
                }
            }
        }
        if check_aggregates {
            for &idx in self.aggregate() {
                let att = self.attribute(idx);
                if att.funct.is_none() {
                    report
                        .warnings
                        .push(format!("aggregate attribute {:?} has no function", att.id()));
                }
            }
        }
        report
    }

    /// Validates a batch of alternatives, prefixing every finding with the
    /// alternative's name.
    pub fn check_alternatives(&self, alts: &[Alternative], check_aggregates: bool) -> CheckReport {
        let mut report = CheckReport::default();
        for alt in alts {
            let one = self.check_alternative(alt, check_aggregates);
            report.absorb(one, &format!("alternative {:?}: ", alt.name));
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata;
    use crate::value::Value;

    #[test]
    fn test_clean_alternatives() {
        let model = testdata::car_model();
        let report = model.check_alternatives(&model.alternatives.clone(), true);
        assert!(report.is_ok(), "unexpected findings: {report}");
    }

    #[test]
    fn test_unknown_attribute_is_error() {
        let model = testdata::car_model();
        let alt = Alternative::new("Stray").with_value("NO.SUCH", Value::Index(0));
        let report = model.check_alternative(&alt, false);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("NO.SUCH"));
    }

    #[test]
    fn test_uninterpretable_value_is_error() {
        let model = testdata::car_model();
        let alt = Alternative::new("Bad").with_value("SAFETY", Value::Continuous(1.5));
        let report = model.check_alternative(&alt, false);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("SAFETY"));
    }

    #[test]
    fn test_aggregate_value_is_checked_on_request() {
        let model = testdata::car_model();
        let alt = Alternative::new("Bad").with_value("CAR", Value::Continuous(1.5));
        assert!(model.check_alternative(&alt, false).is_ok());
        let report = model.check_alternative(&alt, true);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("CAR"));
    }

    #[test]
    fn test_scaleless_keyed_attribute_warns() {
        use crate::model::AttributeNode;
        let root = AttributeNode::new("root").with_children([AttributeNode::new("X")]);
        let model = Model::new("m", "", false, root, Vec::new()).unwrap();
        let alt = Alternative::new("A").with_value("X", Value::Index(0));
        let report = model.check_alternative(&alt, false);
        assert!(report.errors.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("X"));
        // attributes the alternative does not key are not reported
        assert!(model.check_alternative(&Alternative::new("B"), false).is_ok());
    }

    #[test]
    fn test_batch_prefixes_alternative_names() {
        let model = testdata::car_model();
        let alts = vec![
            Alternative::new("Good"),
            Alternative::new("Bad").with_value("SAFETY", Value::Continuous(0.5)),
        ];
        let report = model.check_alternatives(&alts, false);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("alternative \"Bad\": "));
    }
}
