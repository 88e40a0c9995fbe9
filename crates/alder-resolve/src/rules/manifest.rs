//! Manifest literal validation.

use alder_ast::ast::class::{Class, Discrete};
use alder_ast::ast::expr::ManifestValue;
use alder_ast::ast::feature::Feature;
use alder_ast::ast::types::Resolution;
use alder_ast::foundation::Span;
use alder_ast::{ClassId, FeatureRef, Model};
use thiserror::Error;

use crate::error::{Diagnostic, DiagnosticKind, DiagnosticList};
use crate::template::{SealedTableTemplate, SourceTemplate};

use super::{Rule, RuleOutcome};

/// Why a manifest lexeme is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error("invalid character '{0}' in manifest number")]
    InvalidCharacter(char),

    #[error("'{0}' is not a valid manifest number")]
    InvalidNumber(String),
}

impl ManifestError {
    fn kind(&self) -> DiagnosticKind {
        match self {
            ManifestError::InvalidCharacter(_) => DiagnosticKind::InvalidManifestCharacter,
            ManifestError::InvalidNumber(_) => DiagnosticKind::InvalidManifestNumber,
        }
    }
}

/// Validate a manifest number lexeme.
///
/// Underscores group digits and are ignored; a lexeme with a decimal
/// point or exponent is a real, anything else an integer.
pub fn parse_manifest(lexeme: &str) -> Result<ManifestValue, ManifestError> {
    for ch in lexeme.chars() {
        let valid = ch.is_ascii_digit() || matches!(ch, '.' | '_' | '+' | '-' | 'e' | 'E');
        if !valid {
            return Err(ManifestError::InvalidCharacter(ch));
        }
    }

    let digits: String = lexeme.chars().filter(|&c| c != '_').collect();
    let invalid = || ManifestError::InvalidNumber(lexeme.to_string());
    if digits.contains(['.', 'e', 'E']) {
        let value: f64 = digits.parse().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }
        Ok(ManifestValue::Real(value))
    } else {
        let value: i64 = digits.parse().map_err(|_| invalid())?;
        Ok(ManifestValue::Integer(value))
    }
}

/// Where a class keeps a manifest expression.
enum ManifestSite {
    /// A constant feature's literal
    ConstantLiteral(usize),
    /// An attribute feature's default value
    AttributeDefault(usize),
    /// A discrete member's value
    Discrete(String),
}

fn local_features(class: &Class) -> &alder_ast::foundation::SealableMap<String, FeatureRef> {
    &class.local_feature_table
}

fn discrete_table(class: &Class) -> &alder_ast::foundation::SealableMap<String, Discrete> {
    &class.discrete_table
}

/// Validates every manifest literal of a class — constant values,
/// attribute defaults, discrete member values — and records the parsed
/// value, or a terminal diagnostic, on the expression.
pub struct ManifestValueRule {
    features: SealedTableTemplate<Class, String, FeatureRef>,
    discretes: SealedTableTemplate<Class, String, Discrete>,
}

impl ManifestValueRule {
    /// Construct the rule and its templates.
    pub fn new() -> Self {
        Self {
            features: SealedTableTemplate::new(local_features),
            discretes: SealedTableTemplate::new(discrete_table),
        }
    }
}

impl Rule for ManifestValueRule {
    fn name(&self) -> &'static str {
        "validate-manifest-values"
    }

    fn attempt(
        &self,
        class: ClassId,
        model: &mut Model,
        diagnostics: &mut DiagnosticList,
    ) -> RuleOutcome {
        // Check: the literal set is final once the declaration tables are.
        let node = model.class(class);
        if !self.features.is_ready(node, model).is_ready()
            || !self.discretes.is_ready(node, model).is_ready()
        {
            return RuleOutcome::NotReady;
        }

        let mut planned: Vec<(ManifestSite, Result<ManifestValue, ManifestError>, Span)> =
            Vec::new();
        for (feature_idx, feature) in node.features.iter().enumerate() {
            match feature {
                Feature::Constant(constant) => {
                    planned.push((
                        ManifestSite::ConstantLiteral(feature_idx),
                        parse_manifest(&constant.literal.lexeme),
                        constant.literal.span,
                    ));
                }
                Feature::Attribute(attribute) => {
                    if let Some(default) = attribute.default.get() {
                        planned.push((
                            ManifestSite::AttributeDefault(feature_idx),
                            parse_manifest(&default.lexeme),
                            default.span,
                        ));
                    }
                }
                _ => {}
            }
        }
        for (name, discrete) in node.discrete_table.iter() {
            planned.push((
                ManifestSite::Discrete(name.clone()),
                parse_manifest(&discrete.literal.lexeme),
                discrete.literal.span,
            ));
        }

        // Effect: record values and report invalid literals.
        let mut errored = false;
        for (site, result, span) in planned {
            let resolution = match result {
                Ok(value) => Resolution::Known(value),
                Err(error) => {
                    diagnostics.push(Diagnostic::new(error.kind(), span, error.to_string()));
                    errored = true;
                    Resolution::Failed
                }
            };
            let node = model.class_mut(class);
            let cell = match site {
                ManifestSite::ConstantLiteral(feature_idx) => match &mut node.features[feature_idx]
                {
                    Feature::Constant(constant) => &mut constant.literal.value,
                    _ => unreachable!("site recorded from a constant"),
                },
                ManifestSite::AttributeDefault(feature_idx) => match &mut node.features[feature_idx]
                {
                    Feature::Attribute(attribute) => {
                        &mut attribute
                            .default
                            .get_mut()
                            .expect("site recorded from a present default")
                            .value
                    }
                    _ => unreachable!("site recorded from an attribute"),
                },
                ManifestSite::Discrete(name) => {
                    &mut node
                        .discrete_table
                        .get_mut(&name)
                        .expect("site recorded from a table entry")
                        .literal
                        .value
                }
            };
            cell.assign(resolution);
        }
        if errored {
            RuleOutcome::Errored
        } else {
            RuleOutcome::Applied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_and_real_literals() {
        assert_eq!(parse_manifest("42"), Ok(ManifestValue::Integer(42)));
        assert_eq!(parse_manifest("1_000"), Ok(ManifestValue::Integer(1000)));
        assert_eq!(parse_manifest("-7"), Ok(ManifestValue::Integer(-7)));
        assert_eq!(parse_manifest("3.25"), Ok(ManifestValue::Real(3.25)));
        assert_eq!(parse_manifest("1e3"), Ok(ManifestValue::Real(1000.0)));
    }

    #[test]
    fn test_invalid_character_carries_the_character() {
        assert_eq!(
            parse_manifest("12$4"),
            Err(ManifestError::InvalidCharacter('$'))
        );
        let message = ManifestError::InvalidCharacter('$').to_string();
        assert!(message.contains('$'));
    }

    #[test]
    fn test_invalid_number_carries_the_lexeme() {
        assert_eq!(
            parse_manifest("1.2.3"),
            Err(ManifestError::InvalidNumber("1.2.3".to_string()))
        );
        assert_eq!(
            parse_manifest(""),
            Err(ManifestError::InvalidNumber(String::new()))
        );
        assert_eq!(
            parse_manifest("--5"),
            Err(ManifestError::InvalidNumber("--5".to_string()))
        );
    }
}
