use crate::ExpressionEvaluationError;
use rdf_algebra_model::vocab::{rdf, xsd};
use rdf_algebra_model::{is_numeric_datatype, Literal, Numeric, Term};
use std::cmp::Ordering;

/// Computes the [effective boolean value](https://www.w3.org/TR/sparql11-query/#ebv) of a term.
///
/// Only booleans, strings, and numerics have an effective boolean value.
pub fn effective_boolean_value(term: &Term) -> Result<bool, ExpressionEvaluationError> {
    let Term::Literal(literal) = term else {
        return Err(ExpressionEvaluationError::TypeError);
    };

    let datatype = literal.datatype();
    if datatype == xsd::BOOLEAN {
        parse_boolean(literal)
    } else if datatype == xsd::STRING {
        Ok(!literal.value().is_empty())
    } else if is_numeric_datatype(datatype) {
        Ok(Numeric::from_literal(literal)
            .map(Numeric::effective_boolean_value)
            .unwrap_or(false))
    } else {
        Err(ExpressionEvaluationError::TypeError)
    }
}

/// [RDFterm-equal](https://www.w3.org/TR/sparql11-query/#func-RDFterm-equal) extended by the
/// value equality of numerics, strings, and booleans.
///
/// Two different literals of an unsupported datatype cannot be compared and raise an error.
pub fn equals(lhs: &Term, rhs: &Term) -> Result<bool, ExpressionEvaluationError> {
    let (Term::Literal(lhs_literal), Term::Literal(rhs_literal)) = (lhs, rhs) else {
        return Ok(lhs == rhs);
    };

    if let (Ok(lhs), Ok(rhs)) = (
        Numeric::from_literal(lhs_literal),
        Numeric::from_literal(rhs_literal),
    ) {
        return Ok(lhs.compare(rhs) == Some(Ordering::Equal));
    }
    if lhs_literal == rhs_literal {
        return Ok(true);
    }
    if lhs_literal.datatype() == xsd::BOOLEAN && rhs_literal.datatype() == xsd::BOOLEAN {
        return Ok(parse_boolean(lhs_literal)? == parse_boolean(rhs_literal)?);
    }
    if is_comparable_datatype(lhs_literal) && is_comparable_datatype(rhs_literal) {
        return Ok(false);
    }
    Err(ExpressionEvaluationError::TypeError)
}

/// Compares two terms for the ordering operators (`<`, `>`, ...).
///
/// Numerics, plain strings, and booleans can be ordered. Returns `Ok(None)` if the values are
/// unordered (e.g., `NaN`), and an error if the terms cannot be compared at all.
pub fn partial_compare(
    lhs: &Term,
    rhs: &Term,
) -> Result<Option<Ordering>, ExpressionEvaluationError> {
    let (Term::Literal(lhs), Term::Literal(rhs)) = (lhs, rhs) else {
        return Err(ExpressionEvaluationError::TypeError);
    };

    if is_numeric_datatype(lhs.datatype()) && is_numeric_datatype(rhs.datatype()) {
        let lhs = Numeric::from_literal(lhs)?;
        let rhs = Numeric::from_literal(rhs)?;
        return Ok(lhs.compare(rhs));
    }
    if lhs.datatype() == xsd::STRING && rhs.datatype() == xsd::STRING {
        return Ok(Some(lhs.value().cmp(rhs.value())));
    }
    if lhs.datatype() == xsd::BOOLEAN && rhs.datatype() == xsd::BOOLEAN {
        return Ok(Some(parse_boolean(lhs)?.cmp(&parse_boolean(rhs)?)));
    }
    Err(ExpressionEvaluationError::TypeError)
}

fn parse_boolean(literal: &Literal) -> Result<bool, ExpressionEvaluationError> {
    match literal.value() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ExpressionEvaluationError::TypeError),
    }
}

/// Literals of these datatypes are known to be different if they are not equal.
fn is_comparable_datatype(literal: &Literal) -> bool {
    let datatype = literal.datatype();
    datatype == xsd::STRING
        || datatype == rdf::LANG_STRING
        || datatype == xsd::BOOLEAN
        || is_numeric_datatype(datatype)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_algebra_model::NamedNode;

    #[test]
    fn test_effective_boolean_value() {
        assert!(effective_boolean_value(&Literal::from(true).into()).unwrap());
        assert!(!effective_boolean_value(&Literal::new_simple_literal("").into()).unwrap());
        assert!(!effective_boolean_value(&Literal::from(0.0_f64).into()).unwrap());
        assert!(effective_boolean_value(
            &NamedNode::new_unchecked("http://example.com/a").into()
        )
        .is_err());
    }

    #[test]
    fn test_equality_of_unknown_datatypes_fails() {
        let datatype = NamedNode::new_unchecked("http://example.com/datatype");
        let lhs = Literal::new_typed_literal("a", datatype.clone()).into();
        let rhs = Literal::new_typed_literal("b", datatype).into();
        assert!(equals(&lhs, &rhs).is_err());
        assert!(equals(&lhs, &lhs).unwrap());
    }

    #[test]
    fn test_language_strings_are_unequal() {
        let lhs = Literal::new_language_tagged_literal_unchecked("chat", "fr").into();
        let rhs = Literal::new_simple_literal("chat").into();
        assert!(!equals(&lhs, &rhs).unwrap());
    }

    #[test]
    fn test_string_ordering() {
        let lhs = Literal::new_simple_literal("a").into();
        let rhs = Literal::new_simple_literal("b").into();
        assert_eq!(partial_compare(&lhs, &rhs).unwrap(), Some(Ordering::Less));
    }
}
