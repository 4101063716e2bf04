use crate::ExpressionEvaluationError;
use rdf_algebra_model::vocab::{rdf, xsd};
use rdf_algebra_model::{is_numeric_datatype, Function, Literal, Term};

/// Evaluates a built-in function call on already evaluated arguments.
pub(super) fn evaluate_function(
    function: &Function,
    args: &[Term],
) -> Result<Term, ExpressionEvaluationError> {
    match (function, args) {
        (Function::Str, [arg]) => to_str(arg),
        (Function::Lang, [Term::Literal(literal)]) => {
            Ok(Literal::new_simple_literal(literal.language().unwrap_or_default()).into())
        }
        (Function::Datatype, [Term::Literal(literal)]) => {
            Ok(literal.datatype().into_owned().into())
        }
        (Function::IsIri, [arg]) => Ok(boolean(matches!(arg, Term::NamedNode(_)))),
        (Function::IsBlank, [arg]) => Ok(boolean(matches!(arg, Term::BlankNode(_)))),
        (Function::IsLiteral, [arg]) => Ok(boolean(matches!(arg, Term::Literal(_)))),
        (Function::IsNumeric, [arg]) => Ok(boolean(matches!(
            arg,
            Term::Literal(literal) if is_numeric_datatype(literal.datatype())
        ))),
        (Function::StrLen, [arg]) => {
            let length = string_literal(arg)?.value().chars().count();
            let length =
                i64::try_from(length).map_err(|_| ExpressionEvaluationError::TypeError)?;
            Ok(Literal::from(length).into())
        }
        (Function::UCase, [arg]) => map_string(arg, str::to_uppercase),
        (Function::LCase, [arg]) => map_string(arg, str::to_lowercase),
        (Function::Contains, [lhs, rhs]) => {
            string_predicate(lhs, rhs, |lhs, rhs| lhs.contains(rhs))
        }
        (Function::StrStarts, [lhs, rhs]) => {
            string_predicate(lhs, rhs, |lhs, rhs| lhs.starts_with(rhs))
        }
        (Function::StrEnds, [lhs, rhs]) => {
            string_predicate(lhs, rhs, |lhs, rhs| lhs.ends_with(rhs))
        }
        (
            Function::Str
            | Function::Lang
            | Function::Datatype
            | Function::IsIri
            | Function::IsBlank
            | Function::IsLiteral
            | Function::IsNumeric
            | Function::StrLen
            | Function::UCase
            | Function::LCase
            | Function::Contains
            | Function::StrStarts
            | Function::StrEnds,
            _,
        ) => Err(ExpressionEvaluationError::TypeError),
        (function, _) => Err(ExpressionEvaluationError::UnsupportedFunction(
            function.to_string(),
        )),
    }
}

/// [STR](https://www.w3.org/TR/sparql11-query/#func-str)
fn to_str(arg: &Term) -> Result<Term, ExpressionEvaluationError> {
    match arg {
        Term::NamedNode(node) => Ok(Literal::new_simple_literal(node.as_str()).into()),
        Term::Literal(literal) => Ok(Literal::new_simple_literal(literal.value()).into()),
        Term::BlankNode(_) => Err(ExpressionEvaluationError::TypeError),
    }
}

/// Returns the argument if it is a simple literal, an `xsd:string`, or a language-tagged string.
fn string_literal(arg: &Term) -> Result<&Literal, ExpressionEvaluationError> {
    match arg {
        Term::Literal(literal)
            if literal.datatype() == xsd::STRING || literal.datatype() == rdf::LANG_STRING =>
        {
            Ok(literal)
        }
        _ => Err(ExpressionEvaluationError::TypeError),
    }
}

/// Applies `f` to the lexical form of a string, keeping the language tag.
fn map_string(arg: &Term, f: impl Fn(&str) -> String) -> Result<Term, ExpressionEvaluationError> {
    let literal = string_literal(arg)?;
    let value = f(literal.value());
    Ok(match literal.language() {
        Some(language) => Literal::new_language_tagged_literal_unchecked(value, language),
        None => Literal::new_simple_literal(value),
    }
    .into())
}

/// Evaluates a string predicate on two [argument-compatible](https://www.w3.org/TR/sparql11-query/#func-arg-compatibility)
/// strings.
fn string_predicate(
    lhs: &Term,
    rhs: &Term,
    predicate: impl Fn(&str, &str) -> bool,
) -> Result<Term, ExpressionEvaluationError> {
    let (lhs, rhs) = (string_literal(lhs)?, string_literal(rhs)?);
    if let Some(rhs_language) = rhs.language() {
        if lhs.language() != Some(rhs_language) {
            return Err(ExpressionEvaluationError::TypeError);
        }
    }
    Ok(boolean(predicate(lhs.value(), rhs.value())))
}

fn boolean(value: bool) -> Term {
    Literal::from(value).into()
}
