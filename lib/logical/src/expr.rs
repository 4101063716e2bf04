use crate::join::JoinStrategy;
use crate::Algebra;
use itertools::Itertools;
use rdf_algebra_model::{Function, Literal, NamedNode, Variable};
use std::fmt::{Display, Formatter};

/// A SPARQL expression.
///
/// The type parameter `P` is the representation of the graph pattern of an `EXISTS` expression.
/// Expressions produced by a parser contain [Element](crate::Element)s, while the compiler turns
/// them into [ExistsPattern]s.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expression<P = ExistsPattern> {
    NamedNode(NamedNode),
    Literal(Literal),
    Variable(Variable),
    /// [Logical-or](https://www.w3.org/TR/sparql11-query/#func-logical-or).
    Or(Box<Self>, Box<Self>),
    /// [Logical-and](https://www.w3.org/TR/sparql11-query/#func-logical-and).
    And(Box<Self>, Box<Self>),
    /// [RDFterm-equal](https://www.w3.org/TR/sparql11-query/#func-RDFterm-equal) and all the XSD equalities.
    Equal(Box<Self>, Box<Self>),
    /// [sameTerm](https://www.w3.org/TR/sparql11-query/#func-sameTerm).
    SameTerm(Box<Self>, Box<Self>),
    Greater(Box<Self>, Box<Self>),
    GreaterOrEqual(Box<Self>, Box<Self>),
    Less(Box<Self>, Box<Self>),
    LessOrEqual(Box<Self>, Box<Self>),
    /// [IN](https://www.w3.org/TR/sparql11-query/#func-in)
    In(Box<Self>, Vec<Self>),
    Add(Box<Self>, Box<Self>),
    Subtract(Box<Self>, Box<Self>),
    Multiply(Box<Self>, Box<Self>),
    Divide(Box<Self>, Box<Self>),
    UnaryPlus(Box<Self>),
    UnaryMinus(Box<Self>),
    Not(Box<Self>),
    /// [EXISTS](https://www.w3.org/TR/sparql11-query/#func-filter-exists).
    Exists(Box<P>),
    /// [BOUND](https://www.w3.org/TR/sparql11-query/#func-bound).
    Bound(Variable),
    /// [IF](https://www.w3.org/TR/sparql11-query/#func-if).
    If(Box<Self>, Box<Self>, Box<Self>),
    /// [COALESCE](https://www.w3.org/TR/sparql11-query/#func-coalesce).
    Coalesce(Vec<Self>),
    /// A regular function call.
    FunctionCall(Function, Vec<Self>),
}

/// The compiled graph pattern of an `EXISTS` expression.
///
/// The strategy is selected against the operand of the enclosing filter and is always an
/// existence strategy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExistsPattern {
    pattern: Algebra,
    strategy: JoinStrategy,
}

impl ExistsPattern {
    /// Creates a new [ExistsPattern].
    pub fn new(pattern: Algebra, strategy: JoinStrategy) -> Self {
        Self { pattern, strategy }
    }

    /// The pattern that must (not) have a compatible solution.
    pub fn pattern(&self) -> &Algebra {
        &self.pattern
    }

    /// The strategy used for probing the pattern.
    pub fn strategy(&self) -> &JoinStrategy {
        &self.strategy
    }

    /// Returns the pattern, dropping the strategy.
    pub fn into_pattern(self) -> Algebra {
        self.pattern
    }
}

impl<P> Expression<P> {
    /// Creates a binary expression with boxed operands.
    fn binary(
        constructor: fn(Box<Self>, Box<Self>) -> Self,
        lhs: Self,
        rhs: Self,
    ) -> Self {
        constructor(Box::new(lhs), Box::new(rhs))
    }

    /// Creates an `lhs = rhs` expression.
    pub fn equal(lhs: Self, rhs: Self) -> Self {
        Self::binary(Self::Equal, lhs, rhs)
    }

    /// Creates an `lhs > rhs` expression.
    pub fn greater(lhs: Self, rhs: Self) -> Self {
        Self::binary(Self::Greater, lhs, rhs)
    }

    /// Creates an `lhs < rhs` expression.
    pub fn less(lhs: Self, rhs: Self) -> Self {
        Self::binary(Self::Less, lhs, rhs)
    }

    /// Creates an `lhs + rhs` expression.
    pub fn add(lhs: Self, rhs: Self) -> Self {
        Self::binary(Self::Add, lhs, rhs)
    }

    /// Creates an `lhs / rhs` expression.
    pub fn divide(lhs: Self, rhs: Self) -> Self {
        Self::binary(Self::Divide, lhs, rhs)
    }

    /// Creates a `!inner` expression.
    pub fn not(inner: Self) -> Self {
        Self::Not(Box::new(inner))
    }

    /// Creates an `EXISTS { pattern }` expression.
    pub fn exists(pattern: P) -> Self {
        Self::Exists(Box::new(pattern))
    }

    /// Creates a `NOT EXISTS { pattern }` expression.
    pub fn not_exists(pattern: P) -> Self {
        Self::not(Self::exists(pattern))
    }

    /// Rebuilds the expression, mapping the pattern of every `EXISTS` with `f`.
    ///
    /// Patterns are visited in the order they appear in the expression.
    pub fn try_map_patterns<Q, E>(
        self,
        f: &mut impl FnMut(P) -> Result<Q, E>,
    ) -> Result<Expression<Q>, E> {
        fn map_box<P, Q, E>(
            inner: Box<Expression<P>>,
            f: &mut impl FnMut(P) -> Result<Q, E>,
        ) -> Result<Box<Expression<Q>>, E> {
            Ok(Box::new((*inner).try_map_patterns(f)?))
        }

        fn map_vec<P, Q, E>(
            inner: Vec<Expression<P>>,
            f: &mut impl FnMut(P) -> Result<Q, E>,
        ) -> Result<Vec<Expression<Q>>, E> {
            inner
                .into_iter()
                .map(|expression| expression.try_map_patterns(f))
                .collect()
        }

        Ok(match self {
            Self::NamedNode(node) => Expression::NamedNode(node),
            Self::Literal(literal) => Expression::Literal(literal),
            Self::Variable(variable) => Expression::Variable(variable),
            Self::Bound(variable) => Expression::Bound(variable),
            Self::Or(lhs, rhs) => Expression::Or(map_box(lhs, f)?, map_box(rhs, f)?),
            Self::And(lhs, rhs) => Expression::And(map_box(lhs, f)?, map_box(rhs, f)?),
            Self::Equal(lhs, rhs) => Expression::Equal(map_box(lhs, f)?, map_box(rhs, f)?),
            Self::SameTerm(lhs, rhs) => Expression::SameTerm(map_box(lhs, f)?, map_box(rhs, f)?),
            Self::Greater(lhs, rhs) => Expression::Greater(map_box(lhs, f)?, map_box(rhs, f)?),
            Self::GreaterOrEqual(lhs, rhs) => {
                Expression::GreaterOrEqual(map_box(lhs, f)?, map_box(rhs, f)?)
            }
            Self::Less(lhs, rhs) => Expression::Less(map_box(lhs, f)?, map_box(rhs, f)?),
            Self::LessOrEqual(lhs, rhs) => {
                Expression::LessOrEqual(map_box(lhs, f)?, map_box(rhs, f)?)
            }
            Self::In(lhs, rhs) => Expression::In(map_box(lhs, f)?, map_vec(rhs, f)?),
            Self::Add(lhs, rhs) => Expression::Add(map_box(lhs, f)?, map_box(rhs, f)?),
            Self::Subtract(lhs, rhs) => Expression::Subtract(map_box(lhs, f)?, map_box(rhs, f)?),
            Self::Multiply(lhs, rhs) => Expression::Multiply(map_box(lhs, f)?, map_box(rhs, f)?),
            Self::Divide(lhs, rhs) => Expression::Divide(map_box(lhs, f)?, map_box(rhs, f)?),
            Self::UnaryPlus(inner) => Expression::UnaryPlus(map_box(inner, f)?),
            Self::UnaryMinus(inner) => Expression::UnaryMinus(map_box(inner, f)?),
            Self::Not(inner) => Expression::Not(map_box(inner, f)?),
            Self::Exists(pattern) => Expression::Exists(Box::new(f(*pattern)?)),
            Self::If(condition, then, otherwise) => Expression::If(
                map_box(condition, f)?,
                map_box(then, f)?,
                map_box(otherwise, f)?,
            ),
            Self::Coalesce(inner) => Expression::Coalesce(map_vec(inner, f)?),
            Self::FunctionCall(function, args) => {
                Expression::FunctionCall(function, map_vec(args, f)?)
            }
        })
    }
}

impl<P> From<Variable> for Expression<P> {
    fn from(value: Variable) -> Self {
        Self::Variable(value)
    }
}

impl<P> From<NamedNode> for Expression<P> {
    fn from(value: NamedNode) -> Self {
        Self::NamedNode(value)
    }
}

impl<P> From<Literal> for Expression<P> {
    fn from(value: Literal) -> Self {
        Self::Literal(value)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NamedNode(node) => write!(f, "{node}"),
            Self::Literal(literal) => write!(f, "{literal}"),
            Self::Variable(variable) => write!(f, "{variable}"),
            Self::Or(lhs, rhs) => write!(f, "({lhs} || {rhs})"),
            Self::And(lhs, rhs) => write!(f, "({lhs} && {rhs})"),
            Self::Equal(lhs, rhs) => write!(f, "({lhs} = {rhs})"),
            Self::SameTerm(lhs, rhs) => write!(f, "sameTerm({lhs}, {rhs})"),
            Self::Greater(lhs, rhs) => write!(f, "({lhs} > {rhs})"),
            Self::GreaterOrEqual(lhs, rhs) => write!(f, "({lhs} >= {rhs})"),
            Self::Less(lhs, rhs) => write!(f, "({lhs} < {rhs})"),
            Self::LessOrEqual(lhs, rhs) => write!(f, "({lhs} <= {rhs})"),
            Self::In(lhs, rhs) => write!(f, "({lhs} IN ({}))", rhs.iter().join(", ")),
            Self::Add(lhs, rhs) => write!(f, "({lhs} + {rhs})"),
            Self::Subtract(lhs, rhs) => write!(f, "({lhs} - {rhs})"),
            Self::Multiply(lhs, rhs) => write!(f, "({lhs} * {rhs})"),
            Self::Divide(lhs, rhs) => write!(f, "({lhs} / {rhs})"),
            Self::UnaryPlus(inner) => write!(f, "+{inner}"),
            Self::UnaryMinus(inner) => write!(f, "-{inner}"),
            Self::Not(inner) => write!(f, "!{inner}"),
            Self::Exists(pattern) => write!(f, "EXISTS[{}]", pattern.strategy()),
            Self::Bound(variable) => write!(f, "BOUND({variable})"),
            Self::If(condition, then, otherwise) => {
                write!(f, "IF({condition}, {then}, {otherwise})")
            }
            Self::Coalesce(inner) => write!(f, "COALESCE({})", inner.iter().join(", ")),
            Self::FunctionCall(function, args) => {
                write!(f, "{function}({})", args.iter().join(", "))
            }
        }
    }
}
