use crate::join::{JoinStrategy, JoinStrategySelector};
use crate::{
    Algebra, Bgp, CompilationError, CompilerOptions, Element, ElementExpression, ExistsPattern,
    Expression, Extend, Filter, Join, LeftJoin, Minus, NamedGraph, Project, PropertyPath,
    QueryCompiler, Service, Table, TriplePath, Union,
};
use rdf_algebra_model::{TermPattern, TriplePattern, Variable};
use std::collections::BTreeSet;
use std::mem::take;

/// Compiles a graph pattern [Element] into an [Algebra].
///
/// The compiler walks the element tree depth-first and threads an accumulator through it. Each
/// element combines the accumulator with its own algebra and returns the new accumulator.
/// Elements that open a new scope (`OPTIONAL`, `MINUS`, `UNION` branches, `GRAPH`, `SERVICE`) are
/// compiled from a fresh unit seed and only composed with the accumulator afterward.
#[derive(Clone, Copy, Debug, Default)]
pub struct ElementCompiler {
    options: CompilerOptions,
    selector: JoinStrategySelector,
}

impl ElementCompiler {
    /// Creates a new [ElementCompiler].
    pub fn new(options: CompilerOptions) -> Self {
        Self {
            options,
            selector: JoinStrategySelector::from(options),
        }
    }

    /// Returns the join strategy selector of this compiler.
    pub fn selector(&self) -> &JoinStrategySelector {
        &self.selector
    }

    /// Compiles `element`, seeded with the unit table.
    pub fn compile(&self, element: &Element) -> Result<Algebra, CompilationError> {
        self.compile_with_seed(Algebra::unit(), element)
    }

    /// Compiles `element` and composes it with the accumulator `acc`.
    pub fn compile_with_seed(
        &self,
        acc: Algebra,
        element: &Element,
    ) -> Result<Algebra, CompilationError> {
        match element {
            Element::TripleBlock(patterns) => {
                let mut scope = BlankNodeScope::default();
                let patterns = scope.triples(patterns);
                Ok(self.join(acc, scope.close(bgp(patterns))))
            }
            Element::PathBlock(paths) => {
                let mut scope = BlankNodeScope::default();
                let paths = scope.paths(paths);
                if scope.is_empty() {
                    return Ok(self.compile_path_block(acc, &paths));
                }
                let block = self.compile_path_block(Algebra::unit(), &paths);
                Ok(self.join(acc, scope.close(block)))
            }
            Element::Filter(expressions) => {
                let expressions = self.compile_expressions(&acc, expressions)?;
                Ok(Filter::create(acc, expressions))
            }
            Element::Bind(assignments) => {
                let assignments = assignments
                    .iter()
                    .map(|(variable, expression)| {
                        Ok((variable.clone(), self.compile_expression(&acc, expression)?))
                    })
                    .collect::<Result<Vec<(Variable, Expression)>, CompilationError>>()?;
                Ok(Extend::create(acc, assignments))
            }
            Element::Optional(inner) => self.compile_optional(acc, inner),
            Element::Minus(inner) => {
                let rhs = self.compile(inner)?;
                Ok(Minus::create(acc, rhs, &self.selector).into())
            }
            Element::Union(branches) => {
                let union = self.compile_union(branches)?;
                Ok(self.join(acc, union))
            }
            Element::Group(elements) => self.compile_group(acc, elements),
            Element::NamedGraph { graph, inner } => {
                let inner = self.compile(inner)?;
                Ok(self.join(acc, NamedGraph::new(graph.clone(), inner).into()))
            }
            Element::Service {
                endpoint,
                inner,
                silent,
            } => {
                let inner = self.compile(inner)?;
                let service = Service::new(inner, endpoint.clone(), *silent);
                Ok(self.join(acc, service.into()))
            }
            Element::SubQuery(query) => {
                let sub_query = QueryCompiler::new(self.options).compile(query)?;
                Ok(self.join(acc, sub_query))
            }
            Element::Data(data) => {
                let table = Table::try_from_inline_data(data)?;
                Ok(self.join(acc, table.into()))
            }
        }
    }

    fn join(&self, lhs: Algebra, rhs: Algebra) -> Algebra {
        Join::create(lhs, rhs, &self.selector)
    }

    /// Groups consecutive plain triples into one [Bgp] and joins each property path separately.
    fn compile_path_block(&self, mut acc: Algebra, paths: &[TriplePath]) -> Algebra {
        let mut current_triples = Vec::new();
        for path in paths {
            if let Some(triple) = path.as_triple() {
                current_triples.push(triple);
                continue;
            }

            acc = self.join(acc, bgp(take(&mut current_triples)));
            if let TriplePath::Path {
                subject,
                path,
                object,
            } = path
            {
                let path = PropertyPath::new(subject.clone(), path.clone(), object.clone());
                acc = self.join(acc, path.into());
            }
        }
        self.join(acc, bgp(current_triples))
    }

    /// Compiles the optional element on its own and left-joins it with the accumulator.
    ///
    /// If the optional element compiles to a filter, the filter becomes the condition of the
    /// left join.
    fn compile_optional(&self, acc: Algebra, inner: &Element) -> Result<Algebra, CompilationError> {
        let (rhs, filters) = match self.compile(inner)? {
            Algebra::Filter(filter) => filter.into_parts(),
            rhs => (rhs, Vec::new()),
        };
        let filters = self.select_left_join_existence(&acc, &rhs, filters)?;
        let strategy = self.selector.select(&acc, &rhs);
        Ok(LeftJoin::new(acc, rhs, filters, strategy).into())
    }

    /// The condition of a left join is evaluated on the joined solutions. The strategies of its
    /// `EXISTS` patterns are selected again against the variables of both operands.
    fn select_left_join_existence(
        &self,
        lhs: &Algebra,
        rhs: &Algebra,
        filters: Vec<Expression>,
    ) -> Result<Vec<Expression>, CompilationError> {
        let projected = lhs
            .projected_variables()
            .union(rhs.projected_variables())
            .cloned()
            .collect::<BTreeSet<_>>();
        let fixed = lhs
            .fixed_variables()
            .union(rhs.fixed_variables())
            .cloned()
            .collect::<BTreeSet<_>>();

        filters
            .into_iter()
            .map(|expression| {
                expression.try_map_patterns(&mut |pattern: ExistsPattern| {
                    let pattern = pattern.into_pattern();
                    let inner = self.selector.select_for_variables(
                        &projected,
                        &fixed,
                        pattern.projected_variables(),
                        pattern.fixed_variables(),
                    );
                    let strategy = JoinStrategy::Existence(Box::new(inner));
                    Ok::<_, CompilationError>(ExistsPattern::new(pattern, strategy))
                })
            })
            .collect()
    }

    /// Compiles every branch on its own and folds them to the right.
    fn compile_union(&self, branches: &[Element]) -> Result<Algebra, CompilationError> {
        let mut compiled = branches
            .iter()
            .map(|branch| self.compile(branch))
            .collect::<Result<Vec<_>, _>>()?;

        let mut result = compiled.pop().ok_or(CompilationError::EmptyUnion)?;
        while let Some(lhs) = compiled.pop() {
            result = Union::new(lhs, result).into();
        }
        Ok(result)
    }

    /// Compiles the non-filter elements of a group in order, joins the group with the
    /// accumulator, and applies the filters of the group to the result.
    fn compile_group(&self, acc: Algebra, elements: &[Element]) -> Result<Algebra, CompilationError> {
        let mut filters = Vec::new();
        let mut scope = BlankNodeScope::default();
        let mut group = Algebra::unit();
        for element in elements {
            match element {
                Element::Filter(expressions) => filters.extend(expressions),
                Element::TripleBlock(patterns) => {
                    group = self.join(group, bgp(scope.triples(patterns)));
                }
                Element::PathBlock(paths) => {
                    group = self.compile_path_block(group, &scope.paths(paths));
                }
                element => group = self.compile_with_seed(group, element)?,
            }
        }

        let joined = self.join(acc, scope.close(group));
        let expressions = filters
            .into_iter()
            .map(|expression| self.compile_expression(&joined, expression))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Filter::create(joined, expressions))
    }

    fn compile_expressions(
        &self,
        filtered: &Algebra,
        expressions: &[ElementExpression],
    ) -> Result<Vec<Expression>, CompilationError> {
        expressions
            .iter()
            .map(|expression| self.compile_expression(filtered, expression))
            .collect()
    }

    /// Compiles the `EXISTS` patterns of `expression`. Their strategies are selected against
    /// `filtered`, the algebra whose solutions the expression is evaluated on.
    fn compile_expression(
        &self,
        filtered: &Algebra,
        expression: &ElementExpression,
    ) -> Result<Expression, CompilationError> {
        expression.clone().try_map_patterns(&mut |pattern| {
            let pattern = self.compile(&pattern)?;
            let strategy = self.selector.select_existence(filtered, &pattern);
            Ok(ExistsPattern::new(pattern, strategy))
        })
    }
}

/// Replaces the blank nodes of a basic graph pattern with variables that are removed from its
/// solutions.
///
/// A blank node label is scoped to its basic graph pattern. The pattern may be compiled into
/// several [Bgp] and [PropertyPath] nodes, and the variable keeps all occurrences of a label
/// connected.
#[derive(Debug, Default)]
struct BlankNodeScope {
    hidden: BTreeSet<Variable>,
}

impl BlankNodeScope {
    fn is_empty(&self) -> bool {
        self.hidden.is_empty()
    }

    fn triples(&mut self, patterns: &[TriplePattern]) -> Vec<TriplePattern> {
        patterns.iter().map(|pattern| self.triple(pattern)).collect()
    }

    fn paths(&mut self, paths: &[TriplePath]) -> Vec<TriplePath> {
        paths
            .iter()
            .map(|path| match path {
                TriplePath::Triple(pattern) => TriplePath::Triple(self.triple(pattern)),
                TriplePath::Path {
                    subject,
                    path,
                    object,
                } => TriplePath::Path {
                    subject: self.term(subject),
                    path: path.clone(),
                    object: self.term(object),
                },
            })
            .collect()
    }

    fn triple(&mut self, pattern: &TriplePattern) -> TriplePattern {
        TriplePattern {
            subject: self.term(&pattern.subject),
            predicate: pattern.predicate.clone(),
            object: self.term(&pattern.object),
        }
    }

    /// `_:b` becomes `?_:b`, which is not a valid SPARQL variable name and can't clash with a
    /// variable of the query.
    fn term(&mut self, term: &TermPattern) -> TermPattern {
        let TermPattern::BlankNode(node) = term else {
            return term.clone();
        };
        let variable = Variable::new_unchecked(format!("_:{}", node.as_str()));
        self.hidden.insert(variable.clone());
        TermPattern::Variable(variable)
    }

    /// Removes the hidden variables from the solutions of `algebra`.
    fn close(self, algebra: Algebra) -> Algebra {
        if self.hidden.is_empty() {
            return algebra;
        }
        let projection = algebra
            .projected_variables()
            .difference(&self.hidden)
            .cloned()
            .collect();
        Project::new(algebra, projection).into()
    }
}

fn bgp(patterns: Vec<TriplePattern>) -> Algebra {
    if patterns.is_empty() {
        return Algebra::unit();
    }
    Bgp::new(patterns).into()
}
