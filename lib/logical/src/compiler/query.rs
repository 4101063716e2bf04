use crate::{
    Algebra, CompilationError, CompilerOptions, Distinct, DuplicateHandling, ElementCompiler,
    Join, Project, Query, Reduced, Slice, Table,
};

/// Compiles a whole [Query] into an [Algebra].
///
/// The `WHERE` clause is compiled first, then the query-level `VALUES` block is joined, followed
/// by the projection, the duplicate handling, and the slice.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryCompiler {
    element_compiler: ElementCompiler,
}

impl QueryCompiler {
    /// Creates a new [QueryCompiler].
    pub fn new(options: CompilerOptions) -> Self {
        Self {
            element_compiler: ElementCompiler::new(options),
        }
    }

    /// Compiles `query`.
    pub fn compile(&self, query: &Query) -> Result<Algebra, CompilationError> {
        let mut algebra = match &query.where_clause {
            Some(where_clause) => self.element_compiler.compile(where_clause)?,
            None => Algebra::unit(),
        };

        if let Some(values) = &query.values_clause {
            let table = Table::try_from_inline_data(values)?;
            algebra = Join::create(algebra, table.into(), self.element_compiler.selector());
        }

        if let Some(projection) = &query.projection {
            algebra = Project::new(algebra, projection.clone()).into();
        }

        algebra = match query.duplicates {
            DuplicateHandling::Keep => algebra,
            DuplicateHandling::Distinct => Distinct::new(algebra).into(),
            DuplicateHandling::Reduced => Reduced::new(algebra).into(),
        };

        if query.has_limit() || query.has_offset() {
            algebra = Slice::new(algebra, query.offset, query.limit).into();
        }

        tracing::debug!("Compiled query:\n{algebra}");
        Ok(algebra)
    }
}
