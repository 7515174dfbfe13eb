use std::{
    fmt::{self, Display},
    time::Instant,
};

use chrono::Utc;
use tracing::{debug, error};

use crate::{
    config::CompilerConfig,
    parser::{
        analyzer::{AnalyzerError, InternalError, NormalizeContext},
        ast::Query,
        ParseError, QueryParser,
    },
};

/// Any failure of `compile`.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    Syntax(ParseError),
    Semantic(AnalyzerError),
    Internal(InternalError),
}

impl CompileError {
    /// The failure is a compiler bug rather than a problem with the query text.
    pub fn is_internal(&self) -> bool {
        matches!(self, CompileError::Internal(_))
    }
}

impl From<ParseError> for CompileError {
    fn from(err: ParseError) -> Self {
        CompileError::Syntax(err)
    }
}

impl From<AnalyzerError> for CompileError {
    fn from(err: AnalyzerError) -> Self {
        CompileError::Semantic(err)
    }
}

impl From<InternalError> for CompileError {
    fn from(err: InternalError) -> Self {
        CompileError::Internal(err)
    }
}

impl Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Syntax(err) => write!(f, "{}", err),
            CompileError::Semantic(err) => write!(f, "{}", err),
            CompileError::Internal(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CompileError {}

#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Parses and normalizes `source` into a fully resolved query whose root
    /// carries the compilation metadata.
    pub fn compile(&self, source: &str) -> Result<Query, CompileError> {
        let span = tracing::debug_span!(
            "compile",
            len = source.len(),
            queries = tracing::field::Empty,
            views = tracing::field::Empty,
        );
        let _guard = span.enter();
        let started = Instant::now();

        let result = self.compile_source(source, started);
        match &result {
            Ok(query) => {
                if let Some(meta) = &query.meta {
                    span.record("queries", meta.query_graph.len());
                    span.record("views", meta.view_graph.len());
                    debug!(
                        elapsed_ns = meta.elapsed_time,
                        columns = meta.next_column_id - 1,
                        parameters = meta.parameters.len(),
                        "compiled"
                    );
                }
            },
            Err(err) if err.is_internal() => error!(%err, "compilation failed"),
            Err(err) => debug!(%err, "query rejected"),
        }
        result
    }

    fn compile_source(&self, source: &str, started: Instant) -> Result<Query, CompileError> {
        if let Some(max) = self.config.max_source_length {
            if source.len() > max {
                let message = format!("The source exceeds the maximum length of {} bytes", max);
                return Err(ParseError::at_start(&message, source).into());
            }
        }

        let max_depth = self.config.max_nesting_depth.unwrap_or(usize::MAX);
        let mut parser = QueryParser::new(source).with_max_depth(max_depth);
        let mut query = Query::parse(&mut parser)?;

        let mut meta = NormalizeContext::new(self.config.max_nesting_depth).normalize(&mut query)?;
        meta.version = self.config.format_version.clone();
        meta.date = Utc::now();
        meta.elapsed_time = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);
        meta.source = source.to_string();

        query.meta = Some(Box::new(meta));
        Ok(query)
    }
}

/// Compiles `source` with the default configuration.
pub fn compile(source: &str) -> Result<Query, CompileError> {
    Compiler::default().compile(source)
}
