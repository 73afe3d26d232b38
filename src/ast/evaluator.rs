use crate::ast::{ExpressionNode, ParseError, Parser};
use crate::Error;
use log::debug;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Parses and evaluates expressions, remembering the most recently parsed
/// trees so repeated sources skip the parser.
pub struct Evaluator {
    cache: LruCache<String, Arc<ExpressionNode>>,
}

impl Evaluator {
    /// Creates a new `Evaluator` with a given maximum cache size. A size of
    /// zero is treated as one.
    pub fn new(max_cache_size: usize) -> Self {
        let capacity = NonZeroUsize::new(max_cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Parse an expression string into a tree, reusing a cached one when the
    /// same source was parsed before. Failed parses are not cached.
    pub fn parse_expression(&mut self, expression: &str) -> Result<Arc<ExpressionNode>, ParseError> {
        if let Some(ast) = self.cache.get(expression) {
            debug!("Cache hit for expression: {}", expression);
            return Ok(Arc::clone(ast));
        }

        let ast = Arc::new(Parser::parse_expression(expression)?);
        self.cache.put(expression.to_string(), Arc::clone(&ast));
        Ok(ast)
    }

    /// Evaluates a given expression string against one variable assignment.
    ///
    /// # Arguments
    ///
    /// * `expression` - The prefix-notation source.
    /// * `values` - Variable values, indexed by [`Variable::index`](crate::ast::Variable::index).
    pub fn evaluate_expression(&mut self, expression: &str, values: &[f64]) -> Result<f64, Error> {
        let ast = self.parse_expression(expression)?;
        Ok(ast.evaluate(values)?)
    }

    /// Evaluates a given expression string against many assignments at once.
    pub fn evaluate_batch<V>(&mut self, expression: &str, rows: &[V]) -> Result<Vec<f64>, Error>
    where
        V: AsRef<[f64]> + Sync,
    {
        let ast = self.parse_expression(expression)?;
        debug!("Evaluating {} rows of: {}", rows.len(), expression);
        Ok(ast.evaluate_batch(rows)?)
    }

    /// Number of trees currently cached.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(100)
    }
}
