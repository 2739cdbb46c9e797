//! # Engine context
//!
//! `CalculusEngine` owns everything a derivative or integral computation shares: the
//! configuration and the two memo caches. Each cache sits behind its own `Mutex`, all
//! other data handed to parallel subtasks is an immutable subtree.
//!
//! A process-wide engine with default settings is available through
//! [`CalculusEngine::global`]; tests and benchmarks build isolated engines with
//! [`CalculusEngine::new`].
use crate::Utils::logger::{init_logger, parse_level};
use crate::Utils::task_parser::{Value, parse_document};
use crate::symbolic::symbolic_cache::LruCache;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_errors::CalculusError;
use log::{LevelFilter, info};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, OnceLock};

pub const DEFAULT_CACHE_CAPACITY: usize = 1000;
pub const DEFAULT_COMPLEXITY_THRESHOLD: usize = 10;
pub const DEFAULT_QUADRATURE_DEGREE: usize = 24;

/// Settings of a `CalculusEngine`.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// entries kept by each memo cache
    pub cache_capacity: usize,
    /// a term with more nodes than this is split into parallel subtasks
    pub complexity_threshold: usize,
    /// false forces sequential evaluation of every term
    pub parallel: bool,
    /// Gauss-Legendre degree of the definite-integral fallback
    pub quadrature_degree: usize,
    /// when set, `CalculusEngine::new` installs the terminal logger at this level
    pub loglevel: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            complexity_threshold: DEFAULT_COMPLEXITY_THRESHOLD,
            parallel: true,
            quadrature_degree: DEFAULT_QUADRATURE_DEGREE,
            loglevel: None,
        }
    }
}

fn single_value<'a>(key: &str, values: &'a [Value]) -> Result<&'a Value, CalculusError> {
    match values {
        [value] => Ok(value),
        _ => Err(CalculusError::Config(format!(
            "'{}' expects exactly one value, got {}",
            key,
            values.len()
        ))),
    }
}

fn positive_integer(key: &str, values: &[Value]) -> Result<usize, CalculusError> {
    match single_value(key, values)?.as_integer() {
        Some(n) if n >= 0 => Ok(n as usize),
        _ => Err(CalculusError::Config(format!(
            "'{}' must be a non-negative integer",
            key
        ))),
    }
}

impl EngineConfig {
    /// Reads the `engine` section of a settings document:
    ///
    /// ```text
    /// engine
    ///   cache_capacity: 500
    ///   complexity_threshold: 10
    ///   parallel: true
    ///   quadrature_degree: 32
    ///   loglevel: info
    /// ```
    /// Missing keys keep their defaults; unknown keys are rejected.
    pub fn from_document(document: &str) -> Result<Self, CalculusError> {
        let parsed = parse_document(document).map_err(CalculusError::Config)?;
        let section = parsed
            .get("engine")
            .ok_or_else(|| CalculusError::Config("section 'engine' not found".to_string()))?;
        let mut config = EngineConfig::default();
        for (key, values) in section {
            match key.as_str() {
                "cache_capacity" => config.cache_capacity = positive_integer(key, values)?,
                "complexity_threshold" => {
                    config.complexity_threshold = positive_integer(key, values)?
                }
                "quadrature_degree" => {
                    let degree = positive_integer(key, values)?;
                    if degree < 2 {
                        return Err(CalculusError::Config(
                            "'quadrature_degree' must be at least 2".to_string(),
                        ));
                    }
                    config.quadrature_degree = degree;
                }
                "parallel" => {
                    config.parallel = single_value(key, values)?.as_boolean().ok_or_else(|| {
                        CalculusError::Config("'parallel' must be true or false".to_string())
                    })?
                }
                "loglevel" => {
                    let level = single_value(key, values)?.to_string();
                    parse_level(&level).map_err(CalculusError::Config)?;
                    config.loglevel = Some(level);
                }
                other => {
                    return Err(CalculusError::Config(format!(
                        "unknown key '{}' in section 'engine'",
                        other
                    )));
                }
            }
        }
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CalculusError> {
        let document = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CalculusError::Config(format!("cannot read {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_document(&document)
    }

    /// Configuration with the parallel gate switched off.
    pub fn sequential() -> Self {
        EngineConfig {
            parallel: false,
            ..EngineConfig::default()
        }
    }
}

/// Shared state of derivative and integral computations.
#[derive(Debug)]
pub struct CalculusEngine {
    pub config: EngineConfig,
    pub(crate) derivative_cache: Mutex<LruCache<Expr>>,
    pub(crate) integral_cache: Mutex<LruCache<String>>,
}

impl Default for CalculusEngine {
    fn default() -> Self {
        CalculusEngine::new(EngineConfig::default())
    }
}

static GLOBAL_ENGINE: OnceLock<CalculusEngine> = OnceLock::new();

// a poisoned cache only means another task panicked mid-insert; the data is still a valid LRU
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl CalculusEngine {
    pub fn new(config: EngineConfig) -> Self {
        if let Some(level) = config.loglevel.as_deref() {
            let level = parse_level(level).unwrap_or(LevelFilter::Info);
            init_logger(level, false);
        }
        info!(
            "calculus engine: cache capacity {}, complexity threshold {}, parallel {}",
            config.cache_capacity, config.complexity_threshold, config.parallel
        );
        CalculusEngine {
            derivative_cache: Mutex::new(LruCache::new(config.cache_capacity)),
            integral_cache: Mutex::new(LruCache::new(config.cache_capacity)),
            config,
        }
    }

    /// Engine with default settings shared by the free functions of `calculus_api`.
    pub fn global() -> &'static CalculusEngine {
        GLOBAL_ENGINE.get_or_init(CalculusEngine::default)
    }

    /// true when `expr` is large enough to be split into parallel subtasks
    pub fn is_complex(&self, expr: &Expr) -> bool {
        self.config.parallel && expr.node_count() > self.config.complexity_threshold
    }

    /// Runs both closures, in parallel when `expr` is complex, and returns both results.
    pub fn join<A, B, RA, RB>(&self, expr: &Expr, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        if self.is_complex(expr) {
            rayon::join(a, b)
        } else {
            (a(), b())
        }
    }

    pub(crate) fn cached_derivative(&self, key: &str) -> Option<Expr> {
        lock(&self.derivative_cache).get(key)
    }

    pub(crate) fn store_derivative(&self, key: String, value: Expr) {
        lock(&self.derivative_cache).insert(key, value);
    }

    pub(crate) fn cached_integral(&self, key: &str) -> Option<String> {
        lock(&self.integral_cache).get(key)
    }

    pub(crate) fn store_integral(&self, key: String, value: String) {
        lock(&self.integral_cache).insert(key, value);
    }

    /// (derivative entries, integral entries)
    pub fn cache_sizes(&self) -> (usize, usize) {
        (
            lock(&self.derivative_cache).len(),
            lock(&self.integral_cache).len(),
        )
    }

    pub fn clear_caches(&self) {
        lock(&self.derivative_cache).clear();
        lock(&self.integral_cache).clear();
    }
}
