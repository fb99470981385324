use crate::error::EvalError;
use crate::Expr;
use rustc_hash::FxHashMap;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

/// Symbolic derivative rule.
/// Arguments: (args of the function call, derivatives of the arguments)
/// Returns the total derivative dA/dx = sum( (dA/d_arg_i) * (d_arg_i/dx) )
pub(crate) type DerivativeRule = fn(&[Expr], &[Expr]) -> Expr;

/// Definition of a function including its evaluation and differentiation logic
#[derive(Clone)]
pub(crate) struct FunctionDefinition {
    /// Canonical name of the function (e.g., "sin", "sqrt")
    pub name: &'static str,

    /// Acceptable argument count (arity)
    pub arity: RangeInclusive<usize>,

    /// Real-valued evaluation; domain violations are reported, divergence is not
    pub eval: fn(&[f64]) -> Result<f64, EvalError>,

    /// `None` for functions without a derivative rule (step functions)
    pub derivative: Option<DerivativeRule>,
}

impl FunctionDefinition {
    /// Helper to check if argument count is valid
    pub(crate) fn validate_arity(&self, args: usize) -> bool {
        self.arity.contains(&args)
    }

    /// Human-readable arity for error messages
    pub(crate) fn arity_description(&self) -> String {
        let (lo, hi) = (*self.arity.start(), *self.arity.end());
        if lo == hi {
            lo.to_string()
        } else {
            format!("{lo} to {hi}")
        }
    }
}

/// Static registry storing all function definitions
static REGISTRY: OnceLock<FxHashMap<&'static str, FunctionDefinition>> = OnceLock::new();

/// Initialize the registry with all function definitions
fn init_registry() -> FxHashMap<&'static str, FunctionDefinition> {
    crate::functions::definitions::all_definitions()
        .into_iter()
        .map(|def| (def.name, def))
        .collect()
}

/// Central registry for getting function definitions
pub(crate) struct Registry;

impl Registry {
    /// Get a function definition by name - O(1) HashMap lookup
    pub(crate) fn get(name: &str) -> Option<&'static FunctionDefinition> {
        REGISTRY.get_or_init(init_registry).get(name)
    }

    /// Check whether a name is a supported function
    pub(crate) fn contains(name: &str) -> bool {
        Self::get(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        let sqrt = Registry::get("sqrt").expect("sqrt is registered");
        assert_eq!(sqrt.name, "sqrt");
        assert!(sqrt.validate_arity(1));
        assert!(!sqrt.validate_arity(2));
        assert!(Registry::get("besselj").is_none());
    }

    #[test]
    fn test_log_accepts_optional_base() {
        let log = Registry::get("log").expect("log is registered");
        assert!(log.validate_arity(1));
        assert!(log.validate_arity(2));
        assert_eq!(log.arity_description(), "1 to 2");
    }

    #[test]
    fn test_step_functions_have_no_derivative() {
        for name in ["sign", "floor", "ceil", "round"] {
            let def = Registry::get(name).expect("registered");
            assert!(def.derivative.is_none(), "{name} should have no rule");
        }
        assert!(Registry::get("sin").and_then(|d| d.derivative).is_some());
    }
}
