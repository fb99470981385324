//! Real-valued point evaluation of an expression tree
//!
//! Walks the tree directly. Divergence follows IEEE arithmetic (`1/0 = ∞`,
//! `ln(0) = -∞`); forms with no real value at all are reported as
//! [`EvalError`]s so callers can tell the two apart.

use crate::ast::known_constant;
use crate::error::EvalError;
use crate::functions::registry::Registry;
use crate::traits::is_integer;
use crate::{Expr, ExprKind};

/// Evaluate `expr` with `var` bound to `x`
///
/// Returns the raw `f64`, which may be infinite or NaN; only real-domain
/// violations are errors.
pub(crate) fn eval_at(expr: &Expr, var: &str, x: f64) -> Result<f64, EvalError> {
    match &expr.kind {
        ExprKind::Number(n) => Ok(*n),

        ExprKind::Symbol(name) => {
            if let Some(value) = known_constant(name) {
                Ok(value)
            } else if name == var {
                Ok(x)
            } else {
                Err(EvalError::UnboundSymbol(name.clone()))
            }
        }

        ExprKind::Add(l, r) => Ok(eval_at(l, var, x)? + eval_at(r, var, x)?),
        ExprKind::Sub(l, r) => Ok(eval_at(l, var, x)? - eval_at(r, var, x)?),
        ExprKind::Mul(l, r) => Ok(eval_at(l, var, x)? * eval_at(r, var, x)?),

        ExprKind::Div(l, r) => {
            let num = eval_at(l, var, x)?;
            let den = eval_at(r, var, x)?;
            if num == 0.0 && den == 0.0 {
                return Err(EvalError::Indeterminate { form: "0/0" });
            }
            Ok(num / den)
        }

        ExprKind::Pow(base, exp) => {
            let b = eval_at(base, var, x)?;
            let e = eval_at(exp, var, x)?;
            power(b, e)
        }

        ExprKind::FunctionCall { name, args } => {
            let def = Registry::get(name)
                .ok_or_else(|| EvalError::UnknownFunction(name.clone()))?;
            if !def.validate_arity(args.len()) {
                return Err(EvalError::Arity {
                    name: name.clone(),
                    got: args.len(),
                });
            }
            let values = args
                .iter()
                .map(|a| eval_at(a, var, x))
                .collect::<Result<Vec<_>, _>>()?;
            (def.eval)(&values)
        }
    }
}

/// Real power: integer exponents use `powi`, negative bases need one
fn power(base: f64, exponent: f64) -> Result<f64, EvalError> {
    if is_integer(exponent) && exponent.abs() <= f64::from(i32::MAX) {
        return Ok(base.powi(exponent as i32));
    }
    if base < 0.0 && exponent.is_finite() {
        return Err(EvalError::ComplexPower { base, exponent });
    }
    Ok(base.powf(exponent))
}
