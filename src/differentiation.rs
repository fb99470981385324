// Differentiation engine - applies calculus rules
//
// Inline optimizations (0 + x → x, 1 * x → x) keep intermediate trees small;
// the simplification pass tidies whatever remains.

use crate::error::DifferentiationError;
use crate::expression::Expression;
use crate::functions::mul_opt;
use crate::functions::registry::Registry;
use crate::simplification::simplify;
use crate::{Expr, ExprKind};

/// Sum with zero short-circuits
fn add_opt(a: Expr, b: Expr) -> Expr {
    if a.is_zero_num() {
        b
    } else if b.is_zero_num() {
        a
    } else {
        Expr::add_expr(a, b)
    }
}

/// Difference with zero short-circuits
fn sub_opt(a: Expr, b: Expr) -> Expr {
    if b.is_zero_num() {
        a
    } else if a.is_zero_num() {
        Expr::neg(b)
    } else {
        Expr::sub_expr(a, b)
    }
}

impl Expr {
    /// Differentiate this expression with respect to `var`
    ///
    /// Named constants (`pi`, `e`) and other symbols differentiate to zero.
    ///
    /// # Errors
    /// `NoRule` when a step function (`sign`, `floor`, ...) is applied to
    /// something that depends on `var`.
    pub(crate) fn derive(&self, var: &str) -> Result<Expr, DifferentiationError> {
        Ok(match &self.kind {
            // Base cases
            ExprKind::Number(_) => Expr::number(0.0),

            ExprKind::Symbol(name) => {
                if name == var {
                    Expr::number(1.0)
                } else {
                    Expr::number(0.0)
                }
            }

            // Chain rule through the registry
            ExprKind::FunctionCall { name, args } => {
                let def = Registry::get(name)
                    .ok_or_else(|| DifferentiationError::UnknownFunction(name.clone()))?;

                if !args.iter().any(|a| a.contains_var(var)) {
                    return Ok(Expr::number(0.0));
                }
                let rule = def
                    .derivative
                    .ok_or_else(|| DifferentiationError::NoRule(name.clone()))?;

                let arg_primes = args
                    .iter()
                    .map(|arg| arg.derive(var))
                    .collect::<Result<Vec<_>, _>>()?;
                rule(args, &arg_primes)
            }

            // Sum rule: (u + v)' = u' + v'
            ExprKind::Add(u, v) => add_opt(u.derive(var)?, v.derive(var)?),

            // Subtraction rule: (u - v)' = u' - v'
            ExprKind::Sub(u, v) => sub_opt(u.derive(var)?, v.derive(var)?),

            // Product rule: (u * v)' = u' * v + u * v'
            ExprKind::Mul(u, v) => {
                let u_prime = u.derive(var)?;
                let v_prime = v.derive(var)?;
                let term1 = mul_opt(u_prime, (**v).clone());
                let term2 = mul_opt((**u).clone(), v_prime);
                add_opt(term1, term2)
            }

            // Quotient rule: (u / v)' = (u' * v - u * v') / v^2
            ExprKind::Div(u, v) => {
                let u_prime = u.derive(var)?;
                let v_prime = v.derive(var)?;

                if v_prime.is_zero_num() {
                    // Constant denominator: u' / v
                    if u_prime.is_zero_num() {
                        Expr::number(0.0)
                    } else if v.is_one_num() {
                        u_prime
                    } else {
                        Expr::div_expr(u_prime, (**v).clone())
                    }
                } else {
                    let numerator = sub_opt(
                        mul_opt(u_prime, (**v).clone()),
                        mul_opt((**u).clone(), v_prime),
                    );
                    if numerator.is_zero_num() {
                        Expr::number(0.0)
                    } else {
                        Expr::div_expr(numerator, Expr::pow((**v).clone(), Expr::number(2.0)))
                    }
                }
            }

            ExprKind::Pow(u, v) => {
                if !v.contains_var(var) {
                    // Constant exponent - standard power rule
                    // (u^n)' = n * u^(n-1) * u'
                    let u_prime = u.derive(var)?;
                    if u_prime.is_zero_num() {
                        return Ok(Expr::number(0.0));
                    }
                    let n = (**v).clone();
                    match n.as_number() {
                        Some(n_val) if n_val == 0.0 => Expr::number(0.0),
                        Some(n_val) if n_val == 1.0 => u_prime,
                        Some(n_val) => {
                            let lowered = if n_val - 1.0 == 1.0 {
                                (**u).clone()
                            } else {
                                Expr::pow((**u).clone(), Expr::number(n_val - 1.0))
                            };
                            mul_opt(Expr::mul_expr(n, lowered), u_prime)
                        }
                        None => {
                            // Non-numeric constant exponent such as pi
                            let lowered = Expr::pow(
                                (**u).clone(),
                                Expr::sub_expr(n.clone(), Expr::number(1.0)),
                            );
                            mul_opt(Expr::mul_expr(n, lowered), u_prime)
                        }
                    }
                } else {
                    // Variable exponent - logarithmic differentiation
                    // d/dx[u^v] = u^v * (v' * ln(u) + v * u'/u)
                    let u_prime = u.derive(var)?;
                    let v_prime = v.derive(var)?;

                    // ln(e) = 1
                    let ln_u = if matches!(&u.kind, ExprKind::Symbol(s) if s == "e") {
                        Expr::number(1.0)
                    } else {
                        Expr::func("ln", (**u).clone())
                    };
                    let term1 = mul_opt(v_prime, ln_u);
                    let term2 = if u_prime.is_zero_num() {
                        Expr::number(0.0)
                    } else {
                        mul_opt((**v).clone(), Expr::div_expr(u_prime, (**u).clone()))
                    };
                    mul_opt(self.clone(), add_opt(term1, term2))
                }
            }
        })
    }
}

/// Symbolic derivative with respect to the expression's free variable
///
/// The result is simplified so that `x^2` yields `2*x`, and stays evaluable.
///
/// # Example
/// ```
/// use stepcalc::{differentiate, Expression};
///
/// let f = Expression::parse("x^2").unwrap();
/// let df = differentiate(&f).unwrap();
/// assert_eq!(df.to_string(), "2*x");
/// ```
///
/// # Errors
/// `DifferentiationError` when the formula uses a construct with no rule.
pub fn differentiate(expression: &Expression) -> Result<Expression, DifferentiationError> {
    let raw = expression.expr().derive(expression.variable())?;
    Ok(Expression::from_expr(simplify(&raw)))
}
