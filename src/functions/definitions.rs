//! Function definitions for the function registry
//!
//! Contains real-domain evaluation and symbolic differentiation rules for all
//! supported functions. Evaluation reports `EvalError::Domain` only where the
//! function has no real value; points where it diverges (`ln(0)`, `tan` at a
//! pole) yield the IEEE result and are classified as non-finite by the caller.

use super::registry::FunctionDefinition;
use super::{div_opt, func, mul_opt, neg};
use crate::error::EvalError;
use crate::Expr;

fn domain(function: &'static str, arg: f64) -> EvalError {
    EvalError::Domain { function, arg }
}

fn real_log(function: &'static str, x: f64) -> Result<f64, EvalError> {
    if x < 0.0 {
        Err(domain(function, x))
    } else {
        Ok(x.ln())
    }
}

/// Return all function definitions for populating the registry
pub(crate) fn all_definitions() -> Vec<FunctionDefinition> {
    vec![
        // Roots and magnitude
        FunctionDefinition {
            name: "sqrt",
            arity: 1..=1,
            eval: |args| {
                if args[0] < 0.0 {
                    Err(domain("sqrt", args[0]))
                } else {
                    Ok(args[0].sqrt())
                }
            },
            derivative: Some(d_sqrt),
        },
        FunctionDefinition {
            name: "cbrt",
            arity: 1..=1,
            eval: |args| Ok(args[0].cbrt()),
            derivative: Some(d_cbrt),
        },
        FunctionDefinition {
            name: "abs",
            arity: 1..=1,
            eval: |args| Ok(args[0].abs()),
            derivative: Some(d_abs),
        },
        // Step functions: evaluable, not differentiable
        FunctionDefinition {
            name: "sign",
            arity: 1..=1,
            eval: |args| {
                let x = args[0];
                Ok(if x == 0.0 { 0.0 } else { x.signum() })
            },
            derivative: None,
        },
        FunctionDefinition {
            name: "floor",
            arity: 1..=1,
            eval: |args| Ok(args[0].floor()),
            derivative: None,
        },
        FunctionDefinition {
            name: "ceil",
            arity: 1..=1,
            eval: |args| Ok(args[0].ceil()),
            derivative: None,
        },
        FunctionDefinition {
            name: "round",
            arity: 1..=1,
            eval: |args| Ok(args[0].round()),
            derivative: None,
        },
        // Exponentials and logarithms
        FunctionDefinition {
            name: "exp",
            arity: 1..=1,
            eval: |args| Ok(args[0].exp()),
            derivative: Some(d_exp),
        },
        FunctionDefinition {
            name: "ln",
            arity: 1..=1,
            eval: |args| real_log("ln", args[0]),
            derivative: Some(d_ln),
        },
        FunctionDefinition {
            name: "log",
            arity: 1..=2,
            eval: |args| {
                let ln_x = real_log("log", args[0])?;
                match args.get(1) {
                    None => Ok(ln_x),
                    Some(&base) if base <= 0.0 || base == 1.0 => Err(domain("log", base)),
                    Some(&base) => Ok(ln_x / base.ln()),
                }
            },
            derivative: Some(d_log),
        },
        FunctionDefinition {
            name: "log10",
            arity: 1..=1,
            eval: |args| real_log("log10", args[0]).map(|_| args[0].log10()),
            derivative: Some(d_log10),
        },
        FunctionDefinition {
            name: "log2",
            arity: 1..=1,
            eval: |args| real_log("log2", args[0]).map(|_| args[0].log2()),
            derivative: Some(d_log2),
        },
        // Trigonometric
        FunctionDefinition {
            name: "sin",
            arity: 1..=1,
            eval: |args| Ok(args[0].sin()),
            derivative: Some(d_sin),
        },
        FunctionDefinition {
            name: "cos",
            arity: 1..=1,
            eval: |args| Ok(args[0].cos()),
            derivative: Some(d_cos),
        },
        FunctionDefinition {
            name: "tan",
            arity: 1..=1,
            eval: |args| Ok(args[0].tan()),
            derivative: Some(d_tan),
        },
        FunctionDefinition {
            name: "sec",
            arity: 1..=1,
            eval: |args| Ok(1.0 / args[0].cos()),
            derivative: Some(d_sec),
        },
        FunctionDefinition {
            name: "csc",
            arity: 1..=1,
            eval: |args| Ok(1.0 / args[0].sin()),
            derivative: Some(d_csc),
        },
        FunctionDefinition {
            name: "cot",
            arity: 1..=1,
            eval: |args| Ok(args[0].cos() / args[0].sin()),
            derivative: Some(d_cot),
        },
        // Inverse trigonometric
        FunctionDefinition {
            name: "asin",
            arity: 1..=1,
            eval: |args| {
                if args[0].abs() > 1.0 {
                    Err(domain("asin", args[0]))
                } else {
                    Ok(args[0].asin())
                }
            },
            derivative: Some(d_asin),
        },
        FunctionDefinition {
            name: "acos",
            arity: 1..=1,
            eval: |args| {
                if args[0].abs() > 1.0 {
                    Err(domain("acos", args[0]))
                } else {
                    Ok(args[0].acos())
                }
            },
            derivative: Some(d_acos),
        },
        FunctionDefinition {
            name: "atan",
            arity: 1..=1,
            eval: |args| Ok(args[0].atan()),
            derivative: Some(d_atan),
        },
        // Hyperbolic
        FunctionDefinition {
            name: "sinh",
            arity: 1..=1,
            eval: |args| Ok(args[0].sinh()),
            derivative: Some(d_sinh),
        },
        FunctionDefinition {
            name: "cosh",
            arity: 1..=1,
            eval: |args| Ok(args[0].cosh()),
            derivative: Some(d_cosh),
        },
        FunctionDefinition {
            name: "tanh",
            arity: 1..=1,
            eval: |args| Ok(args[0].tanh()),
            derivative: Some(d_tanh),
        },
    ]
}

// ===== Derivative rules =====

fn square(u: Expr) -> Expr {
    Expr::pow(u, Expr::number(2.0))
}

fn d_sqrt(args: &[Expr], primes: &[Expr]) -> Expr {
    // d/dx sqrt(u) = u' / (2 * sqrt(u))
    Expr::div_expr(
        primes[0].clone(),
        Expr::mul_expr(Expr::number(2.0), func("sqrt", args[0].clone())),
    )
}

fn d_cbrt(args: &[Expr], primes: &[Expr]) -> Expr {
    // d/dx cbrt(u) = u' / (3 * cbrt(u)^2)
    Expr::div_expr(
        primes[0].clone(),
        Expr::mul_expr(Expr::number(3.0), square(func("cbrt", args[0].clone()))),
    )
}

fn d_abs(args: &[Expr], primes: &[Expr]) -> Expr {
    // d/dx |u| = sign(u) * u'
    mul_opt(func("sign", args[0].clone()), primes[0].clone())
}

fn d_exp(args: &[Expr], primes: &[Expr]) -> Expr {
    mul_opt(func("exp", args[0].clone()), primes[0].clone())
}

fn d_ln(args: &[Expr], primes: &[Expr]) -> Expr {
    // d/dx ln(u) = u' / u
    Expr::div_expr(primes[0].clone(), args[0].clone())
}

fn d_log(args: &[Expr], primes: &[Expr]) -> Expr {
    if args.len() == 1 {
        return d_ln(args, primes);
    }
    let (u, b) = (&args[0], &args[1]);
    let (u_prime, b_prime) = (&primes[0], &primes[1]);
    let ln_b = func("ln", b.clone());

    if b_prime.is_zero_num() {
        // Constant base: u' / (u * ln(b))
        return Expr::div_expr(u_prime.clone(), Expr::mul_expr(u.clone(), ln_b));
    }

    // log_b(u) = ln(u) / ln(b), quotient rule:
    // (u'/u * ln(b) - ln(u) * b'/b) / ln(b)^2
    let term1 = mul_opt(div_opt(u_prime.clone(), u.clone()), ln_b.clone());
    let term2 = mul_opt(func("ln", u.clone()), div_opt(b_prime.clone(), b.clone()));
    Expr::div_expr(Expr::sub_expr(term1, term2), square(ln_b))
}

fn d_log10(args: &[Expr], primes: &[Expr]) -> Expr {
    Expr::div_expr(
        primes[0].clone(),
        Expr::mul_expr(args[0].clone(), func("ln", Expr::number(10.0))),
    )
}

fn d_log2(args: &[Expr], primes: &[Expr]) -> Expr {
    Expr::div_expr(
        primes[0].clone(),
        Expr::mul_expr(args[0].clone(), func("ln", Expr::number(2.0))),
    )
}

fn d_sin(args: &[Expr], primes: &[Expr]) -> Expr {
    // d/dx sin(u) = cos(u) * u'
    mul_opt(func("cos", args[0].clone()), primes[0].clone())
}

fn d_cos(args: &[Expr], primes: &[Expr]) -> Expr {
    // d/dx cos(u) = -sin(u) * u'
    mul_opt(neg(func("sin", args[0].clone())), primes[0].clone())
}

fn d_tan(args: &[Expr], primes: &[Expr]) -> Expr {
    // d/dx tan(u) = sec^2(u) * u'
    mul_opt(square(func("sec", args[0].clone())), primes[0].clone())
}

fn d_sec(args: &[Expr], primes: &[Expr]) -> Expr {
    // d/dx sec(u) = sec(u)tan(u) * u'
    let u = &args[0];
    mul_opt(
        Expr::mul_expr(func("sec", u.clone()), func("tan", u.clone())),
        primes[0].clone(),
    )
}

fn d_csc(args: &[Expr], primes: &[Expr]) -> Expr {
    // d/dx csc(u) = -csc(u)cot(u) * u'
    let u = &args[0];
    mul_opt(
        neg(Expr::mul_expr(func("csc", u.clone()), func("cot", u.clone()))),
        primes[0].clone(),
    )
}

fn d_cot(args: &[Expr], primes: &[Expr]) -> Expr {
    // d/dx cot(u) = -csc^2(u) * u'
    mul_opt(neg(square(func("csc", args[0].clone()))), primes[0].clone())
}

fn d_asin(args: &[Expr], primes: &[Expr]) -> Expr {
    // d/dx asin(u) = u' / sqrt(1 - u^2)
    Expr::div_expr(
        primes[0].clone(),
        func(
            "sqrt",
            Expr::sub_expr(Expr::number(1.0), square(args[0].clone())),
        ),
    )
}

fn d_acos(args: &[Expr], primes: &[Expr]) -> Expr {
    // d/dx acos(u) = -u' / sqrt(1 - u^2)
    Expr::div_expr(
        neg(primes[0].clone()),
        func(
            "sqrt",
            Expr::sub_expr(Expr::number(1.0), square(args[0].clone())),
        ),
    )
}

fn d_atan(args: &[Expr], primes: &[Expr]) -> Expr {
    // d/dx atan(u) = u' / (1 + u^2)
    Expr::div_expr(
        primes[0].clone(),
        Expr::add_expr(Expr::number(1.0), square(args[0].clone())),
    )
}

fn d_sinh(args: &[Expr], primes: &[Expr]) -> Expr {
    mul_opt(func("cosh", args[0].clone()), primes[0].clone())
}

fn d_cosh(args: &[Expr], primes: &[Expr]) -> Expr {
    mul_opt(func("sinh", args[0].clone()), primes[0].clone())
}

fn d_tanh(args: &[Expr], primes: &[Expr]) -> Expr {
    // d/dx tanh(u) = (1 - tanh(u)^2) * u'
    mul_opt(
        Expr::sub_expr(Expr::number(1.0), square(func("tanh", args[0].clone()))),
        primes[0].clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::super::registry::Registry;
    use crate::error::EvalError;

    fn eval(name: &str, args: &[f64]) -> Result<f64, EvalError> {
        let def = Registry::get(name).expect("registered");
        (def.eval)(args)
    }

    #[test]
    fn test_domain_violations() {
        assert!(matches!(
            eval("sqrt", &[-1.0]),
            Err(EvalError::Domain { function: "sqrt", .. })
        ));
        assert!(eval("ln", &[-2.0]).is_err());
        assert!(eval("asin", &[1.5]).is_err());
        assert!(eval("log", &[8.0, 1.0]).is_err());
    }

    #[test]
    fn test_divergence_is_not_an_error() {
        assert_eq!(eval("ln", &[0.0]), Ok(f64::NEG_INFINITY));
        assert!(eval("csc", &[0.0]).is_ok_and(|v| v.is_infinite()));
    }

    #[test]
    fn test_log_with_base() {
        let v = eval("log", &[8.0, 2.0]).expect("finite");
        assert!((v - 3.0).abs() < 1e-12);
        let v = eval("log10", &[1000.0]).expect("finite");
        assert!((v - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_sign_of_zero() {
        assert_eq!(eval("sign", &[0.0]), Ok(0.0));
        assert_eq!(eval("sign", &[-3.0]), Ok(-1.0));
    }
}
