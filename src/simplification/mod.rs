//! Simplification - tidies derivative trees for display
//!
//! A light, bottom-up pass: numeric folding, identity removal (`a + 0`,
//! `a * 1`, `a^1`, `a^0`, `1^a`), zero annihilation and coefficient ordering
//! in products. Repeated until the tree stops changing. No algebraic
//! rewriting beyond that: `(x^2 - 4)/(x - 2)` is left alone.

use crate::traits::is_integer;
use crate::{Expr, ExprKind};

/// Upper bound on fixpoint passes
const MAX_PASSES: usize = 16;

/// Simplify an expression until it reaches a fixpoint
pub fn simplify(expr: &Expr) -> Expr {
    let mut current = expr.clone();
    for _ in 0..MAX_PASSES {
        let next = simplify_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn simplify_once(expr: &Expr) -> Expr {
    match &expr.kind {
        ExprKind::Number(_) | ExprKind::Symbol(_) => expr.clone(),

        ExprKind::FunctionCall { name, args } => {
            Expr::func_multi(name.clone(), args.iter().map(simplify_once).collect())
        }

        ExprKind::Add(u, v) => simplify_add(simplify_once(u), simplify_once(v)),
        ExprKind::Sub(u, v) => simplify_sub(simplify_once(u), simplify_once(v)),
        ExprKind::Mul(_, _) => simplify_mul(expr),
        ExprKind::Div(u, v) => simplify_div(simplify_once(u), simplify_once(v)),
        ExprKind::Pow(u, v) => simplify_pow(simplify_once(u), simplify_once(v)),
    }
}

/// Fold only when the result is an ordinary finite number
fn folded(value: f64) -> Option<Expr> {
    value.is_finite().then(|| Expr::number(value))
}

fn simplify_add(u: Expr, v: Expr) -> Expr {
    if let (Some(a), Some(b)) = (u.as_number(), v.as_number()) {
        if let Some(n) = folded(a + b) {
            return n;
        }
    }
    if u.is_zero_num() {
        return v;
    }
    if v.is_zero_num() {
        return u;
    }
    Expr::add_expr(u, v)
}

fn simplify_sub(u: Expr, v: Expr) -> Expr {
    if let (Some(a), Some(b)) = (u.as_number(), v.as_number()) {
        if let Some(n) = folded(a - b) {
            return n;
        }
    }
    if v.is_zero_num() {
        return u;
    }
    if u.is_zero_num() {
        return Expr::neg(v);
    }
    if u == v {
        return Expr::number(0.0);
    }
    // a - (-3) -> a + 3
    match v.as_number() {
        Some(b) if b < 0.0 => Expr::add_expr(u, Expr::number(-b)),
        _ => Expr::sub_expr(u, v),
    }
}

/// Flatten a product chain into its factors, left to right
fn collect_factors(expr: &Expr, out: &mut Vec<Expr>) {
    match &expr.kind {
        ExprKind::Mul(l, r) => {
            collect_factors(l, out);
            collect_factors(r, out);
        }
        _ => out.push(simplify_once(expr)),
    }
}

/// Ordering inside a product: the variable and its powers before compound factors
fn factor_rank(expr: &Expr) -> u8 {
    match &expr.kind {
        ExprKind::Symbol(_) => 0,
        ExprKind::Pow(base, _) if matches!(base.kind, ExprKind::Symbol(_)) => 0,
        _ => 1,
    }
}

fn simplify_mul(expr: &Expr) -> Expr {
    let mut factors = Vec::new();
    collect_factors(expr, &mut factors);

    // Nested products produced by simplifying a factor are flattened too
    let mut flat = Vec::with_capacity(factors.len());
    for f in factors {
        match &f.kind {
            ExprKind::Mul(_, _) => {
                let mut inner = Vec::new();
                collect_factors(&f, &mut inner);
                flat.extend(inner);
            }
            _ => flat.push(f),
        }
    }

    let mut coefficient = 1.0;
    let mut rest = Vec::with_capacity(flat.len());
    for f in flat {
        match f.as_number() {
            Some(n) => coefficient *= n,
            None => rest.push(f),
        }
    }

    if coefficient == 0.0 {
        return Expr::number(0.0);
    }
    if !coefficient.is_finite() {
        // Leave non-finite products unfolded
        rest.insert(0, Expr::number(coefficient));
        coefficient = 1.0;
    }

    rest.sort_by_key(factor_rank);

    let mut iter = rest.into_iter();
    let Some(first) = iter.next() else {
        return Expr::number(coefficient);
    };
    let product = iter.fold(first, Expr::mul_expr);

    if crate::traits::is_one(coefficient) {
        product
    } else {
        Expr::mul_expr(Expr::number(coefficient), product)
    }
}

fn simplify_div(u: Expr, v: Expr) -> Expr {
    if v.is_one_num() {
        return u;
    }
    if let (Some(a), Some(b)) = (u.as_number(), v.as_number()) {
        // Only exact quotients, so 1/3 stays a fraction
        if b != 0.0 && is_integer(a / b) {
            if let Some(n) = folded(a / b) {
                return n;
            }
        }
    }
    if u.is_zero_num() && !v.is_zero_num() {
        return Expr::number(0.0);
    }
    Expr::div_expr(u, v)
}

fn simplify_pow(u: Expr, v: Expr) -> Expr {
    if v.is_one_num() {
        return u;
    }
    if v.is_zero_num() || u.is_one_num() {
        return Expr::number(1.0);
    }
    if let (Some(a), Some(b)) = (u.as_number(), v.as_number()) {
        if is_integer(b) && b > 0.0 && b <= 64.0 {
            let value = a.powi(b as i32);
            if is_integer(value) && value.abs() < 1e15 {
                return Expr::number(value);
            }
        }
    }
    Expr::pow(u, v)
}
