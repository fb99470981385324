// Display formatting for AST
//
// Plain text aims to be re-parseable: `2*x`, `(x^2 - 4)/(x - 2)`, `x^(-1)`.
use crate::{Expr, ExprKind};
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq)]
enum FormatMode {
    Plain,
    Latex,
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let s = if n > 0.0 { "Infinity" } else { "-Infinity" };
        s.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        // Display as integer if no fractional part
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// `-1 * e` is shown as `-e`
fn negated(expr: &Expr) -> Option<&Expr> {
    match &expr.kind {
        ExprKind::Mul(l, r) if l.is_neg_one_num() => Some(r),
        _ => None,
    }
}

/// Renders with a leading minus sign
fn starts_negative(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Number(n) => *n < 0.0,
        ExprKind::Mul(l, _) | ExprKind::Div(l, _) => starts_negative(l),
        ExprKind::Add(l, _) | ExprKind::Sub(l, _) => starts_negative(l),
        _ => false,
    }
}

fn is_additive(expr: &Expr) -> bool {
    matches!(expr.kind, ExprKind::Add(_, _) | ExprKind::Sub(_, _))
}

struct Renderer {
    mode: FormatMode,
}

impl Renderer {
    fn paren(&self, inner: String) -> String {
        match self.mode {
            FormatMode::Plain => format!("({inner})"),
            FormatMode::Latex => format!("\\left({inner}\\right)"),
        }
    }

    fn number(&self, n: f64) -> String {
        match self.mode {
            FormatMode::Latex if n.is_infinite() => {
                let s = if n > 0.0 { "\\infty" } else { "-\\infty" };
                s.to_string()
            }
            _ => format_number(n),
        }
    }

    fn render(&self, expr: &Expr) -> String {
        match &expr.kind {
            ExprKind::Number(n) => self.number(*n),

            ExprKind::Symbol(s) => match (self.mode, s.as_str()) {
                (FormatMode::Latex, "pi") => "\\pi".to_string(),
                _ => s.clone(),
            },

            ExprKind::FunctionCall { name, args } => self.function(name, args),

            ExprKind::Add(u, v) => {
                // a + (-b) shows as a - b
                if let Some(inner) = negated(v) {
                    format!("{} - {}", self.render(u), self.sub_operand(inner))
                } else if let Some(n) = v.as_number().filter(|n| *n < 0.0) {
                    format!("{} - {}", self.render(u), self.number(-n))
                } else {
                    format!("{} + {}", self.render(u), self.render(v))
                }
            }

            ExprKind::Sub(u, v) => format!("{} - {}", self.render(u), self.sub_operand(v)),

            ExprKind::Mul(u, v) => {
                if let Some(inner) = negated(expr) {
                    let body = if is_additive(inner) {
                        self.paren(self.render(inner))
                    } else {
                        self.render(inner)
                    };
                    return format!("-{body}");
                }
                let left = self.mul_operand(u, false);
                let right = self.mul_operand(v, true);
                match self.mode {
                    FormatMode::Plain => format!("{left}*{right}"),
                    FormatMode::Latex if u.as_number().is_some() && juxtaposable(v) => {
                        format!("{left}{right}")
                    }
                    FormatMode::Latex => format!("{left} \\cdot {right}"),
                }
            }

            ExprKind::Div(u, v) => match self.mode {
                FormatMode::Latex => {
                    format!("\\frac{{{}}}{{{}}}", self.render(u), self.render(v))
                }
                FormatMode::Plain => {
                    // Add parentheses around numerator if it's addition or subtraction
                    let num = if is_additive(u) {
                        self.paren(self.render(u))
                    } else {
                        self.render(u)
                    };
                    // Denominator stays bare only when it is atomic
                    let den = match &v.kind {
                        ExprKind::Symbol(_) | ExprKind::FunctionCall { .. } => self.render(v),
                        ExprKind::Number(n) if *n >= 0.0 => self.render(v),
                        ExprKind::Pow(_, _) if negated(v).is_none() => self.render(v),
                        _ => self.paren(self.render(v)),
                    };
                    format!("{num}/{den}")
                }
            },

            ExprKind::Pow(u, v) => {
                let base = match &u.kind {
                    ExprKind::Symbol(_) | ExprKind::FunctionCall { .. } => self.render(u),
                    ExprKind::Number(n) if *n >= 0.0 => self.render(u),
                    _ => self.paren(self.render(u)),
                };
                match self.mode {
                    FormatMode::Latex => format!("{base}^{{{}}}", self.render(v)),
                    FormatMode::Plain => {
                        // Add parentheses around exponent if it's not a simple number or symbol
                        let exp = match &v.kind {
                            ExprKind::Symbol(_) => self.render(v),
                            ExprKind::Number(n) if *n >= 0.0 => self.render(v),
                            _ => self.paren(self.render(v)),
                        };
                        format!("{base}^{exp}")
                    }
                }
            }
        }
    }

    /// Right operand of a subtraction: `a - (b + c)`, `a - (-b)`
    fn sub_operand(&self, expr: &Expr) -> String {
        if is_additive(expr) || starts_negative(expr) || negated(expr).is_some() {
            self.paren(self.render(expr))
        } else {
            self.render(expr)
        }
    }

    fn mul_operand(&self, expr: &Expr, right: bool) -> String {
        let needs_parens = is_additive(expr)
            || (right && (starts_negative(expr) || negated(expr).is_some()))
            || (right && self.mode == FormatMode::Plain && matches!(expr.kind, ExprKind::Div(_, _)));
        if needs_parens {
            self.paren(self.render(expr))
        } else {
            self.render(expr)
        }
    }

    fn function(&self, name: &str, args: &[Expr]) -> String {
        let rendered: Vec<String> = args.iter().map(|a| self.render(a)).collect();
        if self.mode == FormatMode::Plain {
            return format!("{name}({})", rendered.join(", "));
        }
        let arg = rendered.first().cloned().unwrap_or_default();
        match (name, rendered.len()) {
            ("sqrt", _) => format!("\\sqrt{{{arg}}}"),
            ("cbrt", _) => format!("\\sqrt[3]{{{arg}}}"),
            ("abs", _) => format!("\\left|{arg}\\right|"),
            ("exp", _) => format!("e^{{{arg}}}"),
            ("log", 2) => format!("\\log_{{{}}}{}", rendered[1], self.paren(arg)),
            ("log" | "ln", _) => format!("\\ln{}", self.paren(arg)),
            ("log10", _) => format!("\\log_{{10}}{}", self.paren(arg)),
            ("log2", _) => format!("\\log_{{2}}{}", self.paren(arg)),
            ("floor", _) => format!("\\lfloor {arg} \\rfloor"),
            ("ceil", _) => format!("\\lceil {arg} \\rceil"),
            ("asin" | "acos" | "atan", _) => {
                format!("\\arc{}{}", &name[1..], self.paren(arg))
            }
            ("sin" | "cos" | "tan" | "sec" | "csc" | "cot" | "sinh" | "cosh" | "tanh", _) => {
                format!("\\{name}{}", self.paren(arg))
            }
            _ => format!(
                "\\operatorname{{{name}}}{}",
                self.paren(rendered.join(", "))
            ),
        }
    }
}

/// `2x`, `2x^2`, `2\sin(x)` read naturally without a dot
fn juxtaposable(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Symbol(_) | ExprKind::FunctionCall { .. } => true,
        ExprKind::Pow(base, _) => matches!(base.kind, ExprKind::Symbol(_)),
        _ => false,
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Renderer {
            mode: FormatMode::Plain,
        }
        .render(self))
    }
}

impl Expr {
    /// Render as LaTeX
    pub fn to_latex(&self) -> String {
        Renderer {
            mode: FormatMode::Latex,
        }
        .render(self)
    }
}
