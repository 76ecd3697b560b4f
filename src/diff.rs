//! Symbolic differentiation with respect to `z`, and the numeric fallback
//! used when an expression contains a function that is not complex
//! differentiable.
use crate::error::DerivativeFault;
use crate::expr::{Func, Function, depends_on_z, pow_node};
use crate::guard::Guard;
use crate::types::{Complex, Tangent};
use dew_core::{Ast, BinOp, UnaryOp};
use std::f64::consts::LN_10;
fn num(x: f64) -> Ast {
    Ast::Num(x)
}
fn is_num(a: &Ast, x: f64) -> bool {
    matches!(a, Ast::Num(n) if *n == x)
}
///replaces a node over literals by its value when that is real and finite
fn fold(node: Ast) -> Ast {
    let literal = |a: &Ast| matches!(a, Ast::Num(_));
    let foldable = match &node {
        Ast::BinOp(_, a, b) => literal(a) && literal(b),
        Ast::Call(_, args) => args.iter().all(literal),
        _ => false,
    };
    if foldable
        && let Ok(w) = Function::from(node.clone()).eval(Complex::new(0.0, 0.0))
        && w.im == 0.0
    {
        return Ast::Num(w.re);
    }
    node
}
fn bin(op: BinOp, a: Ast, b: Ast) -> Ast {
    fold(Ast::BinOp(op, Box::new(a), Box::new(b)))
}
fn add(a: Ast, b: Ast) -> Ast {
    if is_num(&a, 0.0) {
        b
    } else if is_num(&b, 0.0) {
        a
    } else {
        bin(BinOp::Add, a, b)
    }
}
fn sub(a: Ast, b: Ast) -> Ast {
    if is_num(&b, 0.0) {
        a
    } else if is_num(&a, 0.0) {
        neg(b)
    } else {
        bin(BinOp::Sub, a, b)
    }
}
fn mul(a: Ast, b: Ast) -> Ast {
    if is_num(&a, 0.0) || is_num(&b, 0.0) {
        num(0.0)
    } else if is_num(&a, 1.0) {
        b
    } else if is_num(&b, 1.0) {
        a
    } else {
        bin(BinOp::Mul, a, b)
    }
}
fn div(a: Ast, b: Ast) -> Ast {
    if is_num(&b, 1.0) {
        a
    } else if is_num(&a, 0.0) && !is_num(&b, 0.0) {
        num(0.0)
    } else {
        bin(BinOp::Div, a, b)
    }
}
fn power(a: Ast, b: Ast) -> Ast {
    if is_num(&b, 1.0) {
        a
    } else if is_num(&b, 0.0) {
        num(1.0)
    } else {
        fold(pow_node(a, b))
    }
}
fn neg(a: Ast) -> Ast {
    match a {
        Ast::Num(x) => Ast::Num(-x),
        Ast::UnaryOp(UnaryOp::Neg, inner) => *inner,
        a => Ast::UnaryOp(UnaryOp::Neg, Box::new(a)),
    }
}
fn call(f: Func, a: Ast) -> Ast {
    fold(Ast::Call(f.ident().to_string(), vec![a]))
}
impl Func {
    ///f'(u), to be multiplied by u' for the chain rule
    fn derivative_at(self, u: &Ast) -> Result<Ast, DerivativeFault> {
        let u = || u.clone();
        Ok(match self {
            Func::Sqrt => div(num(1.0), mul(num(2.0), call(Func::Sqrt, u()))),
            Func::Exp => call(Func::Exp, u()),
            Func::Ln | Func::Log => div(num(1.0), u()),
            Func::Log10 => div(num(1.0), mul(u(), num(LN_10))),
            Func::Sin => call(Func::Cos, u()),
            Func::Cos => neg(call(Func::Sin, u())),
            Func::Tan => div(num(1.0), power(call(Func::Cos, u()), num(2.0))),
            Func::Sec => mul(call(Func::Sec, u()), call(Func::Tan, u())),
            Func::Csc => neg(mul(call(Func::Csc, u()), call(Func::Cot, u()))),
            Func::Cot => neg(div(num(1.0), power(call(Func::Sin, u()), num(2.0)))),
            Func::Sinh => call(Func::Cosh, u()),
            Func::Cosh => call(Func::Sinh, u()),
            Func::Tanh => div(num(1.0), power(call(Func::Cosh, u()), num(2.0))),
            Func::Asin => div(
                num(1.0),
                call(Func::Sqrt, sub(num(1.0), power(u(), num(2.0)))),
            ),
            Func::Acos => neg(div(
                num(1.0),
                call(Func::Sqrt, sub(num(1.0), power(u(), num(2.0)))),
            )),
            Func::Atan => div(num(1.0), add(num(1.0), power(u(), num(2.0)))),
            Func::Pow
            | Func::Abs
            | Func::Conj
            | Func::Re
            | Func::Im
            | Func::Arg
            | Func::Norm => {
                return Err(DerivativeFault::NotHolomorphic(self.ident().to_string()));
            }
        })
    }
}
fn power_rule(a: &Ast, b: &Ast) -> Result<Ast, DerivativeFault> {
    Ok(if !depends_on_z(b) {
        mul(
            mul(b.clone(), power(a.clone(), sub(b.clone(), num(1.0)))),
            derivative(a)?,
        )
    } else if !depends_on_z(a) {
        mul(
            mul(power(a.clone(), b.clone()), call(Func::Ln, a.clone())),
            derivative(b)?,
        )
    } else {
        //a^b = exp(b ln a)
        mul(
            power(a.clone(), b.clone()),
            add(
                mul(derivative(b)?, call(Func::Ln, a.clone())),
                div(mul(b.clone(), derivative(a)?), a.clone()),
            ),
        )
    })
}
///d/dz of a compiled expression, simplified
pub fn derivative(ast: &Ast) -> Result<Ast, DerivativeFault> {
    if !depends_on_z(ast) {
        return Ok(num(0.0));
    }
    Ok(match ast {
        Ast::Var(_) => num(1.0),
        Ast::UnaryOp(UnaryOp::Neg, a) => neg(derivative(a)?),
        Ast::BinOp(BinOp::Add, a, b) => add(derivative(a)?, derivative(b)?),
        Ast::BinOp(BinOp::Sub, a, b) => sub(derivative(a)?, derivative(b)?),
        Ast::BinOp(BinOp::Mul, a, b) => add(
            mul(derivative(a)?, b.as_ref().clone()),
            mul(a.as_ref().clone(), derivative(b)?),
        ),
        Ast::BinOp(BinOp::Div, a, b) => div(
            sub(
                mul(derivative(a)?, b.as_ref().clone()),
                mul(a.as_ref().clone(), derivative(b)?),
            ),
            power(b.as_ref().clone(), num(2.0)),
        ),
        Ast::BinOp(BinOp::Pow, a, b) => power_rule(a, b)?,
        Ast::Call(name, args) => {
            let func = Func::from_ident(name)
                .ok_or_else(|| DerivativeFault::NotHolomorphic(name.clone()))?;
            match (func, args.as_slice()) {
                (Func::Pow, [a, b]) => power_rule(a, b)?,
                (Func::Log, [x, base]) => derivative(&div(
                    call(Func::Ln, x.clone()),
                    call(Func::Ln, base.clone()),
                ))?,
                (func, [u]) => mul(func.derivative_at(u)?, derivative(u)?),
                _ => return Err(DerivativeFault::NotHolomorphic(name.clone())),
            }
        }
        other => return Err(DerivativeFault::NotHolomorphic(other.to_string())),
    })
}
///how df/dz is obtained for the active function
#[derive(Clone, Debug, PartialEq)]
pub enum Derivative {
    Analytic(Function),
    ///forward difference with the given step
    Numeric {
        step: f64,
        reason: DerivativeFault,
    },
}
impl Derivative {
    ///never fails, falls back to the numeric estimate
    pub fn new(f: &Function, step: f64) -> Self {
        match derivative(f.ast()) {
            Ok(df) => Derivative::Analytic(Function::from(df)),
            Err(reason) => {
                tracing::info!(%reason, step, "falling back to numeric derivative");
                Derivative::Numeric { step, reason }
            }
        }
    }
    pub fn is_analytic(&self) -> bool {
        matches!(self, Derivative::Analytic(_))
    }
    ///why the numeric mode is in use
    pub fn note(&self) -> Option<&DerivativeFault> {
        match self {
            Derivative::Analytic(_) => None,
            Derivative::Numeric { reason, .. } => Some(reason),
        }
    }
    ///images of the +1 and +i unit vectors under the linear approximation at z
    pub fn directions(&self, f: &Function, z: Complex) -> Option<(Complex, Complex)> {
        let (dx, dy) = match self {
            Derivative::Analytic(df) => {
                let d = df.eval(z).ok()?;
                (d, d * Complex::i())
            }
            Derivative::Numeric { step, .. } => {
                let h = *step;
                let fz = f.eval(z).ok()?;
                let fx = f.eval(z + h).ok()?;
                let fy = f.eval(z + Complex::new(0.0, h)).ok()?;
                ((fx - fz) / h, (fy - fz) / h)
            }
        };
        (dx.is_finite() && dy.is_finite()).then_some((dx, dy))
    }
    ///None when f or its derivative is undefined at z
    pub fn evaluate_tangent(&self, f: &Function, guard: Guard, z: Complex) -> Option<Tangent> {
        let value = guard.clamp(f.eval(z))?;
        let (dx, dy) = self.directions(f, z)?;
        Some(Tangent { value, dx, dy })
    }
}
