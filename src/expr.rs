//! Complex expressions in the single variable `z`, parsed by `dew_core` and
//! evaluated by `dew_complex`.
//!
//! The syntax is dew's: `+ - * /`, a right associative `^`, unary minus
//! binding tighter than `^` (so `-z^2` is `(-z)^2`), calls and parentheses.
//! Compiling on top of that
//! - binds the constants `i`, `e`, `pi` (`π`), `tau` (`τ`) and `phi` (`φ`)
//! - lowers `a^b` to `pow(a, b)`, dew's own `^` has no complex exponent
//! - rejects what dew parses but complex arithmetic lacks: remainder, bit
//!   operators, comparisons, conditionals and `let`
//! - bounds the source length and nesting so parsing cannot exhaust the stack
use crate::error::{EvalFault, ParseFault};
use crate::types::Complex;
use dew_complex::{ComplexFn, ComplexValue, FunctionRegistry, Signature, Type};
use dew_core::{Ast, BinOp, Expr, UnaryOp};
use std::collections::HashMap;
use std::f64::consts::{E, LN_10, PI, TAU};
use std::fmt;
use std::sync::OnceLock;
const PHI: f64 = 1.618_033_988_749_895;
///longest accepted source in chars
pub const MAX_SOURCE: usize = 1024;
///deepest accepted parenthesis nesting and syntax tree
pub const MAX_DEPTH: usize = 128;
///dew value that is complex even for literals, so dew never takes one of its
///real only branches and `sqrt(-4)` is `2i`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Value(pub Complex);
impl ComplexValue<f64> for Value {
    fn typ(&self) -> Type {
        Type::Complex
    }
    fn from_scalar(v: f64) -> Self {
        Value(Complex::new(v, 0.0))
    }
    fn from_complex([re, im]: [f64; 2]) -> Self {
        Value(Complex::new(re, im))
    }
    fn as_scalar(&self) -> Option<f64> {
        (self.0.im == 0.0).then_some(self.0.re)
    }
    fn as_complex(&self) -> Option<[f64; 2]> {
        Some([self.0.re, self.0.im])
    }
}
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Func {
    Sqrt,
    Exp,
    Ln,
    Log,
    Log10,
    Pow,
    Sin,
    Cos,
    Tan,
    Sec,
    Csc,
    Cot,
    Sinh,
    Cosh,
    Tanh,
    Asin,
    Acos,
    Atan,
    Abs,
    Conj,
    Re,
    Im,
    Arg,
    Norm,
}
const FUNCS: [Func; 24] = [
    Func::Sqrt,
    Func::Exp,
    Func::Ln,
    Func::Log,
    Func::Log10,
    Func::Pow,
    Func::Sin,
    Func::Cos,
    Func::Tan,
    Func::Sec,
    Func::Csc,
    Func::Cot,
    Func::Sinh,
    Func::Cosh,
    Func::Tanh,
    Func::Asin,
    Func::Acos,
    Func::Atan,
    Func::Abs,
    Func::Conj,
    Func::Re,
    Func::Im,
    Func::Arg,
    Func::Norm,
];
impl Func {
    pub fn from_ident(name: &str) -> Option<Self> {
        FUNCS.into_iter().find(|f| f.ident() == name)
    }
    pub fn ident(self) -> &'static str {
        match self {
            Func::Sqrt => "sqrt",
            Func::Exp => "exp",
            Func::Ln => "ln",
            Func::Log => "log",
            Func::Log10 => "log10",
            Func::Pow => "pow",
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Sec => "sec",
            Func::Csc => "csc",
            Func::Cot => "cot",
            Func::Sinh => "sinh",
            Func::Cosh => "cosh",
            Func::Tanh => "tanh",
            Func::Asin => "asin",
            Func::Acos => "acos",
            Func::Atan => "atan",
            Func::Abs => "abs",
            Func::Conj => "conj",
            Func::Re => "re",
            Func::Im => "im",
            Func::Arg => "arg",
            Func::Norm => "norm",
        }
    }
    ///log takes an optional base
    fn arities(self) -> &'static [usize] {
        match self {
            Func::Log => &[1, 2],
            Func::Pow => &[2],
            _ => &[1],
        }
    }
    fn expected(self) -> &'static str {
        match self {
            Func::Log => "1 or 2",
            Func::Pow => "2",
            _ => "1",
        }
    }
    ///whether f has a complex derivative wherever it is defined
    pub fn is_holomorphic(self) -> bool {
        !matches!(
            self,
            Func::Abs | Func::Conj | Func::Re | Func::Im | Func::Arg | Func::Norm
        )
    }
    ///registered from dew_complex rather than implemented here
    fn is_dew_builtin(self) -> bool {
        matches!(
            self,
            Func::Sqrt
                | Func::Exp
                | Func::Abs
                | Func::Conj
                | Func::Re
                | Func::Im
                | Func::Arg
                | Func::Norm
        )
    }
    ///undefined points come out as NaN or infinity
    pub fn apply(self, args: &[Complex]) -> Complex {
        match (self, args) {
            (Func::Log, [x, base]) => x.ln() / base.ln(),
            (Func::Pow, [a, b]) => pow(*a, *b),
            (Func::Pow, _) => Complex::new(f64::NAN, f64::NAN),
            (f, [z]) => f.apply_unary(*z),
            _ => Complex::new(f64::NAN, f64::NAN),
        }
    }
    fn apply_unary(self, z: Complex) -> Complex {
        match self {
            Func::Sqrt => z.sqrt(),
            Func::Exp => z.exp(),
            Func::Ln | Func::Log => z.ln(),
            Func::Log10 => z.ln() / LN_10,
            Func::Sin => z.sin(),
            Func::Cos => z.cos(),
            Func::Tan => z.tan(),
            Func::Sec => z.cos().inv(),
            Func::Csc => z.sin().inv(),
            Func::Cot => z.cos() / z.sin(),
            Func::Sinh => z.sinh(),
            Func::Cosh => z.cosh(),
            Func::Tanh => z.tanh(),
            Func::Asin => z.asin(),
            Func::Acos => z.acos(),
            Func::Atan => z.atan(),
            Func::Abs => Complex::new(z.norm(), 0.0),
            Func::Conj => z.conj(),
            Func::Re => Complex::new(z.re, 0.0),
            Func::Im => Complex::new(z.im, 0.0),
            Func::Arg => Complex::new(z.arg(), 0.0),
            Func::Norm => Complex::new(z.norm_sqr(), 0.0),
            Func::Pow => Complex::new(f64::NAN, f64::NAN),
        }
    }
}
///integer exponents are exact, 0^b is 0 only for re(b) > 0
fn pow(a: Complex, b: Complex) -> Complex {
    if b.im == 0.0 && b.re.fract() == 0.0 && b.re.abs() <= i32::MAX as f64 {
        return a.powi(b.re as i32);
    }
    if a.re == 0.0 && a.im == 0.0 {
        return if b.re > 0.0 {
            Complex::new(0.0, 0.0)
        } else {
            Complex::new(f64::NAN, f64::NAN)
        };
    }
    a.powc(b)
}
impl ComplexFn<f64, Value> for Func {
    fn name(&self) -> &str {
        self.ident()
    }
    fn signatures(&self) -> Vec<Signature> {
        self.arities()
            .iter()
            .map(|&n| Signature {
                args: vec![Type::Complex; n],
                ret: Type::Complex,
            })
            .collect()
    }
    fn call(&self, args: &[Value]) -> Value {
        let args: Vec<Complex> = args.iter().map(|v| v.0).collect();
        Value(self.apply(&args))
    }
}
type Registry = FunctionRegistry<f64, Value>;
fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry = Registry::new();
        registry.register(dew_complex::Sqrt);
        registry.register(dew_complex::Exp);
        registry.register(dew_complex::Abs);
        registry.register(dew_complex::Conj);
        registry.register(dew_complex::Re);
        registry.register(dew_complex::Im);
        registry.register(dew_complex::Arg);
        registry.register(dew_complex::Norm);
        for func in FUNCS.into_iter().filter(|f| !f.is_dew_builtin()) {
            registry.register(func);
        }
        registry
    })
}
pub(crate) fn pow_node(base: Ast, exponent: Ast) -> Ast {
    Ast::Call(Func::Pow.ident().to_string(), vec![base, exponent])
}
///true when the value changes with z
pub fn depends_on_z(ast: &Ast) -> bool {
    ast.free_vars().contains("z")
}
///upper bound on how deep the parser recurses: parenthesis depth plus every
///`^` plus the longest run of `-`
fn nesting_bound(source: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0;
    let mut carets = 0;
    let mut minus_run = 0;
    let mut longest_run = 0;
    for c in source.chars().filter(|c| !c.is_whitespace()) {
        match c {
            '(' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            ')' => depth = depth.saturating_sub(1),
            '^' => carets += 1,
            _ => {}
        }
        if c == '-' {
            minus_run += 1;
            longest_run = longest_run.max(minus_run);
        } else {
            minus_run = 0;
        }
    }
    deepest + carets + longest_run
}
///tree depth without recursing, the tree is not yet known to be shallow
fn tree_depth(ast: &Ast) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(ast, 1)];
    while let Some((node, depth)) = stack.pop() {
        deepest = deepest.max(depth);
        match node {
            Ast::BinOp(_, a, b) => {
                stack.push((a.as_ref(), depth + 1));
                stack.push((b.as_ref(), depth + 1));
            }
            Ast::UnaryOp(_, a) => stack.push((a.as_ref(), depth + 1)),
            Ast::Call(_, args) => stack.extend(args.iter().map(|a| (a, depth + 1))),
            _ => {}
        }
    }
    deepest
}
fn lower(ast: &Ast) -> Result<Ast, ParseFault> {
    Ok(match ast {
        Ast::Num(n) => Ast::Num(*n),
        Ast::Var(name) => match name.as_str() {
            "z" | "i" => Ast::Var(name.clone()),
            "e" => Ast::Num(E),
            "pi" => Ast::Num(PI),
            "tau" => Ast::Num(TAU),
            "phi" => Ast::Num(PHI),
            _ if Func::from_ident(name).is_some() => {
                return Err(ParseFault::MissingArguments(name.clone()));
            }
            _ => return Err(ParseFault::UnknownIdentifier(name.clone())),
        },
        Ast::UnaryOp(UnaryOp::Neg, a) => Ast::UnaryOp(UnaryOp::Neg, Box::new(lower(a)?)),
        Ast::UnaryOp(..) => return Err(ParseFault::Unsupported("logical and bitwise operators")),
        Ast::BinOp(BinOp::Pow, a, b) => pow_node(lower(a)?, lower(b)?),
        Ast::BinOp(op @ (BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div), a, b) => {
            Ast::BinOp(*op, Box::new(lower(a)?), Box::new(lower(b)?))
        }
        Ast::BinOp(..) => {
            return Err(ParseFault::Unsupported(
                "remainder, bitwise and shift operators",
            ));
        }
        Ast::Call(name, args) => {
            let func =
                Func::from_ident(name).ok_or_else(|| ParseFault::UnknownFunction(name.clone()))?;
            if !func.arities().contains(&args.len()) {
                return Err(ParseFault::Arity {
                    name: name.clone(),
                    expected: func.expected(),
                    found: args.len(),
                });
            }
            let args = args.iter().map(lower).collect::<Result<Vec<_>, _>>()?;
            Ast::Call(name.clone(), args)
        }
        Ast::Let { .. } => return Err(ParseFault::Unsupported("let bindings")),
        _ => return Err(ParseFault::Unsupported("comparisons and conditionals")),
    })
}
///parses source into a syntax tree without touching any existing function
pub fn parse(source: &str) -> Result<Ast, ParseFault> {
    let source = source.trim();
    if source.is_empty() {
        return Err(ParseFault::Empty);
    }
    if source.chars().count() > MAX_SOURCE {
        return Err(ParseFault::TooLong { limit: MAX_SOURCE });
    }
    let source = source
        .replace('π', "pi")
        .replace('τ', "tau")
        .replace('φ', "phi");
    let too_deep = ParseFault::TooDeep { limit: MAX_DEPTH };
    if nesting_bound(&source) > MAX_DEPTH {
        return Err(too_deep);
    }
    let expr = Expr::parse(&source)?;
    if tree_depth(expr.ast()) > MAX_DEPTH {
        return Err(too_deep);
    }
    lower(expr.ast())
}
fn precedence(ast: &Ast) -> u8 {
    match ast {
        Ast::BinOp(BinOp::Add | BinOp::Sub, ..) => 1,
        Ast::BinOp(BinOp::Mul | BinOp::Div, ..) => 2,
        Ast::BinOp(BinOp::Pow, ..) => 3,
        Ast::Call(name, args) if is_pow(name, args) => 3,
        Ast::UnaryOp(..) => 4,
        Ast::Num(n) if n.is_sign_negative() => 4,
        _ => 5,
    }
}
fn is_pow(name: &str, args: &[Ast]) -> bool {
    name == Func::Pow.ident() && args.len() == 2
}
///prints with the fewest parentheses dew needs to read it back
struct Infix<'a>(&'a Ast);
impl Infix<'_> {
    fn child(f: &mut fmt::Formatter<'_>, ast: &Ast, parens: bool) -> fmt::Result {
        if parens {
            write!(f, "({})", Infix(ast))
        } else {
            write!(f, "{}", Infix(ast))
        }
    }
    fn power(f: &mut fmt::Formatter<'_>, base: &Ast, exponent: &Ast) -> fmt::Result {
        Self::child(f, base, precedence(base) < 5)?;
        write!(f, "^")?;
        Self::child(f, exponent, precedence(exponent) < 3)
    }
}
impl fmt::Display for Infix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Ast::Num(x) if *x == E => write!(f, "e"),
            Ast::Num(x) if *x == PI => write!(f, "pi"),
            Ast::Num(x) if *x == TAU => write!(f, "tau"),
            Ast::Num(x) => write!(f, "{x}"),
            Ast::Var(name) => write!(f, "{name}"),
            Ast::UnaryOp(UnaryOp::Neg, a) => {
                write!(f, "-")?;
                Self::child(f, a, precedence(a) < 4)
            }
            Ast::BinOp(BinOp::Pow, a, b) => Self::power(f, a, b),
            Ast::Call(name, args) if is_pow(name, args) => Self::power(f, &args[0], &args[1]),
            Ast::BinOp(op, a, b) => {
                let p = precedence(self.0);
                let tight = matches!(op, BinOp::Sub | BinOp::Div);
                Self::child(f, a, precedence(a) < p)?;
                if p == 1 {
                    write!(f, " {op} ")?;
                } else {
                    write!(f, "{op}")?;
                }
                Self::child(f, b, precedence(b) < p || (precedence(b) == p && tight))
            }
            Ast::Call(name, args) => {
                write!(f, "{name}(")?;
                for (k, arg) in args.iter().enumerate() {
                    if k > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", Infix(arg))?;
                }
                write!(f, ")")
            }
            other => write!(f, "{other}"),
        }
    }
}
///an immutable compiled expression, evaluation never mutates it
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    ast: Ast,
}
impl Function {
    pub fn compile(source: &str) -> Result<Self, ParseFault> {
        parse(source).map(Self::from)
    }
    pub fn ast(&self) -> &Ast {
        &self.ast
    }
    ///a non finite result is reported as a fault so callers only ever see finite values
    pub fn eval(&self, z: Complex) -> Result<Complex, EvalFault> {
        let scope = HashMap::from([
            ("z".to_string(), Value(z)),
            ("i".to_string(), Value(Complex::i())),
        ]);
        let Value(w) = dew_complex::eval(&self.ast, &scope, registry())?;
        if w.is_finite() {
            Ok(w)
        } else {
            Err(EvalFault::NonFinite)
        }
    }
}
impl From<Ast> for Function {
    fn from(ast: Ast) -> Self {
        Self { ast }
    }
}
impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Infix(&self.ast))
    }
}
pub fn compile(source: &str) -> Result<Function, ParseFault> {
    Function::compile(source)
}
#[cfg(test)]
mod tests {
    use super::*;
    fn eval(source: &str, z: Complex) -> Complex {
        compile(source).unwrap().eval(z).unwrap()
    }
    fn close(a: Complex, b: Complex) -> bool {
        (a - b).norm() < 1e-9
    }
    #[test]
    fn arithmetic_precedence() {
        let z = Complex::new(2.0, 0.0);
        let c = |re| Complex::new(re, 0.0);
        assert!(close(eval("1 + 2 * z", z), c(5.0)));
        assert!(close(eval("(1 + 2) * z", z), c(6.0)));
        assert!(close(eval("-z^2", z), c(4.0)));
        assert!(close(eval("-(z^2)", z), c(-4.0)));
        assert!(close(eval("2^3^2", z), c(512.0)));
        assert!(close(eval("z^-1", z), c(0.5)));
        assert!(close(eval("8 / 2 / 2", z), c(2.0)));
        assert!(close(eval("1 - 2 - 3", z), c(-4.0)));
    }
    #[test]
    fn constants_and_functions() {
        let zero = Complex::new(0.0, 0.0);
        assert!(close(eval("e^(i*pi)", zero), Complex::new(-1.0, 0.0)));
        assert!(close(eval("2*π", zero), Complex::new(2.0 * PI, 0.0)));
        assert!(close(eval("exp(z)", zero), Complex::new(1.0, 0.0)));
        assert!(close(eval("sqrt(z - 4)", zero), Complex::new(0.0, 2.0)));
        assert!(close(eval("sqrt(-4)", zero), Complex::new(0.0, 2.0)));
        assert!(close(eval("log(8, 2)", zero), Complex::new(3.0, 0.0)));
        assert!(close(eval("pow(z + 2, 3)", zero), Complex::new(8.0, 0.0)));
        assert!(close(eval("abs(3 + 4*i)", zero), Complex::new(5.0, 0.0)));
        assert!(close(
            eval("conj(z)", Complex::new(1.0, 2.0)),
            Complex::new(1.0, -2.0)
        ));
    }
    #[test]
    fn dew_builtins_agree_with_num_complex() {
        let z = Complex::new(0.7, -1.3);
        for func in FUNCS.into_iter().filter(|f| f.is_dew_builtin()) {
            let source = format!("{}(z)", func.ident());
            assert!(
                close(eval(&source, z), func.apply(&[z])),
                "{source}"
            );
        }
    }
    #[test]
    fn undefined_points_are_faults() {
        let zero = Complex::new(0.0, 0.0);
        for source in ["1/z", "z^-2", "ln(z)", "0^(z - 1)"] {
            let f = compile(source).unwrap();
            assert_eq!(f.eval(zero), Err(EvalFault::NonFinite), "{source}");
        }
        assert!(close(eval("z^2", zero), zero));
    }
    #[test]
    fn malformed_input() {
        assert_eq!(compile("z^"), Err(ParseFault::UnexpectedEnd));
        assert_eq!(compile("   "), Err(ParseFault::Empty));
        assert_eq!(compile("(z + 1"), Err(ParseFault::UnexpectedEnd));
        assert_eq!(
            compile("z + w"),
            Err(ParseFault::UnknownIdentifier("w".to_string()))
        );
        assert_eq!(
            compile("foo(z)"),
            Err(ParseFault::UnknownFunction("foo".to_string()))
        );
        assert_eq!(compile("z $ 2"), Err(ParseFault::UnexpectedChar('$')));
        assert_eq!(
            compile("z)"),
            Err(ParseFault::UnexpectedToken(")".to_string()))
        );
        assert_eq!(
            compile("2z"),
            Err(ParseFault::UnexpectedToken("z".to_string()))
        );
        assert!(matches!(
            compile("sin(z, 2)"),
            Err(ParseFault::Arity { found: 2, .. })
        ));
        assert_eq!(
            compile("sin"),
            Err(ParseFault::MissingArguments("sin".to_string()))
        );
        assert_eq!(
            compile("1.2.3"),
            Err(ParseFault::InvalidNumber("1.2.3".to_string()))
        );
        assert!(matches!(compile("z % 2"), Err(ParseFault::Unsupported(_))));
        assert_eq!(
            compile("let w = z; w"),
            Err(ParseFault::Unsupported("let bindings"))
        );
    }
    #[test]
    fn nesting_is_bounded() {
        let too_deep = Err(ParseFault::TooDeep { limit: MAX_DEPTH });
        let nested = |n| format!("{}z{}", "(".repeat(n), ")".repeat(n));
        assert!(compile(&nested(100)).is_ok());
        assert_eq!(compile(&nested(300)), too_deep);
        assert!(matches!(
            compile(&nested(600)),
            Err(ParseFault::TooLong { .. } | ParseFault::TooDeep { .. })
        ));
        assert_eq!(compile(&format!("{}z", "-".repeat(500))), too_deep);
        assert_eq!(compile(&format!("{}z", "z^".repeat(200))), too_deep);
        assert_eq!(compile(&vec!["z"; 300].join("+")), too_deep);
        assert_eq!(
            compile(&format!("{}z", "-".repeat(2000))),
            Err(ParseFault::TooLong { limit: MAX_SOURCE })
        );
    }
    #[test]
    fn display_is_minimal() {
        let shown = |source: &str| compile(source).unwrap().to_string();
        assert_eq!(shown("z^2 + 1"), "z^2 + 1");
        assert_eq!(shown("-z^2"), "(-z)^2");
        assert_eq!(shown("-(z^2)"), "-(z^2)");
        assert_eq!(shown("(z - 1)/(z + 1)"), "(z - 1)/(z + 1)");
        assert_eq!(shown("e^(i*pi*z)"), "e^(i*pi*z)");
        assert_eq!(shown("log(z, 2)"), "log(z, 2)");
    }
    #[test]
    fn display_reparses_to_same_values() {
        for source in [
            "-z^2",
            "-(z^2)",
            "(z - 1)/(z + 1)",
            "2^(z - 1)",
            "-(z + 1)*3",
            "sin(z)^2 - z/(2 - z)",
            "z^-2 - -z",
        ] {
            let f = compile(source).unwrap();
            let again = compile(&f.to_string()).unwrap();
            let z = Complex::new(0.3, -0.7);
            assert!(
                close(f.eval(z).unwrap(), again.eval(z).unwrap()),
                "{source} -> {f}"
            );
        }
    }
}
