use crate::ast::UnknownName;
use crate::functions::{aggregate, arithmetic, trigonometry, Kernel};
use std::fmt;

/// Number of operands an operation accepts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Arity {
    Exact(usize),
    Variadic,
}

impl Arity {
    /// Tests whether the given operand count satisfies this arity constraint.
    pub fn accepts(self, count: usize) -> bool {
        self.check(count).is_ok()
    }

    /// Like [`Arity::accepts`], but a rejected count yields the count that
    /// was expected instead.
    pub fn check(self, count: usize) -> Result<(), usize> {
        match self {
            Arity::Exact(expected) if count != expected => Err(expected),
            _ => Ok(()),
        }
    }
}

/// Defines the closed operation registry: the enum, its symbols, arities
/// and kernels, all from a single table.
macro_rules! operations {
    (
        $(
            $variant:ident => {
                symbol: $symbol:literal,
                arity: $arity:expr,
                kernel: $kernel:path $(,)?
            }
        ),* $(,)?
    ) => {
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        pub enum Operation {
            $($variant,)*
        }

        impl Operation {
            /// Every registered operation, in registry order.
            pub const ALL: &'static [Operation] = &[$(Operation::$variant,)*];

            pub fn resolve(name: &str) -> Option<Self> {
                match name {
                    $($symbol => Some(Operation::$variant),)*
                    _ => None,
                }
            }

            pub fn symbol(self) -> &'static str {
                match self {
                    $(Operation::$variant => $symbol,)*
                }
            }

            pub fn arity(self) -> Arity {
                match self {
                    $(Operation::$variant => $arity,)*
                }
            }

            fn kernel(self) -> Kernel {
                match self {
                    $(Operation::$variant => $kernel as Kernel,)*
                }
            }
        }
    };
}

operations! {
    Add      => { symbol: "+",      arity: Arity::Exact(2), kernel: arithmetic::add },
    Subtract => { symbol: "-",      arity: Arity::Exact(2), kernel: arithmetic::subtract },
    Multiply => { symbol: "*",      arity: Arity::Exact(2), kernel: arithmetic::multiply },
    Divide   => { symbol: "/",      arity: Arity::Exact(2), kernel: arithmetic::divide },
    Negate   => { symbol: "negate", arity: Arity::Exact(1), kernel: arithmetic::negate },
    ArcTan   => { symbol: "atan",   arity: Arity::Exact(1), kernel: trigonometry::atan },
    ArcTan2  => { symbol: "atan2",  arity: Arity::Exact(2), kernel: trigonometry::atan2 },
    Min3     => { symbol: "min3",   arity: Arity::Variadic, kernel: aggregate::min3 },
    Max5     => { symbol: "max5",   arity: Arity::Variadic, kernel: aggregate::max5 },
    Sum      => { symbol: "sum",    arity: Arity::Variadic, kernel: aggregate::sum },
    Avg      => { symbol: "avg",    arity: Arity::Variadic, kernel: aggregate::avg },
}

impl Operation {
    /// Applies the operation to already evaluated operands.
    ///
    /// The operand count must satisfy [`Operation::arity`]; the parser and
    /// [`ExpressionNode::evaluate`](crate::ast::ExpressionNode::evaluate)
    /// both check this before calling.
    ///
    /// # Panics
    ///
    /// Panics if a fixed-arity operation receives fewer operands than its
    /// arity.
    pub fn apply(self, operands: &[f64]) -> f64 {
        (self.kernel())(operands)
    }
}

impl TryFrom<&str> for Operation {
    type Error = UnknownName;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Operation::resolve(value).ok_or_else(|| UnknownName::Operation(value.to_string()))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
