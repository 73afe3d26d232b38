use crate::ast::UnknownName;
use std::fmt;

/// The fixed variable table. Each variable reads its value from a stable
/// position of the slice handed to [`ExpressionNode::evaluate`].
///
/// [`ExpressionNode::evaluate`]: crate::ast::ExpressionNode::evaluate
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Variable {
    X,
    Y,
    Z,
}

impl Variable {
    /// Number of registered variables, i.e. the expected length of an assignment.
    pub const COUNT: usize = 3;

    pub const ALL: [Variable; Self::COUNT] = [Variable::X, Variable::Y, Variable::Z];

    pub fn resolve(name: &str) -> Option<Self> {
        match name {
            "x" => Some(Variable::X),
            "y" => Some(Variable::Y),
            "z" => Some(Variable::Z),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Variable::X => 0,
            Variable::Y => 1,
            Variable::Z => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variable::X => "x",
            Variable::Y => "y",
            Variable::Z => "z",
        }
    }
}

impl TryFrom<&str> for Variable {
    type Error = UnknownName;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Variable::resolve(value).ok_or_else(|| UnknownName::Variable(value.to_string()))
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_stable_and_unique() {
        let indices: Vec<usize> = Variable::ALL.iter().map(|v| v.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_resolve_round_trips_names() {
        for variable in Variable::ALL {
            assert_eq!(Variable::resolve(variable.name()), Some(variable));
        }
        assert_eq!(Variable::resolve("w"), None);
        assert_eq!(Variable::resolve("X"), None);
    }

    #[test]
    fn test_try_from_unknown_name() {
        assert_eq!(
            Variable::try_from("t"),
            Err(UnknownName::Variable("t".to_string()))
        );
    }
}
