use std::fmt;

/// A step taken while simplifying an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `1/x + 1/y = (x + y)/(x*y)`
    CombineFractions,

    /// `(x**2 - 1)/(x - 1) = x + 1`
    Cancel,

    /// `x*(x + 1) = x**2 + x`
    Expand,

    /// `x**2 + 2*x + 1 = (x + 1)**2`
    Factor,

    /// `sin(x)**2 + cos(x)**2 = 1`
    PythagoreanIdentity,

    /// `sin(x)/cos(x) = tan(x)`
    TangentIdentity,

    /// `2*sin(x)*cos(x) = sin(2*x)`
    DoubleAngle,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let description = match self {
            Self::CombineFractions => "Combine the fractions over a common denominator",
            Self::Cancel => "Cancel the common factors of the numerator and denominator",
            Self::Expand => "Expand the products",
            Self::Factor => "Factor the expression",
            Self::PythagoreanIdentity => "Apply the identity sin(x)**2 + cos(x)**2 = 1",
            Self::TangentIdentity => "Apply the identity sin(x)/cos(x) = tan(x)",
            Self::DoubleAngle => "Apply the identity 2*sin(x)*cos(x) = sin(2*x)",
        };
        write!(f, "{}", description)
    }
}
