/// The default number of evaluation steps a single request may take.
pub const DEFAULT_MAX_STEPS: usize = 100_000;

/// The default maximum depth of nested user function calls.
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 64;

/// The default number of iterations a single `for` loop may run, which also bounds `range`.
pub const DEFAULT_MAX_LOOP_ITERATIONS: usize = 10_000;

/// Bounds on the work a single evaluation request may do.
///
/// Every evaluated statement and expression node consumes one step. Running out of steps, calling
/// user functions too deeply, or looping too long stops the evaluation with an error instead of
/// letting it run forever.
///
/// ```
/// use gamma_compute::eval::Limits;
///
/// let limits = Limits::builder().max_steps(500).max_recursion_depth(16).build();
/// assert_eq!(limits.max_steps, 500);
/// assert_eq!(limits.max_loop_iterations, Limits::default().max_loop_iterations);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// The maximum number of steps.
    pub max_steps: usize,

    /// The maximum depth of nested user function calls.
    pub max_recursion_depth: usize,

    /// The maximum number of iterations of a single loop.
    pub max_loop_iterations: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
            max_loop_iterations: DEFAULT_MAX_LOOP_ITERATIONS,
        }
    }
}

impl Limits {
    /// Starts building limits from the defaults.
    pub fn builder() -> LimitsBuilder {
        LimitsBuilder::default()
    }
}

/// Builder for [`Limits`].
#[derive(Debug, Clone, Default)]
pub struct LimitsBuilder {
    limits: Limits,
}

impl LimitsBuilder {
    pub fn max_steps(mut self, steps: usize) -> Self {
        self.limits.max_steps = steps;
        self
    }

    pub fn max_recursion_depth(mut self, depth: usize) -> Self {
        self.limits.max_recursion_depth = depth;
        self
    }

    pub fn max_loop_iterations(mut self, iterations: usize) -> Self {
        self.limits.max_loop_iterations = iterations;
        self
    }

    pub fn build(self) -> Limits {
        self.limits
    }
}
