use gamma_compute::eval::Limits;

/// The default number of lines kept from the trace of an unexpected error.
pub const DEFAULT_TRACE_CAP: usize = 5;

/// The default number of significant digits of numeric approximations.
pub const DEFAULT_DIGITS: u32 = 15;

/// Settings shared by every request handled by a [`Gamma`](crate::Gamma).
///
/// ```
/// use gamma_cards::Config;
/// use gamma_compute::eval::Limits;
///
/// let config = Config::builder()
///     .limits(Limits::builder().max_steps(1000).build())
///     .trace_cap(3)
///     .build();
/// assert_eq!(config.limits.max_steps, 1000);
/// assert_eq!(config.digits, 15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// The limits each request's evaluator runs under.
    pub limits: Limits,

    /// The maximum number of trace lines in the card of an unexpected error.
    pub trace_cap: usize,

    /// The number of significant digits shown next to exact constants.
    pub digits: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            trace_cap: DEFAULT_TRACE_CAP,
            digits: DEFAULT_DIGITS,
        }
    }
}

impl Config {
    /// Starts building a configuration from the defaults.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn limits(mut self, limits: Limits) -> Self {
        self.config.limits = limits;
        self
    }

    pub fn trace_cap(mut self, cap: usize) -> Self {
        self.config.trace_cap = cap;
        self
    }

    pub fn digits(mut self, digits: u32) -> Self {
        self.config.digits = digits;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
