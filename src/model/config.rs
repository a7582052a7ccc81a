/// How member values are assigned to the generated object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssignmentStyle {
    /// Fields are written directly
    #[default]
    Field,
    /// Fields are written through their matching setter, if there is one
    Method,
}

/// Naming convention used to pair setters with fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetterStyle {
    /// `setFoo(value)`
    #[default]
    Set,
    /// `withFoo(value)`
    With,
    /// `foo(value)`
    Property,
}

impl SetterStyle {
    /// The prefix setters of this style start with; `None` for property-style setters
    #[must_use]
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            SetterStyle::Set => Some("set"),
            SetterStyle::With => Some("with"),
            SetterStyle::Property => None,
        }
    }

    /// The setter name this style expects for `field`
    #[must_use]
    pub fn setter_name(&self, field: &str) -> String {
        match self.prefix() {
            Some(prefix) => {
                let mut chars = field.chars();
                match chars.next() {
                    Some(first) => format!("{prefix}{}{}", first.to_uppercase(), chars.as_str()),
                    None => prefix.to_string(),
                }
            }
            None => field.to_string(),
        }
    }
}

/// Configuration for building node graphs.
///
/// Controls how deep the graph is expanded and how members are discovered.
/// The defaults describe plain field assignment with a maximum depth of 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeConfig {
    /// Maximum depth of created nodes, the root being at depth 0. Members whose node
    /// would be deeper are left out of their parent's children. 0 means unlimited.
    pub max_depth: usize,

    /// Whether members are assigned through fields or setters
    pub assignment: AssignmentStyle,

    /// Naming convention used to pair fields with setters in [`AssignmentStyle::Method`]
    pub setter_style: SetterStyle,

    /// Drop setters that have no matching field. When false they become members of
    /// their own (only for prefixed setter styles)
    pub ignore_unmatched_setters: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            assignment: AssignmentStyle::Field,
            setter_style: SetterStyle::Set,
            ignore_unmatched_setters: true,
        }
    }
}

impl NodeConfig {
    /// Creates a configuration without a depth limit
    ///
    /// Cycle detection still guarantees termination.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_depth: 0,
            ..Self::default()
        }
    }

    /// Creates a configuration assigning members through `setFoo` style setters
    #[must_use]
    pub fn method_assignment() -> Self {
        Self {
            assignment: AssignmentStyle::Method,
            ..Self::default()
        }
    }

    /// Returns a copy with a different depth limit
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns a copy with a different setter naming convention
    #[must_use]
    pub fn with_setter_style(mut self, setter_style: SetterStyle) -> Self {
        self.setter_style = setter_style;
        self
    }

    /// Returns a copy that keeps or drops unmatched setters
    #[must_use]
    pub fn with_ignore_unmatched_setters(mut self, ignore: bool) -> Self {
        self.ignore_unmatched_setters = ignore;
        self
    }

    /// Returns true if a node at `depth` may still be created
    #[must_use]
    pub fn allows_depth(&self, depth: usize) -> bool {
        self.max_depth == 0 || depth <= self.max_depth
    }
}
