/// Flags inherited while walking down the tree.
///
/// Each flag only ever switches on; children get a modified copy and the
/// caller's value is left untouched.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TraversalContext {
    pub in_callable_body: bool,
    pub skip_parameters: bool,
    pub skip_binding_elements: bool,
}

impl TraversalContext {
    pub fn entering_body(self) -> Self {
        Self {
            in_callable_body: true,
            ..self
        }
    }

    pub fn skipping_parameters(self) -> Self {
        Self {
            skip_parameters: true,
            ..self
        }
    }

    pub fn skipping_binding_elements(self) -> Self {
        Self {
            skip_binding_elements: true,
            ..self
        }
    }

    /// Variables and binding elements only count outside executable bodies.
    pub fn admits_variables(&self) -> bool {
        !self.in_callable_body
    }

    pub fn admits_binding_elements(&self) -> bool {
        !self.in_callable_body && !self.skip_binding_elements
    }
}
