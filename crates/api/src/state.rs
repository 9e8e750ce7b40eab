use fieldguard_core::user::DocType;
use fieldguard_core::validation::derived::DerivedFieldValidator;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (the rule table is a process-wide static).
#[derive(Clone)]
pub struct AppState {
    /// Derived-field rules applied to user document updates.
    pub user_rules: &'static DerivedFieldValidator<DocType>,
}

impl AppState {
    /// State backed by the built-in user document rules.
    pub fn new() -> Self {
        Self {
            user_rules: &*fieldguard_core::user::DOC_FIELD_RULES,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
