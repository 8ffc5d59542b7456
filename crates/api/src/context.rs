use staybook_core::UserId;

/// Authenticated user context for a request.
///
/// Inserted by the auth middleware; present on all protected routes. The
/// session is threaded explicitly through handlers rather than looked up from
/// ambient state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UserContext {
    user_id: UserId,
}

impl UserContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}
