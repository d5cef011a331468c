use uuid::Uuid;

/// Identity of the user logged in on this client process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: Uuid,
    pub username: String,
}
