//! Role-based access policy.
//!
//! Every protected operation is granted to exactly one role. The table lives
//! in [`Operation::required_role`] so the whole policy can be audited in one
//! place; the HTTP layer only ever asks [`Operation::permits`].

use super::user::UserRole;

/// Operations guarded by the role gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListUsers,
    ImportProducts,
    SearchProducts,
    CreateReview,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::ListUsers,
        Operation::ImportProducts,
        Operation::SearchProducts,
        Operation::CreateReview,
    ];

    pub fn required_role(self) -> UserRole {
        match self {
            Operation::ListUsers => UserRole::Admin,
            Operation::ImportProducts => UserRole::Admin,
            Operation::SearchProducts => UserRole::Client,
            Operation::CreateReview => UserRole::Client,
        }
    }

    pub fn permits(self, role: UserRole) -> bool {
        self.required_role() == role
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::ListUsers => "list_users",
            Operation::ImportProducts => "import_products",
            Operation::SearchProducts => "search_products",
            Operation::CreateReview => "create_review",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_operations() {
        assert!(Operation::ListUsers.permits(UserRole::Admin));
        assert!(Operation::ImportProducts.permits(UserRole::Admin));
        assert!(!Operation::ImportProducts.permits(UserRole::Client));
    }

    #[test]
    fn client_operations() {
        assert!(Operation::SearchProducts.permits(UserRole::Client));
        assert!(Operation::CreateReview.permits(UserRole::Client));
        assert!(!Operation::SearchProducts.permits(UserRole::Admin));
    }

    #[test]
    fn every_operation_has_exactly_one_role() {
        for op in Operation::ALL {
            let allowed = [UserRole::Admin, UserRole::Client]
                .into_iter()
                .filter(|role| op.permits(*role))
                .count();
            assert_eq!(allowed, 1, "{} must be granted to one role", op.as_str());
        }
    }
}
