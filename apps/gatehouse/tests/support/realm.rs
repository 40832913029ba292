use std::collections::HashMap;
use std::sync::Arc;

use gatehouse::state::builder::build_state;
use gatehouse::{
    AppState, AuthConfig, GuardName, InMemoryPrincipalStore, Principal, PrincipalStatus,
    RevocationList,
};
use gatehouse_test_support::unique_helpers::{unique_email, unique_id};

pub const USER_SECRET: &str = "user-guard-test-secret";
pub const ADMIN_SECRET: &str = "admin-guard-test-secret";
pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// A principal created for one test, with its plain-text password.
#[derive(Debug, Clone)]
pub struct TestPrincipal {
    pub id: i64,
    pub email: String,
    pub password: String,
}

/// App state plus handles on the `users` and `admins` providers, so tests
/// can add principals and flip their status behind the app's back.
pub struct TestRealm {
    pub state: AppState,
    pub users: Arc<InMemoryPrincipalStore>,
    pub admins: Arc<InMemoryPrincipalStore>,
    pub revocations: Arc<RevocationList>,
}

impl TestRealm {
    /// `user` and `admin` jwt guards with distinct secrets.
    pub fn new() -> Self {
        Self::with_vars(&[])
    }

    /// Default guards with `vars` layered on top of the test secrets.
    pub fn with_vars(vars: &[(&str, &str)]) -> Self {
        let mut env: HashMap<String, String> = HashMap::from([
            ("AUTH_GUARD_USER_JWT_SECRET".to_string(), USER_SECRET.to_string()),
            ("AUTH_GUARD_ADMIN_JWT_SECRET".to_string(), ADMIN_SECRET.to_string()),
        ]);
        for (key, value) in vars {
            env.insert(key.to_string(), value.to_string());
        }
        let config = AuthConfig::from_lookup(|key| env.get(key).cloned())
            .expect("test auth config should be valid");

        let users = Arc::new(InMemoryPrincipalStore::new());
        let admins = Arc::new(InMemoryPrincipalStore::new());
        let revocations = Arc::new(RevocationList::new());
        let state = build_state(config)
            .with_provider("users", users.clone())
            .with_provider("admins", admins.clone())
            .with_revocations(revocations.clone())
            .build()
            .expect("test state should build");

        Self {
            state,
            users,
            admins,
            revocations,
        }
    }

    pub fn add_user(&self, status: PrincipalStatus) -> TestPrincipal {
        add_principal(&self.users, "user", status)
    }

    pub fn add_admin(&self, status: PrincipalStatus) -> TestPrincipal {
        add_principal(&self.admins, "admin", status)
    }

    pub fn deactivate_user(&self, principal: &TestPrincipal) {
        assert!(self.users.set_status(principal.id, PrincipalStatus::Inactive));
    }

    pub fn deactivate_admin(&self, principal: &TestPrincipal) {
        assert!(self.admins.set_status(principal.id, PrincipalStatus::Inactive));
    }

    pub fn revoked_tokens(&self) -> usize {
        self.revocations.len()
    }
}

pub fn guard(name: &str) -> GuardName {
    GuardName::parse(name).expect("valid guard name")
}

fn add_principal(
    store: &InMemoryPrincipalStore,
    prefix: &str,
    status: PrincipalStatus,
) -> TestPrincipal {
    let principal = Principal {
        id: unique_id(),
        email: unique_email(prefix),
        name: format!("Test {prefix}"),
        status,
    };
    let created = TestPrincipal {
        id: principal.id,
        email: principal.email.clone(),
        password: TEST_PASSWORD.to_string(),
    };
    store
        .insert(principal, TEST_PASSWORD)
        .expect("unique principal should insert");
    created
}
