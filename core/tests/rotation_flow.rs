//! End-to-end login and refresh flows against the in-memory collaborators

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use uuid::Uuid;

    use garage_core::domain::IdentityKind;
    use garage_core::errors::{AuthError, DomainError, TokenError};
    use garage_core::repositories::{
        IdentityStore, KindDirectory, MockIdentityStore, MockRefreshTokenLedger,
        MockUserDirectory, MockWorkshopDirectory, RefreshTokenLedger,
    };
    use garage_core::services::token::hash_refresh_token;
    use garage_core::services::{AuthService, TokenIssuer, TokenIssuerConfig};

    type Service =
        AuthService<MockIdentityStore, KindDirectory<MockUserDirectory, MockWorkshopDirectory>, MockRefreshTokenLedger>;

    const PASSWORD: &str = "correct horse battery staple";

    struct Setup {
        service: Arc<Service>,
        ledger: Arc<MockRefreshTokenLedger>,
        identities: Arc<MockIdentityStore>,
        users: Arc<MockUserDirectory>,
        workshops: Arc<MockWorkshopDirectory>,
    }

    fn setup() -> Setup {
        let identities = Arc::new(MockIdentityStore::new());
        let users = Arc::new(MockUserDirectory::new());
        let workshops = Arc::new(MockWorkshopDirectory::new());
        let ledger = Arc::new(MockRefreshTokenLedger::new());
        let issuer = TokenIssuer::new(TokenIssuerConfig::default()).unwrap();

        let service = AuthService::new(
            identities.clone(),
            Arc::new(KindDirectory::new(users.clone(), workshops.clone())),
            ledger.clone(),
            issuer,
        );

        Setup {
            service: Arc::new(service),
            ledger,
            identities,
            users,
            workshops,
        }
    }

    async fn register(setup: &Setup, email: &str, kind: IdentityKind) -> Uuid {
        let identity = setup
            .identities
            .create(email, "someone", kind, PASSWORD)
            .await
            .unwrap();
        match kind {
            IdentityKind::User => setup.users.insert(identity.id, Uuid::new_v4()).await,
            IdentityKind::Workshop => setup.workshops.insert(identity.id, Uuid::new_v4()).await,
        }
        identity.id
    }

    fn is_invalid_refresh<T: std::fmt::Debug>(result: &Result<T, DomainError>) -> bool {
        matches!(
            result,
            Err(DomainError::Token(TokenError::InvalidOrExpiredRefreshToken))
        )
    }

    #[tokio::test]
    async fn test_login_rotate_replay_and_mismatched_pair() {
        let setup = setup();
        register(&setup, "u1@example.com", IdentityKind::User).await;

        let first = setup
            .service
            .login("u1@example.com", PASSWORD, IdentityKind::User)
            .await
            .unwrap();

        let second = setup
            .service
            .refresh(&first.access_token, &first.refresh_token)
            .await
            .unwrap();
        assert_ne!(second.access_token, first.access_token);
        assert_ne!(second.refresh_token, first.refresh_token);
        assert_eq!(second.domain_entity_id, first.domain_entity_id);

        let old_entry = setup
            .ledger
            .find_refresh_token(&hash_refresh_token(&first.refresh_token))
            .await
            .unwrap()
            .unwrap();
        let new_entry = setup
            .ledger
            .find_refresh_token(&hash_refresh_token(&second.refresh_token))
            .await
            .unwrap()
            .unwrap();
        assert!(old_entry.is_used());
        assert_ne!(new_entry.jti, old_entry.jti);

        let replay = setup
            .service
            .refresh(&first.access_token, &first.refresh_token)
            .await;
        assert!(is_invalid_refresh(&replay));

        let mismatched = setup
            .service
            .refresh(&second.access_token, &first.refresh_token)
            .await;
        assert!(is_invalid_refresh(&mismatched));

        // The legitimate successor pair is untouched by the failed attempts.
        assert!(setup
            .service
            .refresh(&second.access_token, &second.refresh_token)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_login_and_refresh_errors_look_alike() {
        let setup = setup();
        register(&setup, "u1@example.com", IdentityKind::User).await;

        let login = setup
            .service
            .login("u1@example.com", "nope", IdentityKind::User)
            .await
            .unwrap_err();
        let refresh = setup
            .service
            .refresh("not-a-token", "not-a-refresh-token")
            .await
            .unwrap_err();

        assert!(matches!(login, DomainError::Auth(AuthError::InvalidCredentials)));
        assert!(login.is_unauthorized());
        assert!(refresh.is_unauthorized());
    }

    #[tokio::test]
    async fn test_kind_isolation_on_login() {
        let setup = setup();
        register(&setup, "shop@example.com", IdentityKind::Workshop).await;

        let as_user = setup
            .service
            .login("shop@example.com", PASSWORD, IdentityKind::User)
            .await;
        let as_workshop = setup
            .service
            .login("shop@example.com", PASSWORD, IdentityKind::Workshop)
            .await
            .unwrap();

        assert!(matches!(as_user, Err(DomainError::Auth(AuthError::InvalidCredentials))));
        assert_eq!(as_workshop.kind, IdentityKind::Workshop);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_rotations_yield_one_pair() {
        let setup = setup();
        let identity_id = register(&setup, "u1@example.com", IdentityKind::User).await;

        let login = setup
            .service
            .login("u1@example.com", PASSWORD, IdentityKind::User)
            .await
            .unwrap();

        let attempts: Vec<_> = (0..2)
            .map(|_| {
                let service = setup.service.clone();
                let access = login.access_token.clone();
                let refresh = login.refresh_token.clone();
                tokio::spawn(async move { service.refresh(&access, &refresh).await })
            })
            .collect();

        let mut succeeded = 0;
        let mut rejected = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(_) => succeeded += 1,
                Err(DomainError::Token(TokenError::InvalidOrExpiredRefreshToken)) => rejected += 1,
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }

        assert_eq!(succeeded, 1);
        assert_eq!(rejected, 1);
        // One entry from login, exactly one from the winning rotation.
        assert_eq!(setup.ledger.entries_for(identity_id).await.len(), 2);
    }
}
