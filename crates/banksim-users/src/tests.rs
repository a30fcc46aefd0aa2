// Directory behaviour across operations

#[cfg(test)]
mod tests {
    use crate::*;
    use banksim_types::{BankError, RequestContext, UserId};

    #[tokio::test]
    async fn test_list_users() {
        let dir = UserDirectory::new();
        let ctx = RequestContext::new();

        let a = dir.create_user(&ctx, "alice", "alice@bank.io").await.unwrap();
        let b = dir.create_user(&ctx, "bob", "bob@bank.io").await.unwrap();

        let users = dir.list_users(&ctx).await.unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.iter().any(|u| u.id == a));
        assert!(users.iter().any(|u| u.id == b));
    }

    #[tokio::test]
    async fn test_list_users_canceled() {
        let dir = UserDirectory::new();
        let ctx = RequestContext::new();
        ctx.cancel();

        let err = dir.list_users(&ctx).await.unwrap_err();
        assert!(matches!(err, BankError::Canceled(_)));
    }

    #[tokio::test]
    async fn test_point_lookups_ignore_cancellation() {
        let dir = UserDirectory::new();
        let id = dir
            .create_user(&RequestContext::new(), "alice", "alice@bank.io")
            .await
            .unwrap();

        let ctx = RequestContext::new();
        ctx.cancel();

        let user = dir.get_user(&ctx, &id).await.unwrap();
        assert_eq!(user.login, "alice");
    }

    #[tokio::test]
    async fn test_update_user_ignores_empty_fields() {
        let dir = UserDirectory::new();
        let ctx = RequestContext::new();
        let id = dir.create_user(&ctx, "alice", "alice@bank.io").await.unwrap();

        let updated = dir
            .update_user(
                &ctx,
                &id,
                UserUpdate {
                    login: Some(String::new()),
                    email: Some("alice@new.io".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.login, "alice");
        assert_eq!(updated.email, "alice@new.io");

        let updated = dir
            .update_user(
                &ctx,
                &id,
                UserUpdate {
                    login: Some("alicia".to_string()),
                    email: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.login, "alicia");
        assert_eq!(updated.email, "alice@new.io");

        assert_eq!(dir.get_user(&ctx, &id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_unknown_user() {
        let dir = UserDirectory::new();
        let ctx = RequestContext::new();

        let err = dir
            .update_user(&ctx, &UserId::new("nobody"), UserUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BankError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let dir = UserDirectory::new();
        let ctx = RequestContext::new();
        let id = dir.create_user(&ctx, "carol", "carol@bank.io").await.unwrap();

        dir.delete_user(&ctx, &id).await.unwrap();
        assert!(matches!(
            dir.get_user(&ctx, &id).await,
            Err(BankError::NotFound(_))
        ));

        // Second delete reports the missing user
        assert!(matches!(
            dir.delete_user(&ctx, &id).await,
            Err(BankError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let dir = UserDirectory::new();
        let ctx = RequestContext::new();

        let a = dir.create_user(&ctx, "same", "same@bank.io").await.unwrap();
        let b = dir.create_user(&ctx, "same", "same@bank.io").await.unwrap();
        assert_ne!(a, b);
        assert_eq!(dir.len().await, 2);
    }
}
