//! 登录令牌存储操作

use super::{SeaOrmStorage, db_error};
use crate::entity::accounts::Entity as Accounts;
use crate::entity::auth_tokens::{ActiveModel, Column, Entity as AuthTokens};
use crate::errors::{Result, SchoolError};
use crate::models::accounts::entities::Account;
use crate::utils::random_code::generate_token;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, SqlErr};

impl SeaOrmStorage {
    /// 获取账号已有令牌，没有则签发一个新的
    pub async fn get_or_create_token_impl(&self, account_id: i64) -> Result<String> {
        if let Some(key) = self.get_token_by_account_id_impl(account_id).await? {
            return Ok(key);
        }

        let model = ActiveModel {
            key: Set(generate_token()),
            account_id: Set(account_id),
            created_at: Set(chrono::Utc::now().timestamp()),
        };

        match model.insert(&self.db).await {
            Ok(token) => Ok(token.key),
            // 并发登录时另一请求已签发，返回已有令牌
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => self
                .get_token_by_account_id_impl(account_id)
                .await?
                .ok_or_else(|| SchoolError::database_operation(format!("签发令牌失败: {e}"))),
            Err(e) => Err(db_error("签发令牌失败")(e)),
        }
    }

    /// 通过令牌获取账号
    pub async fn get_account_by_token_impl(&self, key: &str) -> Result<Option<Account>> {
        let result = AuthTokens::find_by_id(key.to_string())
            .find_also_related(Accounts)
            .one(&self.db)
            .await
            .map_err(db_error("查询令牌失败"))?;

        Ok(result
            .and_then(|(_, account)| account)
            .map(|m| m.into_account()))
    }

    pub async fn get_token_by_account_id_impl(&self, account_id: i64) -> Result<Option<String>> {
        let result = AuthTokens::find()
            .filter(Column::AccountId.eq(account_id))
            .one(&self.db)
            .await
            .map_err(db_error("查询令牌失败"))?;

        Ok(result.map(|m| m.key))
    }

    /// 吊销令牌，返回被删除的令牌以便清理缓存
    pub async fn delete_token_impl(&self, account_id: i64) -> Result<Option<String>> {
        let Some(key) = self.get_token_by_account_id_impl(account_id).await? else {
            return Ok(None);
        };

        AuthTokens::delete_by_id(key.clone())
            .exec(&self.db)
            .await
            .map_err(db_error("删除令牌失败"))?;

        Ok(Some(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::accounts::{entities::AccountRole, requests::NewAccount};

    #[tokio::test]
    async fn test_token_lifecycle() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let account = storage
            .create_account_impl(NewAccount {
                username: "t1".into(),
                password_hash: "hash".into(),
                first_name: None,
                last_name: None,
                profile_pic: None,
                role: AccountRole::Teacher,
                is_staff: false,
                is_superuser: false,
            })
            .await
            .expect("account");

        let token = storage
            .get_or_create_token_impl(account.id)
            .await
            .expect("token");
        assert_eq!(token.len(), 40);

        // 重复登录返回同一令牌
        let again = storage
            .get_or_create_token_impl(account.id)
            .await
            .expect("token");
        assert_eq!(token, again);

        let resolved = storage
            .get_account_by_token_impl(&token)
            .await
            .expect("lookup")
            .expect("account");
        assert_eq!(resolved.id, account.id);

        assert_eq!(
            storage.delete_token_impl(account.id).await.expect("delete"),
            Some(token.clone())
        );
        assert!(
            storage
                .get_account_by_token_impl(&token)
                .await
                .expect("lookup")
                .is_none()
        );
        assert_eq!(storage.delete_token_impl(account.id).await.expect("delete"), None);
    }

    #[tokio::test]
    async fn test_concurrent_logins_share_token() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let account = storage
            .create_account_impl(NewAccount {
                username: "s1".into(),
                password_hash: "hash".into(),
                first_name: None,
                last_name: None,
                profile_pic: None,
                role: AccountRole::Student,
                is_staff: false,
                is_superuser: false,
            })
            .await
            .expect("account");

        let (a, b) = tokio::join!(
            storage.get_or_create_token_impl(account.id),
            storage.get_or_create_token_impl(account.id)
        );
        let a = a.expect("first login");
        let b = b.expect("second login");
        assert_eq!(a, b);
        assert_eq!(
            storage
                .get_token_by_account_id_impl(account.id)
                .await
                .expect("lookup"),
            Some(a)
        );
    }
}
