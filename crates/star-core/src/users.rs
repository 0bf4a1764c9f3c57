//! Staff directory

use star_records::{Role, User};
use star_storage::Store;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub password: String,
    pub role: Role,
}

#[derive(Clone)]
pub struct UserDirectory {
    store: Store,
}

impl UserDirectory {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Add an active user. Usernames are unique; a taken one surfaces as a
    /// storage constraint violation.
    pub async fn add_user(&self, new_user: NewUser) -> Result<User> {
        if new_user.username.trim().is_empty() {
            return Err(CoreError::InvalidInput("username is required".to_string()));
        }
        if new_user.name.trim().is_empty() {
            return Err(CoreError::InvalidInput("name is required".to_string()));
        }

        let user = User::new(
            new_user.name,
            new_user.username,
            new_user.password,
            new_user.role,
        );
        let user = self.store.insert(user).await?;

        tracing::info!(user_id = ?user.id, username = %user.username, role = %user.role, "Added user");
        Ok(user)
    }

    pub async fn get(&self, id: i64) -> Result<User> {
        self.store
            .read_by_id(id)
            .await?
            .ok_or(CoreError::NotFound { kind: "User", id })
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        Ok(self.store.read_all().await?)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let mut found: Vec<User> = self
            .store
            .find_by_index("usuario", username.trim())
            .await?;
        Ok(found.pop())
    }

    pub async fn users_with_role(&self, role: Role) -> Result<Vec<User>> {
        Ok(self.store.find_by_index("rol", role.as_str()).await?)
    }

    pub async fn set_active(&self, id: i64, active: bool) -> Result<User> {
        let mut user = self.get(id).await?;
        user.active = active;
        self.store.update(&user).await?;

        tracing::info!(user_id = id, active, "User activation changed");
        Ok(user)
    }

    pub async fn remove(&self, id: i64) -> Result<()> {
        self.store.delete::<User>(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use star_storage::StorageError;

    fn new_user(username: &str, role: Role) -> NewUser {
        NewUser {
            name: "Rosa Peña".to_string(),
            username: username.to_string(),
            password: "secreto".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_add_and_find() {
        let users = UserDirectory::new(Store::in_memory());
        let added = users.add_user(new_user(" rosa ", Role::Admin)).await.unwrap();
        assert_eq!(added.username, "rosa");
        assert!(added.active);

        let found = users.find_by_username("rosa").await.unwrap().unwrap();
        assert_eq!(found.id, added.id);
        assert!(users.find_by_username("nadie").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let users = UserDirectory::new(Store::in_memory());
        users.add_user(new_user("caja1", Role::BilliardsCashier)).await.unwrap();

        let err = users
            .add_user(new_user("caja1", Role::Washer))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Storage(StorageError::ConstraintViolation { .. })
        ));
        assert_eq!(users.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_roles_and_deactivation() {
        let users = UserDirectory::new(Store::in_memory());
        let carlos = users.add_user(new_user("carlos", Role::Barber)).await.unwrap();
        users.add_user(new_user("miguel", Role::Barber)).await.unwrap();
        users.add_user(new_user("juan", Role::Washer)).await.unwrap();

        assert_eq!(users.users_with_role(Role::Barber).await.unwrap().len(), 2);

        let id = carlos.id.unwrap();
        users.set_active(id, false).await.unwrap();
        assert!(!users.get(id).await.unwrap().active);

        users.remove(id).await.unwrap();
        assert!(matches!(
            users.get(id).await,
            Err(CoreError::NotFound { .. })
        ));
    }
}
