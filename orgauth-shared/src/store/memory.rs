/// In-memory store
///
/// Keeps users, organisations and memberships in maps behind a single
/// `RwLock`. Every write takes the write lock for its whole duration, which
/// gives the same all-or-nothing and email-uniqueness guarantees as the
/// PostgreSQL transaction and constraint. Data lives for the life of the
/// process.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::{
    organisation::{CreateOrganisation, Organisation},
    user::{CreateUser, User, EMAIL_UNIQUE_CONSTRAINT},
};

#[derive(Debug, Default)]
struct State {
    users: HashMap<Uuid, User>,
    organisations: HashMap<Uuid, Organisation>,
    // (user_id, organisation_id) pairs in insertion order
    memberships: Vec<(Uuid, Uuid)>,
    membership_index: BTreeSet<(Uuid, Uuid)>,
}

impl State {
    fn link(&mut self, user_id: Uuid, organisation_id: Uuid) -> bool {
        if self.membership_index.insert((user_id, organisation_id)) {
            self.memberships.push((user_id, organisation_id));
            true
        } else {
            false
        }
    }

    fn new_organisation(&mut self, data: CreateOrganisation) -> Organisation {
        let organisation = Organisation {
            id: Uuid::new_v4(),
            name: data.name,
            description: data.description,
            created_at: Utc::now(),
        };
        self.organisations.insert(organisation.id, organisation.clone());
        organisation
    }
}

/// Store that keeps everything in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn register_user(
        &self,
        user: CreateUser,
        organisation: CreateOrganisation,
    ) -> Result<(User, Organisation), StoreError> {
        let mut state = self.state.write().await;

        // Checked before any insert so a duplicate leaves nothing behind
        if state.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation {
                constraint: EMAIL_UNIQUE_CONSTRAINT.to_string(),
            });
        }

        let organisation = state.new_organisation(organisation);

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            phone: user.phone,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        state.link(user.id, organisation.id);

        Ok((user, organisation))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_organisation(&self, id: Uuid) -> Result<Option<Organisation>, StoreError> {
        Ok(self.state.read().await.organisations.get(&id).cloned())
    }

    async fn list_organisations_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Organisation>, StoreError> {
        let state = self.state.read().await;

        Ok(state
            .memberships
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .filter_map(|(_, org_id)| state.organisations.get(org_id).cloned())
            .collect())
    }

    async fn create_organisation(
        &self,
        creator_id: Uuid,
        organisation: CreateOrganisation,
    ) -> Result<Organisation, StoreError> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&creator_id) {
            return Err(StoreError::MissingReference(
                "user_organisations_user_id_fkey".to_string(),
            ));
        }

        let organisation = state.new_organisation(organisation);
        state.link(creator_id, organisation.id);

        Ok(organisation)
    }

    async fn add_member(&self, organisation_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&user_id) {
            return Err(StoreError::MissingReference(
                "user_organisations_user_id_fkey".to_string(),
            ));
        }
        if !state.organisations.contains_key(&organisation_id) {
            return Err(StoreError::MissingReference(
                "user_organisations_organisation_id_fkey".to_string(),
            ));
        }

        Ok(state.link(user_id, organisation_id))
    }

    async fn list_members(&self, organisation_id: Uuid) -> Result<Vec<User>, StoreError> {
        let state = self.state.read().await;

        Ok(state
            .memberships
            .iter()
            .filter(|(_, org_id)| *org_id == organisation_id)
            .filter_map(|(user_id, _)| state.users.get(user_id).cloned())
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
