//! Test utilities shared by unit tests (in `src/`) and integration tests
//! (in `tests/`): in-memory implementations of every persistence port plus a
//! scriptable identity provider, so the full HTTP surface can be exercised
//! without a database or network.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    CategoryRepository, IdentityProvider, IdentityProviderError, ItemRepository,
    PersistenceError, UserRepository,
};
use crate::domain::{
    Category, CategoryId, EntryName, ExchangedToken, Item, ItemChanges, ItemId, NewCategory,
    NewItem, NewUser, Profile, TokenInfo, User, UserId,
};
use crate::inbound::http::state::HttpState;

#[derive(Default)]
struct CatalogState {
    users: Vec<User>,
    categories: Vec<Category>,
    items: Vec<Item>,
}

/// In-memory implementation of all three persistence ports, mirroring the
/// relational semantics the Diesel adapters provide: ascending-id ordering,
/// unique user emails and category names, and cascade deletion of a
/// category's items.
#[derive(Default)]
pub struct InMemoryCatalog {
    state: Mutex<CatalogState>,
    next_user: AtomicI32,
    next_category: AtomicI32,
    next_item: AtomicI32,
}

impl InMemoryCatalog {
    fn next_id(counter: &AtomicI32) -> i32 {
        counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CatalogState> {
        self.state.lock().expect("catalog state lock")
    }

    /// Insert a user directly, bypassing the login flow.
    pub fn seed_user(&self, name: &str, email: &str) -> User {
        let user = User {
            id: UserId(Self::next_id(&self.next_user)),
            name: name.to_owned(),
            email: email.to_owned(),
            picture: String::new(),
        };
        self.lock().users.push(user.clone());
        user
    }

    /// Insert a category directly, bypassing the handlers.
    pub fn seed_category(&self, name: &str, user_id: UserId) -> Category {
        let category = Category {
            id: CategoryId(Self::next_id(&self.next_category)),
            name: name.to_owned(),
            user_id,
        };
        self.lock().categories.push(category.clone());
        category
    }

    /// Insert an item directly, bypassing the handlers.
    pub fn seed_item(&self, name: &str, category_id: CategoryId, user_id: UserId) -> Item {
        let item = Item {
            id: ItemId(Self::next_id(&self.next_item)),
            name: name.to_owned(),
            description: format!("{name} description"),
            picture: String::new(),
            date: Utc::now().naive_utc(),
            category_id,
            user_id,
        };
        self.lock().items.push(item.clone());
        item
    }

    /// Snapshot of all stored users.
    pub fn users(&self) -> Vec<User> {
        self.lock().users.clone()
    }

    /// Snapshot of all stored categories, ascending id.
    pub fn categories(&self) -> Vec<Category> {
        let mut categories = self.lock().categories.clone();
        categories.sort_by_key(|category| category.id.0);
        categories
    }

    /// Snapshot of all stored items, ascending id.
    pub fn items(&self) -> Vec<Item> {
        let mut items = self.lock().items.clone();
        items.sort_by_key(|item| item.id.0);
        items
    }
}

#[async_trait]
impl UserRepository for InMemoryCatalog {
    async fn create(&self, user: &NewUser) -> Result<User, PersistenceError> {
        let mut state = self.lock();
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(PersistenceError::duplicate(user.email.clone()));
        }
        let stored = User {
            id: UserId(Self::next_id(&self.next_user)),
            name: user.name.clone(),
            email: user.email.clone(),
            picture: user.picture.clone(),
        };
        state.users.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, PersistenceError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, PersistenceError> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCatalog {
    async fn create(&self, category: &NewCategory) -> Result<Category, PersistenceError> {
        let mut state = self.lock();
        if state
            .categories
            .iter()
            .any(|c| c.name == category.name.as_ref())
        {
            return Err(PersistenceError::duplicate(category.name.as_ref()));
        }
        let stored = Category {
            id: CategoryId(Self::next_id(&self.next_category)),
            name: category.name.as_ref().to_owned(),
            user_id: category.user_id,
        };
        state.categories.push(stored.clone());
        Ok(stored)
    }

    async fn rename(&self, id: CategoryId, name: &EntryName) -> Result<(), PersistenceError> {
        let mut state = self.lock();
        if state
            .categories
            .iter()
            .any(|c| c.id != id && c.name == name.as_ref())
        {
            return Err(PersistenceError::duplicate(name.as_ref()));
        }
        if let Some(category) = state.categories.iter_mut().find(|c| c.id == id) {
            category.name = name.as_ref().to_owned();
        }
        Ok(())
    }

    async fn delete(&self, id: CategoryId) -> Result<(), PersistenceError> {
        let mut state = self.lock();
        state.categories.retain(|c| c.id != id);
        state.items.retain(|item| item.category_id != id);
        Ok(())
    }

    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, PersistenceError> {
        Ok(self.lock().categories.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, PersistenceError> {
        Ok(self
            .categories()
            .into_iter()
            .find(|category| category.name == name))
    }

    async fn list(&self) -> Result<Vec<Category>, PersistenceError> {
        Ok(self.categories())
    }
}

#[async_trait]
impl ItemRepository for InMemoryCatalog {
    async fn create(&self, item: &NewItem) -> Result<Item, PersistenceError> {
        let stored = Item {
            id: ItemId(Self::next_id(&self.next_item)),
            name: item.name.as_ref().to_owned(),
            description: item.description.clone(),
            picture: item.picture.clone(),
            date: item.date,
            category_id: item.category_id,
            user_id: item.user_id,
        };
        self.lock().items.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: ItemId, changes: &ItemChanges) -> Result<Item, PersistenceError> {
        let mut state = self.lock();
        let item = state
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| PersistenceError::query(format!("no item with id {id}")))?;
        if let Some(name) = &changes.name {
            item.name = name.as_ref().to_owned();
        }
        if let Some(description) = &changes.description {
            item.description = description.clone();
        }
        if let Some(picture) = &changes.picture {
            item.picture = picture.clone();
        }
        if let Some(category_id) = changes.category_id {
            item.category_id = category_id;
        }
        item.date = changes.date;
        Ok(item.clone())
    }

    async fn delete(&self, id: ItemId) -> Result<(), PersistenceError> {
        self.lock().items.retain(|item| item.id != id);
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Item>, PersistenceError> {
        Ok(self.items().into_iter().find(|item| item.name == name))
    }

    async fn list_for_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Item>, PersistenceError> {
        Ok(self
            .items()
            .into_iter()
            .filter(|item| item.category_id == category_id)
            .collect())
    }

    async fn count_for_category(&self, category_id: CategoryId) -> Result<i64, PersistenceError> {
        Ok(self
            .lock()
            .items
            .iter()
            .filter(|item| item.category_id == category_id)
            .count() as i64)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<(Item, Category)>, PersistenceError> {
        let state = self.lock();
        let mut items = state.items.clone();
        items.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(items
            .into_iter()
            .take(limit.max(0) as usize)
            .filter_map(|item| {
                state
                    .categories
                    .iter()
                    .find(|category| category.id == item.category_id)
                    .cloned()
                    .map(|category| (item, category))
            })
            .collect())
    }
}

/// Scriptable [`IdentityProvider`] double.
#[derive(Clone)]
pub struct StubIdentityProvider {
    exchange: Result<ExchangedToken, IdentityProviderError>,
    token_info: Result<TokenInfo, IdentityProviderError>,
    profile: Result<Profile, IdentityProviderError>,
    revoke: Result<(), IdentityProviderError>,
}

impl StubIdentityProvider {
    /// A provider that completes the whole flow for one fixed identity.
    pub fn happy(subject: &str, client_id: &str, name: &str, email: &str) -> Self {
        Self {
            exchange: Ok(ExchangedToken {
                access_token: "ya29.stub-token".to_owned(),
                subject: subject.to_owned(),
            }),
            token_info: Ok(TokenInfo {
                user_id: subject.to_owned(),
                issued_to: client_id.to_owned(),
            }),
            profile: Ok(Profile {
                name: name.to_owned(),
                picture: Some("https://example.com/avatar.png".to_owned()),
                email: email.to_owned(),
            }),
            revoke: Ok(()),
        }
    }

    /// Fail the code exchange.
    pub fn with_exchange_failure(mut self, message: &str) -> Self {
        self.exchange = Err(IdentityProviderError::exchange(message));
        self
    }

    /// Make the provider report an error during token validation.
    pub fn with_validation_failure(mut self, message: &str) -> Self {
        self.token_info = Err(IdentityProviderError::validation(message));
        self
    }

    /// Override the token-info response.
    pub fn with_token_info(mut self, user_id: &str, issued_to: &str) -> Self {
        self.token_info = Ok(TokenInfo {
            user_id: user_id.to_owned(),
            issued_to: issued_to.to_owned(),
        });
        self
    }

    /// Refuse revocation with the given status.
    pub fn with_revocation_failure(mut self, status: u16) -> Self {
        self.revoke = Err(IdentityProviderError::revocation(status));
        self
    }
}

#[async_trait]
impl IdentityProvider for StubIdentityProvider {
    async fn exchange_code(&self, _code: &str) -> Result<ExchangedToken, IdentityProviderError> {
        self.exchange.clone()
    }

    async fn verify_token(&self, _access_token: &str) -> Result<TokenInfo, IdentityProviderError> {
        self.token_info.clone()
    }

    async fn fetch_profile(&self, _access_token: &str) -> Result<Profile, IdentityProviderError> {
        self.profile.clone()
    }

    async fn revoke(&self, _access_token: &str) -> Result<(), IdentityProviderError> {
        self.revoke.clone()
    }
}

/// Build an [`HttpState`] over a fresh in-memory catalog, returning the
/// catalog too so tests can seed and inspect it directly.
pub fn in_memory_state(
    identity: Arc<dyn IdentityProvider>,
    client_id: &str,
) -> (HttpState, Arc<InMemoryCatalog>) {
    let catalog = Arc::new(InMemoryCatalog::default());
    let state = HttpState {
        users: catalog.clone(),
        categories: catalog.clone(),
        items: catalog.clone(),
        identity,
        client_id: client_id.to_owned(),
    };
    (state, catalog)
}
