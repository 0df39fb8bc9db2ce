//! Product screen controller: owns the list state and runs user actions
//! against the API.
//!
//! Every action is checked locally first (capability, then input), so a
//! refused action never reaches the network. Failures are recorded in the
//! state's error region and returned to the caller; none leave the controller
//! unusable.

use std::sync::Arc;
use std::time::Duration;

use stockroom_auth::{
    authorize, authorize_any, Capability, CapabilitySet, RoleConvention, ViewPermissions,
};
use stockroom_core::{DomainError, ProductId};
use stockroom_inventory::{plan_movement, MovementKind, StockMovement};
use stockroom_products::{
    reduce, ListAction, ListState, Product, ProductDraft, ProductForm, ProductListView,
};

use crate::config::DEFAULT_MIN_TOKEN_VALIDITY;
use crate::error::{ClientError, ClientResult, Operation};
use crate::identity::IdentityProvider;
use crate::repository::ProductRepository;

/// How capabilities are decided.
#[derive(Clone)]
pub enum AccessPolicy {
    /// Read roles from the access token under the given convention.
    Roles(Arc<dyn RoleConvention>),
    /// Auth is switched off for this deployment; everything is allowed.
    Unrestricted,
}

/// Asks the user to confirm a destructive action.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub struct InventoryController {
    repo: Arc<dyn ProductRepository>,
    identity: Arc<dyn IdentityProvider>,
    policy: AccessPolicy,
    confirm: Box<dyn Confirm>,
    min_token_validity: Duration,
    state: ListState,
    form: ProductForm,
}

impl InventoryController {
    pub fn new(
        repo: Arc<dyn ProductRepository>,
        identity: Arc<dyn IdentityProvider>,
        policy: AccessPolicy,
        confirm: Box<dyn Confirm>,
    ) -> Self {
        Self {
            repo,
            identity,
            policy,
            confirm,
            min_token_validity: DEFAULT_MIN_TOKEN_VALIDITY,
            state: ListState::default(),
            form: ProductForm::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.state = reduce(&self.state, ListAction::SetPageSize(page_size));
        self
    }

    pub fn with_min_token_validity(mut self, min_validity: Duration) -> Self {
        self.min_token_validity = min_validity;
        self
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn view(&self) -> ProductListView<'_> {
        self.state.view()
    }

    pub fn form(&self) -> &ProductForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ProductForm {
        &mut self.form
    }

    /// Apply a UI action (filter, paging, error dismissal) to the list state.
    pub fn dispatch(&mut self, action: ListAction) {
        self.state = reduce(&self.state, action);
    }

    pub async fn capabilities(&self) -> CapabilitySet {
        match &self.policy {
            AccessPolicy::Unrestricted => CapabilitySet {
                admin: true,
                employee: true,
            },
            AccessPolicy::Roles(convention) => match self.identity.claims().await {
                Some(claims) => CapabilitySet::from_claims(&claims, convention.as_ref()),
                None => CapabilitySet::none(),
            },
        }
    }

    pub async fn permissions(&self) -> ViewPermissions {
        ViewPermissions::from(self.capabilities().await)
    }

    /// Load the product collection from the API.
    pub async fn fetch(&mut self) -> ClientResult<()> {
        self.dispatch(ListAction::LoadStarted);
        let result = match self.ensure_session().await {
            Ok(()) => self.repo.list().await,
            Err(e) => Err(e),
        };
        match result {
            Ok(products) => {
                tracing::info!(count = products.len(), "products loaded");
                self.dispatch(ListAction::ProductsLoaded(products));
                Ok(())
            }
            Err(e) => {
                let message = e.user_message(Operation::Fetch);
                tracing::warn!("fetch failed: {e}");
                self.dispatch(ListAction::LoadFailed(message));
                self.after_failure(&e).await;
                Err(e)
            }
        }
    }

    /// Create a product from the current form contents; clears the form on success.
    pub async fn submit_form(&mut self) -> ClientResult<Product> {
        if let Err(e) = self.require(Capability::Admin).await {
            return Err(self.fail(Operation::Create, e).await);
        }
        let draft = match self.form.to_draft() {
            Ok(draft) => draft,
            Err(e) => return Err(self.fail(Operation::Create, e.into()).await),
        };
        let product = self.create(draft).await?;
        self.form.clear();
        Ok(product)
    }

    /// Load a cached product into the form for editing.
    pub async fn edit(&mut self, id: &ProductId) -> ClientResult<()> {
        if let Err(e) = self.require(Capability::Admin).await {
            return Err(self.fail(Operation::Update, e).await);
        }
        match self.state.find(id).map(ProductForm::from_product) {
            Some(form) => {
                self.form = form;
                Ok(())
            }
            None => Err(self.fail(Operation::Update, DomainError::not_found().into()).await),
        }
    }

    /// Save the form over product `id`; clears the form on success.
    pub async fn submit_edit(&mut self, id: &ProductId) -> ClientResult<Product> {
        let draft = match self.form.to_draft() {
            Ok(draft) => draft,
            Err(e) => return Err(self.fail(Operation::Update, e.into()).await),
        };
        let product = self.update(id, draft).await?;
        self.form.clear();
        Ok(product)
    }

    pub async fn create(&mut self, draft: ProductDraft) -> ClientResult<Product> {
        let result = self.run_create(&draft).await;
        match result {
            Ok(product) => {
                tracing::info!(id = %product.id, name = %product.name, "product created");
                self.reload_or_apply(ListAction::ProductCreated(product.clone()))
                    .await;
                Ok(product)
            }
            Err(e) => Err(self.fail(Operation::Create, e).await),
        }
    }

    async fn run_create(&self, draft: &ProductDraft) -> ClientResult<Product> {
        self.require(Capability::Admin).await?;
        draft.validate()?;
        self.ensure_session().await?;
        self.repo.create(draft).await
    }

    pub async fn update(&mut self, id: &ProductId, draft: ProductDraft) -> ClientResult<Product> {
        let result = self.run_update(id, &draft).await;
        match result {
            Ok(product) => {
                tracing::info!(id = %product.id, "product updated");
                self.reload_or_apply(ListAction::ProductUpdated(product.clone()))
                    .await;
                Ok(product)
            }
            Err(e) => Err(self.fail(Operation::Update, e).await),
        }
    }

    async fn run_update(&self, id: &ProductId, draft: &ProductDraft) -> ClientResult<Product> {
        self.require(Capability::Admin).await?;
        draft.validate()?;
        self.ensure_session().await?;
        self.repo.update(id, draft).await
    }

    /// Delete a product after confirmation.
    ///
    /// Returns `Ok(false)` when the user declined; nothing is sent in that case.
    pub async fn delete(&mut self, id: &ProductId) -> ClientResult<bool> {
        if let Err(e) = self.require(Capability::Admin).await {
            return Err(self.fail(Operation::Delete, e).await);
        }

        let label = self
            .state
            .find(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string());
        if !self
            .confirm
            .confirm(&format!("Are you sure you want to delete {label}?"))
        {
            tracing::debug!(id = %id, "delete cancelled");
            return Ok(false);
        }

        let result = match self.ensure_session().await {
            Ok(()) => self.repo.delete(id).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                tracing::info!(id = %id, "product deleted");
                self.reload_or_apply(ListAction::ProductDeleted(id.clone()))
                    .await;
                Ok(true)
            }
            Err(e) => Err(self.fail(Operation::Delete, e).await),
        }
    }

    /// Move stock for a cached product.
    ///
    /// `amount` is the number of units for in/out/return/loss and the target
    /// quantity for an adjustment.
    pub async fn record_movement(
        &mut self,
        id: &ProductId,
        kind: MovementKind,
        amount: u32,
        reason: Option<String>,
    ) -> ClientResult<StockMovement> {
        let result = self.run_movement(id, kind, amount, reason).await;
        match result {
            Ok((mut product, movement)) => {
                tracing::info!(
                    id = %id,
                    kind = kind.description(),
                    previous = movement.previous_quantity,
                    new = movement.new_quantity,
                    "stock movement recorded"
                );
                product.initial_quantity = movement.new_quantity;
                self.reload_or_apply(ListAction::ProductUpdated(product))
                    .await;
                Ok(movement)
            }
            Err(e) => Err(self.fail(Operation::MoveStock, e).await),
        }
    }

    async fn run_movement(
        &self,
        id: &ProductId,
        kind: MovementKind,
        amount: u32,
        reason: Option<String>,
    ) -> ClientResult<(Product, StockMovement)> {
        match kind {
            MovementKind::Adjustment => self.require(Capability::Admin).await?,
            _ => {
                let caps = self.capabilities().await;
                authorize_any(&caps, &[Capability::Admin, Capability::Employee])?;
            }
        }
        let product = self.state.find(id).ok_or_else(DomainError::not_found)?;
        let plan = plan_movement(product, kind, amount, reason)?;
        self.ensure_session().await?;
        let movement = self.repo.record_movement(plan.kind, &plan.request).await?;
        Ok((product.clone(), movement))
    }

    pub async fn movement_history(&mut self, id: &ProductId) -> ClientResult<Vec<StockMovement>> {
        let result = match self.ensure_session().await {
            Ok(()) => self.repo.movement_history(id).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(history) => Ok(history),
            Err(e) => Err(self.fail(Operation::History, e).await),
        }
    }

    async fn require(&self, capability: Capability) -> ClientResult<()> {
        let caps = self.capabilities().await;
        authorize(&caps, capability).map_err(|e| {
            tracing::warn!(required = %capability, "action refused by role check");
            ClientError::from(e)
        })
    }

    async fn ensure_session(&self) -> ClientResult<()> {
        self.identity.refresh(self.min_token_validity).await.map(|_| ())
    }

    /// Refetch after a mutation; apply `fallback` if the refetch fails.
    async fn reload_or_apply(&mut self, fallback: ListAction) {
        match self.repo.list().await {
            Ok(products) => self.dispatch(ListAction::ProductsLoaded(products)),
            Err(e) => {
                tracing::warn!("refetch after mutation failed, applying result locally: {e}");
                self.dispatch(fallback);
            }
        }
    }

    async fn fail(&mut self, operation: Operation, error: ClientError) -> ClientError {
        tracing::warn!(?operation, "{error}");
        self.dispatch(ListAction::ErrorRaised(error.user_message(operation)));
        self.after_failure(&error).await;
        error
    }

    async fn after_failure(&self, error: &ClientError) {
        if *error == ClientError::AuthExpired {
            self.identity.login().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    use stockroom_auth::{PlainRolesClaim, PERMISSION_DENIED_MESSAGE};
    use stockroom_core::Price;
    use stockroom_inventory::MovementRequest;

    use crate::identity::StaticToken;

    fn mint(roles: &[&str]) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            &json!({ "sub": "u1", "roles": roles }),
            &EncodingKey::from_secret(b"test"),
        )
        .expect("failed to encode jwt")
    }

    fn product(id: u64, name: &str, qty: u32) -> Product {
        Product {
            id: ProductId::from(id),
            name: name.to_string(),
            description: format!("{name} description"),
            category: "Electronics".to_string(),
            price: Price::from_cents(1_000),
            initial_quantity: qty,
            minimum_stock: None,
        }
    }

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            description: "desc".to_string(),
            category: "Office".to_string(),
            price: Price::from_cents(250),
            initial_quantity: 4,
        }
    }

    #[derive(Default)]
    struct FakeRepo {
        products: Mutex<Vec<Product>>,
        calls: AtomicUsize,
        reject_with: Mutex<Option<ClientError>>,
        fail_list: AtomicBool,
    }

    impl FakeRepo {
        fn with(products: Vec<Product>) -> Arc<Self> {
            Arc::new(Self {
                products: Mutex::new(products),
                ..Self::default()
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn hit(&self) -> ClientResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reject_with.lock().unwrap().clone() {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl ProductRepository for FakeRepo {
        async fn list(&self) -> ClientResult<Vec<Product>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(ClientError::NetworkFailure("down".into()));
            }
            Ok(self.products.lock().unwrap().clone())
        }

        async fn create(&self, draft: &ProductDraft) -> ClientResult<Product> {
            self.hit()?;
            let mut products = self.products.lock().unwrap();
            let product = draft.clone().into_product(ProductId::from(products.len() as u64 + 100));
            products.push(product.clone());
            Ok(product)
        }

        async fn update(&self, id: &ProductId, draft: &ProductDraft) -> ClientResult<Product> {
            self.hit()?;
            Ok(draft.clone().into_product(id.clone()))
        }

        async fn delete(&self, id: &ProductId) -> ClientResult<()> {
            self.hit()?;
            self.products.lock().unwrap().retain(|p| p.id != *id);
            Ok(())
        }

        async fn record_movement(
            &self,
            kind: MovementKind,
            request: &MovementRequest,
        ) -> ClientResult<StockMovement> {
            self.hit()?;
            let mut products = self.products.lock().unwrap();
            let product = products
                .iter_mut()
                .find(|p| p.id == request.product_id)
                .ok_or(ClientError::ServerRejection { status: 404, message: None })?;
            let previous = product.initial_quantity;
            product.initial_quantity = match kind {
                MovementKind::StockIn | MovementKind::Return => previous + request.quantity,
                MovementKind::Adjustment => request.new_quantity.unwrap_or(previous),
                _ => previous - request.quantity,
            };
            Ok(StockMovement {
                id: None,
                product_id: request.product_id.clone(),
                product_name: Some(product.name.clone()),
                quantity: request.quantity,
                reason: request.reason.clone(),
                movement_type: kind,
                previous_quantity: previous,
                new_quantity: product.initial_quantity,
                timestamp: None,
                username: None,
            })
        }

        async fn movement_history(&self, _id: &ProductId) -> ClientResult<Vec<StockMovement>> {
            self.hit()?;
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct ExpiredSession {
        logins: AtomicUsize,
    }

    #[async_trait]
    impl IdentityProvider for ExpiredSession {
        async fn access_token(&self) -> Option<String> {
            Some(mint(&["ROLE_ADMIN"]))
        }

        async fn refresh(&self, _min_validity: Duration) -> ClientResult<bool> {
            Err(ClientError::AuthExpired)
        }

        async fn login(&self) {
            self.logins.fetch_add(1, Ordering::SeqCst);
        }

        async fn login_required(&self) -> bool {
            self.logins.load(Ordering::SeqCst) > 0
        }
    }

    fn controller(repo: Arc<FakeRepo>, roles: &[&str], confirm: bool) -> InventoryController {
        InventoryController::new(
            repo,
            Arc::new(StaticToken::new(mint(roles))),
            AccessPolicy::Roles(Arc::new(PlainRolesClaim)),
            Box::new(move |_: &str| confirm),
        )
    }

    #[tokio::test]
    async fn non_admin_delete_makes_no_network_call() {
        let repo = FakeRepo::with(vec![product(1, "Laptop", 3)]);
        let mut ctl = controller(repo.clone(), &["ROLE_EMPLOYEE"], true);

        let err = ctl.delete(&ProductId::from(1)).await.unwrap_err();
        assert_eq!(err, ClientError::PermissionDenied);
        assert_eq!(repo.calls(), 0);
        assert_eq!(ctl.state().error.as_deref(), Some(PERMISSION_DENIED_MESSAGE));
    }

    #[tokio::test]
    async fn declined_confirmation_is_a_no_op() {
        let repo = FakeRepo::with(vec![product(1, "Laptop", 3)]);
        let mut ctl = controller(repo.clone(), &["ROLE_ADMIN"], false);
        ctl.fetch().await.unwrap();
        let calls = repo.calls();

        assert_eq!(ctl.delete(&ProductId::from(1)).await, Ok(false));
        assert_eq!(repo.calls(), calls);
        assert_eq!(ctl.state().products.len(), 1);
    }

    #[tokio::test]
    async fn confirmed_delete_refetches() {
        let repo = FakeRepo::with(vec![product(1, "Laptop", 3), product(2, "Mouse", 5)]);
        let mut ctl = controller(repo.clone(), &["admin"], true);
        ctl.fetch().await.unwrap();

        assert_eq!(ctl.delete(&ProductId::from(1)).await, Ok(true));
        let names: Vec<&str> = ctl.state().products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Mouse"]);
        assert_eq!(ctl.state().error, None);
    }

    #[tokio::test]
    async fn submit_form_creates_and_clears_form() {
        let repo = FakeRepo::with(Vec::new());
        let mut ctl = controller(repo.clone(), &["ROLE_ADMIN"], true);
        *ctl.form_mut() = ProductForm {
            name: "Stapler".into(),
            description: "Red".into(),
            category: "Office".into(),
            price: "12.50".into(),
            initial_quantity: "3".into(),
        };

        let created = ctl.submit_form().await.unwrap();
        assert_eq!(created.price, Price::from_cents(1_250));
        assert!(ctl.form().is_empty());
        assert_eq!(ctl.state().products, vec![created]);
    }

    #[tokio::test]
    async fn invalid_form_is_rejected_locally() {
        let repo = FakeRepo::with(Vec::new());
        let mut ctl = controller(repo.clone(), &["ROLE_ADMIN"], true);
        ctl.form_mut().name = "Stapler".into();
        ctl.form_mut().price = "abc".into();

        let err = ctl.submit_form().await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(repo.calls(), 0);
        assert!(!ctl.form().is_empty());
    }

    #[tokio::test]
    async fn server_message_is_surfaced_verbatim() {
        let repo = FakeRepo::with(Vec::new());
        *repo.reject_with.lock().unwrap() = Some(ClientError::ServerRejection {
            status: 400,
            message: Some("Product name already exists".into()),
        });
        let mut ctl = controller(repo.clone(), &["ROLE_ADMIN"], true);

        assert!(ctl.create(draft("Stapler")).await.is_err());
        assert_eq!(ctl.state().error.as_deref(), Some("Product name already exists"));

        *repo.reject_with.lock().unwrap() = Some(ClientError::ServerRejection {
            status: 500,
            message: None,
        });
        assert!(ctl.create(draft("Stapler")).await.is_err());
        assert_eq!(ctl.state().error.as_deref(), Some("Failed to create product"));
    }

    #[tokio::test]
    async fn failed_refetch_applies_returned_entity() {
        let repo = FakeRepo::with(vec![product(1, "Laptop", 3)]);
        let mut ctl = controller(repo.clone(), &["ROLE_ADMIN"], true);
        ctl.fetch().await.unwrap();
        repo.fail_list.store(true, Ordering::SeqCst);

        let updated = ctl.update(&ProductId::from(1), draft("Laptop Pro")).await.unwrap();
        assert_eq!(ctl.state().products, vec![updated]);
        assert_eq!(ctl.state().error, None);
    }

    #[tokio::test]
    async fn edit_prefills_form_and_saves_changes() {
        let repo = FakeRepo::with(vec![product(1, "Laptop", 3)]);
        let mut ctl = controller(repo.clone(), &["ROLE_ADMIN"], true);
        ctl.fetch().await.unwrap();

        ctl.edit(&ProductId::from(1)).await.unwrap();
        assert_eq!(ctl.form().name, "Laptop");
        assert_eq!(ctl.form().price, "10.00");
        assert_eq!(ctl.form().initial_quantity, "3");

        ctl.form_mut().price = "12.00".into();
        let updated = ctl.submit_edit(&ProductId::from(1)).await.unwrap();
        assert_eq!(updated.name, "Laptop");
        assert_eq!(updated.price, Price::from_cents(1_200));
        assert!(ctl.form().is_empty());

        let err = ctl.edit(&ProductId::from(9)).await.unwrap_err();
        assert_eq!(err, ClientError::Validation(DomainError::NotFound));
        assert!(ctl.form().is_empty());
    }

    #[tokio::test]
    async fn employee_cannot_open_edit_form() {
        let repo = FakeRepo::with(vec![product(1, "Laptop", 3)]);
        let mut ctl = controller(repo.clone(), &["ROLE_EMPLOYEE"], true);
        ctl.fetch().await.unwrap();

        assert_eq!(ctl.edit(&ProductId::from(1)).await, Err(ClientError::PermissionDenied));
        assert!(ctl.form().is_empty());
    }

    #[tokio::test]
    async fn failed_refetch_after_movement_applies_new_quantity() {
        let repo = FakeRepo::with(vec![product(1, "Laptop", 3)]);
        let mut ctl = controller(repo.clone(), &["ROLE_EMPLOYEE"], true);
        ctl.fetch().await.unwrap();
        repo.fail_list.store(true, Ordering::SeqCst);

        ctl.record_movement(&ProductId::from(1), MovementKind::Loss, 1, Some("broken".into()))
            .await
            .unwrap();
        assert_eq!(ctl.state().products[0].initial_quantity, 2);
        assert_eq!(ctl.state().products[0].name, "Laptop");
    }

    #[tokio::test]
    async fn employee_can_move_stock_but_not_adjust() {
        let repo = FakeRepo::with(vec![product(1, "Laptop", 3)]);
        let mut ctl = controller(repo.clone(), &["ROLE_EMPLOYEE"], true);
        ctl.fetch().await.unwrap();

        let movement = ctl
            .record_movement(&ProductId::from(1), MovementKind::StockIn, 2, None)
            .await
            .unwrap();
        assert_eq!(movement.new_quantity, 5);
        assert_eq!(ctl.state().products[0].initial_quantity, 5);

        let err = ctl
            .record_movement(&ProductId::from(1), MovementKind::Adjustment, 1, None)
            .await
            .unwrap_err();
        assert_eq!(err, ClientError::PermissionDenied);
    }

    #[tokio::test]
    async fn insufficient_stock_never_reaches_the_api() {
        let repo = FakeRepo::with(vec![product(1, "Laptop", 3)]);
        let mut ctl = controller(repo.clone(), &["ROLE_EMPLOYEE"], true);
        ctl.fetch().await.unwrap();
        let calls = repo.calls();

        let err = ctl
            .record_movement(&ProductId::from(1), MovementKind::StockOut, 4, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(DomainError::InvariantViolation(_))));
        assert_eq!(repo.calls(), calls);
    }

    #[tokio::test]
    async fn expired_session_requests_login() {
        let repo = FakeRepo::with(vec![product(1, "Laptop", 3)]);
        let identity = Arc::new(ExpiredSession::default());
        let mut ctl = InventoryController::new(
            repo.clone(),
            identity.clone(),
            AccessPolicy::Roles(Arc::new(PlainRolesClaim)),
            Box::new(|_: &str| true),
        );

        assert_eq!(ctl.fetch().await, Err(ClientError::AuthExpired));
        assert_eq!(identity.logins.load(Ordering::SeqCst), 1);
        assert_eq!(repo.calls(), 0);
        assert!(!ctl.state().loading);
        assert!(ctl.state().error.is_some());
    }

    #[tokio::test]
    async fn unrestricted_policy_allows_everything() {
        let repo = FakeRepo::with(Vec::new());
        let mut ctl = InventoryController::new(
            repo.clone(),
            Arc::new(StaticToken::anonymous()),
            AccessPolicy::Unrestricted,
            Box::new(|_: &str| true),
        );
        let perms = ctl.permissions().await;
        assert!(perms.can_create && perms.can_delete);
        assert!(ctl.create(draft("Stapler")).await.is_ok());
    }

    #[tokio::test]
    async fn anonymous_user_gets_no_actions() {
        let repo = FakeRepo::with(Vec::new());
        let ctl = InventoryController::new(
            repo,
            Arc::new(StaticToken::anonymous()),
            AccessPolicy::Roles(Arc::new(PlainRolesClaim)),
            Box::new(|_: &str| true),
        );
        assert_eq!(ctl.permissions().await, ViewPermissions::default());
    }
}
