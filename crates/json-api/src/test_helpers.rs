//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use aroma_app::{
    auth::{Identity, MockTokenAuth},
    context::AppContext,
    domain::{
        categories::MockCategoriesService,
        orders::{
            MockOrdersService,
            models::{Order, OrderItem, OrderItemUuid, OrderUuid, ShippingAddress},
        },
        products::{
            MockProductsService,
            models::{Product, ProductUuid},
        },
        users::{
            MockUsersService,
            models::{User, UserUuid},
        },
    },
    payments::MockPaymentsService,
    storage::MockImageStore,
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER: Identity = Identity {
    user_uuid: UserUuid::from_uuid(Uuid::nil()),
    is_admin: false,
};

pub(crate) const TEST_ADMIN: Identity = Identity {
    user_uuid: UserUuid::from_uuid(Uuid::from_u128(1)),
    is_admin: true,
};

/// Mock services for one handler test. Unset services are fresh mocks, so
/// any unexpected call fails the test.
#[derive(Default)]
pub(crate) struct TestApp {
    pub products: MockProductsService,
    pub categories: MockCategoriesService,
    pub users: MockUsersService,
    pub orders: MockOrdersService,
    pub auth: MockTokenAuth,
    pub images: MockImageStore,
    pub payments: MockPaymentsService,
}

impl TestApp {
    pub(crate) fn into_state(self) -> Arc<State> {
        let app = AppContext {
            products: Arc::new(self.products),
            categories: Arc::new(self.categories),
            users: Arc::new(self.users),
            orders: Arc::new(self.orders),
            auth: Arc::new(self.auth),
            images: Arc::new(self.images),
            payments: Arc::new(self.payments),
        };

        Arc::new(State::new(app))
    }
}

pub(crate) fn state_with_auth(auth: MockTokenAuth) -> Arc<State> {
    TestApp {
        auth,
        ..TestApp::default()
    }
    .into_state()
}

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_identity(TEST_USER);
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_identity(TEST_ADMIN);
    ctrl.call_next(req, depot, res).await;
}

/// A service with no identity attached, for open routes.
pub(crate) fn open_service(app: TestApp, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(app.into_state()))
            .push(route),
    )
}

/// A service with [`TEST_USER`] pre-authenticated.
pub(crate) fn user_service(app: TestApp, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(app.into_state()))
            .hoop(inject_user)
            .push(route),
    )
}

/// A service with [`TEST_ADMIN`] pre-authenticated.
pub(crate) fn admin_service(app: TestApp, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(app.into_state()))
            .hoop(inject_admin)
            .push(route),
    )
}

pub(crate) fn make_product(uuid: ProductUuid) -> Product {
    Product {
        uuid,
        name: "Cedar Noir".to_string(),
        description: "Dry cedar over amber".to_string(),
        brand: "Atelier".to_string(),
        image: String::new(),
        images: vec![],
        price: 89_00,
        category_uuid: aroma_app::domain::categories::models::CategoryUuid::new(),
        count_in_stock: 12,
        rating: 0.0,
        num_reviews: 0,
        is_featured: false,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_user(uuid: UserUuid) -> User {
    User {
        uuid,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        password_hash: "$2b$10$hash".to_string(),
        is_admin: false,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_order(uuid: OrderUuid, user: UserUuid) -> Order {
    Order {
        uuid,
        user_uuid: user,
        items: vec![OrderItem {
            uuid: OrderItemUuid::new(),
            product_uuid: ProductUuid::new(),
            qty: 3,
            price: 10_00,
        }],
        shipping: ShippingAddress {
            address1: "12 Rue des Lilas".to_string(),
            address2: String::new(),
            apartment: String::new(),
            city: "Montreal".to_string(),
            postal_code: "H2X 1Y4".to_string(),
            state: "QC".to_string(),
            country: "Canada".to_string(),
            phone_number: "514-555-0101".to_string(),
        },
        payment_method: "card".to_string(),
        items_price: 30_00,
        shipping_price: 2_50,
        tax_price: 1_00,
        total_price: 33_50,
        is_paid: false,
        paid_at: None,
        payment_result: None,
        is_delivered: false,
        delivered_at: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
