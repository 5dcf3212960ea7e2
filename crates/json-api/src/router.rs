//! App Router

use salvo::Router;

use crate::{auth::middleware, categories, healthcheck, orders, payments, products, users};

/// Assemble every route under the API prefix.
///
/// Open routes go first; protected subtrees hoop `protect`, and admin
/// subtrees add `require_admin` on top.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(products_router())
        .push(categories_router())
        .push(users_router())
        .push(orders_router())
        .push(
            Router::with_path("checkout/session")
                .hoop(middleware::protect)
                .post(payments::checkout::handler),
        )
}

fn products_router() -> Router {
    Router::with_path("products")
        .get(products::index::handler)
        .push(Router::with_path("featured").get(products::featured::handler))
        .push(
            Router::new()
                .hoop(middleware::protect)
                .hoop(middleware::require_admin)
                .post(products::create::handler)
                .push(Router::with_path("count").get(products::count::handler))
                .push(Router::with_path("upload").post(products::upload::handler))
                .push(
                    Router::with_path("upload-multiple").post(products::upload::multiple_handler),
                ),
        )
        .push(
            Router::with_path("{uuid}")
                .get(products::get::handler)
                .push(
                    Router::new()
                        .hoop(middleware::protect)
                        .hoop(middleware::require_admin)
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                )
                .push(
                    Router::with_path("reviews")
                        .hoop(middleware::protect)
                        .post(products::reviews::handler),
                ),
        )
}

fn categories_router() -> Router {
    Router::with_path("categories")
        .get(categories::index::handler)
        .push(
            Router::new()
                .hoop(middleware::protect)
                .hoop(middleware::require_admin)
                .post(categories::create::handler),
        )
        .push(
            Router::with_path("{uuid}")
                .get(categories::get::handler)
                .push(
                    Router::new()
                        .hoop(middleware::protect)
                        .hoop(middleware::require_admin)
                        .delete(categories::delete::handler),
                ),
        )
}

fn users_router() -> Router {
    Router::with_path("users")
        .push(Router::with_path("register").post(users::register::handler))
        .push(Router::with_path("login").post(users::login::handler))
        .push(Router::with_path("logout").post(users::logout::handler))
        .push(
            Router::with_path("profile")
                .hoop(middleware::protect)
                .get(users::profile::get_handler)
                .put(users::profile::update_handler),
        )
        .push(
            Router::new()
                .hoop(middleware::protect)
                .hoop(middleware::require_admin)
                .get(users::index::handler)
                .push(Router::with_path("count").get(users::count::handler))
                .push(
                    Router::with_path("{uuid}")
                        .get(users::get::handler)
                        .put(users::update::handler)
                        .delete(users::delete::handler),
                ),
        )
}

fn orders_router() -> Router {
    Router::with_path("orders")
        .hoop(middleware::protect)
        .post(orders::create::handler)
        .push(Router::with_path("my-orders").get(orders::my_orders::handler))
        .push(
            Router::new()
                .hoop(middleware::require_admin)
                .get(orders::index::handler)
                .push(Router::with_path("total-sales").get(orders::total_sales::handler))
                .push(Router::with_path("count").get(orders::count::handler))
                .push(Router::with_path("user-orders/{user}").get(orders::user_orders::handler)),
        )
        .push(
            Router::with_path("{uuid}")
                .get(orders::get::handler)
                .push(Router::with_path("pay").put(orders::pay::handler))
                .push(
                    Router::with_path("deliver")
                        .hoop(middleware::require_admin)
                        .put(orders::deliver::handler),
                ),
        )
}
