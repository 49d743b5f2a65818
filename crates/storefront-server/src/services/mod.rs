//! Application services.
//!
//! Each service takes the caller as a [`CurrentUser`](storefront_auth::CurrentUser)
//! argument where the operation is user-scoped and returns [`ApiError`](crate::ApiError).

mod accounts;
mod carts;
mod catalog;
mod orders;
mod wishlists;

pub use accounts::{AccountService, AuthSession, LoginRequest, SignupRequest};
pub use carts::{AddToCartRequest, CartLineView, CartService, CartView};
pub use catalog::{CatalogService, NewProduct, ProductUpdate};
pub use orders::{CreateOrderRequest, OrderItemRequest, OrderService};
pub use wishlists::{WishlistService, WishlistView};
