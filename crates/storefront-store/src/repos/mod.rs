//! Typed repositories, one per record kind.

mod carts;
mod orders;
mod products;
mod users;
mod wishlists;

pub use carts::CartRepo;
pub use orders::OrderRepo;
pub use products::ProductRepo;
pub use users::UserRepo;
pub use wishlists::WishlistRepo;
