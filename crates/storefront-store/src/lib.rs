//! Storage for the storefront.
//!
//! A [`KvBackend`] holds raw bytes under string keys with a version per key
//! and compare-and-swap writes. [`Store`] adds JSON serialization and an
//! optimistic read-modify-write loop, and the repositories in [`repos`]
//! give each record kind a typed API.
//!
//! # Example
//!
//! ```rust
//! use storefront_store::{repos::CartRepo, Store};
//! use storefront_commerce::{ProductId, UserId};
//!
//! # tokio_test_block(async {
//! let carts = CartRepo::new(Store::in_memory());
//! let user = UserId::new("user-1");
//! carts
//!     .update(&user, |cart| cart.add_item(ProductId::new("P1"), 1, "M", "Red").map(|_| ()))
//!     .await
//!     .unwrap();
//! assert_eq!(carts.get(&user).await.unwrap().item_count(), 1);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod error;
mod kv;
mod store;

pub mod repos;

pub use error::StoreError;
pub use kv::{KvBackend, MemoryBackend, Versioned};
pub use store::Store;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::repos::{CartRepo, OrderRepo, ProductRepo, UserRepo, WishlistRepo};
    pub use crate::{KvBackend, MemoryBackend, Store, StoreError};
}
