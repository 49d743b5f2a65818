//! Order placement and lifecycle.
//!
//! Placing an order reserves stock line by line. If a later line cannot be
//! reserved, or the order cannot be stored, the lines already reserved are
//! put back before the error is returned.

use crate::ApiError;
use serde::Deserialize;
use storefront_auth::CurrentUser;
use storefront_commerce::cart::{price_lines, MAX_QUANTITY_PER_ITEM};
use storefront_commerce::catalog::{AdjustmentReason, StockAdjustment};
use storefront_commerce::checkout::{
    Order, OrderLineItem, OrderStatus, PaymentInfo, PaymentMethod, ShippingAddress,
};
use storefront_commerce::{CommerceError, Currency, OrderId, ProductId};
use storefront_store::repos::{CartRepo, OrderRepo, ProductRepo};
use storefront_store::StoreError;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub quantity: i64,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub order_items: Vec<OrderItemRequest>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    #[serde(default)]
    pub payment_info: Option<PaymentInfo>,
}

impl CreateOrderRequest {
    fn validate(&self) -> Result<PaymentMethod, CommerceError> {
        if self.order_items.is_empty() {
            return Err(CommerceError::Validation("No order items".to_string()));
        }
        for item in &self.order_items {
            if item.quantity < 1 {
                return Err(CommerceError::InvalidQuantity(item.quantity));
            }
            if item.quantity > MAX_QUANTITY_PER_ITEM {
                return Err(CommerceError::QuantityExceedsLimit(
                    item.quantity,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }
            if item.size.trim().is_empty() || item.color.trim().is_empty() {
                return Err(CommerceError::Validation(
                    "Each item needs a size and a color".to_string(),
                ));
            }
        }
        self.shipping_address.validate()?;
        self.payment_method
            .parse()
            .map_err(|_| CommerceError::Validation("Invalid payment method".to_string()))
    }
}

#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepo,
    products: ProductRepo,
    carts: CartRepo,
    currency: Currency,
}

impl OrderService {
    pub fn new(orders: OrderRepo, products: ProductRepo, carts: CartRepo, currency: Currency) -> Self {
        Self {
            orders,
            products,
            carts,
            currency,
        }
    }

    pub async fn create_order(
        &self,
        user: &CurrentUser,
        request: CreateOrderRequest,
    ) -> Result<Order, ApiError> {
        let payment_method = request.validate()?;

        let mut lines = Vec::with_capacity(request.order_items.len());
        for item in request.order_items {
            let product = self
                .products
                .get(&item.product_id)
                .await?
                .filter(|p| p.is_active)
                .ok_or_else(|| CommerceError::ProductNotFound(item.product_id.to_string()))?;
            if product.out_of_stock {
                return Err(CommerceError::OutOfStock(product.name).into());
            }
            lines.push(OrderLineItem {
                product_id: product.id,
                name: product.name,
                price: product.price,
                image: product.main_image,
                size: item.size,
                color: item.color,
                quantity: item.quantity,
            });
        }

        let pricing = price_lines(lines.iter().map(|l| (l.price, l.quantity)), self.currency)?;
        let order = Order::new(
            user.id.clone(),
            lines,
            request.shipping_address,
            payment_method,
            request.payment_info,
            pricing,
            self.currency,
        )?;

        self.reserve_stock(&order).await?;

        if let Err(e) = self.orders.insert(&order).await {
            error!(order_number = %order.order_number, error = %e, "failed to store order, releasing stock");
            self.release_stock(&order.id, &order.order_items, AdjustmentReason::Compensation)
                .await;
            return Err(e.into());
        }

        match self
            .carts
            .update(&user.id, |cart| {
                cart.remove_ordered(&order.order_items);
                Ok(())
            })
            .await
        {
            Ok(_) => {}
            Err(e) => warn!(order_id = %order.id, error = %e, "order placed but cart not updated"),
        }

        info!(
            order_id = %order.id,
            order_number = %order.order_number,
            user_id = %user.id,
            items = order.item_count(),
            total = order.total_price,
            payment_method = %order.payment_method,
            "order created"
        );
        Ok(order)
    }

    /// The caller's orders, newest first.
    pub async fn list_orders(&self, user: &CurrentUser) -> Result<Vec<Order>, ApiError> {
        Ok(self.orders.list_for_user(&user.id).await?)
    }

    pub async fn get_order(&self, user: &CurrentUser, id: &OrderId) -> Result<Order, ApiError> {
        let order = self.require(id).await?;
        if !user.can_access(&order.user_id) {
            return Err(ApiError::Forbidden(
                "Not authorized to access this order".to_string(),
            ));
        }
        Ok(order)
    }

    /// Admin status change. Cancelling this way also returns the stock.
    pub async fn update_status(
        &self,
        actor: &CurrentUser,
        id: &OrderId,
        status: &str,
    ) -> Result<Order, ApiError> {
        actor.require_admin()?;
        let next: OrderStatus = status.parse()?;
        let order = self.orders.update(id, |order| order.apply_status(next)).await?;

        if next == OrderStatus::Cancelled {
            self.release_stock(id, &order.order_items, AdjustmentReason::Cancellation)
                .await;
        }
        info!(order_id = %id, status = %next, by = %actor.id, "order status updated");
        Ok(order)
    }

    /// Customer cancellation of a pending or processing order.
    pub async fn cancel_order(&self, user: &CurrentUser, id: &OrderId) -> Result<Order, ApiError> {
        let order = self.require(id).await?;
        if !order.is_owned_by(&user.id) {
            return Err(ApiError::Forbidden(
                "Not authorized to cancel this order".to_string(),
            ));
        }

        let order = self.orders.update(id, |order| order.cancel()).await?;
        self.release_stock(id, &order.order_items, AdjustmentReason::Cancellation)
            .await;
        info!(order_id = %id, user_id = %user.id, "order cancelled");
        Ok(order)
    }

    async fn require(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.orders
            .get(id)
            .await?
            .ok_or_else(|| CommerceError::OrderNotFound(id.to_string()).into())
    }

    /// Decrement stock for every line, undoing earlier lines if one fails.
    async fn reserve_stock(&self, order: &Order) -> Result<(), ApiError> {
        let items = &order.order_items;
        for (reserved, item) in items.iter().enumerate() {
            let sale = StockAdjustment::sale(item.product_id.clone(), item.quantity)
                .with_reference(order.id.as_str());
            match self.products.apply_adjustment(&sale).await {
                Ok(product) => {
                    debug!(product_id = %product.id, stock = product.stock, "stock reserved");
                }
                Err(e) => {
                    warn!(product_id = %item.product_id, error = %e, "stock reservation failed");
                    self.release_stock(&order.id, &items[..reserved], AdjustmentReason::Compensation)
                        .await;
                    return Err(e.into());
                }
            }
        }
        Ok(())
    }

    /// Put line quantities back. Products that no longer exist are skipped.
    async fn release_stock(&self, order_id: &OrderId, items: &[OrderLineItem], reason: AdjustmentReason) {
        for item in items {
            let restock = StockAdjustment::restock(item.product_id.clone(), item.quantity, reason)
                .with_reference(order_id.as_str());
            match self.products.apply_adjustment(&restock).await {
                Ok(product) => {
                    debug!(product_id = %product.id, stock = product.stock, reason = reason.as_str(), "stock restored");
                }
                Err(StoreError::Domain(CommerceError::ProductNotFound(_))) => {
                    warn!(product_id = %item.product_id, "product gone, stock not restored");
                }
                Err(e) => {
                    error!(
                        product_id = %item.product_id,
                        quantity = item.quantity,
                        reason = reason.as_str(),
                        error = %e,
                        "failed to restore stock"
                    );
                }
            }
        }
    }
}
