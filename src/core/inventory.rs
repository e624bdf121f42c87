//! Products, stock movements and quick sales. Stock levels and sale totals
//! are computed by the backend procedures; this screen only validates the
//! quantities it forwards.

use crate::backend::{Backend, Direction, Query, decode_rows};
use crate::core::forms::{optional_text, parse_int, parse_number_or_zero, required};
use crate::core::scope::ScreenScope;
use crate::errors::{AppError, AppResult};
use crate::models::product::{MovementKind, Product};
use crate::session::AuthContext;
use serde_json::{Value, json};

pub const PRODUCTS_TABLE: &str = "products";
pub const PRODUCT_STOCK_VIEW: &str = "v_product_stock";
pub const STOCK_MOVEMENT_FN: &str = "add_stock_movement";
pub const SALE_FN: &str = "create_sale_with_items";

#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub sku: Option<String>,
    pub name: String,
    pub category: Option<String>,
    pub price: Option<String>,
    pub tax_pct: Option<String>,
}

pub struct InventoryScreen<'a, B: Backend> {
    backend: &'a B,
    scope: ScreenScope,
    ctx: &'a AuthContext,
    products: Vec<Product>,
}

impl<'a, B: Backend> InventoryScreen<'a, B> {
    pub fn new(backend: &'a B, scope: ScreenScope, ctx: &'a AuthContext) -> Self {
        Self {
            backend,
            scope,
            ctx,
            products: Vec::new(),
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, product_id: &str) -> AppResult<&Product> {
        self.products
            .iter()
            .find(|p| p.product_id == product_id)
            .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))
    }

    async fn list_price(&mut self, product_id: &str) -> AppResult<f64> {
        if self.products.is_empty() {
            self.load().await?;
        }
        Ok(self.find(product_id)?.price)
    }

    /// Products with their current stock, by name.
    pub async fn load(&mut self) -> AppResult<&[Product]> {
        let query = Query::from(PRODUCT_STOCK_VIEW).order("name", Direction::Asc);
        let rows = self.scope.run(self.backend.select(&query)).await?;
        self.products = decode_rows(rows)?;
        Ok(&self.products)
    }

    pub async fn add_product(&mut self, form: &NewProduct) -> AppResult<()> {
        let name = required(&form.name, "Product name is required")?;
        let price = parse_number_or_zero(form.price.as_deref(), "Price must be a number")?;
        let tax = parse_number_or_zero(form.tax_pct.as_deref(), "Tax % must be a number")?;

        let row = json!({
            "sku": optional_text(form.sku.as_deref()),
            "name": name,
            "category": optional_text(form.category.as_deref()),
            "price": price,
            "tax_pct": tax,
            "created_by": self.ctx.user_id,
        });

        self.scope.run(self.backend.insert(PRODUCTS_TABLE, row)).await?;
        self.load().await?;
        Ok(())
    }

    /// Record a purchase or an adjustment; `qty` must be a non-zero integer.
    pub async fn add_stock(
        &mut self,
        product_id: &str,
        kind: MovementKind,
        qty: &str,
        note: Option<&str>,
    ) -> AppResult<()> {
        let q = parse_int(qty, "Quantity must be a non-zero integer")?;
        if q == 0 {
            return Err(AppError::validation("Quantity must be a non-zero integer"));
        }

        let args = json!({
            "p_product_id": product_id,
            "p_type": kind.to_db_str(),
            "p_qty": q,
            "p_note": optional_text(note),
        });

        self.scope.run(self.backend.rpc(STOCK_MOVEMENT_FN, args)).await?;
        self.load().await?;
        Ok(())
    }

    /// Single-item cash sale. An explicit unit price above zero wins,
    /// otherwise the product's list price is used. Returns what the
    /// procedure answered (the sale id).
    pub async fn quick_sale(
        &mut self,
        product_id: &str,
        qty: &str,
        unit_price: Option<&str>,
    ) -> AppResult<Value> {
        let q = parse_int(qty, "Sale quantity must be a positive integer")?;
        if q <= 0 {
            return Err(AppError::validation("Sale quantity must be a positive integer"));
        }
        let explicit = parse_number_or_zero(unit_price, "Unit price must be a number")?;

        let unit_price = if explicit > 0.0 {
            explicit
        } else {
            self.list_price(product_id).await?
        };

        let args = json!({
            "p_member_id": Value::Null,
            "p_method": "cash",
            "p_items": [
                { "product_id": product_id, "qty": q, "unit_price": unit_price }
            ],
        });

        let sale = self.scope.run(self.backend.rpc(SALE_FN, args)).await?;
        self.load().await?;
        Ok(sale)
    }
}
