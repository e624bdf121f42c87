use super::{Invocation, connect, or_dash};
use crate::cli::parser::InventoryCmd;
use crate::config::Config;
use crate::core::inventory::{InventoryScreen, NewProduct};
use crate::errors::AppResult;
use crate::models::product::Product;
use crate::ui::messages::{header, info, success};
use crate::utils::table::Table;
use serde_json::Value;

pub async fn handle(cmd: &InventoryCmd, cfg: &Config, inv: &Invocation) -> AppResult<()> {
    let conn = connect(cfg, inv).await?;
    let mut screen = InventoryScreen::new(&conn.backend, inv.scope.clone(), &conn.ctx);

    match cmd {
        InventoryCmd::List => {
            header("Inventory");
            print_products(screen.load().await?);
        }

        InventoryCmd::Add {
            name,
            sku,
            category,
            price,
            tax_pct,
        } => {
            let form = NewProduct {
                sku: sku.clone(),
                name: name.clone(),
                category: category.clone(),
                price: price.clone(),
                tax_pct: tax_pct.clone(),
            };
            screen.add_product(&form).await?;
            success(format!("Product '{}' added", name.trim()));
            print_products(screen.products());
        }

        InventoryCmd::Stock {
            product_id,
            kind,
            qty,
            note,
        } => {
            screen
                .add_stock(product_id, *kind, qty, note.as_deref())
                .await?;
            success(kind.done_message());
            print_products(screen.products());
        }

        InventoryCmd::Sell {
            product_id,
            qty,
            unit_price,
        } => {
            let sale = screen
                .quick_sale(product_id, qty, unit_price.as_deref())
                .await?;
            match sale {
                Value::Null => success("Sale recorded"),
                Value::String(id) => success(format!("Sale recorded: {id}")),
                other => success(format!("Sale recorded: {other}")),
            }
            print_products(screen.products());
        }
    }

    Ok(())
}

fn print_products(products: &[Product]) {
    if products.is_empty() {
        info("No products yet");
        return;
    }

    let mut table = Table::new(&["ID", "SKU", "Name", "Category", "Price", "Tax %", "Stock"]);
    for p in products {
        table.add_row(vec![
            p.product_id.clone(),
            or_dash(p.sku.as_deref()),
            p.name.clone(),
            or_dash(p.category.as_deref()),
            format!("{:.2} {}", p.price, p.currency).trim_end().to_string(),
            format!("{:.1}", p.tax_pct),
            p.stock_qty.to_string(),
        ]);
    }
    print!("{}", table.render());
}
