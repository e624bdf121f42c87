use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

/// Missing and `null` both decode to the default. Aggregates over an outer
/// join come back as `null` when nothing matched.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Row of `v_product_stock`: product data plus server-computed stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tax_pct: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub track_stock: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock_qty: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MovementKind {
    Purchase,
    Adjustment,
}

impl MovementKind {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            MovementKind::Purchase => "purchase",
            MovementKind::Adjustment => "adjustment",
        }
    }

    pub fn done_message(&self) -> &'static str {
        match self {
            MovementKind::Purchase => "Stock purchased",
            MovementKind::Adjustment => "Stock adjusted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_aggregates_decode_as_defaults() {
        let p: Product = serde_json::from_value(json!({
            "product_id": "p1",
            "name": "Water",
            "price": 2.5,
            "currency": null,
            "track_stock": null,
            "is_active": null,
            "stock_qty": null,
        }))
        .unwrap();

        assert_eq!(p.stock_qty, 0);
        assert_eq!(p.currency, "");
        assert!(!p.track_stock);
        assert_eq!(p.tax_pct, 0.0);
        assert_eq!(p.price, 2.5);
    }
}
