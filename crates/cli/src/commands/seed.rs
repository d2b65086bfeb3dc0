//! Seed the catalog with sample products.
//!
//! Inserts a small, deterministic set of products across a few
//! categories, with a couple featured, for local development.

use rust_decimal::Decimal;
use tracing::info;

use super::{CommandError, connect};

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: Decimal,
    category: &'static str,
    featured: bool,
}

fn sample_products() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            name: "Stoneware Mug",
            description: "A 350ml hand-glazed stoneware mug.",
            price: Decimal::new(1850, 2),
            category: "kitchen",
            featured: true,
        },
        SeedProduct {
            name: "Linen Apron",
            description: "Washed linen apron with leather straps.",
            price: Decimal::new(4200, 2),
            category: "kitchen",
            featured: false,
        },
        SeedProduct {
            name: "Walnut Serving Board",
            description: "End-grain walnut board, food-safe oil finish.",
            price: Decimal::new(6500, 2),
            category: "kitchen",
            featured: true,
        },
        SeedProduct {
            name: "Wool Throw Blanket",
            description: "Lambswool throw in a herringbone weave.",
            price: Decimal::new(9800, 2),
            category: "living",
            featured: false,
        },
        SeedProduct {
            name: "Ceramic Planter",
            description: "Matte ceramic planter with drainage tray.",
            price: Decimal::new(2400, 2),
            category: "living",
            featured: false,
        },
        SeedProduct {
            name: "Beeswax Candle Set",
            description: "Three pure beeswax pillar candles.",
            price: Decimal::new(1600, 2),
            category: "living",
            featured: false,
        },
    ]
}

/// Seed sample products into the catalog.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run(clear: bool) -> Result<(), CommandError> {
    info!("Connecting to catalog database...");
    let pool = connect().await?;

    if clear {
        info!("Clearing existing products...");
        sqlx::query("DELETE FROM products").execute(&pool).await?;
    }

    let products = sample_products();
    let count = products.len();

    for product in products {
        sqlx::query(
            "INSERT INTO products (name, description, price, category, is_featured) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(product.name)
        .bind(product.description)
        .bind(product.price)
        .bind(product.category)
        .bind(product.featured)
        .execute(&pool)
        .await?;
    }

    info!("Seeded {count} products");
    Ok(())
}
