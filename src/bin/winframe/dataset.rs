// Copyright 2025 Winframe Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Toy retail dataset and the grouping that feeds the window queries
//!
//! The engine expects rows that are already joined and grouped. Here that
//! upstream work is done by hand: transactions are joined to products and
//! customers, then summed per product, per month or per customer.

use std::collections::BTreeMap;

use winframe::{DataType, Result, Row, Schema, SchemaBuilder, Value};

pub struct Customer {
    pub id: i64,
    pub name: &'static str,
    pub city: &'static str,
}

pub struct Product {
    pub id: i64,
    pub name: &'static str,
    pub category: &'static str,
    pub price: i64,
}

pub struct Transaction {
    pub customer_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// (year, month, day)
    pub date: (i32, u32, u32),
}

pub const CUSTOMERS: &[Customer] = &[
    Customer { id: 1, name: "Alice Smith", city: "New York" },
    Customer { id: 2, name: "Bob Johnson", city: "Los Angeles" },
    Customer { id: 3, name: "Carol Davis", city: "Chicago" },
    Customer { id: 4, name: "David Wilson", city: "Houston" },
    Customer { id: 5, name: "Eva Brown", city: "Phoenix" },
];

pub const PRODUCTS: &[Product] = &[
    Product { id: 1, name: "Laptop", category: "Electronics", price: 50000 },
    Product { id: 2, name: "Smartphone", category: "Electronics", price: 20000 },
    Product { id: 3, name: "Desk Chair", category: "Furniture", price: 15000 },
    Product { id: 4, name: "Coffee Table", category: "Furniture", price: 11000 },
    Product { id: 5, name: "Headphones", category: "Electronics", price: 6000 },
];

pub const TRANSACTIONS: &[Transaction] = &[
    Transaction { customer_id: 1, product_id: 1, quantity: 1, date: (2024, 1, 15) },
    Transaction { customer_id: 2, product_id: 2, quantity: 1, date: (2024, 1, 20) },
    Transaction { customer_id: 3, product_id: 3, quantity: 1, date: (2024, 2, 10) },
    Transaction { customer_id: 4, product_id: 4, quantity: 2, date: (2024, 2, 18) },
    Transaction { customer_id: 5, product_id: 5, quantity: 3, date: (2024, 3, 5) },
];

fn product(id: i64) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.id == id)
}

fn amount(tx: &Transaction) -> i64 {
    product(tx.product_id).map_or(0, |p| p.price * tx.quantity)
}

/// Revenue per product: `(category, product, revenue)`
pub fn product_revenue() -> (Schema, Vec<Row>) {
    let schema = SchemaBuilder::new()
        .add("category", DataType::Text)
        .add("product", DataType::Text)
        .add("revenue", DataType::Integer)
        .build();

    let rows = PRODUCTS
        .iter()
        .map(|p| {
            let revenue: i64 = TRANSACTIONS
                .iter()
                .filter(|tx| tx.product_id == p.id)
                .map(amount)
                .sum();
            winframe::row![p.category, p.name, revenue]
        })
        .collect();
    (schema, rows)
}

/// Sales per calendar month: `(month, sales)`, ordered by month
pub fn monthly_sales() -> Result<(Schema, Vec<Row>)> {
    let schema = SchemaBuilder::new()
        .add("month", DataType::Timestamp)
        .add("sales", DataType::Integer)
        .build();

    let mut totals: BTreeMap<(i32, u32), i64> = BTreeMap::new();
    for tx in TRANSACTIONS {
        let (year, month, _) = tx.date;
        *totals.entry((year, month)).or_default() += amount(tx);
    }

    let rows = totals
        .into_iter()
        .map(|((year, month), sales)| {
            Ok(Row::from_values(vec![
                Value::date(year, month, 1)?,
                Value::integer(sales),
            ]))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((schema, rows))
}

/// Total spend per customer: `(customer, city, spend)`
pub fn customer_spend() -> (Schema, Vec<Row>) {
    let schema = SchemaBuilder::new()
        .add("customer", DataType::Text)
        .add("city", DataType::Text)
        .add("spend", DataType::Integer)
        .build();

    let rows = CUSTOMERS
        .iter()
        .map(|c| {
            let spend: i64 = TRANSACTIONS
                .iter()
                .filter(|tx| tx.customer_id == c.id)
                .map(amount)
                .sum();
            winframe::row![c.name, c.city, spend]
        })
        .collect();
    (schema, rows)
}
