//! Admin dashboard figures.
//!
//! Revenue only counts orders whose payment status is `paid`.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use preface_core::{Order, OrderStatus, PaymentStatus, ProductId};

use crate::db::{Database, Tables};

/// Largest window the sales chart covers.
pub const MAX_CHART_DAYS: u32 = 365;

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_revenue: Decimal,
    pub total_orders: usize,
    pub total_customers: usize,
    pub total_products: usize,
    pub pending_orders: usize,
    pub orders_this_month: usize,
    pub revenue_this_month: Decimal,
}

/// Paid orders on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesPoint {
    pub date: NaiveDate,
    pub orders: usize,
    pub revenue: Decimal,
}

/// Units sold for one product, across all non-cancelled orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub total_sold: u64,
    pub total_revenue: Decimal,
}

/// Read-only reports over the store.
pub struct AnalyticsService<'a> {
    db: &'a Database,
}

impl<'a> AnalyticsService<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn dashboard(&self) -> DashboardStats {
        dashboard(&*self.db.read().await, Utc::now())
    }

    pub async fn sales_chart(&self, days: u32) -> Vec<SalesPoint> {
        sales_chart(&*self.db.read().await, days, Utc::now())
    }

    pub async fn top_products(&self, limit: usize) -> Vec<TopProduct> {
        top_products(&*self.db.read().await, limit)
    }
}

fn is_paid(order: &Order) -> bool {
    order.payment_status == PaymentStatus::Paid
}

fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .with_day(1)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map_or(now, |midnight| Utc.from_utc_datetime(&midnight))
}

fn dashboard(tables: &Tables, now: DateTime<Utc>) -> DashboardStats {
    let month_start = start_of_month(now);
    let orders = || tables.orders.values();

    DashboardStats {
        total_revenue: orders().filter(|o| is_paid(o)).map(|o| o.totals.total).sum(),
        total_orders: tables.orders.len(),
        total_customers: tables.customers.len(),
        total_products: tables.catalog.products().iter().filter(|p| p.is_active).count(),
        pending_orders: orders().filter(|o| o.status == OrderStatus::Pending).count(),
        orders_this_month: orders().filter(|o| o.created_at >= month_start).count(),
        revenue_this_month: orders()
            .filter(|o| o.created_at >= month_start && is_paid(o))
            .map(|o| o.totals.total)
            .sum(),
    }
}

fn sales_chart(tables: &Tables, days: u32, now: DateTime<Utc>) -> Vec<SalesPoint> {
    let since = now - Duration::days(i64::from(days.min(MAX_CHART_DAYS)));
    let mut by_day: BTreeMap<NaiveDate, (usize, Decimal)> = BTreeMap::new();

    for order in tables.orders.values().filter(|o| o.created_at >= since && is_paid(o)) {
        let entry = by_day.entry(order.created_at.date_naive()).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += order.totals.total;
    }

    by_day
        .into_iter()
        .map(|(date, (orders, revenue))| SalesPoint { date, orders, revenue })
        .collect()
}

fn top_products(tables: &Tables, limit: usize) -> Vec<TopProduct> {
    let mut sold: HashMap<&ProductId, (String, u64, Decimal)> = HashMap::new();
    for order in tables.orders.values().filter(|o| o.status != OrderStatus::Cancelled) {
        for item in &order.items {
            let entry = sold
                .entry(&item.product_id)
                .or_insert_with(|| (item.product_name.clone(), 0, Decimal::ZERO));
            entry.1 += u64::from(item.quantity);
            entry.2 += item.subtotal;
        }
    }

    let mut ranked: Vec<TopProduct> = sold
        .into_iter()
        .map(|(id, (name, total_sold, total_revenue))| {
            let product = tables.catalog.get(id);
            TopProduct {
                id: id.clone(),
                name: product.map_or(name, |p| p.name.clone()),
                price: product.map(|p| p.price),
                image: product.map(|p| p.image.clone()),
                total_sold,
                total_revenue,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.total_sold.cmp(&a.total_sold).then_with(|| a.id.cmp(&b.id)));
    ranked.truncate(limit);
    ranked
}
