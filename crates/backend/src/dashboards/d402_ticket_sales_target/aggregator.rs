use chrono::{DateTime, NaiveDate, NaiveDateTime};
use contracts::dashboards::d402_ticket_sales_target::{
    CategoryBreakdown, CumulativeSales, DailySales, TicketRecord, TicketStatistics,
};
use std::collections::{BTreeMap, HashSet};

use super::ticket_kind::TicketKindRules;

/// Per-day and running sales totals built from raw ticket records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesAggregation {
    pub daily: BTreeMap<NaiveDate, DailySales>,
    /// Ascending by date, one entry per day with sales
    pub cumulative: Vec<CumulativeSales>,
}

impl SalesAggregation {
    /// Most recent running total, `None` before the first sale
    pub fn latest(&self) -> Option<&CumulativeSales> {
        self.cumulative.last()
    }

    /// Tickets sold up to and including `now`
    pub fn ticket_count_as_of(&self, now: NaiveDate) -> u64 {
        let sold = self.cumulative.partition_point(|c| c.date <= now);
        sold.checked_sub(1).map_or(0, |index| self.cumulative[index].ticket_count)
    }

    pub fn statistics(&self, kind_rules: &TicketKindRules) -> TicketStatistics {
        let (total_tickets, total_revenue, total_orders, tickets_by_category) =
            match self.latest() {
                Some(latest) => (
                    latest.ticket_count,
                    latest.revenue,
                    latest.distinct_order_count,
                    latest.category_breakdown.clone(),
                ),
                None => (0, 0.0, 0, CategoryBreakdown::new()),
            };

        let average_order_value = if total_orders > 0 {
            total_revenue / total_orders as f64
        } else {
            0.0
        };

        TicketStatistics {
            total_tickets,
            total_revenue,
            total_orders,
            average_order_value,
            tickets_by_kind: kind_rules.breakdown(&tickets_by_category),
            tickets_by_category,
            first_sale_date: self.daily.keys().next().copied(),
            last_sale_date: self.daily.keys().next_back().copied(),
            daily: self.daily.values().cloned().collect(),
            cumulative: self.cumulative.clone(),
        }
    }
}

#[derive(Default)]
struct DayAccumulator {
    ticket_count: u64,
    revenue: f64,
    category_breakdown: CategoryBreakdown,
    seen_orders: HashSet<i64>,
}

/// Truncate an ISO-8601 date or timestamp to its calendar day.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (the day as written, offset
/// ignored) and naive `YYYY-MM-DDTHH:MM:SS[.fff]` timestamps.
pub fn parse_day_key(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(timestamp.date());
        }
    }

    None
}

/// Parse an order total. Malformed, non-finite or negative values yield 0.
pub fn parse_amount(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => amount,
        _ => {
            tracing::debug!("Unusable ticket amount '{}' counted as 0", raw);
            0.0
        }
    }
}

/// Revenue totals are kept in whole cents
fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Group ticket records by day and fold them into running totals.
///
/// Every record adds one ticket to its day and category. Revenue of an order
/// is added once per day: `amount` is the order total repeated on every
/// attendee line. Lines of one order spread over several days are counted
/// once on each of those days.
pub fn aggregate(tickets: &[TicketRecord]) -> SalesAggregation {
    let mut days: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();
    let mut skipped = 0usize;

    for ticket in tickets {
        let Some(day) = parse_day_key(&ticket.order_date) else {
            skipped += 1;
            continue;
        };

        let acc = days.entry(day).or_default();
        acc.ticket_count += 1;
        *acc
            .category_breakdown
            .entry(ticket.category.clone())
            .or_insert(0) += 1;
        if acc.seen_orders.insert(ticket.order_id) {
            acc.revenue += parse_amount(&ticket.amount);
        }
    }

    if skipped > 0 {
        tracing::warn!(
            "Skipped {} ticket record(s) with unparsable order date",
            skipped
        );
    }

    let daily: BTreeMap<NaiveDate, DailySales> = days
        .into_iter()
        .map(|(date, acc)| {
            let sales = DailySales {
                date,
                ticket_count: acc.ticket_count,
                revenue: round_to_cents(acc.revenue),
                category_breakdown: acc.category_breakdown,
                distinct_order_count: acc.seen_orders.len() as u64,
            };
            (date, sales)
        })
        .collect();

    let mut cumulative = Vec::with_capacity(daily.len());
    let mut ticket_count = 0u64;
    let mut revenue = 0.0;
    let mut order_count = 0u64;
    let mut category_breakdown = CategoryBreakdown::new();

    for day in daily.values() {
        ticket_count += day.ticket_count;
        revenue = round_to_cents(revenue + day.revenue);
        order_count += day.distinct_order_count;
        for (category, count) in &day.category_breakdown {
            *category_breakdown.entry(category.clone()).or_insert(0) += count;
        }

        cumulative.push(CumulativeSales {
            date: day.date,
            ticket_count,
            revenue,
            category_breakdown: category_breakdown.clone(),
            distinct_order_count: order_count,
        });
    }

    tracing::debug!(
        "Aggregated {} ticket record(s) into {} sales day(s)",
        tickets.len(),
        daily.len()
    );

    SalesAggregation { daily, cumulative }
}
