//! Dashboard figures computed from the ledger.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;

use crate::types::Sale;

use super::model::{CostKind, ExpenseCategory, FixedCost, VariableExpense};

const DAYS_PER_MONTH: f64 = 30.0;

/// Longest window [`daily_sales_series`] will build; larger requests are clamped.
pub const MAX_SERIES_DAYS: u32 = 3_660;

/// Inclusive time window for [`calculate_kpis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Period {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }

    /// Length in 30-day months (fractional).
    pub fn months(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64 / (DAYS_PER_MONTH * 86_400_000.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiData {
    pub gross_revenue: f64,
    pub net_revenue: f64,
    /// Variable expenses plus (prorated) fixed costs.
    pub total_expenses: f64,
    pub net_profit: f64,
    pub average_ticket: f64,
    pub total_sales: usize,
    /// Net profit over total expenses, in percent. `0` without expenses.
    pub roi: f64,
    /// Net profit over gross revenue, in percent. `0` without revenue.
    pub margin_percentage: f64,
}

/// Compute the dashboard KPIs.
///
/// Without a period every record counts and fixed costs count at face value. With a period,
/// sales and expenses outside it (or with an unreadable date) are left out, and fixed costs are
/// prorated: monthly costs × months, annual costs × months / 12.
pub fn calculate_kpis(
    sales: &[Sale],
    fixed_costs: &[FixedCost],
    expenses: &[VariableExpense],
    period: Option<Period>,
) -> KpiData {
    let in_period = |date: &str| match period {
        Some(p) => parse_instant(date).is_some_and(|at| p.contains(at)),
        None => true,
    };

    let sales: Vec<&Sale> = sales.iter().filter(|s| in_period(&s.date)).collect();
    let variable: f64 = expenses
        .iter()
        .filter(|e| in_period(&e.date))
        .map(|e| e.value)
        .sum();
    let fixed: f64 = fixed_costs
        .iter()
        .map(|c| match (period, c.kind) {
            (None, _) => c.value,
            (Some(p), CostKind::Monthly) => c.value * p.months(),
            (Some(p), CostKind::Annual) => c.value * (p.months() / 12.0),
        })
        .sum();

    let gross_revenue: f64 = sales.iter().map(|s| s.gross_value).sum();
    let net_revenue: f64 = sales.iter().map(|s| s.net_value).sum();
    let total_expenses = variable + fixed;
    let net_profit = net_revenue - total_expenses;
    let total_sales = sales.len();

    KpiData {
        gross_revenue,
        net_revenue,
        total_expenses,
        net_profit,
        average_ticket: if total_sales > 0 {
            gross_revenue / total_sales as f64
        } else {
            0.0
        },
        total_sales,
        roi: if total_expenses > 0.0 {
            net_profit / total_expenses * 100.0
        } else {
            0.0
        },
        margin_percentage: if gross_revenue > 0.0 {
            net_profit / gross_revenue * 100.0
        } else {
            0.0
        },
    }
}

/// `R$ 1.234,56`, with a no-break space after the symbol and the minus sign in front.
pub fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let (units, frac) = (cents / 100, cents % 100);

    let digits = units.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$\u{a0}{grouped},{frac:02}")
}

/// One decimal and a percent sign: `12.5%`.
pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}

/// One day of the sales chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub date: NaiveDate,
    /// Sum of net values.
    pub value: f64,
    /// `dd/mm`.
    pub formatted_date: String,
}

/// Net sales per day for `[today - days, today]`, oldest first, zero-filled.
///
/// `days` is clamped to [`MAX_SERIES_DAYS`].
pub fn daily_sales_series(sales: &[Sale], days: u32, today: NaiveDate) -> Vec<DailyPoint> {
    let days = days.min(MAX_SERIES_DAYS);
    let start = today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN);
    let mut points: Vec<DailyPoint> = start
        .iter_days()
        .take_while(|d| *d <= today)
        .map(|date| DailyPoint {
            date,
            value: 0.0,
            formatted_date: date.format("%d/%m").to_string(),
        })
        .collect();

    for sale in sales {
        let Some(day) = parse_instant(&sale.date).map(|at| at.date_naive()) else {
            continue;
        };
        if day < start || day > today {
            continue;
        }
        let offset = (day - start).num_days() as usize;
        if let Some(point) = points.get_mut(offset) {
            point.value += sale.net_value;
        }
    }
    points
}

/// Total spent in one expense category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseShare {
    pub category: ExpenseCategory,
    pub label: &'static str,
    pub value: f64,
    /// Share of all expenses, in percent.
    pub percentage: f64,
}

/// Per-category expense totals in order of first appearance.
pub fn expense_distribution(expenses: &[VariableExpense]) -> Vec<ExpenseShare> {
    let total: f64 = expenses.iter().map(|e| e.value).sum();
    let mut shares: Vec<ExpenseShare> = Vec::new();
    for expense in expenses {
        match shares.iter_mut().find(|s| s.category == expense.category) {
            Some(share) => share.value += expense.value,
            None => shares.push(ExpenseShare {
                category: expense.category,
                label: expense.category.label(),
                value: expense.value,
                percentage: 0.0,
            }),
        }
    }
    if total != 0.0 {
        for share in &mut shares {
            share.percentage = share.value / total * 100.0;
        }
    }
    shares
}

/// Sales and expenses dated on one calendar day, for the calendar markers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DayEvents<'a> {
    pub sales: Vec<&'a Sale>,
    pub expenses: Vec<&'a VariableExpense>,
}

impl DayEvents<'_> {
    pub fn has_sales(&self) -> bool {
        !self.sales.is_empty()
    }

    pub fn has_expenses(&self) -> bool {
        !self.expenses.is_empty()
    }
}

/// Records whose date falls in `[day 00:00:00.000, day 23:59:59.999]` UTC.
///
/// Records with an unreadable date are left out.
pub fn day_events<'a>(
    sales: &'a [Sale],
    expenses: &'a [VariableExpense],
    day: NaiveDate,
) -> DayEvents<'a> {
    let start = day.and_time(chrono::NaiveTime::MIN).and_utc();
    let window = Period::new(start, start + chrono::Duration::milliseconds(86_399_999));
    let on_day = |date: &str| parse_instant(date).is_some_and(|at| window.contains(at));

    DayEvents {
        sales: sales.iter().filter(|s| on_day(&s.date)).collect(),
        expenses: expenses.iter().filter(|e| on_day(&e.date)).collect(),
    }
}

/// Record dates are either full timestamps or plain `YYYY-MM-DD` (read as UTC midnight).
fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc())
}
