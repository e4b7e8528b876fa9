//! The dashboard's financial records: sales, fixed costs, variable expenses and the user
//! profile, persisted as one JSON document, plus the KPI and chart helpers computed from them.

pub mod kpi;
pub mod model;
pub mod store;

pub use kpi::{
    calculate_kpis, daily_sales_series, day_events, expense_distribution, format_brl,
    format_percentage, DailyPoint, DayEvents, ExpenseShare, KpiData, Period, MAX_SERIES_DAYS,
};
pub use model::{
    CostKind, ExpenseCategory, ExpenseKind, FinancialData, FixedCost, UserProfile,
    VariableExpense,
};
pub use store::{FileStore, FinancialStore, KeyValueStore, MemoryStore, FINANCIAL_DATA_KEY};
