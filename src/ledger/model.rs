//! Persisted record types. Field names match the dashboard's JSON document.

use serde::{Deserialize, Serialize};

use crate::types::Sale;

/// How often a fixed cost is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostKind {
    Monthly,
    Annual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedCost {
    pub id: String,
    pub name: String,
    pub value: f64,
    #[serde(rename = "type")]
    pub kind: CostKind,
    pub category: String,
    pub recurring_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Traffic,
    Domain,
    Tools,
    Content,
    Other,
}

impl ExpenseCategory {
    /// Label shown in charts.
    pub fn label(self) -> &'static str {
        match self {
            ExpenseCategory::Traffic => "Tráfego",
            ExpenseCategory::Domain => "Domínio",
            ExpenseCategory::Tools => "Ferramentas",
            ExpenseCategory::Content => "Conteúdo",
            ExpenseCategory::Other => "Outros",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseKind {
    Business,
    Personal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableExpense {
    pub id: String,
    pub name: String,
    pub value: f64,
    pub category: ExpenseCategory,
    /// `YYYY-MM-DD` or an ISO-8601 timestamp.
    pub date: String,
    #[serde(rename = "type")]
    pub kind: ExpenseKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub avatar: String,
    pub email: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Usuário".to_string(),
            avatar: String::new(),
            email: String::new(),
        }
    }
}

/// The whole persisted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialData {
    pub sales: Vec<Sale>,
    pub fixed_costs: Vec<FixedCost>,
    pub variable_expenses: Vec<VariableExpense>,
    pub user_profile: UserProfile,
}
