//! Header-based schema detection.
//!
//! Column roles are inferred from header text with ordered keyword rules (case-insensitive
//! substring match). Every role ends up as a [`RoleMatch`], so callers can tell a confident
//! guess from an ambiguous or missing one and ask the user to fill the gaps.

use std::collections::BTreeMap;

use crate::types::{ColumnMapping, ColumnRole, SchemaKind};

/// A header keyword rule.
///
/// A (lowercased) header matches when it contains at least one `any_of` keyword (if any are
/// listed), every `all_of` keyword and no `none_of` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordRule {
    pub role: ColumnRole,
    pub any_of: &'static [&'static str],
    pub all_of: &'static [&'static str],
    pub none_of: &'static [&'static str],
}

impl KeywordRule {
    pub const fn any(role: ColumnRole, any_of: &'static [&'static str]) -> Self {
        Self {
            role,
            any_of,
            all_of: &[],
            none_of: &[],
        }
    }

    pub fn matches(&self, header: &str) -> bool {
        let h = header.to_lowercase();
        (self.any_of.is_empty() || self.any_of.iter().any(|k| h.contains(k)))
            && self.all_of.iter().all(|k| h.contains(k))
            && !self.none_of.iter().any(|k| h.contains(k))
    }
}

/// Headers containing any of these mark a daily-aggregated sheet.
pub const AGGREGATED_MARKERS: &[&str] = &["ano", "mês", "mes", "dia"];

/// Interactive-import rules, in priority order. The first rule that matches a header claims it.
pub const IMPORT_RULES: [KeywordRule; 3] = [
    KeywordRule::any(
        ColumnRole::Date,
        &["data", "date", "ano", "mês", "mes", "dia"],
    ),
    KeywordRule::any(
        ColumnRole::GrossValue,
        &["bruto", "gross", "valor vendas", "total"],
    ),
    KeywordRule::any(
        ColumnRole::NetValue,
        &["líquido", "liquido", "net", "recebido", "valor"],
    ),
];

/// Extra roles located on daily-aggregated sheets, each evaluated over all headers.
pub const DATE_PART_RULES: [KeywordRule; 4] = [
    KeywordRule::any(ColumnRole::Year, &["ano"]),
    KeywordRule::any(ColumnRole::Month, &["mês", "mes"]),
    KeywordRule::any(ColumnRole::Day, &["dia"]),
    KeywordRule {
        role: ColumnRole::Quantity,
        any_of: &[],
        all_of: &["vendas"],
        none_of: &["valor"],
    },
];

/// Outcome of locating one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleMatch {
    /// Exactly one header matched.
    Found(String),
    /// Several headers matched; none was picked.
    Ambiguous(Vec<String>),
    /// No header matched.
    Absent,
}

impl RoleMatch {
    fn from_candidates(mut candidates: Vec<String>) -> Self {
        candidates.dedup();
        match candidates.len() {
            0 => RoleMatch::Absent,
            1 => RoleMatch::Found(candidates.remove(0)),
            _ => RoleMatch::Ambiguous(candidates),
        }
    }

    pub fn found(&self) -> Option<&str> {
        match self {
            RoleMatch::Found(label) => Some(label.as_str()),
            _ => None,
        }
    }
}

/// Result of [`detect_schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDetection {
    pub schema: SchemaKind,
    pub roles: BTreeMap<ColumnRole, RoleMatch>,
}

impl SchemaDetection {
    pub fn role(&self, role: ColumnRole) -> &RoleMatch {
        self.roles.get(&role).unwrap_or(&RoleMatch::Absent)
    }

    /// A mapping made of the confidently found roles only.
    pub fn mapping(&self) -> ColumnMapping {
        let mut mapping = ColumnMapping::new(self.schema);
        for (role, m) in &self.roles {
            if let Some(label) = m.found() {
                mapping.set(*role, label);
            }
        }
        mapping
    }

    /// Required roles of the detected schema that were not found unambiguously.
    pub fn unresolved_required(&self) -> Vec<ColumnRole> {
        self.schema
            .required_roles()
            .iter()
            .copied()
            .filter(|r| self.role(*r).found().is_none())
            .collect()
    }
}

/// Daily-aggregated when any header mentions year, month or day.
pub fn detect_schema_kind(headers: &[String]) -> SchemaKind {
    let aggregated = headers.iter().any(|h| {
        let h = h.to_lowercase();
        AGGREGATED_MARKERS.iter().any(|k| h.contains(k))
    });
    if aggregated {
        SchemaKind::DailyAggregated
    } else {
        SchemaKind::Transactional
    }
}

/// Infer the schema and a role assignment from a header row.
pub fn detect_schema(headers: &[String]) -> SchemaDetection {
    let schema = detect_schema_kind(headers);

    let mut claimed: BTreeMap<ColumnRole, Vec<String>> = IMPORT_RULES
        .iter()
        .map(|rule| (rule.role, Vec::new()))
        .collect();
    for header in headers.iter().filter(|h| !h.trim().is_empty()) {
        if let Some(rule) = IMPORT_RULES.iter().find(|r| r.matches(header)) {
            claimed.entry(rule.role).or_default().push(header.clone());
        }
    }

    let mut roles: BTreeMap<ColumnRole, RoleMatch> = claimed
        .into_iter()
        .map(|(role, candidates)| (role, RoleMatch::from_candidates(candidates)))
        .collect();

    if schema == SchemaKind::DailyAggregated {
        for rule in &DATE_PART_RULES {
            roles.insert(rule.role, match_independently(headers, rule));
        }
    }

    SchemaDetection { schema, roles }
}

/// Every header matching `rule`, regardless of other rules.
pub(crate) fn match_independently(headers: &[String], rule: &KeywordRule) -> RoleMatch {
    RoleMatch::from_candidates(
        headers
            .iter()
            .filter(|h| !h.trim().is_empty() && rule.matches(h))
            .cloned()
            .collect(),
    )
}
