//! GraphQL documents and the injected collaborators that run them.
//!
//! Transport and token storage live with the host. This module only knows
//! which documents to send, with which variables, and how to decode the
//! `data` object that comes back.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Value, json};

use crate::decode::{self, Profile};
use crate::errors::{MissingResponse, QueryError};
use crate::identity::user_id_from_token;
use crate::layout::AuditTotals;
use crate::series::{Event, PassFail, ProgressRecord, SeriesPoint, build_cumulative_series};

// ============================================================================
// Documents
// ============================================================================

/// Basic user information
pub const GET_USER_PROFILE: &str = r#"
query GetUserProfile($userId: Int!) {
  user(where: { id: { _eq: $userId } }) {
    id
    login
    attrs
  }
}
"#;

/// Sum of XP transactions
pub const GET_TOTAL_XP: &str = r#"
query GetTotalXP($userId: Int!) {
  transaction_aggregate(
    where: {
      userId: { _eq: $userId },
      type: { _eq: "xp" }
    }
  ) {
    aggregate {
      sum {
        amount
      }
    }
  }
}
"#;

/// Audit ratio and totals
pub const GET_AUDIT_STATS: &str = r#"
query GetAuditStats($userId: Int!) {
  user(where: { id: { _eq: $userId } }) {
    id
    auditRatio
    totalUp
    totalDown
  }
}
"#;

/// XP transactions, oldest first
pub const GET_XP_TRANSACTIONS: &str = r#"
query GetXPTransactions($userId: Int!) {
  transaction(
    where: {
      userId: { _eq: $userId },
      type: { _eq: "xp" }
    }
    order_by: { createdAt: asc }
  ) {
    amount
    createdAt
    path
  }
}
"#;

/// Latest 50 project results
pub const GET_PROJECT_RESULTS: &str = r#"
query GetProjectResults($userId: Int!) {
  result(
    where: { userId: { _eq: $userId } }
    order_by: { createdAt: desc }
    limit: 50
  ) {
    id
    grade
    createdAt
    object {
      name
      type
    }
  }
}
"#;

/// Piscine progress rows, oldest first
pub const GET_PISCINE_STATS: &str = r#"
query GetPiscineStats($userId: Int!) {
  progress(
    where: {
      userId: { _eq: $userId },
      path: { _ilike: "%piscine%" }
    }
    order_by: { createdAt: asc }
  ) {
    id
    grade
    createdAt
    path
    object {
      name
      type
    }
  }
}
"#;

/// Every document, in the order the dashboard issues them.
pub const ALL_QUERIES: [&str; 6] = [
    GET_USER_PROFILE,
    GET_TOTAL_XP,
    GET_AUDIT_STATS,
    GET_XP_TRANSACTIONS,
    GET_PROJECT_RESULTS,
    GET_PISCINE_STATS,
];

/// Operation name of a document (`GetUserProfile` for [`GET_USER_PROFILE`]).
pub fn operation_name(document: &str) -> Option<&str> {
    let rest = document.trim_start().strip_prefix("query")?.trim_start();
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}

// ============================================================================
// Collaborators
// ============================================================================

/// Source of the bearer token for the current session.
pub trait CredentialProvider {
    /// `None` when the user is signed out.
    fn bearer_token(&self) -> Option<String>;
}

/// A fixed token, for scripts and tests.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl CredentialProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Runs one GraphQL document and returns its `data` object.
///
/// Implementations own transport, authentication headers, retries and
/// GraphQL-level `errors` handling.
pub trait QueryExecutor {
    type Error: std::error::Error + Send + Sync + 'static;

    fn execute(&self, document: &str, variables: &Value) -> Result<Value, Self::Error>;
}

/// Executor that answers from canned `data` objects keyed by operation name.
#[derive(Debug, Clone, Default)]
pub struct RecordedResponses {
    responses: HashMap<String, Value>,
}

impl RecordedResponses {
    /// Load from a JSON object of `{ "OperationName": data, ... }`.
    pub fn from_json(value: &Value) -> Self {
        let responses = value
            .as_object()
            .map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        Self { responses }
    }

    pub fn insert(&mut self, operation: impl Into<String>, data: Value) {
        self.responses.insert(operation.into(), data);
    }
}

impl QueryExecutor for RecordedResponses {
    type Error = MissingResponse;

    fn execute(&self, document: &str, _variables: &Value) -> Result<Value, Self::Error> {
        let operation = operation_name(document).unwrap_or_default();
        self.responses.get(operation).cloned().ok_or_else(|| MissingResponse {
            operation: operation.to_string(),
        })
    }
}

// ============================================================================
// Dashboard data
// ============================================================================

/// Everything the profile page shows, decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    pub profile: Profile,
    pub total_xp: i64,
    pub audit: AuditTotals,
    pub transactions: Vec<Event>,
    pub piscine: Vec<ProgressRecord>,
}

impl DashboardData {
    /// Day-bucketed cumulative XP for the line chart.
    pub fn xp_series(&self) -> Vec<SeriesPoint> {
        build_cumulative_series(self.transactions.as_slice())
    }

    /// Pass/fail tally for the pie chart.
    pub fn piscine_tally(&self) -> PassFail {
        PassFail::classify(&self.piscine)
    }
}

fn run<E: QueryExecutor>(executor: &E, document: &'static str, variables: &Value) -> Result<Value, QueryError> {
    let name = operation_name(document).unwrap_or("anonymous");
    crate::log::debug!(operation = name, "executing query");
    executor.execute(document, variables).map_err(|source| QueryError::Executor {
        query: name,
        source: Box::new(source),
    })
}

/// Fetch and decode everything the dashboard needs.
///
/// The user id comes from the token's `sub` claim. Queries run one after
/// another through `executor`; a host that wants them concurrent can issue
/// the documents itself and call the [`decode`](crate::decode) functions.
pub fn fetch_dashboard_data<C, E>(credentials: &C, executor: &E) -> Result<DashboardData, QueryError>
where
    C: CredentialProvider + ?Sized,
    E: QueryExecutor,
{
    let token = credentials.bearer_token().ok_or(QueryError::Unauthenticated)?;
    let user_id = user_id_from_token(&token)?;
    let variables = json!({ "userId": user_id });

    let profile = decode::decode_profile(&run(executor, GET_USER_PROFILE, &variables)?)?;
    let total_xp = decode::decode_total_xp(&run(executor, GET_TOTAL_XP, &variables)?)?;
    let audit = decode::decode_audit_totals(&run(executor, GET_AUDIT_STATS, &variables)?)?;
    let transactions = decode::decode_events(&run(executor, GET_XP_TRANSACTIONS, &variables)?)?;
    let piscine = decode::decode_progress(&run(executor, GET_PISCINE_STATS, &variables)?)?;

    crate::log::debug!(
        user_id,
        transactions = transactions.len(),
        piscine = piscine.len(),
        "fetched dashboard data"
    );

    Ok(DashboardData {
        profile,
        total_xp,
        audit,
        transactions,
        piscine,
    })
}
