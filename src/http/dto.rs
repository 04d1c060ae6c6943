//! Request/response DTOs and wire mapping
//!
//! Field names follow the public API (`valor`, `tipo`, `descricao`, ...).
//! Kinds travel as `c`/`d` on the wire and as `credit`/`debit` inside.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    AccountSnapshot, ClientId, Statement, TransactionKind, TransactionRecord, TransactionRequest,
};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct TransactionBody {
    #[serde(rename = "valor")]
    pub amount: i64,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "descricao")]
    pub description: String,
}

impl TransactionBody {
    /// Convert to a raw request for `client`
    ///
    /// Unknown kind codes are passed through untouched so the validator
    /// reports them.
    pub fn into_request(self, client: ClientId) -> TransactionRequest {
        let kind = match self.kind.as_str() {
            "c" => TransactionKind::Credit.as_str().to_string(),
            "d" => TransactionKind::Debit.as_str().to_string(),
            _ => self.kind,
        };
        TransactionRequest::new(client, self.amount, kind, self.description)
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TransactionResponse {
    #[serde(rename = "limite")]
    pub limit: i64,
    #[serde(rename = "saldo")]
    pub balance: i64,
}

impl From<AccountSnapshot> for TransactionResponse {
    fn from(snapshot: AccountSnapshot) -> Self {
        Self {
            limit: snapshot.limit,
            balance: snapshot.balance,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatementResponse {
    #[serde(rename = "saldo")]
    pub balance: BalanceBody,
    #[serde(rename = "ultimas_transacoes")]
    pub transactions: Vec<StatementEntry>,
}

#[derive(Debug, Serialize)]
pub struct BalanceBody {
    pub total: i64,
    #[serde(rename = "data_extrato")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "limite")]
    pub limit: i64,
}

#[derive(Debug, Serialize)]
pub struct StatementEntry {
    #[serde(rename = "valor")]
    pub amount: u64,
    #[serde(rename = "tipo")]
    pub kind: &'static str,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "realizada_em")]
    pub created_at: DateTime<Utc>,
}

impl From<TransactionRecord> for StatementEntry {
    fn from(record: TransactionRecord) -> Self {
        Self {
            amount: record.amount,
            kind: wire_code(record.kind),
            description: record.description,
            created_at: record.created_at,
        }
    }
}

impl From<Statement> for StatementResponse {
    fn from(statement: Statement) -> Self {
        Self {
            balance: BalanceBody {
                total: statement.account.balance,
                updated_at: statement.account.updated_at,
                limit: statement.account.limit,
            },
            transactions: statement
                .transactions
                .into_iter()
                .map(StatementEntry::from)
                .collect(),
        }
    }
}

pub fn wire_code(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Credit => "c",
        TransactionKind::Debit => "d",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::credit("c", "credit")]
    #[case::debit("d", "debit")]
    #[case::unknown_passes_through("x", "x")]
    #[case::full_name_passes_through("credit", "credit")]
    #[case::upper_case_passes_through("C", "C")]
    fn test_kind_code_mapping(#[case] wire: &str, #[case] expected: &str) {
        let body = TransactionBody {
            amount: 10,
            kind: wire.to_string(),
            description: "desc".to_string(),
        };
        assert_eq!(body.into_request(1).kind, expected);
    }

    #[test]
    fn test_body_deserializes_wire_names() {
        let body: TransactionBody =
            serde_json::from_str(r#"{"valor": 1000, "tipo": "c", "descricao": "descricao"}"#)
                .unwrap();
        assert_eq!(body.amount, 1000);
        assert_eq!(
            body.into_request(3),
            TransactionRequest::new(3, 1000, "credit", "descricao")
        );
    }

    #[rstest]
    #[case::fractional(r#"{"valor": 1.5, "tipo": "c", "descricao": "x"}"#)]
    #[case::missing_field(r#"{"valor": 1, "tipo": "c"}"#)]
    #[case::string_amount(r#"{"valor": "1", "tipo": "c", "descricao": "x"}"#)]
    fn test_body_rejects_malformed_json(#[case] json: &str) {
        assert!(serde_json::from_str::<TransactionBody>(json).is_err());
    }

    #[test]
    fn test_transaction_response_wire_names() {
        let value = serde_json::to_value(TransactionResponse {
            limit: 100000,
            balance: -9098,
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({"limite": 100000, "saldo": -9098}));
    }
}
