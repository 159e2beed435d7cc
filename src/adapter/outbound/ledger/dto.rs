//! Wire types for the proof server and ledger node.

use serde::{Deserialize, Serialize};

use crate::port::TxStatus;

#[derive(Debug, Deserialize)]
pub(super) struct ProveResponse {
    pub proof: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SubmitTransaction<'a> {
    pub deployer: &'a str,
    pub contract: &'a str,
    pub private_state_id: &'a str,
    pub proof: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SubmitResponse {
    pub tx_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub(super) enum StatusResponse {
    Pending,
    #[serde(rename_all = "camelCase")]
    Confirmed {
        contract_address: String,
        #[serde(default)]
        block_height: Option<u64>,
    },
    Rejected {
        #[serde(default)]
        reason: Option<String>,
    },
}

impl From<StatusResponse> for TxStatus {
    fn from(response: StatusResponse) -> Self {
        match response {
            StatusResponse::Pending => Self::Pending,
            StatusResponse::Confirmed {
                contract_address,
                block_height,
            } => Self::Confirmed {
                contract_address,
                block_height,
            },
            StatusResponse::Rejected { reason } => Self::Rejected {
                reason: reason.unwrap_or_else(|| "rejected by node".into()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_status_variants() {
        let pending: StatusResponse = serde_json::from_str(r#"{"status":"pending"}"#).unwrap();
        assert_eq!(TxStatus::from(pending), TxStatus::Pending);

        let confirmed: StatusResponse = serde_json::from_str(
            r#"{"status":"confirmed","contractAddress":"0200ff","blockHeight":42}"#,
        )
        .unwrap();
        assert_eq!(
            TxStatus::from(confirmed),
            TxStatus::Confirmed {
                contract_address: "0200ff".into(),
                block_height: Some(42),
            }
        );

        let rejected: StatusResponse =
            serde_json::from_str(r#"{"status":"rejected","reason":"insufficient fee"}"#).unwrap();
        assert_eq!(
            TxStatus::from(rejected),
            TxStatus::Rejected {
                reason: "insufficient fee".into()
            }
        );
    }

    #[test]
    fn submit_body_is_camel_case() {
        let body = SubmitTransaction {
            deployer: "02ab",
            contract: "age-verification",
            private_state_id: "ageVerificationPrivateState",
            proof: serde_json::json!("p"),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["privateStateId"], "ageVerificationPrivateState");
        assert_eq!(json["deployer"], "02ab");
    }
}
