use {
    serde::{Deserialize, Serialize},
    serde_json::Value,
    std::str::FromStr,
};

use crate::{
    error::{Error, Result},
    quantity::{opt_string_or_number, parse_chain_id},
};

/// The closed set of signing methods a tool result may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SigningMethod {
    #[serde(rename = "eth_sendTransaction", alias = "send-transaction")]
    SendTransaction,
    /// `personal_sign`: params are `[message, address]`.
    #[serde(rename = "personal_sign", alias = "sign-message")]
    SignMessage,
    /// `eth_sign`: params are `[address, message]`.
    #[serde(rename = "eth_sign", alias = "sign-message-legacy")]
    SignMessageLegacy,
    #[serde(rename = "eth_signTypedData", alias = "sign-typed-data-v1")]
    SignTypedDataV1,
    #[serde(rename = "eth_signTypedData_v4", alias = "sign-typed-data-v4")]
    SignTypedDataV4,
}

impl SigningMethod {
    pub const ALL: [Self; 5] = [
        Self::SendTransaction,
        Self::SignMessage,
        Self::SignMessageLegacy,
        Self::SignTypedDataV1,
        Self::SignTypedDataV4,
    ];

    /// Wire name of the method.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SendTransaction => "eth_sendTransaction",
            Self::SignMessage => "personal_sign",
            Self::SignMessageLegacy => "eth_sign",
            Self::SignTypedDataV1 => "eth_signTypedData",
            Self::SignTypedDataV4 => "eth_signTypedData_v4",
        }
    }

    fn alias(self) -> &'static str {
        match self {
            Self::SendTransaction => "send-transaction",
            Self::SignMessage => "sign-message",
            Self::SignMessageLegacy => "sign-message-legacy",
            Self::SignTypedDataV1 => "sign-typed-data-v1",
            Self::SignTypedDataV4 => "sign-typed-data-v4",
        }
    }
}

impl FromStr for SigningMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s || m.alias() == s)
            .ok_or_else(|| Error::unsupported_method(s))
    }
}

impl std::fmt::Display for SigningMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One element of an `eth_sendTransaction` params array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(
        default,
        alias = "gasLimit",
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub gas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A decoded signing request.
///
/// Each variant carries exactly the parameters its method needs, so the
/// positional differences between methods are resolved at decode time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningRequest {
    SendTransaction {
        chain_id: u64,
        calls: Vec<TxParams>,
    },
    SignMessage {
        chain_id: u64,
        message: String,
        address: String,
    },
    SignMessageLegacy {
        chain_id: u64,
        address: String,
        message: String,
    },
    SignTypedDataV1 {
        chain_id: u64,
        address: String,
        typed_data: String,
    },
    SignTypedDataV4 {
        chain_id: u64,
        address: String,
        typed_data: String,
    },
}

impl SigningRequest {
    pub fn method(&self) -> SigningMethod {
        match self {
            Self::SendTransaction { .. } => SigningMethod::SendTransaction,
            Self::SignMessage { .. } => SigningMethod::SignMessage,
            Self::SignMessageLegacy { .. } => SigningMethod::SignMessageLegacy,
            Self::SignTypedDataV1 { .. } => SigningMethod::SignTypedDataV1,
            Self::SignTypedDataV4 { .. } => SigningMethod::SignTypedDataV4,
        }
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Self::SendTransaction { chain_id, .. }
            | Self::SignMessage { chain_id, .. }
            | Self::SignMessageLegacy { chain_id, .. }
            | Self::SignTypedDataV1 { chain_id, .. }
            | Self::SignTypedDataV4 { chain_id, .. } => *chain_id,
        }
    }

    /// Decode `{"method": ..., "chainId": ..., "params": [...]}`.
    ///
    /// An unknown method is an [`Error::UnsupportedMethod`], never skipped.
    pub fn from_value(value: &Value) -> Result<Self> {
        let method_name = value
            .get("method")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::invalid_params("signing request", "missing method"))?;
        let method = SigningMethod::from_str(method_name)?;

        let chain_id = value
            .get("chainId")
            .or_else(|| value.get("chain_id"))
            .ok_or_else(|| Error::invalid_params(method.as_str(), "missing chainId"))
            .and_then(parse_chain_id)?;

        let params = match value.get("params") {
            Some(Value::Array(items)) => items.as_slice(),
            Some(_) => {
                return Err(Error::invalid_params(method.as_str(), "params must be an array"));
            },
            None => &[],
        };

        Ok(match method {
            SigningMethod::SendTransaction => {
                let calls = params
                    .iter()
                    .map(|p| serde_json::from_value::<TxParams>(p.clone()))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| Error::invalid_params(method.as_str(), e.to_string()))?;
                if calls.is_empty() {
                    return Err(Error::invalid_params(method.as_str(), "no transactions"));
                }
                Self::SendTransaction { chain_id, calls }
            },
            SigningMethod::SignMessage => {
                let [message, address] = pair(method, params)?;
                Self::SignMessage {
                    chain_id,
                    message,
                    address,
                }
            },
            SigningMethod::SignMessageLegacy => {
                let [address, message] = pair(method, params)?;
                Self::SignMessageLegacy {
                    chain_id,
                    address,
                    message,
                }
            },
            SigningMethod::SignTypedDataV1 | SigningMethod::SignTypedDataV4 => {
                let (address, typed_data) = typed_data_params(method, params)?;
                if method == SigningMethod::SignTypedDataV1 {
                    Self::SignTypedDataV1 {
                        chain_id,
                        address,
                        typed_data,
                    }
                } else {
                    Self::SignTypedDataV4 {
                        chain_id,
                        address,
                        typed_data,
                    }
                }
            },
        })
    }
}

fn pair(method: SigningMethod, params: &[Value]) -> Result<[String; 2]> {
    match params {
        [Value::String(a), Value::String(b)] => Ok([a.clone(), b.clone()]),
        _ => Err(Error::invalid_params(
            method.as_str(),
            "expected two string params",
        )),
    }
}

/// Typed data arrives as JSON text, but agents sometimes inline the object.
fn typed_data_params(method: SigningMethod, params: &[Value]) -> Result<(String, String)> {
    match params {
        [Value::String(address), Value::String(text)] => Ok((address.clone(), text.clone())),
        [Value::String(address), object @ Value::Object(_)] => {
            Ok((address.clone(), serde_json::to_string(object)?))
        },
        [Value::String(_), other] => Err(Error::malformed_typed_data(format!(
            "typed data must be JSON text or an object, got {other}"
        ))),
        _ => Err(Error::invalid_params(
            method.as_str(),
            "expected [address, typedData]",
        )),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest, serde_json::json};

    #[rstest]
    #[case("eth_sendTransaction", SigningMethod::SendTransaction)]
    #[case("personal_sign", SigningMethod::SignMessage)]
    #[case("eth_sign", SigningMethod::SignMessageLegacy)]
    #[case("eth_signTypedData", SigningMethod::SignTypedDataV1)]
    #[case("eth_signTypedData_v4", SigningMethod::SignTypedDataV4)]
    #[case("sign-typed-data-v4", SigningMethod::SignTypedDataV4)]
    #[case("send-transaction", SigningMethod::SendTransaction)]
    fn method_names(#[case] name: &str, #[case] expected: SigningMethod) {
        assert_eq!(name.parse::<SigningMethod>().unwrap(), expected);
    }

    #[rstest]
    #[case("eth_signTypedData_v3")]
    #[case("wallet_switchEthereumChain")]
    #[case("")]
    fn unknown_methods_are_unsupported(#[case] name: &str) {
        let request = json!({"method": name, "chainId": 1, "params": []});
        assert!(matches!(
            SigningRequest::from_value(&request),
            Err(Error::UnsupportedMethod { method }) if method == name
        ));
    }

    #[test]
    fn sign_message_orders_differ() {
        let personal = SigningRequest::from_value(&json!({
            "method": "personal_sign",
            "chainId": 8453,
            "params": ["hello", "0xabc"]
        }))
        .unwrap();
        assert_eq!(personal, SigningRequest::SignMessage {
            chain_id: 8453,
            message: "hello".into(),
            address: "0xabc".into(),
        });

        let legacy = SigningRequest::from_value(&json!({
            "method": "eth_sign",
            "chainId": "8453",
            "params": ["0xabc", "hello"]
        }))
        .unwrap();
        assert_eq!(legacy, SigningRequest::SignMessageLegacy {
            chain_id: 8453,
            address: "0xabc".into(),
            message: "hello".into(),
        });
    }

    #[test]
    fn send_transaction_accepts_numeric_value_and_gas_limit() {
        let request = SigningRequest::from_value(&json!({
            "method": "eth_sendTransaction",
            "chainId": 1,
            "params": [{"to": "0xdef", "value": 0, "gasLimit": 21000, "from": "0xabc"}]
        }))
        .unwrap();
        let SigningRequest::SendTransaction { calls, .. } = request else {
            panic!("expected send transaction");
        };
        assert_eq!(calls[0].value.as_deref(), Some("0"));
        assert_eq!(calls[0].gas.as_deref(), Some("21000"));
        assert_eq!(calls[0].from.as_deref(), Some("0xabc"));
    }

    #[test]
    fn send_transaction_requires_calls() {
        let err = SigningRequest::from_value(&json!({
            "method": "eth_sendTransaction",
            "chainId": 1,
            "params": []
        }))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidParams { .. }));
    }

    #[test]
    fn typed_data_accepts_inline_object() {
        let request = SigningRequest::from_value(&json!({
            "method": "eth_signTypedData_v4",
            "chainId": 8453,
            "params": ["0xabc", {"domain": {"name": "Permit2"}}]
        }))
        .unwrap();
        let SigningRequest::SignTypedDataV4 { typed_data, .. } = request else {
            panic!("expected typed data v4");
        };
        assert_eq!(typed_data, r#"{"domain":{"name":"Permit2"}}"#);
    }

    #[rstest]
    #[case(json!(42))]
    #[case(json!(null))]
    #[case(json!(["domain"]))]
    #[case(json!(true))]
    fn typed_data_of_wrong_shape_is_malformed(#[case] typed_data: Value) {
        let err = SigningRequest::from_value(&json!({
            "method": "eth_signTypedData_v4",
            "chainId": 8453,
            "params": ["0xabc", typed_data]
        }))
        .unwrap_err();
        assert!(matches!(err, Error::MalformedTypedData { .. }), "{err}");
    }

    #[test]
    fn typed_data_with_non_string_address_is_invalid_params() {
        let err = SigningRequest::from_value(&json!({
            "method": "eth_signTypedData_v4",
            "chainId": 8453,
            "params": [7, {"domain": {}}]
        }))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidParams { .. }), "{err}");
    }

    #[test]
    fn missing_chain_id_is_invalid() {
        let err = SigningRequest::from_value(&json!({
            "method": "personal_sign",
            "params": ["hello", "0xabc"]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("missing chainId"));
    }

    #[test]
    fn wrong_arity_is_invalid() {
        let err = SigningRequest::from_value(&json!({
            "method": "personal_sign",
            "chainId": 1,
            "params": ["hello"]
        }))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidParams { .. }));
    }
}
