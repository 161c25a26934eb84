use crate::USER_AGENT;
use async_trait::async_trait;
use logoali::domain::Address;
use logoali::normalize::CepKey;
use logoali::ports::AddressFetcher;
use serde::Deserialize;
use shared::{Error, Result};
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the ViaCEP address registry.
pub struct ViaCepClient {
    client: reqwest::Client,
    base_url: String,
}

/// Raw ViaCEP payload. The registry answers 200 with `{"erro": true}` for
/// unknown codes, and omits fields freely; anything unrecognized is
/// ignored rather than treated as an error.
#[derive(Debug, Deserialize)]
struct ViaCepPayload {
    #[serde(default)]
    erro: Option<serde_json::Value>,
    #[serde(default)]
    logradouro: Option<String>,
    #[serde(default)]
    complemento: Option<String>,
    #[serde(default)]
    unidade: Option<String>,
    #[serde(default)]
    bairro: Option<String>,
    #[serde(default)]
    localidade: Option<String>,
    #[serde(default)]
    uf: Option<String>,
}

impl ViaCepClient {
    /// `base_url` is the registry root, e.g. `https://viacep.com.br/ws`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn decode(cep: &CepKey, payload: ViaCepPayload) -> Result<Address> {
        if payload.erro.is_some() {
            return Err(Error::NotFound(format!(
                "CEP {} does not exist",
                cep.hyphenated()
            )));
        }

        Ok(Address {
            cep: cep.hyphenated(),
            logradouro: payload.logradouro,
            complemento: payload.complemento,
            unidade: payload.unidade,
            bairro: payload.bairro,
            localidade: payload.localidade,
            uf: payload.uf,
        })
    }
}

#[async_trait]
impl AddressFetcher for ViaCepClient {
    async fn fetch(&self, cep: &CepKey) -> Result<Address> {
        let url = format!("{}/{}/json/", self.base_url, cep.as_str());
        debug!(%url, "fetching address from ViaCEP");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::UpstreamUnavailable(format!("ViaCEP request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            // Only malformed paths 404 here; unknown CEPs come back as
            // 200 + {"erro": true}. Kept for parity with the registry's
            // documented behavior.
            return Err(Error::NotFound(format!(
                "CEP {} does not exist",
                cep.hyphenated()
            )));
        }
        if !status.is_success() {
            return Err(Error::UpstreamUnavailable(format!(
                "ViaCEP returned HTTP {}",
                status
            )));
        }

        let payload: ViaCepPayload = response.json().await.map_err(|e| {
            Error::UpstreamUnavailable(format!("ViaCEP response was not valid JSON: {}", e))
        })?;

        Self::decode(cep, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cep() -> CepKey {
        CepKey::parse("01001-000").unwrap()
    }

    #[test]
    fn decodes_a_full_payload() {
        let payload: ViaCepPayload = serde_json::from_str(
            r#"{
                "cep": "01001-000",
                "logradouro": "Praça da Sé",
                "complemento": "lado ímpar",
                "unidade": "",
                "bairro": "Sé",
                "localidade": "São Paulo",
                "uf": "SP",
                "ibge": "3550308",
                "ddd": "11"
            }"#,
        )
        .unwrap();

        let address = ViaCepClient::decode(&cep(), payload).unwrap();
        assert_eq!(address.cep, "01001-000");
        assert_eq!(address.logradouro.as_deref(), Some("Praça da Sé"));
        assert_eq!(address.uf.as_deref(), Some("SP"));
    }

    #[test]
    fn missing_optional_fields_decode_as_none() {
        let payload: ViaCepPayload =
            serde_json::from_str(r#"{"cep": "01001-000", "uf": "SP"}"#).unwrap();

        let address = ViaCepClient::decode(&cep(), payload).unwrap();
        assert_eq!(address.logradouro, None);
        assert_eq!(address.bairro, None);
        assert_eq!(address.uf.as_deref(), Some("SP"));
    }

    #[test]
    fn erro_marker_maps_to_not_found() {
        let payload: ViaCepPayload = serde_json::from_str(r#"{"erro": true}"#).unwrap();

        let err = ViaCepClient::decode(&cep(), payload).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn erro_as_string_also_maps_to_not_found() {
        // Some ViaCEP mirrors answer {"erro": "true"}.
        let payload: ViaCepPayload = serde_json::from_str(r#"{"erro": "true"}"#).unwrap();

        let err = ViaCepClient::decode(&cep(), payload).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
