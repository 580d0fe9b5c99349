//! REST endpoint descriptors
//!
//! An endpoint is configuration: which API it belongs to, the HTTP method,
//! a URI template with `:name` path parameters, and the body and response
//! types. The client turns a descriptor into a request.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

use crate::types::{Result, SigningError};

/// Back-end APIs an endpoint can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Api {
    /// Civil-status records API
    EtatCivil,
}

impl Api {
    /// Path prefix of the API below the configured base URL
    pub fn prefix(&self) -> &'static str {
        match self {
            Api::EtatCivil => "/rece/etatcivil-api/v1",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Typed endpoint descriptor
///
/// `B` is the request body, `R` the response body.
pub struct ApiEndpoint<B, R> {
    pub api: Api,
    pub method: Method,
    pub uri: &'static str,
    _types: PhantomData<fn(B) -> R>,
}

impl<B, R> ApiEndpoint<B, R>
where
    B: Serialize,
    R: DeserializeOwned,
{
    pub const fn new(api: Api, method: Method, uri: &'static str) -> Self {
        Self {
            api,
            method,
            uri,
            _types: PhantomData,
        }
    }

    /// Substitute every `:name` segment of the template.
    ///
    /// Fails if a parameter has no value.
    pub fn render_uri(&self, params: &[(&str, &str)]) -> Result<String> {
        let segments = self
            .uri
            .split('/')
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => params
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| value.to_string())
                    .ok_or_else(|| SigningError::MissingPathParam(name.to_string())),
                None => Ok(segment.to_string()),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(segments.join("/"))
    }
}

impl<B, R> fmt::Debug for ApiEndpoint<B, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiEndpoint")
            .field("api", &self.api)
            .field("method", &self.method)
            .field("uri", &self.uri)
            .finish()
    }
}

/// Certificates used to compose the final dual-digital document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DualDigitalCertificates {
    #[serde(rename = "issuerCertificat")]
    pub issuer_certificate: String,
    #[serde(rename = "entiteCertificat")]
    pub entity_certificate: String,
}

/// Compose the final document of a dual-digital signature.
///
/// Responds with the composed document as a string.
pub const PATCH_COMPOSE_FINAL_DOCUMENT_DUAL_DIGITAL: ApiEndpoint<DualDigitalCertificates, String> =
    ApiEndpoint::new(
        Api::EtatCivil,
        Method::Patch,
        "/acte/:idActe/double-numerique/composer-document-final",
    );
