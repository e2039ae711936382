//! Typed access to the remote crypto service. Everything that needs real number
//! theory (primes, modular exponentiation, the ciphers) happens over there; this
//! module only shapes requests and decodes responses.

use log::debug;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

pub mod types;

use self::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Rsa,
    MenezesVanstone,
}

impl Scheme {
    pub fn prefix(&self) -> &'static str {
        match self {
            Scheme::Rsa => "rsa",
            Scheme::MenezesVanstone => "mv",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateKeyPair,
    Encrypt,
    Decrypt,
    Sign,
    Verify,
    Exponentiation,
    ExtendedGcd,
    Shanks,
    ModularInverse,
    Multiply,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::CreateKeyPair => "createKeyPair",
            Operation::Encrypt => "encrypt",
            Operation::Decrypt => "decrypt",
            Operation::Sign => "sign",
            Operation::Verify => "verify",
            Operation::Exponentiation => "exponentiation",
            Operation::ExtendedGcd => "extendedGcd",
            Operation::Shanks => "shanks",
            Operation::ModularInverse => "modularInverse",
            Operation::Multiply => "multiply",
        };
        write!(f, "{}", name)
    }
}

impl Operation {
    /// Cipher operations exist once per scheme, the rest are shared helpers.
    pub fn is_scheme_specific(&self) -> bool {
        matches!(
            self,
            Operation::CreateKeyPair
                | Operation::Encrypt
                | Operation::Decrypt
                | Operation::Sign
                | Operation::Verify
        )
    }

    pub fn route(&self, scheme: Scheme) -> String {
        if self.is_scheme_specific() {
            format!("/{}/{}", scheme.prefix(), self)
        } else {
            format!("/math/{}", self)
        }
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("service answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("could not encode request: {0}")]
    Encode(serde_json::Error),
    #[error("unexpected response from {route}: {source}")]
    Decode {
        route: String,
        source: serde_json::Error,
    },
}

/// The HTTP layer. Implementations resolve `route` against their base URL.
pub trait Transport {
    fn post_json(&self, route: &str, body: Value) -> Result<Value, BackendError>;
}

pub struct BackendClient<T> {
    transport: T,
}

impl<T: Transport> BackendClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn call<Req, Resp>(&self, route: String, request: &Req) -> Result<Resp, BackendError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let body = serde_json::to_value(request).map_err(BackendError::Encode)?;
        debug!("POST {}", route);
        let response = self.transport.post_json(&route, body)?;
        serde_json::from_value(response).map_err(|source| BackendError::Decode { route, source })
    }

    pub fn create_key_pair<S: KeyScheme>(
        &self,
        request: &S::KeyRequest,
    ) -> Result<KeyPair<S::PublicKey, S::PrivateKey>, BackendError> {
        self.call(Operation::CreateKeyPair.route(S::SCHEME), request)
    }

    pub fn encrypt<S: KeyScheme>(
        &self,
        plaintext: &str,
        key: &S::PublicKey,
        number_system_base: u32,
    ) -> Result<String, BackendError> {
        let request = EncryptRequest {
            plaintext: plaintext.to_string(),
            key,
            number_system_base,
        };
        let response: CiphertextResponse = self.call(Operation::Encrypt.route(S::SCHEME), &request)?;
        Ok(response.ciphertext)
    }

    pub fn decrypt<S: KeyScheme>(
        &self,
        ciphertext: &str,
        key: &S::PrivateKey,
        number_system_base: u32,
    ) -> Result<String, BackendError> {
        let request = DecryptRequest {
            ciphertext: ciphertext.to_string(),
            key,
            number_system_base,
        };
        let response: PlaintextResponse = self.call(Operation::Decrypt.route(S::SCHEME), &request)?;
        Ok(response.plaintext)
    }

    pub fn sign<S: KeyScheme>(&self, message: &str, key: &S::PrivateKey) -> Result<String, BackendError> {
        let request = SignRequest {
            message: message.to_string(),
            key,
        };
        let response: SignatureResponse = self.call(Operation::Sign.route(S::SCHEME), &request)?;
        Ok(response.signature)
    }

    pub fn verify<S: KeyScheme>(
        &self,
        message: &str,
        signature: &str,
        key: &S::PublicKey,
    ) -> Result<bool, BackendError> {
        let request = VerifyRequest {
            message: message.to_string(),
            signature: signature.to_string(),
            key,
        };
        let response: VerifyResponse = self.call(Operation::Verify.route(S::SCHEME), &request)?;
        Ok(response.valid)
    }

    pub fn exponentiation(&self, request: &ExponentiationRequest) -> Result<NumberResponse, BackendError> {
        self.call(Operation::Exponentiation.route(Scheme::Rsa), request)
    }

    pub fn extended_gcd(&self, request: &ExtendedGcdRequest) -> Result<ExtendedGcdResponse, BackendError> {
        self.call(Operation::ExtendedGcd.route(Scheme::Rsa), request)
    }

    pub fn shanks(&self, request: &ShanksRequest) -> Result<NumberResponse, BackendError> {
        self.call(Operation::Shanks.route(Scheme::Rsa), request)
    }

    pub fn modular_inverse(&self, request: &ModularInverseRequest) -> Result<NumberResponse, BackendError> {
        self.call(Operation::ModularInverse.route(Scheme::Rsa), request)
    }

    pub fn multiply(&self, request: &MultiplyRequest) -> Result<PointResponse, BackendError> {
        self.call(Operation::Multiply.route(Scheme::MenezesVanstone), request)
    }
}
