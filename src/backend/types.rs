//! Request and response bodies of the crypto service. Big integers travel as
//! decimal strings.

use num_bigint::{BigInt, BigUint};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::Scheme;

pub(crate) mod decimal {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::{fmt::Display, str::FromStr};

    pub fn serialize<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.trim().parse().map_err(de::Error::custom)
    }
}

/// Binds a cipher scheme to its key shapes.
pub trait KeyScheme {
    const SCHEME: Scheme;
    type KeyRequest: Serialize;
    type PublicKey: Serialize + DeserializeOwned;
    type PrivateKey: Serialize + DeserializeOwned;
}

pub struct Rsa;

pub struct MenezesVanstone;

impl KeyScheme for Rsa {
    const SCHEME: Scheme = Scheme::Rsa;
    type KeyRequest = RsaKeyPairRequest;
    type PublicKey = RsaPublicKey;
    type PrivateKey = RsaPrivateKey;
}

impl KeyScheme for MenezesVanstone {
    const SCHEME: Scheme = Scheme::MenezesVanstone;
    type KeyRequest = MvKeyPairRequest;
    type PublicKey = MvPublicKey;
    type PrivateKey = MvPrivateKey;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPair<P, S> {
    pub public_key: P,
    pub private_key: S,
}

// ============================================================================
// RSA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsaKeyPairRequest {
    pub modulus_width: u32,
    pub miller_rabin_iterations: u32,
    #[serde(with = "decimal")]
    pub random_seed: BigUint,
    pub number_system_base: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsaPublicKey {
    #[serde(with = "decimal")]
    pub e: BigUint,
    #[serde(with = "decimal")]
    pub n: BigUint,
    pub block_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsaPrivateKey {
    #[serde(with = "decimal")]
    pub d: BigUint,
    #[serde(with = "decimal")]
    pub n: BigUint,
    pub block_size: u32,
}

// ============================================================================
// Menezes-Vanstone
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MvKeyPairRequest {
    pub modulus_width: u32,
    pub miller_rabin_iterations: u32,
    pub number_system_base: u32,
}

/// `y^2 = x^3 + ax mod prime`, with a subgroup of the given order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MvCurve {
    #[serde(with = "decimal")]
    pub a: BigInt,
    #[serde(with = "decimal")]
    pub prime: BigUint,
    #[serde(with = "decimal")]
    pub order: BigUint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcPoint {
    #[serde(with = "decimal")]
    pub x: BigUint,
    #[serde(with = "decimal")]
    pub y: BigUint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MvPublicKey {
    pub curve: MvCurve,
    pub generator: EcPoint,
    pub y: EcPoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MvPrivateKey {
    pub curve: MvCurve,
    #[serde(with = "decimal")]
    pub x: BigUint,
}

// ============================================================================
// Cipher operations, shared by both schemes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptRequest<K> {
    pub plaintext: String,
    pub key: K,
    pub number_system_base: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptRequest<K> {
    pub ciphertext: String,
    pub key: K,
    pub number_system_base: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest<K> {
    pub message: String,
    pub key: K,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest<K> {
    pub message: String,
    pub signature: String,
    pub key: K,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiphertextResponse {
    pub ciphertext: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaintextResponse {
    pub plaintext: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureResponse {
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
}

// ============================================================================
// Number theory helpers
// ============================================================================

/// base ^ exponent mod modulus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExponentiationRequest {
    #[serde(with = "decimal")]
    pub base: BigUint,
    #[serde(with = "decimal")]
    pub exponent: BigUint,
    #[serde(with = "decimal")]
    pub modulus: BigUint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedGcdRequest {
    #[serde(with = "decimal")]
    pub a: BigInt,
    #[serde(with = "decimal")]
    pub b: BigInt,
}

/// gcd = a * x + b * y
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedGcdResponse {
    #[serde(with = "decimal")]
    pub gcd: BigInt,
    #[serde(with = "decimal")]
    pub x: BigInt,
    #[serde(with = "decimal")]
    pub y: BigInt,
}

/// Discrete logarithm of `element` to `base` mod `modulus` (baby-step giant-step).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShanksRequest {
    #[serde(with = "decimal")]
    pub base: BigUint,
    #[serde(with = "decimal")]
    pub element: BigUint,
    #[serde(with = "decimal")]
    pub modulus: BigUint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModularInverseRequest {
    #[serde(with = "decimal")]
    pub value: BigUint,
    #[serde(with = "decimal")]
    pub modulus: BigUint,
}

/// factor * point on a Menezes-Vanstone curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplyRequest {
    pub curve: MvCurve,
    pub point: EcPoint,
    #[serde(with = "decimal")]
    pub factor: BigUint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberResponse {
    #[serde(with = "decimal")]
    pub result: BigUint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointResponse {
    pub result: EcPoint,
}
