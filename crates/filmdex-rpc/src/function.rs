//! `ServerFunction` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::transport::{RawRequest, RawResponse};

/// A callable that is also remotely invocable.
///
/// Implemented by registry-backed local functions and by HTTP fetchers.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(ServerFunction: Send)]
pub trait LocalServerFunction {
    /// Route this function is reachable at, e.g. `/_m/abc123`.
    fn url(&self) -> &str;

    /// Invokes the function with JSON-encoded arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the function fails or the transport fails.
    async fn call(&self, args: Value) -> Result<Value>;

    /// Sends a raw request to the function's route.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails.
    async fn fetch(&self, request: RawRequest) -> Result<RawResponse>;
}

/// Calls a server function with typed arguments and result.
///
/// # Errors
///
/// Returns an error if encoding, the call itself, or decoding fails.
pub async fn call_typed<F, A, R>(function: &F, args: &A) -> Result<R>
where
    F: LocalServerFunction + ?Sized,
    A: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let args = serde_json::to_value(args).context("failed to encode arguments")?;
    let result = function.call(args).await?;
    serde_json::from_value(result)
        .with_context(|| format!("failed to decode result of {}", function.url()))
}
