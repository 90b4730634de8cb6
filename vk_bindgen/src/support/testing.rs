//! Helpers used by the emitted `*_test.rs` files.

use std::cell::RefCell;
use std::fmt::Debug;
use std::future::Future;
use std::pin::pin;
use std::task::{Context as TaskContext, Poll, Waker};

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api_error::ApiError;
use super::caller::{Caller, Context, MethodError};
use super::random::RandomFill;
use super::wire::FormValues;

/// Seed used by emitted tests, so failures reproduce.
pub const FIXTURE_SEED: u64 = 0x5EED_F00D;

/// One call observed by a [`RecordingCaller`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: String,
    pub values: FormValues,
}

#[derive(Debug, Clone)]
enum Reply {
    Body(String),
    Api(ApiError),
    Transport(String),
}

/// In-memory [`Caller`] that records every request and answers with a canned
/// reply.
#[derive(Debug)]
pub struct RecordingCaller {
    reply: Reply,
    calls: RefCell<Vec<RecordedCall>>,
}

impl RecordingCaller {
    /// Answers every call with `body` decoded as the response type.
    #[must_use]
    pub fn responding(body: impl Into<String>) -> Self {
        Self::with_reply(Reply::Body(body.into()))
    }

    /// Answers every call with `body` encoded as JSON.
    ///
    /// # Panics
    ///
    /// Panics if `body` cannot be serialized.
    #[must_use]
    pub fn responding_with<T: Serialize>(body: &T) -> Self {
        let text: String = serde_json::to_string(body).expect("response body serializes");
        Self::responding(text)
    }

    /// Answers every call with an API error envelope.
    #[must_use]
    pub fn api_error(err: ApiError) -> Self {
        Self::with_reply(Reply::Api(err))
    }

    /// Fails every call before reaching the API.
    #[must_use]
    pub fn transport_error(message: impl Into<String>) -> Self {
        Self::with_reply(Reply::Transport(message.into()))
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            calls: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// The only recorded call.
    ///
    /// # Panics
    ///
    /// Panics unless exactly one call was made.
    #[must_use]
    pub fn single_call(&self) -> RecordedCall {
        let calls: Vec<RecordedCall> = self.calls();
        assert_eq!(1, calls.len(), "expected exactly one call");
        calls[0].clone()
    }
}

impl Caller for RecordingCaller {
    fn call<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        method: &str,
        values: FormValues,
    ) -> impl Future<Output = Result<T, MethodError>> {
        let cancelled: bool = ctx.is_cancelled();
        if !cancelled {
            self.calls.borrow_mut().push(RecordedCall {
                method: method.to_string(),
                values,
            });
        }
        let reply: Reply = self.reply.clone();
        async move {
            if cancelled {
                return Err(MethodError::transport("context cancelled"));
            }
            match reply {
                Reply::Body(body) => serde_json::from_str(&body).map_err(MethodError::transport),
                Reply::Api(err) => Err(MethodError::Api(err)),
                Reply::Transport(message) => Err(MethodError::transport(message)),
            }
        }
    }
}

/// Drives a future that never waits on I/O to completion.
///
/// # Panics
///
/// Panics if the future returns `Pending`.
#[must_use]
pub fn block_on<F: Future>(future: F) -> F::Output {
    let mut future = pin!(future);
    let mut cx: TaskContext<'_> = TaskContext::from_waker(Waker::noop());
    match future.as_mut().poll(&mut cx) {
        Poll::Ready(output) => output,
        Poll::Pending => panic!("future was not ready"),
    }
}

/// Deterministic generator for emitted tests.
#[must_use]
pub fn fixture_rng() -> StdRng {
    StdRng::seed_from_u64(FIXTURE_SEED)
}

/// Random fixture of `T` from the shared seed.
#[must_use]
pub fn fixture<T: RandomFill>() -> T {
    T::random_fill(&mut fixture_rng(), 0)
}

/// Asserts `decode(encode(value)) == value` for a random fixture of `T`.
///
/// # Panics
///
/// Panics if encoding or decoding fails or the decoded value differs.
pub fn assert_round_trip<T>()
where
    T: RandomFill + Serialize + DeserializeOwned + PartialEq + Debug,
{
    let mut rng: StdRng = fixture_rng();
    for _ in 0..4 {
        let expected: T = T::random_fill(&mut rng, 0);
        let json: String = serde_json::to_string(&expected).expect("fixture serializes");
        let actual: T = serde_json::from_str(&json).expect("fixture deserializes");
        assert_eq!(expected, actual, "round trip changed value: {json}");
    }
}
