//! Timeout layer for RPC requests.

use alloy::{
    rpc::json_rpc::{RequestPacket, ResponsePacket},
    transports::{Transport, TransportError, TransportErrorKind, TransportFut},
};
use futures_util::FutureExt;
use std::{
    task::{Context, Poll},
    time::Duration,
};
use tower::{Layer, Service};
use tracing::warn;

/// A [`tower::Layer`] that adds a timeout to requests.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutLayer {
    timeout: Duration,
}

impl TimeoutLayer {
    /// Create a new [`TimeoutLayer`] with the given timeout duration.
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl<T> Layer<T> for TimeoutLayer {
    type Service = TimeoutService<T>;

    fn layer(&self, inner: T) -> Self::Service {
        TimeoutService { inner, timeout: self.timeout }
    }
}

/// A service that wraps another service with a timeout.
#[derive(Debug, Clone)]
pub struct TimeoutService<T> {
    inner: T,
    timeout: Duration,
}

impl<T> Service<RequestPacket> for TimeoutService<T>
where
    T: Transport + Clone,
{
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = TransportFut<'static>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: RequestPacket) -> Self::Future {
        let method = req.as_single().map(|r| r.method()).unwrap_or("batch").to_string();

        let fut = self.inner.call(req);
        let timeout = self.timeout;

        async move {
            match tokio::time::timeout(timeout, fut).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(%method, timeout_ms = timeout.as_millis(), "RPC request timeout");
                    Err(TransportErrorKind::custom_str(&format!(
                        "request timeout: method={method}"
                    )))
                }
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::rpc::json_rpc::{Id, Request, Response, ResponsePayload, SerializedRequest};
    use serde_json::value::RawValue;

    /// Helper function that transforms a closure to an alloy transport service
    fn request_fn<T>(f: T) -> RequestFn<T>
    where
        T: FnMut(RequestPacket) -> TransportFut<'static>,
    {
        RequestFn { f }
    }

    #[derive(Copy, Clone)]
    struct RequestFn<T> {
        f: T,
    }

    impl<T> Service<RequestPacket> for RequestFn<T>
    where
        T: FnMut(RequestPacket) -> TransportFut<'static>,
    {
        type Response = ResponsePacket;
        type Error = TransportError;
        type Future = TransportFut<'static>;

        fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), TransportError>> {
            Ok(()).into()
        }

        fn call(&mut self, req: RequestPacket) -> Self::Future {
            (self.f)(req)
        }
    }

    fn block_number_request() -> RequestPacket {
        let request = Request::new("eth_blockNumber", Id::Number(0), ());
        RequestPacket::from(SerializedRequest::try_from(request).unwrap())
    }

    #[tokio::test]
    async fn passes_through_fast_responses() {
        let transport = request_fn(|_| {
            Box::pin(async move {
                Ok::<_, TransportError>(ResponsePacket::Single(Response {
                    id: Id::Number(0),
                    payload: ResponsePayload::Success(
                        RawValue::from_string("\"0x1\"".to_string()).unwrap(),
                    ),
                }))
            })
        });
        let mut service = TimeoutLayer::new(Duration::from_secs(1)).layer(transport);

        assert!(service.call(block_number_request()).await.is_ok());
    }

    #[tokio::test]
    async fn fails_stalled_requests() {
        let transport = request_fn(|_| Box::pin(std::future::pending()));
        let mut service = TimeoutLayer::new(Duration::from_millis(10)).layer(transport);

        let err = service.call(block_number_request()).await.unwrap_err();
        assert!(err.to_string().contains("request timeout: method=eth_blockNumber"));
    }
}
