use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use produce_analyzer::client::backend::AnalysisBackend;
use produce_analyzer::client::client::AnalysisClient;
use produce_analyzer::client::client_model::{
    AnalysisError, AnalysisOutcome, AnalysisResult, PriceInfo,
};
use produce_analyzer::client::error::ClientError;
use produce_analyzer::source::source_model::AnalysisRequest;

/// What the fake service answers to an analyze call.
#[derive(Debug, Clone)]
pub enum Reply {
    Result(AnalysisResult),
    Rejected(String),
    Status(u16),
    Garbled,
}

/// What the fake service answers to a price lookup.
#[derive(Debug, Clone)]
pub enum PriceReply {
    Found(PriceInfo),
    NotListed,
    Status(u16),
}

#[derive(Debug, Default)]
pub struct Calls {
    pub analyze: AtomicUsize,
    pub price: AtomicUsize,
}

impl Calls {
    pub fn analyze(&self) -> usize {
        self.analyze.load(Ordering::SeqCst)
    }

    pub fn price(&self) -> usize {
        self.price.load(Ordering::SeqCst)
    }
}

/// In-memory `AnalysisBackend` with a fixed script and optional latency.
pub struct ScriptedBackend {
    reply: Reply,
    price: PriceReply,
    latency: Duration,
    calls: Arc<Calls>,
}

impl ScriptedBackend {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            price: PriceReply::Status(404),
            latency: Duration::ZERO,
            calls: Arc::new(Calls::default()),
        }
    }

    pub fn with_price(mut self, price: PriceReply) -> Self {
        self.price = price;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Arc<Calls> {
        Arc::clone(&self.calls)
    }

    pub fn into_client(self) -> (AnalysisClient, Arc<Calls>) {
        let calls = self.calls();
        (AnalysisClient::new(Box::new(self)), calls)
    }
}

#[async_trait]
impl AnalysisBackend for ScriptedBackend {
    async fn analyze(&self, _request: &AnalysisRequest) -> Result<AnalysisOutcome, ClientError> {
        self.calls.analyze.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match &self.reply {
            Reply::Result(result) => Ok(AnalysisOutcome::Success(result.clone())),
            Reply::Rejected(message) => Ok(AnalysisOutcome::Failure(AnalysisError::new(message))),
            Reply::Status(status) => Err(ClientError::Status {
                endpoint: "scripted/analyze".into(),
                status: *status,
            }),
            Reply::Garbled => Err(ClientError::Decode {
                endpoint: "scripted/analyze".into(),
                message: "expected value at line 1 column 1".into(),
            }),
        }
    }

    async fn price(&self, _product_name: &str) -> Result<PriceInfo, ClientError> {
        self.calls.price.fetch_add(1, Ordering::SeqCst);

        match &self.price {
            PriceReply::Found(info) => Ok(info.clone()),
            PriceReply::NotListed => Ok(PriceInfo {
                price: "N/A".into(),
                quantity: "N/A".into(),
            }),
            PriceReply::Status(status) => Err(ClientError::Status {
                endpoint: "scripted/price".into(),
                status: *status,
            }),
        }
    }
}
