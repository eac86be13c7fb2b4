//! Test doubles shared by the catalog unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::{oneshot, watch};

use crate::catalog::{CatalogSource, ProductRecord};
use crate::error::{CatalogError, Result};

pub fn sample_products() -> Vec<ProductRecord> {
    vec![
        ProductRecord::new("1", "Phone", "Electronics", 599.0),
        ProductRecord::new("2", "Shirt", "Apparel", 19.0),
        ProductRecord::new("3", "Camera", "Electronics", 899.0),
    ]
}

/// Scriptable catalog source that counts calls and can be held open.
pub struct StubSource {
    products: Mutex<Vec<ProductRecord>>,
    failure: Mutex<Option<CatalogError>>,
    calls: AtomicUsize,
    held: watch::Sender<bool>,
}

impl StubSource {
    pub fn with_sample() -> Self {
        Self {
            products: Mutex::new(sample_products()),
            failure: Mutex::new(None),
            calls: AtomicUsize::new(0),
            held: watch::Sender::new(false),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_products(&self, products: Vec<ProductRecord>) {
        *self.products.lock().unwrap() = products;
    }

    pub fn fail_with(&self, error: CatalogError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    /// Blocks subsequent fetches until `release`.
    pub fn hold(&self) {
        self.held.send_replace(true);
    }

    pub fn release(&self) {
        self.held.send_replace(false);
    }

    pub async fn wait_for_calls(&self, n: usize) {
        while self.calls() < n {
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        }
    }
}

#[async_trait]
impl CatalogSource for StubSource {
    async fn fetch_product_list(&self) -> Result<Vec<ProductRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut held = self.held.subscribe();
        let _ = held.wait_for(|h| !*h).await;

        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(self.products.lock().unwrap().clone())
    }
}

/// Source that answers each call with the next queued response.
pub struct ScriptedSource {
    steps: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
}

struct Step {
    gate: Option<oneshot::Receiver<()>>,
    result: Result<Vec<ProductRecord>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            steps: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn push(&self, result: Result<Vec<ProductRecord>>) {
        self.steps.lock().unwrap().push_back(Step { gate: None, result });
    }

    /// Queues a response that is only delivered once the returned sender fires.
    pub fn push_held(&self, result: Result<Vec<ProductRecord>>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.steps.lock().unwrap().push_back(Step {
            gate: Some(rx),
            result,
        });
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn wait_for_calls(&self, n: usize) {
        while self.calls() < n {
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        }
    }
}

#[async_trait]
impl CatalogSource for ScriptedSource {
    async fn fetch_product_list(&self) -> Result<Vec<ProductRecord>> {
        let step = self.steps.lock().unwrap().pop_front();
        self.calls.fetch_add(1, Ordering::SeqCst);

        match step {
            Some(Step { gate, result }) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                result
            }
            None => Err(CatalogError::ServerFailure("no scripted response".into())),
        }
    }
}
