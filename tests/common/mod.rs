#![allow(dead_code)]

use snip::application::services::ShortenerService;
use snip::domain::entities::NewMapping;
use snip::domain::repositories::MappingRepository;
use snip::infrastructure::store::InMemoryMappingStore;
use snip::state::AppState;
use snip::utils::code_generator::{CodeGenerator, RandomIdGenerator};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const BASE_URL: &str = "http://localhost:8000";

/// Hands out a fixed list of codes, then repeats the last one.
pub struct SequenceGenerator {
    codes: Mutex<VecDeque<String>>,
    last: String,
}

impl SequenceGenerator {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
            last: codes.last().map(|c| c.to_string()).unwrap_or_default(),
        }
    }
}

impl CodeGenerator for SequenceGenerator {
    fn generate(&self) -> String {
        self.codes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.last.clone())
    }
}

pub fn create_state_with(
    store: Arc<InMemoryMappingStore>,
    generator: Arc<dyn CodeGenerator>,
    max_attempts: usize,
) -> AppState {
    let repository: Arc<dyn MappingRepository> = store;
    let shortener =
        ShortenerService::new(repository, generator, BASE_URL).with_max_attempts(max_attempts);
    AppState::new(Arc::new(shortener))
}

/// State over a fresh in-memory store and the default base58 generator.
pub fn create_test_state() -> (AppState, Arc<InMemoryMappingStore>) {
    let store = Arc::new(InMemoryMappingStore::new());
    let state = create_state_with(store.clone(), Arc::new(RandomIdGenerator::default()), 100);
    (state, store)
}

/// State whose generator yields `codes` in order.
pub fn create_sequenced_state(
    codes: &[&str],
    max_attempts: usize,
) -> (AppState, Arc<InMemoryMappingStore>) {
    let store = Arc::new(InMemoryMappingStore::new());
    let state = create_state_with(
        store.clone(),
        Arc::new(SequenceGenerator::new(codes)),
        max_attempts,
    );
    (state, store)
}

pub async fn create_test_mapping(store: &InMemoryMappingStore, code: &str, url: &str) {
    let reserved = store.reserve(&NewMapping::now(code, url)).await.unwrap();
    assert!(reserved, "code {code} already taken");
}
