#![allow(dead_code)]

use async_trait::async_trait;
use food_cart::app::ports::{
    ConfirmationPort, ConfirmationRequest, KeyValueStorePort, Notice, NoticePort,
};
use food_cart::config::{StorageBackend, StorageConfig};
use food_cart::infra::kv_memory_adapter::InMemoryKeyValueStore;
use food_cart::infra::{CartRepository, LocalCartDataSource};
use food_cart::{CartError, CartUseCases, MenuItem, RestaurantInfo, Result};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub const KEY: &str = "@food_delivery_cart";

pub fn som_tam() -> MenuItem {
    MenuItem::new("m1", "Som Tam", 45.0)
}

pub fn pad_thai() -> MenuItem {
    MenuItem::new("m3", "Pad Thai", 60.0)
}

pub fn salmon_roll() -> MenuItem {
    MenuItem::new("m2", "Salmon Roll", 120.0)
}

pub fn baan_thai() -> RestaurantInfo {
    RestaurantInfo::new("R1", "Baan Thai", 15.0)
}

pub fn sushi_ya() -> RestaurantInfo {
    RestaurantInfo::new("R2", "Sushi Ya", 25.0)
}

pub fn storage_config(backend: StorageBackend, root: &Path) -> StorageConfig {
    StorageConfig {
        backend,
        data_root: root.to_path_buf(),
        ..StorageConfig::default()
    }
}

pub fn use_cases_over(store: Arc<dyn KeyValueStorePort>) -> CartUseCases {
    let data_source = LocalCartDataSource::new(store, KEY);
    CartUseCases::new(Arc::new(CartRepository::new(data_source)))
}

/// Memory store whose writes can be switched off
#[derive(Default)]
pub struct FlakyStore {
    inner: InMemoryKeyValueStore,
    pub fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn break_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStorePort for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CartError::storage("quota exceeded"));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CartError::storage("quota exceeded"));
        }
        self.inner.remove(key).await
    }
}

#[derive(Default)]
pub struct ScriptedConfirmation {
    answers: Mutex<VecDeque<bool>>,
    pub asked: Mutex<Vec<ConfirmationRequest>>,
}

impl ScriptedConfirmation {
    pub fn answering(answers: &[bool]) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            asked: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ConfirmationPort for ScriptedConfirmation {
    async fn confirm(&self, request: &ConfirmationRequest) -> bool {
        self.asked.lock().unwrap().push(request.clone());
        self.answers.lock().unwrap().pop_front().unwrap_or(false)
    }
}

#[derive(Default)]
pub struct RecordingNotices {
    pub shown: Mutex<Vec<Notice>>,
}

impl NoticePort for RecordingNotices {
    fn show(&self, notice: Notice) {
        self.shown.lock().unwrap().push(notice);
    }
}
