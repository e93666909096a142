#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use group_digest::DigestError;
use group_digest::ai::CompletionProvider;
use group_digest::core::config::PluginConfig;
use group_digest::core::models::ActiveGroup;
use group_digest::host::ChatHost;
use group_digest::summary::SummaryAccumulator;
use group_digest::weather::WeatherLookup;

pub enum ProviderBehavior {
    Reply(String),
    Fail,
    Hang,
}

pub struct MockProvider {
    behavior: ProviderBehavior,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl MockProvider {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            behavior: ProviderBehavior::Reply(text.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn with(behavior: ProviderBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(p, _)| p.clone())
            .collect()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, prompt: &str, session_id: &str) -> Result<String, DigestError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), session_id.to_string()));
        match &self.behavior {
            ProviderBehavior::Reply(text) => Ok(text.clone()),
            ProviderBehavior::Fail => Err(DigestError::ProviderError("upstream 503".to_string())),
            ProviderBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok("too late".to_string())
            }
        }
    }
}

pub struct MockWeather {
    pub calls: AtomicUsize,
    reply: String,
}

impl MockWeather {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            reply: reply.to_string(),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherLookup for MockWeather {
    async fn current_weather(&self, _location: &str) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}

pub struct MockHost {
    pub sent: Mutex<Vec<(String, String)>>,
    pub groups: Vec<ActiveGroup>,
    pub fail_sends: bool,
}

impl MockHost {
    pub fn new() -> Arc<Self> {
        Self::with_groups(&[])
    }

    pub fn with_groups(groups: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            groups: groups
                .iter()
                .map(|g| ActiveGroup {
                    group_id: (*g).to_string(),
                    session_id: session_for(g),
                })
                .collect(),
            fail_sends: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            groups: Vec::new(),
            fail_sends: true,
        })
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn send_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatHost for MockHost {
    async fn send(&self, session_id: &str, text: &str) -> Result<(), DigestError> {
        self.sent
            .lock()
            .unwrap()
            .push((session_id.to_string(), text.to_string()));
        if self.fail_sends {
            return Err(DigestError::HostError("connection reset".to_string()));
        }
        Ok(())
    }

    async fn active_groups(&self) -> Result<Vec<ActiveGroup>, DigestError> {
        Ok(self.groups.clone())
    }
}

pub fn session_for(group_id: &str) -> String {
    format!("aiocqhttp:GroupMessage:{group_id}")
}

pub fn config_with_count(message_count: usize) -> PluginConfig {
    PluginConfig {
        message_count,
        ..PluginConfig::default()
    }
}

pub struct Harness {
    pub accumulator: SummaryAccumulator,
    pub provider: Arc<MockProvider>,
    pub weather: Arc<MockWeather>,
    pub host: Arc<MockHost>,
}

pub fn harness(config: PluginConfig, host: Arc<MockHost>) -> Harness {
    let provider = MockProvider::replying("The group planned a hike.");
    let weather = MockWeather::new("Sunny, temperature: 20°C");
    let accumulator = SummaryAccumulator::new(
        config,
        Some(provider.clone() as Arc<dyn CompletionProvider>),
        weather.clone(),
        host.clone(),
    );
    Harness {
        accumulator,
        provider,
        weather,
        host,
    }
}
