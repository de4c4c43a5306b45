use reeltv::config::PlaybackConfig;
use reeltv::data::{Catalog, LaunchContext, RowResolver};
use reeltv::player::{AutoplayController, AutoplayEvent, AutoplayHandle, PlaybackSession};
use reeltv::storage::Stores;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use super::mocks::FakeHost;

/// A session over a fake host with a running autoplay controller.
///
/// Must be created inside a tokio runtime.
pub struct Harness {
    pub session: PlaybackSession<FakeHost>,
    pub host: FakeHost,
    pub autoplay: AutoplayHandle,
    pub events: mpsc::UnboundedReceiver<AutoplayEvent>,
    pub stores: Stores,
    pub catalog: Arc<Catalog>,
}

impl Harness {
    pub fn new(catalog: Arc<Catalog>, stores: Stores, launch: LaunchContext) -> Self {
        let (autoplay, controller, events) = AutoplayController::new(Duration::from_millis(250));
        tokio::spawn(controller.run());

        let host = FakeHost::new();
        let session = PlaybackSession::new(
            host.clone(),
            catalog.clone(),
            stores.clone(),
            autoplay.clone(),
            PlaybackConfig::default(),
            launch,
        );

        Self {
            session,
            host,
            autoplay,
            events,
            stores,
            catalog,
        }
    }

    /// Session launched from `index` of the home row keyed `row_key`, over the built-in catalog
    pub fn from_home_row(row_key: &str, index: usize) -> Self {
        let catalog = Catalog::builtin();
        let stores = Stores::in_memory();
        let launch = launch_from_home_row(&catalog, &stores, row_key, index);
        Self::new(catalog, stores, launch)
    }

    /// Deliver every autoplay event produced so far, including those caused by handling them
    pub async fn pump(&mut self) {
        loop {
            // round-trip to the controller so queued commands are applied first
            self.autoplay.is_active().await.unwrap();
            let mut delivered = false;
            while let Ok(event) = self.events.try_recv() {
                self.session.handle_autoplay_event(event).await.unwrap();
                delivered = true;
            }
            if !delivered {
                break;
            }
        }
    }

    pub async fn is_autoplay_active(&self) -> bool {
        self.autoplay.is_active().await.unwrap()
    }
}

pub fn launch_from_home_row(
    catalog: &Catalog,
    stores: &Stores,
    row_key: &str,
    index: usize,
) -> LaunchContext {
    let resolver = RowResolver::new(catalog, &stores.favorites, &stores.progress);
    let rows = resolver.home_rows();
    let row = rows
        .iter()
        .find(|row| row.key.as_str() == row_key)
        .expect("home row exists");
    resolver.launch_from_row(row, index).expect("index inside row")
}
