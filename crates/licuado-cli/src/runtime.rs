// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use licuado_app::Catalog;
use licuado_catalog::Client;
use licuado_tui::{CatalogSource, InternalEvent};
use std::sync::mpsc::Sender;
use std::thread;

/// Catalog source backed by the HTTP client. Loads run on a background
/// thread so the UI keeps drawing while the three fetches are in flight.
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl CatalogSource for HttpSource {
    fn load_catalog(&mut self) -> Result<Catalog> {
        self.client.fetch_catalog()
    }

    fn spawn_load(&mut self, request_id: u64, tx: Sender<InternalEvent>) -> Result<()> {
        let client = self.client.clone();
        thread::spawn(move || {
            let result = client
                .fetch_catalog()
                .map_err(|error| format!("{error:#}"));
            let _ = tx.send(InternalEvent::LoadFinished { request_id, result });
        });
        Ok(())
    }
}

/// In-memory sample catalog for `--demo`, no network required.
pub struct DemoSource;

impl CatalogSource for DemoSource {
    fn load_catalog(&mut self) -> Result<Catalog> {
        licuado_testkit::sample_catalog()
    }
}
