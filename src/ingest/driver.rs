use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::{
    core::cache::IdentityCache,
    entity::MessageDraft,
    error::{Error, Result},
    parse::{LineParser, timestamp::TimeZoneMode},
    persist::LogStore,
    types::BufferId,
};

use super::progress::{IngestSummary, Progress, count_lines};

#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Network the log was recorded on.
    pub network: String,
    /// Channel or query the log belongs to.
    pub buffer: String,
    /// How long a write transaction stays open before it is committed.
    pub commit_interval: Duration,
    pub zone: TimeZoneMode,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            network: String::new(),
            buffer: String::new(),
            commit_interval: Duration::from_secs(1),
            zone: TimeZoneMode::Local,
        }
    }
}

/// Converts one text log into `store`.
///
/// Owns the identity cache for the duration of the run; nothing else may write
/// dimension rows to the store meanwhile.
pub struct Ingestor<S: LogStore> {
    store: S,
    cache: IdentityCache,
    config: IngestConfig,
}

impl<S: LogStore> Ingestor<S> {
    /// Loads the identity cache from `store`.
    pub fn new(store: S, config: IngestConfig) -> Result<Self> {
        let cache = IdentityCache::load(&store)?;
        Ok(Self {
            store,
            cache,
            config,
        })
    }

    pub fn cache(&self) -> &IdentityCache {
        &self.cache
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Resolves the configured network and buffer, creating them if needed.
    pub fn target_buffer(&mut self) -> Result<BufferId> {
        let buf = self
            .cache
            .buffer(&mut self.store, &self.config.network, &self.config.buffer)?;
        Ok(buf.id)
    }

    /// Runs without progress reporting.
    pub fn run(&mut self, input: &str) -> Result<IngestSummary> {
        self.run_with_progress(input, |_| {})
    }

    /// Decodes every line of `input` and writes one message per line.
    ///
    /// `on_progress` is called at each batch boundary. A corrupt line stops
    /// the run: lines before it are committed, nothing after it is read.
    pub fn run_with_progress<F>(&mut self, input: &str, mut on_progress: F) -> Result<IngestSummary>
    where
        F: FnMut(Progress),
    {
        let start = Instant::now();
        let total = count_lines(input);
        let created_before = self.cache.created();
        let bufferid = self.target_buffer()?;
        info!(
            network = %self.config.network,
            buffer = %self.config.buffer,
            bufferid,
            total,
            "converting log"
        );

        let mut parser = LineParser::new(input, self.config.zone);
        let mut done = 0u64;
        let mut batch_start = Instant::now();
        self.store.begin()?;

        loop {
            if batch_start.elapsed() >= self.config.commit_interval {
                self.store.commit()?;
                debug!(done, line = parser.line(), "batch committed");
                on_progress(Progress {
                    done,
                    total,
                    elapsed: start.elapsed(),
                });
                batch_start = Instant::now();
                self.store.begin()?;
            }

            let event = match parser.next_event(&mut self.cache, &mut self.store) {
                Ok(Some(event)) => event,
                Ok(None) => break,
                Err(err @ Error::Corrupt { .. }) => {
                    self.store.commit()?;
                    return Err(err);
                }
                Err(err) => return Err(err),
            };

            self.store.insert_message(&MessageDraft {
                timestamp: event.timestamp,
                kind: event.kind,
                bufferid,
                senderid: event.senderid,
                text: event.text,
            })?;
            done += 1;
        }

        self.store.commit()?;
        let elapsed = start.elapsed();
        on_progress(Progress {
            done,
            total,
            elapsed,
        });

        let created = self.cache.created();
        let summary = IngestSummary {
            messages: done,
            lines: total,
            networks_created: created.networks - created_before.networks,
            buffers_created: created.buffers - created_before.buffers,
            senders_created: created.senders - created_before.senders,
            elapsed_ms: elapsed.as_millis() as u64,
        };
        info!(
            messages = summary.messages,
            senders_created = summary.senders_created,
            elapsed_ms = summary.elapsed_ms,
            "conversion finished"
        );
        Ok(summary)
    }
}
