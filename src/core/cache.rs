use tracing::debug;

use crate::{
    entity::{Buffer, Network, Sender, SenderDraft},
    persist::{LogStore, PersistResult},
    types::{BufferId, NetworkId, SenderId},
};

use super::indices::{
    BufferIdIndex, BufferIndex, NetworkIdIndex, NetworkIndex, NickIndex, SenderIdIndex,
    SenderIndex,
};

/// Counts of entities created since the cache was loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreatedCounts {
    pub networks: u64,
    pub buffers: u64,
    pub senders: u64,
}

/// In-memory mirror of the network, buffer and sender tables.
///
/// Lookups go through hash indices keyed by each entity's identity. Every
/// entity the cache hands out exists in the backing store.
#[derive(Debug, Default)]
pub struct IdentityCache {
    networks: Vec<Network>,
    buffers: Vec<Buffer>,
    senders: Vec<Sender>,
    network_by_name: NetworkIndex,
    network_by_id: NetworkIdIndex,
    buffer_by_key: BufferIndex,
    buffer_by_id: BufferIdIndex,
    sender_by_key: SenderIndex,
    sender_by_id: SenderIdIndex,
    senders_by_nick: NickIndex,
    created: CreatedCounts,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the cache with every dimension row already in `store`.
    pub fn load<S: LogStore + ?Sized>(store: &S) -> PersistResult<Self> {
        let mut cache = Self::new();
        for net in store.load_networks()? {
            cache.push_network(net);
        }
        for buf in store.load_buffers()? {
            cache.push_buffer(buf);
        }
        for snd in store.load_senders()? {
            cache.push_sender(snd);
        }
        debug!(
            networks = cache.networks.len(),
            buffers = cache.buffers.len(),
            senders = cache.senders.len(),
            "identity cache loaded"
        );
        Ok(cache)
    }

    /// Get-or-create a network by exact name.
    pub fn network<S: LogStore + ?Sized>(
        &mut self,
        store: &mut S,
        name: &str,
    ) -> PersistResult<&Network> {
        if let Some(&pos) = self.network_by_name.get(name) {
            return Ok(&self.networks[pos]);
        }
        let id = store.insert_network(name)?;
        debug!(id, name, "created network");
        self.created.networks += 1;
        let pos = self.push_network(Network {
            id,
            name: name.to_string(),
        });
        Ok(&self.networks[pos])
    }

    /// Get-or-create a buffer named `name` on network `network`, creating the
    /// network too if it is new.
    pub fn buffer<S: LogStore + ?Sized>(
        &mut self,
        store: &mut S,
        network: &str,
        name: &str,
    ) -> PersistResult<&Buffer> {
        let networkid = self.network(store, network)?.id;
        let key = (networkid, name.to_string());
        if let Some(&pos) = self.buffer_by_key.get(&key) {
            return Ok(&self.buffers[pos]);
        }
        let id = store.insert_buffer(networkid, name)?;
        debug!(id, networkid, name, "created buffer");
        self.created.buffers += 1;
        let pos = self.push_buffer(Buffer {
            id,
            networkid,
            name: key.1,
        });
        Ok(&self.buffers[pos])
    }

    /// Get-or-create a sender by exact `(nick, user, host)` match.
    pub fn sender<S: LogStore + ?Sized>(
        &mut self,
        store: &mut S,
        draft: SenderDraft,
    ) -> PersistResult<&Sender> {
        if let Some(&pos) = self.sender_by_key.get(&draft) {
            return Ok(&self.senders[pos]);
        }
        let pos = self.create_sender(store, draft)?;
        Ok(&self.senders[pos])
    }

    /// Most recently created sender using `nick`, if any.
    pub fn guess_sender_by_nick(&self, nick: &str) -> Option<&Sender> {
        self.senders_by_nick
            .get(nick)
            .and_then(|positions| positions.last())
            .map(|&pos| &self.senders[pos])
    }

    /// Resolves a bare nick to the most recent sender using it, creating a
    /// sender with empty user and host when none exists.
    ///
    /// This cannot tell apart two people who used the same nick at different
    /// times.
    pub fn nick_sender<S: LogStore + ?Sized>(
        &mut self,
        store: &mut S,
        nick: &str,
    ) -> PersistResult<&Sender> {
        let pos = match self.senders_by_nick.get(nick).and_then(|p| p.last()) {
            Some(&pos) => pos,
            None => self.create_sender(store, SenderDraft::nick_only(nick))?,
        };
        Ok(&self.senders[pos])
    }

    pub fn network_by_id(&self, id: NetworkId) -> Option<&Network> {
        self.network_by_id.get(&id).map(|&pos| &self.networks[pos])
    }

    pub fn buffer_by_id(&self, id: BufferId) -> Option<&Buffer> {
        self.buffer_by_id.get(&id).map(|&pos| &self.buffers[pos])
    }

    pub fn sender_by_id(&self, id: SenderId) -> Option<&Sender> {
        self.sender_by_id.get(&id).map(|&pos| &self.senders[pos])
    }

    pub fn networks(&self) -> &[Network] {
        &self.networks
    }

    pub fn buffers(&self) -> &[Buffer] {
        &self.buffers
    }

    pub fn senders(&self) -> &[Sender] {
        &self.senders
    }

    pub fn created(&self) -> CreatedCounts {
        self.created
    }

    fn create_sender<S: LogStore + ?Sized>(
        &mut self,
        store: &mut S,
        draft: SenderDraft,
    ) -> PersistResult<usize> {
        let id = store.insert_sender(&draft)?;
        debug!(id, nick = %draft.nick, user = %draft.user, host = %draft.host, "created sender");
        self.created.senders += 1;
        Ok(self.push_sender(Sender {
            id,
            nick: draft.nick,
            user: draft.user,
            host: draft.host,
        }))
    }

    fn push_network(&mut self, net: Network) -> usize {
        let pos = self.networks.len();
        self.network_by_name.insert(net.name.clone(), pos);
        self.network_by_id.insert(net.id, pos);
        self.networks.push(net);
        pos
    }

    fn push_buffer(&mut self, buf: Buffer) -> usize {
        let pos = self.buffers.len();
        self.buffer_by_key
            .insert((buf.networkid, buf.name.clone()), pos);
        self.buffer_by_id.insert(buf.id, pos);
        self.buffers.push(buf);
        pos
    }

    fn push_sender(&mut self, snd: Sender) -> usize {
        let pos = self.senders.len();
        // Rows loaded from a store that already holds duplicates keep the
        // first occurrence as the exact-match target.
        self.sender_by_key.entry(snd.key()).or_insert(pos);
        self.sender_by_id.insert(snd.id, pos);
        self.senders_by_nick
            .entry(snd.nick.clone())
            .or_default()
            .push(pos);
        self.senders.push(snd);
        pos
    }
}
