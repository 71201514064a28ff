use hashbrown::HashMap;

use crate::{
    entity::SenderDraft,
    types::{BufferId, NetworkId, SenderId},
};

/// Row position inside the cache's insertion-ordered entity list.
pub type Pos = usize;

pub type NetworkIndex = HashMap<String, Pos>;
pub type BufferIndex = HashMap<(NetworkId, String), Pos>;
pub type SenderIndex = HashMap<SenderDraft, Pos>;
/// Nick to matching sender positions, most recently created last.
pub type NickIndex = HashMap<String, Vec<Pos>>;
pub type IdIndex<K> = HashMap<K, Pos>;

pub type NetworkIdIndex = IdIndex<NetworkId>;
pub type BufferIdIndex = IdIndex<BufferId>;
pub type SenderIdIndex = IdIndex<SenderId>;
