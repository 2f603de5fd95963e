use std::path::{Path, PathBuf};

use axum::body::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

/// One synthesized narration
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub id: Uuid,
    pub audio: Bytes,
    pub created_at: DateTime<Utc>,
}

/// Synthesized clips keyed by the request that produced them.
///
/// `latest` backs the id-less `/get_audio` route. When a hand-off file is
/// configured the newest clip is also written there, overwriting the last one.
pub struct AudioStore {
    clips: DashMap<Uuid, AudioClip>,
    latest: RwLock<Option<Uuid>>,
    capacity: usize,
    hand_off_file: Option<PathBuf>,
}

impl AudioStore {
    pub fn new(capacity: usize, hand_off_file: Option<PathBuf>) -> Self {
        Self {
            clips: DashMap::new(),
            latest: RwLock::new(None),
            capacity: capacity.max(1),
            hand_off_file,
        }
    }

    pub async fn insert(&self, audio: Vec<u8>) -> Uuid {
        let clip = AudioClip {
            id: Uuid::new_v4(),
            audio: Bytes::from(audio),
            created_at: Utc::now(),
        };
        let id = clip.id;

        // Held until eviction is done so `latest` always names a stored clip.
        let mut latest = self.latest.write().await;

        if let Some(path) = &self.hand_off_file {
            if let Err(e) = write_hand_off(path, &clip.audio).await {
                warn!("Failed to write hand-off audio {}: {}", path.display(), e);
            }
        }

        self.clips.insert(id, clip);
        *latest = Some(id);
        self.evict_oldest(id);
        drop(latest);
        debug!("Stored audio clip {} ({} held)", id, self.clips.len());
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<AudioClip> {
        self.clips.get(id).map(|entry| entry.value().clone())
    }

    pub async fn latest(&self) -> Option<AudioClip> {
        let id = (*self.latest.read().await)?;
        self.get(&id)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    fn evict_oldest(&self, keep: Uuid) {
        while self.clips.len() > self.capacity {
            let oldest = self
                .clips
                .iter()
                .filter(|entry| *entry.key() != keep)
                .min_by_key(|entry| entry.value().created_at)
                .map(|entry| *entry.key());
            match oldest {
                Some(id) => {
                    self.clips.remove(&id);
                    debug!("Evicted audio clip {}", id);
                }
                None => break,
            }
        }
    }
}

async fn write_hand_off(path: &Path, audio: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, audio).await
}
