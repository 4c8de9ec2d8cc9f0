use std::{collections::BTreeMap, path::Path, sync::Arc};

use async_trait::async_trait;
use models::{seed, Character, CharacterInput};
use tokio::{fs, sync::RwLock};
use tracing::{info, warn};

use super::repository::CharacterRepository;
use crate::errors::ServiceError;

/// 映射与 id 计数器放在同一把锁下，保证“分配 id + 插入”原子完成
struct Registry {
    characters: BTreeMap<i64, Character>,
    next_id: i64,
}

/// In-memory character registry seeded once at startup.
///
/// Ids come from a counter that starts above the largest seeded id and only
/// moves forward, so a deleted id is never handed out again.
pub struct CharacterStore {
    inner: RwLock<Registry>,
}

impl CharacterStore {
    /// Build a store from already-parsed characters. Later duplicates win.
    pub fn from_characters<I>(characters: I) -> Arc<Self>
    where
        I: IntoIterator<Item = Character>,
    {
        let mut map = BTreeMap::new();
        for c in characters {
            if let Some(prev) = map.insert(c.id, c) {
                warn!(id = prev.id, name = %prev.name, "duplicate seed id; keeping the later record");
            }
        }
        let next_id = map.keys().next_back().map_or(1, |max| max.saturating_add(1));
        Arc::new(Self { inner: RwLock::new(Registry { characters: map, next_id }) })
    }

    /// Read and parse the seed file at `path`.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .await
            .map_err(|e| ServiceError::Io(format!("cannot read {}: {e}", path.display())))?;
        let characters = seed::parse_seed(&bytes)?;
        let store = Self::from_characters(characters);
        info!(
            path = %path.display(),
            count = store.len().await,
            next_id = store.next_id().await,
            "character seed loaded"
        );
        Ok(store)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.characters.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.characters.is_empty()
    }

    /// The id the next successful create will receive.
    pub async fn next_id(&self) -> i64 {
        self.inner.read().await.next_id
    }

    pub async fn list(&self) -> Vec<Character> {
        let reg = self.inner.read().await;
        reg.characters.values().cloned().collect()
    }

    pub async fn get(&self, id: i64) -> Result<Character, ServiceError> {
        let reg = self.inner.read().await;
        reg.characters.get(&id).cloned().ok_or(ServiceError::NotFound(id))
    }

    pub async fn create(&self, input: CharacterInput) -> Result<Character, ServiceError> {
        input.validate()?;
        let mut reg = self.inner.write().await;
        let id = reg.next_id;
        // 计数器无法再前进时拒绝分配，避免重复 id
        reg.next_id = id.checked_add(1).ok_or(ServiceError::IdsExhausted)?;
        let character = input.into_character(id);
        reg.characters.insert(id, character.clone());
        drop(reg);
        info!(event = "character_created", id, name = %character.name, "character created");
        Ok(character)
    }

    pub async fn update(&self, id: i64, input: CharacterInput) -> Result<Character, ServiceError> {
        let mut reg = self.inner.write().await;
        let existing = reg.characters.get_mut(&id).ok_or(ServiceError::NotFound(id))?;
        input.validate()?;
        *existing = input.into_character(id);
        let updated = existing.clone();
        drop(reg);
        info!(event = "character_updated", id, name = %updated.name, "character updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let mut reg = self.inner.write().await;
        let removed = reg.characters.remove(&id).ok_or(ServiceError::NotFound(id))?;
        drop(reg);
        info!(event = "character_deleted", id, name = %removed.name, "character deleted");
        Ok(())
    }
}

#[async_trait]
impl CharacterRepository for CharacterStore {
    async fn list(&self) -> Vec<Character> { self.list().await }
    async fn get(&self, id: i64) -> Result<Character, ServiceError> { self.get(id).await }
    async fn create(&self, input: CharacterInput) -> Result<Character, ServiceError> { self.create(input).await }
    async fn update(&self, id: i64, input: CharacterInput) -> Result<Character, ServiceError> { self.update(id, input).await }
    async fn delete(&self, id: i64) -> Result<(), ServiceError> { self.delete(id).await }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spider_man() -> Character {
        Character { id: 1, name: "Spider-Man".into(), year: Some(1962), appearances: Some(4000) }
    }

    fn iron_man() -> CharacterInput {
        CharacterInput::new("Iron Man", Some(1963), Some(3000))
    }

    #[tokio::test]
    async fn seeded_store_starts_after_max_id() {
        let store = CharacterStore::from_characters(vec![
            Character { id: 40, name: "B".into(), year: None, appearances: None },
            Character { id: 7, name: "A".into(), year: None, appearances: None },
        ]);
        assert_eq!(store.len().await, 2);
        assert_eq!(store.next_id().await, 41);
        let ids: Vec<i64> = store.list().await.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![7, 40]);
    }

    #[tokio::test]
    async fn empty_seed_starts_at_one() {
        let store = CharacterStore::from_characters(Vec::new());
        assert!(store.is_empty().await);
        let created = store.create(iron_man()).await.expect("create ok");
        assert_eq!(created.id, 1);
    }

    #[tokio::test]
    async fn duplicate_seed_ids_keep_last() {
        let mut dup = spider_man();
        dup.name = "Spider-Man 2099".into();
        let store = CharacterStore::from_characters(vec![spider_man(), dup]);
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get(1).await.expect("found").name, "Spider-Man 2099");
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let store = CharacterStore::from_characters(vec![spider_man()]);

        // create
        let created = store.create(iron_man()).await.expect("create ok");
        assert_eq!(created, Character { id: 2, name: "Iron Man".into(), year: Some(1963), appearances: Some(3000) });
        assert_eq!(store.get(2).await.expect("found"), created);

        // update 为整体替换：未提供的可选字段变为 None
        let updated = store
            .update(2, CharacterInput::new("Tony Stark", None, None))
            .await
            .expect("update ok");
        assert_eq!(updated, Character { id: 2, name: "Tony Stark".into(), year: None, appearances: None });

        // delete
        store.delete(1).await.expect("delete ok");
        assert!(matches!(store.get(1).await, Err(ServiceError::NotFound(1))));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let store = CharacterStore::from_characters(vec![spider_man()]);
        assert!(matches!(store.get(3).await, Err(ServiceError::NotFound(3))));
        assert!(matches!(store.update(3, iron_man()).await, Err(ServiceError::NotFound(3))));
        assert!(matches!(store.delete(3).await, Err(ServiceError::NotFound(3))));
    }

    #[tokio::test]
    async fn invalid_create_does_not_mutate() {
        let store = CharacterStore::from_characters(vec![spider_man()]);
        let bad = CharacterInput::new("Old Timer", Some(1899), None);
        assert!(matches!(store.create(bad).await, Err(ServiceError::Validation(_))));
        assert_eq!(store.len().await, 1);
        assert_eq!(store.next_id().await, 2);
    }

    #[tokio::test]
    async fn invalid_update_keeps_record() {
        let store = CharacterStore::from_characters(vec![spider_man()]);
        let bad = CharacterInput::new("", Some(1962), None);
        assert!(matches!(store.update(1, bad).await, Err(ServiceError::Validation(_))));
        assert_eq!(store.get(1).await.expect("found"), spider_man());
    }

    #[tokio::test]
    async fn deleted_ids_are_never_reused() {
        let store = CharacterStore::from_characters(vec![spider_man()]);
        let a = store.create(iron_man()).await.expect("create");
        store.delete(a.id).await.expect("delete");
        let b = store.create(iron_man()).await.expect("create");
        assert!(b.id > a.id);
        assert_eq!(store.next_id().await, b.id + 1);
    }

    #[tokio::test]
    async fn id_space_exhaustion_is_an_error() {
        let store = CharacterStore::from_characters(vec![Character {
            id: i64::MAX,
            name: "Last".into(),
            year: None,
            appearances: None,
        }]);
        assert!(matches!(store.create(iron_man()).await, Err(ServiceError::IdsExhausted)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_creates_get_distinct_ids() {
        let store = CharacterStore::from_characters(vec![spider_man()]);
        let mut handles = Vec::new();
        for _ in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move { store.create(iron_man()).await }));
        }
        let mut ids = Vec::new();
        for h in handles {
            ids.push(h.await.expect("join").expect("create").id);
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 32);
        assert_eq!(store.len().await, 33);
    }

    #[tokio::test]
    async fn load_reads_seed_file() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("marvel_seed_{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(
            &tmp,
            br#"[{"page_id": "1678", "name": "Spider-Man", "Year": "1962", "APPEARANCES": "4043"},
                {"page_id": "7139", "name": "Captain America", "Year": "", "APPEARANCES": ""}]"#,
        )
        .await?;

        let store = CharacterStore::load(&tmp).await?;
        assert_eq!(store.len().await, 2);
        assert_eq!(store.next_id().await, 7140);
        assert_eq!(store.get(7139).await?.year, None);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn load_missing_file_is_io_error() {
        let missing = std::env::temp_dir().join(format!("missing_{}.json", uuid::Uuid::new_v4()));
        assert!(matches!(CharacterStore::load(&missing).await, Err(ServiceError::Io(_))));
    }
}
