//! Client-side wizard cache with typed keys and explicit invalidation.
//!
//! Cached slots are addressed by [`CacheKey`] and namespaced per campaign,
//! so clearing one campaign's state cannot touch another's. The string
//! forms of the keys preserve the storage names earlier clients wrote
//! (`campaignDetails`, `artfilesdetails`, ...), keeping the cache readable
//! by anything still inspecting raw storage. Campaign-independent
//! reference data ([`CacheKey::Categories`]) lives in a shared namespace
//! that invalidation leaves alone.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Errors from encoding or decoding cached values.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache serialization error for {key}: {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("cache deserialization error for {key}: {source}")]
    Deserialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// The slots the wizard persists between visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    CampaignDetails,
    Categories,
    Programs,
    ArtFileDetails,
    AgreementDetails,
    PaymentDetails,
}

impl CacheKey {
    /// The legacy storage name for this slot.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CacheKey::CampaignDetails => "campaignDetails",
            CacheKey::Categories => "categories",
            CacheKey::Programs => "programs",
            CacheKey::ArtFileDetails => "artfilesdetails",
            CacheKey::AgreementDetails => "agreementDetails",
            CacheKey::PaymentDetails => "paymentDetails",
        }
    }

    /// Whether the slot belongs to a single campaign. Categories are
    /// reference data shared across campaigns.
    #[must_use]
    pub fn is_campaign_scoped(self) -> bool {
        !matches!(self, CacheKey::Categories)
    }
}

/// Minimal key-value backend the cache runs over. The production frontend
/// binds this to the host environment's storage; tests and the CLI use
/// [`MemoryStorage`].
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
    fn keys(&self) -> Vec<String>;
}

/// In-process [`Storage`] backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_owned(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

/// Typed wizard cache over a [`Storage`] backend.
pub struct WizardCache<S> {
    storage: S,
}

impl<S: Storage> WizardCache<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn storage_key(campaign_id: &Uuid, key: CacheKey) -> String {
        if key.is_campaign_scoped() {
            format!("campaign:{campaign_id}:{}", key.as_str())
        } else {
            format!("shared:{}", key.as_str())
        }
    }

    /// Stores a value in a slot. Campaign-scoped slots land under the
    /// campaign's namespace; shared slots ignore `campaign_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Serialize`] when the value cannot be encoded.
    pub fn put<T: Serialize>(
        &mut self,
        campaign_id: &Uuid,
        key: CacheKey,
        value: &T,
    ) -> Result<(), CacheError> {
        let encoded = serde_json::to_string(value).map_err(|source| CacheError::Serialize {
            key: key.as_str(),
            source,
        })?;
        self.storage.put(&Self::storage_key(campaign_id, key), encoded);
        Ok(())
    }

    /// Reads a slot, `None` when empty.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Deserialize`] when a stored value no longer
    /// decodes as `T` (e.g. the schema moved under an old cache entry).
    pub fn get<T: DeserializeOwned>(
        &self,
        campaign_id: &Uuid,
        key: CacheKey,
    ) -> Result<Option<T>, CacheError> {
        let Some(encoded) = self.storage.get(&Self::storage_key(campaign_id, key)) else {
            return Ok(None);
        };
        serde_json::from_str(&encoded)
            .map(Some)
            .map_err(|source| CacheError::Deserialize {
                key: key.as_str(),
                source,
            })
    }

    /// Removes one slot.
    pub fn remove(&mut self, campaign_id: &Uuid, key: CacheKey) {
        self.storage.remove(&Self::storage_key(campaign_id, key));
    }

    /// Drops every cached slot belonging to `campaign_id`, leaving other
    /// campaigns and shared reference data untouched. Call before
    /// re-entering the wizard for a different campaign so nothing leaks
    /// across. Returns the number of entries removed.
    pub fn invalidate(&mut self, campaign_id: &Uuid) -> usize {
        let prefix = format!("campaign:{campaign_id}:");
        let stale: Vec<String> = self
            .storage
            .keys()
            .into_iter()
            .filter(|k| k.starts_with(&prefix))
            .collect();
        let count = stale.len();
        for key in stale {
            self.storage.remove(&key);
        }
        tracing::debug!(%campaign_id, removed = count, "invalidated campaign cache");
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cache() -> WizardCache<MemoryStorage> {
        WizardCache::new(MemoryStorage::new())
    }

    fn campaign_a() -> Uuid {
        Uuid::from_u128(0xA)
    }

    fn campaign_b() -> Uuid {
        Uuid::from_u128(0xB)
    }

    #[test]
    fn put_get_round_trips_typed_values() {
        let mut cache = make_cache();
        cache
            .put(&campaign_a(), CacheKey::PaymentDetails, &vec![1u64, 2, 3])
            .unwrap();
        let got: Option<Vec<u64>> = cache.get(&campaign_a(), CacheKey::PaymentDetails).unwrap();
        assert_eq!(got, Some(vec![1, 2, 3]));
    }

    #[test]
    fn missing_slot_reads_as_none() {
        let cache = make_cache();
        let got: Option<String> = cache.get(&campaign_a(), CacheKey::AgreementDetails).unwrap();
        assert_eq!(got, None);
    }

    #[test]
    fn campaigns_do_not_share_slots() {
        let mut cache = make_cache();
        cache
            .put(&campaign_a(), CacheKey::CampaignDetails, &"a-data")
            .unwrap();
        let got: Option<String> = cache.get(&campaign_b(), CacheKey::CampaignDetails).unwrap();
        assert_eq!(got, None);
    }

    #[test]
    fn invalidate_removes_only_that_campaign() {
        let mut cache = make_cache();
        cache
            .put(&campaign_a(), CacheKey::CampaignDetails, &"a-data")
            .unwrap();
        cache
            .put(&campaign_a(), CacheKey::Programs, &"a-programs")
            .unwrap();
        cache
            .put(&campaign_b(), CacheKey::CampaignDetails, &"b-data")
            .unwrap();

        assert_eq!(cache.invalidate(&campaign_a()), 2);

        let a: Option<String> = cache.get(&campaign_a(), CacheKey::CampaignDetails).unwrap();
        assert_eq!(a, None);
        let b: Option<String> = cache.get(&campaign_b(), CacheKey::CampaignDetails).unwrap();
        assert_eq!(b, Some("b-data".to_owned()));
    }

    #[test]
    fn shared_categories_survive_invalidation() {
        let mut cache = make_cache();
        cache
            .put(&campaign_a(), CacheKey::Categories, &vec!["grocery"])
            .unwrap();
        cache.invalidate(&campaign_a());
        // Readable under any campaign id: the slot is shared.
        let got: Option<Vec<String>> = cache.get(&campaign_b(), CacheKey::Categories).unwrap();
        assert_eq!(got, Some(vec!["grocery".to_owned()]));
    }

    #[test]
    fn stale_schema_reports_deserialize_error() {
        let mut cache = make_cache();
        cache
            .put(&campaign_a(), CacheKey::CampaignDetails, &"just a string")
            .unwrap();
        let result: Result<Option<Vec<u64>>, _> =
            cache.get(&campaign_a(), CacheKey::CampaignDetails);
        assert!(
            matches!(result, Err(CacheError::Deserialize { key, .. }) if key == "campaignDetails"),
            "expected Deserialize error"
        );
    }

    #[test]
    fn legacy_storage_names_are_preserved() {
        assert_eq!(CacheKey::CampaignDetails.as_str(), "campaignDetails");
        assert_eq!(CacheKey::ArtFileDetails.as_str(), "artfilesdetails");
        assert_eq!(CacheKey::Categories.as_str(), "categories");
    }
}
