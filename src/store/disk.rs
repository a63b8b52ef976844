use crate::core::model::{Expense, FinancialSnapshot, Recipient, Transaction};
use crate::core::store::SnapshotStore;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use fjall::{Batch, Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::collections::HashSet;
use std::path::Path;
use std::sync::RwLock;
use tracing::{debug, instrument};

const PROFILE_KEY: &str = "user_data";

#[derive(Serialize, Deserialize)]
struct StoredRecord<V> {
    position: usize,
    record: V,
}

#[derive(Serialize, Deserialize)]
struct Profile {
    user_name: String,
    balance: Decimal,
}

/// Snapshot store backed by a fjall keyspace.
///
/// Each collection lives in its own partition keyed by record id, and the user
/// profile is a single record in `profile`. Saves replace every partition in
/// one write batch.
pub struct DiskStore {
    keyspace: Keyspace,
    expenses: PartitionHandle,
    recipients: PartitionHandle,
    transactions: PartitionHandle,
    profile: PartitionHandle,
    // Readers never interleave with a half-applied save.
    guard: RwLock<()>,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create store directory: {}", path.display()))?;

        let keyspace = Config::new(path.join("fjall_db"))
            .open()
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        let open = |name: &str| {
            keyspace
                .open_partition(name, PartitionCreateOptions::default())
                .with_context(|| format!("Failed to open partition: {name}"))
        };

        Ok(Self {
            expenses: open("expenses")?,
            recipients: open("recipients")?,
            transactions: open("transactions")?,
            profile: open("profile")?,
            keyspace,
            guard: RwLock::new(()),
        })
    }

    fn load(&self) -> Result<Option<FinancialSnapshot>> {
        let _read = self
            .guard
            .read()
            .map_err(|_| anyhow!("Store lock poisoned"))?;

        let Some(raw) = self.profile.get(PROFILE_KEY)? else {
            return Ok(None);
        };
        let profile: Profile = serde_json::from_slice(&raw)?;

        Ok(Some(FinancialSnapshot {
            user_name: profile.user_name,
            balance: profile.balance,
            expenses: read_collection::<Expense>(&self.expenses)?,
            recipients: read_collection::<Recipient>(&self.recipients)?,
            recent_transactions: read_collection::<Transaction>(&self.transactions)?,
        }))
    }
}

fn read_collection<V: DeserializeOwned>(partition: &PartitionHandle) -> Result<Vec<V>> {
    let mut records = partition
        .iter()
        .map(|item| {
            let (_, value) = item?;
            Ok(serde_json::from_slice::<StoredRecord<V>>(&value)?)
        })
        .collect::<Result<Vec<_>>>()?;
    records.sort_by_key(|r| r.position);
    Ok(records.into_iter().map(|r| r.record).collect())
}

/// Queues the new records and the removal of every stale key in `partition`.
///
/// Keys that are rewritten are not removed first: all items of a batch share
/// one sequence number, so a remove and an insert of the same key would race.
fn replace_collection<V: Serialize>(
    batch: &mut Batch,
    partition: &PartitionHandle,
    records: &[V],
    id_of: impl Fn(&V) -> &str,
) -> Result<()> {
    let fresh: HashSet<&str> = records.iter().map(&id_of).collect();
    for key in partition.keys() {
        let key = key?;
        if !fresh.contains(std::str::from_utf8(&key).unwrap_or_default()) {
            batch.remove(partition, key);
        }
    }
    for (position, record) in records.iter().enumerate() {
        let value = serde_json::to_vec(&StoredRecord { position, record })?;
        batch.insert(partition, id_of(record), value);
    }
    Ok(())
}

#[async_trait]
impl SnapshotStore for DiskStore {
    #[instrument(name = "DiskStoreRead", skip(self))]
    async fn read(&self) -> Option<FinancialSnapshot> {
        match self.load() {
            Ok(Some(snapshot)) => {
                debug!("Store HIT");
                Some(snapshot)
            }
            Ok(None) => {
                debug!("Store MISS");
                None
            }
            Err(e) => {
                debug!("DiskStore read error: {:#}", e);
                None
            }
        }
    }

    #[instrument(name = "DiskStoreWrite", skip_all)]
    async fn write(&self, snapshot: &FinancialSnapshot) -> Result<()> {
        let _write = self
            .guard
            .write()
            .map_err(|_| anyhow!("Store lock poisoned"))?;

        let mut batch = self.keyspace.batch();
        let profile = Profile {
            user_name: snapshot.user_name.clone(),
            balance: snapshot.balance,
        };
        batch.insert(&self.profile, PROFILE_KEY, serde_json::to_vec(&profile)?);
        replace_collection(&mut batch, &self.expenses, &snapshot.expenses, |e| &e.id)?;
        replace_collection(&mut batch, &self.recipients, &snapshot.recipients, |r| {
            &r.id
        })?;
        replace_collection(
            &mut batch,
            &self.transactions,
            &snapshot.recent_transactions,
            |t| &t.id,
        )?;
        batch.commit().context("Failed to commit snapshot")?;
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to persist snapshot")?;

        debug!(
            expenses = snapshot.expenses.len(),
            recipients = snapshot.recipients.len(),
            transactions = snapshot.recent_transactions.len(),
            "Store PUT"
        );
        Ok(())
    }
}
