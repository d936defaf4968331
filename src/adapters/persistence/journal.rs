//! Journaled Point Ledger - Append-only JSONL Events
//!
//! Persists every ledger mutation to daily JSONL files in the format
//! `points/YYYY-MM-DD.jsonl`. Each line is a self-contained JSON event
//! (credit, claim commit, or claim park/unpark), making the ledger
//! recoverable by replay after a restart. In-memory state is the
//! authoritative live view; the journal is its write-ahead record.
//!
//! Claim markers are journaled too: a restart must not forget that a
//! transfer with unknown outcome may already be on chain.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::domain::player::{PlayerAddress, PointCategory};
use crate::domain::points::{PendingClaim, PointBalance};
use crate::ports::ledger::PointsLedger;

/// A single journaled ledger mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LedgerEvent {
    /// Event timestamp (Unix ms).
    timestamp_ms: u64,
    /// Player the event applies to.
    player: PlayerAddress,
    /// What happened.
    #[serde(flatten)]
    kind: LedgerEventKind,
}

/// Event payload, tagged by `event`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum LedgerEventKind {
    /// Points credited to a category.
    Credit {
        category: PointCategory,
        amount: u64,
    },
    /// Claimed category reset to zero after a confirmed transfer.
    ClaimCommit { category: PointCategory },
    /// A claim went Uncertain; its marker blocks further claims.
    ClaimParked {
        request_id: String,
        category: PointCategory,
        units: u64,
        reason: String,
    },
    /// The marker was cleared after out-of-band reconciliation.
    ClaimUnparked,
}

/// JSONL-journaled ledger with replay-on-start.
pub struct JournalLedger {
    /// Directory holding the daily journal files.
    journal_dir: PathBuf,
    /// Live balances, rebuilt from the journal at startup.
    accounts: RwLock<HashMap<PlayerAddress, PointBalance>>,
    /// Unresolved claim markers, rebuilt from the journal at startup.
    parked: RwLock<HashMap<PlayerAddress, PendingClaim>>,
}

impl JournalLedger {
    /// Open (or create) the journal under `data_dir` and replay it.
    #[instrument(skip_all, fields(data_dir))]
    pub async fn open(data_dir: &str) -> Result<Self> {
        let journal_dir = Path::new(data_dir).join("points");
        fs::create_dir_all(&journal_dir)
            .await
            .context("Failed to create points journal directory")?;

        let (accounts, parked) = replay(&journal_dir).await?;
        if !parked.is_empty() {
            warn!(
                players = parked.len(),
                "Unresolved claim markers replayed; those players cannot claim until reconciled"
            );
        }
        info!(
            players = accounts.len(),
            dir = %journal_dir.display(),
            "Point journal replayed"
        );

        Ok(Self {
            journal_dir,
            accounts: RwLock::new(accounts),
            parked: RwLock::new(parked),
        })
    }

    /// Append one event to today's journal file.
    async fn append(&self, event: &LedgerEvent) -> Result<()> {
        let date = Utc::now().format("%Y-%m-%d").to_string();
        let path = self.journal_dir.join(format!("{date}.jsonl"));

        let mut json =
            serde_json::to_string(event).context("Failed to serialize ledger event")?;
        json.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .context("Failed to open points journal file")?;

        file.write_all(json.as_bytes())
            .await
            .context("Failed to write ledger event")?;
        file.flush().await.context("Failed to flush points journal")?;

        Ok(())
    }
}

/// Rebuild balances and claim markers by replaying every journal file in
/// name order (daily file names sort chronologically). Malformed lines
/// are skipped with a warning rather than poisoning the whole replay.
async fn replay(
    journal_dir: &Path,
) -> Result<(
    HashMap<PlayerAddress, PointBalance>,
    HashMap<PlayerAddress, PendingClaim>,
)> {
    let mut paths = Vec::new();
    let mut entries = fs::read_dir(journal_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "jsonl") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut accounts: HashMap<PlayerAddress, PointBalance> = HashMap::new();
    let mut parked: HashMap<PlayerAddress, PendingClaim> = HashMap::new();
    for path in paths {
        let content = fs::read_to_string(&path).await?;
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<LedgerEvent>(line) {
                Ok(event) => match event.kind {
                    LedgerEventKind::Credit { category, amount } => {
                        let entry = accounts.entry(event.player).or_default();
                        *entry = entry.credited(category, amount);
                    }
                    LedgerEventKind::ClaimCommit { category } => {
                        let entry = accounts.entry(event.player).or_default();
                        *entry = entry.cleared(category);
                    }
                    LedgerEventKind::ClaimParked {
                        request_id,
                        category,
                        units,
                        reason,
                    } => {
                        let at = DateTime::from_timestamp_millis(
                            i64::try_from(event.timestamp_ms).unwrap_or(0),
                        )
                        .unwrap_or(DateTime::UNIX_EPOCH);
                        parked.insert(
                            event.player,
                            PendingClaim {
                                request_id,
                                category,
                                units,
                                reason,
                                at,
                            },
                        );
                    }
                    LedgerEventKind::ClaimUnparked => {
                        parked.remove(&event.player);
                    }
                },
                Err(e) => {
                    warn!(
                        file = %path.display(),
                        error = %e,
                        "Skipping malformed ledger event"
                    );
                }
            }
        }
    }

    Ok((accounts, parked))
}

fn now_ms() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

#[async_trait]
impl PointsLedger for JournalLedger {
    async fn add_points(
        &self,
        player: &PlayerAddress,
        category: PointCategory,
        amount: u64,
    ) -> anyhow::Result<PointBalance> {
        // Journal first, then mutate: a crash between the two replays to
        // the credited state, never to a lost credit.
        self.append(&LedgerEvent {
            timestamp_ms: now_ms(),
            player: player.clone(),
            kind: LedgerEventKind::Credit { category, amount },
        })
        .await?;

        let mut accounts = self.accounts.write().await;
        let entry = accounts.entry(player.clone()).or_default();
        *entry = entry.credited(category, amount);
        Ok(*entry)
    }

    async fn get_points(&self, player: &PlayerAddress) -> anyhow::Result<PointBalance> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(player).copied().unwrap_or(PointBalance::ZERO))
    }

    async fn commit_claim(
        &self,
        player: &PlayerAddress,
        category: PointCategory,
    ) -> anyhow::Result<()> {
        self.append(&LedgerEvent {
            timestamp_ms: now_ms(),
            player: player.clone(),
            kind: LedgerEventKind::ClaimCommit { category },
        })
        .await?;

        let mut accounts = self.accounts.write().await;
        if let Some(entry) = accounts.get_mut(player) {
            *entry = entry.cleared(category);
        }
        Ok(())
    }

    async fn park_claim(
        &self,
        player: &PlayerAddress,
        claim: &PendingClaim,
    ) -> anyhow::Result<()> {
        let append = self
            .append(&LedgerEvent {
                timestamp_ms: u64::try_from(claim.at.timestamp_millis()).unwrap_or(0),
                player: player.clone(),
                kind: LedgerEventKind::ClaimParked {
                    request_id: claim.request_id.clone(),
                    category: claim.category,
                    units: claim.units,
                    reason: claim.reason.clone(),
                },
            })
            .await;

        // The marker goes into memory even when the journal write fails:
        // in-process double-claim protection must not depend on the disk.
        self.parked.write().await.insert(player.clone(), claim.clone());
        append
    }

    async fn parked_claim(
        &self,
        player: &PlayerAddress,
    ) -> anyhow::Result<Option<PendingClaim>> {
        let parked = self.parked.read().await;
        Ok(parked.get(player).cloned())
    }

    async fn clear_parked(&self, player: &PlayerAddress) -> anyhow::Result<()> {
        // Journal first: clearing only in memory would resurrect an
        // already-reconciled marker on the next replay.
        self.append(&LedgerEvent {
            timestamp_ms: now_ms(),
            player: player.clone(),
            kind: LedgerEventKind::ClaimUnparked,
        })
        .await?;

        self.parked.write().await.remove(player);
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        fs::metadata(&self.journal_dir).await.is_ok()
    }
}
