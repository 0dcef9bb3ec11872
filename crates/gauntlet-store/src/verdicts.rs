use chrono::Utc;
use tracing::instrument;

use gauntlet_core::rounds::{Decision, Round};

use crate::database::Database;
use crate::error::StoreError;
use crate::row_helpers;

/// One persisted verdict. Written exactly once per round per session and
/// immutable afterwards.
#[derive(Clone, Debug)]
pub struct VerdictRecord {
    pub round: Round,
    pub decision: Decision,
    pub verdict: String,
    pub created_at: String,
}

/// Decision memory: one verdict record per evaluation round, keyed by round
/// number, cleared wholesale on session reset.
pub struct VerdictRepo {
    db: Database,
}

impl VerdictRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Persist a round's verdict. A round that already has a record is
    /// rejected with Conflict — records are never overwritten.
    #[instrument(skip(self, verdict), fields(round = %round, decision = %decision))]
    pub fn write(&self, round: Round, decision: Decision, verdict: &str) -> Result<(), StoreError> {
        if !Round::VERDICT_ROUNDS.contains(&round) {
            return Err(StoreError::Conflict(format!(
                "round {round} does not persist a verdict"
            )));
        }

        let now = Utc::now().to_rfc3339();
        self.db.with_conn(|conn| {
            let result = conn.execute(
                "INSERT INTO verdicts (round, decision, verdict, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![round.number(), decision.token(), verdict, now],
            );
            match result {
                Ok(_) => Ok(()),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    Err(StoreError::Conflict(format!(
                        "verdict for round {round} already recorded"
                    )))
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Read a round's verdict record. Absent records fail with NotFound.
    #[instrument(skip(self), fields(round = %round))]
    pub fn read(&self, round: Round) -> Result<VerdictRecord, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT round, decision, verdict, created_at FROM verdicts WHERE round = ?1",
            )?;
            let mut rows = stmt.query([round.number()])?;
            match rows.next()? {
                Some(row) => row_to_verdict(row),
                None => Err(StoreError::NotFound(format!("verdict for round {round}"))),
            }
        })
    }

    /// Convenience accessor for just the raw verdict text.
    pub fn read_text(&self, round: Round) -> Result<String, StoreError> {
        Ok(self.read(round)?.verdict)
    }

    /// Per-round existence flags for rounds 1-3, in order.
    pub fn presence(&self) -> Result<[bool; 3], StoreError> {
        self.db.with_conn(|conn| {
            let mut present = [false; 3];
            let mut stmt = conn.prepare("SELECT round FROM verdicts")?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let n: u8 = row_helpers::get(row, 0, "verdicts", "round")?;
                if (1..=3).contains(&n) {
                    present[(n - 1) as usize] = true;
                }
            }
            Ok(present)
        })
    }

    /// Clear every record. Runs as a single statement under the connection
    /// lock, so readers see either the full store or an empty one.
    #[instrument(skip(self))]
    pub fn reset(&self) -> Result<(), StoreError> {
        self.db.with_conn(|conn| {
            conn.execute("DELETE FROM verdicts", [])?;
            Ok(())
        })
    }
}

fn row_to_verdict(row: &rusqlite::Row<'_>) -> Result<VerdictRecord, StoreError> {
    let round_n: u8 = row_helpers::get(row, 0, "verdicts", "round")?;
    let round = Round::from_number(round_n).ok_or(StoreError::CorruptRow {
        table: "verdicts",
        column: "round",
        detail: format!("round out of range: {round_n}"),
    })?;
    let decision_str: String = row_helpers::get(row, 1, "verdicts", "decision")?;

    Ok(VerdictRecord {
        round,
        decision: row_helpers::parse_enum(&decision_str, "verdicts", "decision")?,
        verdict: row_helpers::get(row, 2, "verdicts", "verdict")?,
        created_at: row_helpers::get(row, 3, "verdicts", "created_at")?,
    })
}
