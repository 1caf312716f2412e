use crate::encoder::{AbaEncoder, RunningTotals};
use crate::error::{AbaError, ValidationError};
use crate::model::{DetailTransaction, FileHeader};
use crate::validate::{validate_header, validate_transaction};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};

const BATCH_VERSION: u8 = 1;

/// First line of a batch file: the descriptive-record values plus bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchHeader {
    pub version: u8,
    pub created_at: DateTime<Utc>,
    pub file: FileHeader,
    #[serde(default)]
    pub history: Vec<AuditEvent>,
}

impl BatchHeader {
    pub fn new(file: FileHeader) -> Self {
        Self {
            version: BATCH_VERSION,
            created_at: Utc::now(),
            file,
            history: Vec::new(),
        }
    }
}

/// One change made to a batch, kept in the header so `aba audit log` can
/// replay who staged and generated what.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditEvent {
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub action: String,
}

impl AuditEvent {
    pub fn now<S: Into<String>>(action: S) -> Self {
        Self {
            timestamp: Utc::now(),
            actor: current_actor(),
            action: action.into(),
        }
    }
}

fn current_actor() -> String {
    ["USER", "USERNAME"]
        .into_iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// A header and its transactions, staged on disk as JSON lines.
#[derive(Debug, Clone)]
pub struct Batch {
    pub header: BatchHeader,
    pub transactions: Vec<DetailTransaction>,
    pub path: Option<PathBuf>,
}

impl Batch {
    pub fn new(file: FileHeader) -> Self {
        Self {
            header: BatchHeader::new(file),
            transactions: Vec::new(),
            path: None,
        }
    }

    /// Read a batch file. The header must be the first line; blank lines are
    /// skipped. Transactions are loaded without validation so that
    /// [`problems`](Batch::problems) can report on hand-edited files.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read batch file {}", path.display()))?;
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(idx, raw)| (idx + 1, raw))
            .filter(|(_, raw)| !raw.trim().is_empty());

        let header = match lines.next() {
            Some((number, raw)) => match parse_line(raw, number)? {
                BatchLine::Header(header) => header,
                BatchLine::Transaction(_) => {
                    bail!("line {number}: expected the batch header, found a transaction")
                }
            },
            None => bail!("batch file {} is empty", path.display()),
        };
        if header.version != BATCH_VERSION {
            bail!(
                "unsupported batch version {} (expected {})",
                header.version,
                BATCH_VERSION
            );
        }

        let transactions = lines
            .map(|(number, raw)| match parse_line(raw, number)? {
                BatchLine::Transaction(tx) => Ok(tx),
                BatchLine::Header(_) => Err(anyhow!("line {number}: second batch header")),
            })
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("failed to load {}", path.display()))?;

        Ok(Self {
            header,
            transactions,
            path: Some(path.to_path_buf()),
        })
    }

    /// Write the batch back as JSON lines, replacing the file.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let mut text = serde_json::to_string(&BatchLine::Header(self.header.clone()))
            .context("failed to serialize batch header")?;
        text.push('\n');
        for (idx, tx) in self.transactions.iter().enumerate() {
            let line = serde_json::to_string(&BatchLine::Transaction(tx.clone()))
                .with_context(|| format!("failed to serialize transaction #{}", idx + 1))?;
            text.push_str(&line);
            text.push('\n');
        }
        fs::write(path, text)
            .with_context(|| format!("failed to write batch file {}", path.display()))?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Append a transaction after checking it would encode.
    pub fn append(&mut self, transaction: DetailTransaction) -> Result<()> {
        validate_transaction(&transaction)
            .map_err(|err| err.at(self.transactions.len()))
            .context("transaction rejected")?;
        self.transactions.push(transaction);
        Ok(())
    }

    /// Append an audit log entry.
    pub fn log_action<S: Into<String>>(&mut self, action: S) {
        self.header.history.push(AuditEvent::now(action));
    }

    /// Every validation failure in the batch, header first, without stopping
    /// at the first one.
    pub fn problems(&self) -> Vec<ValidationError> {
        let mut problems = Vec::new();
        if let Err(err) = validate_header(&self.header.file) {
            problems.push(err);
        }
        for (idx, tx) in self.transactions.iter().enumerate() {
            if let Err(err) = validate_transaction(tx) {
                problems.push(err.at(idx));
            }
        }
        problems
    }

    /// Encode the batch into ABA text with its totals.
    pub fn encode(&self) -> std::result::Result<(String, RunningTotals), AbaError> {
        AbaEncoder::new(&self.header.file).generate_with_totals(&self.transactions)
    }
}

/// Hex SHA-256 of generated file contents.
pub fn file_digest(contents: &str) -> String {
    let digest = Sha256::digest(contents.as_bytes());
    format!("{digest:x}")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum BatchLine {
    Header(BatchHeader),
    Transaction(DetailTransaction),
}

/// Parse one JSON line, keeping the serde message since it names the
/// offending field.
fn parse_line(raw: &str, number: usize) -> Result<BatchLine> {
    serde_json::from_str(raw).map_err(|err| {
        let kind = serde_json::from_str::<serde_json::Value>(raw)
            .ok()
            .and_then(|v| v.get("kind").and_then(|k| k.as_str()).map(str::to_string))
            .unwrap_or_else(|| "record".to_string());
        anyhow!("line {number}: invalid {kind}: {err}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction_code::TransactionCode;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn batch() -> Batch {
        let file = FileHeader::new(
            "123-456",
            "123456789",
            "ABC",
            "TEST USER",
            "TEST REMITTER",
            "123456",
            "PAYROLL",
        )
        .with_processing_date(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        Batch::new(file)
    }

    fn salary() -> DetailTransaction {
        DetailTransaction::new(
            "654-321",
            "987654321",
            "JOHN SMITH",
            1000,
            TransactionCode::PayrollPayment,
            "SALARY",
        )
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payroll.batch");
        let mut original = batch();
        original.append(salary()).unwrap();
        original
            .append(salary().with_indicator("W").with_tax_withholding(150))
            .unwrap();
        original.log_action("created");
        original.save(&path).unwrap();

        let loaded = Batch::load(&path).unwrap();
        assert_eq!(loaded.header, original.header);
        assert_eq!(loaded.transactions, original.transactions);
        assert_eq!(loaded.path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn load_rejects_second_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("twice.batch");
        let header = serde_json::to_string(&BatchLine::Header(batch().header)).unwrap();
        std::fs::write(&path, format!("{header}\n{header}\n")).unwrap();
        let err = Batch::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("line 2: second batch header"), "{err:#}");
    }

    #[test]
    fn load_names_the_transaction_field_that_failed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.batch");
        let header = serde_json::to_string(&BatchLine::Header(batch().header)).unwrap();
        let tx = r#"{"kind":"transaction","bsb":"654-321","account_number":"1","account_name":"A","transaction_code":"50"}"#;
        std::fs::write(&path, format!("{header}\n\n{tx}\n")).unwrap();
        let err = format!("{:#}", Batch::load(&path).unwrap_err());
        assert!(err.contains("line 3: invalid transaction"), "{err}");
        assert!(err.contains("missing field `amount`"), "{err}");
    }

    #[test]
    fn load_rejects_transaction_before_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("headless.batch");
        let tx = serde_json::to_string(&BatchLine::Transaction(salary())).unwrap();
        std::fs::write(&path, format!("{tx}\n")).unwrap();
        let err = Batch::load(&path).unwrap_err();
        assert!(err.to_string().contains("expected the batch header"), "{err}");
    }

    #[test]
    fn audit_events_record_action_in_order() {
        let mut b = batch();
        b.log_action("batch init");
        b.log_action("generate");
        let actions: Vec<&str> = b.header.history.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(actions, ["batch init", "generate"]);
        assert!(b.header.history.iter().all(|e| !e.actor.is_empty()));
    }

    #[test]
    fn load_keeps_invalid_transactions_for_reporting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.batch");
        let header = serde_json::to_string(&BatchLine::Header(batch().header)).unwrap();
        let tx = r#"{"kind":"transaction","bsb":"654321","account_number":"1","account_name":"A","amount":5,"transaction_code":"50"}"#;
        std::fs::write(&path, format!("{header}\n\n{tx}\n")).unwrap();
        let loaded = Batch::load(&path).unwrap();
        let problems = loaded.problems();
        assert_eq!(problems.len(), 1);
        assert!(matches!(
            problems[0],
            ValidationError::Detail { index: Some(0), .. }
        ));
        assert!(loaded.encode().is_err());
    }

    #[test]
    fn append_rejects_invalid_transaction() {
        let mut b = batch();
        let mut tx = salary();
        tx.reference = "INV-1".into();
        assert!(b.append(tx).is_err());
        assert!(b.transactions.is_empty());
    }

    #[test]
    fn digest_is_stable_hex() {
        let digest = file_digest("abc");
        assert_eq!(
            digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
