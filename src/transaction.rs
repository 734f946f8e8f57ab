// 🧾 Transaction Model - Input records for the matching engine
// Validation happens here, at the import boundary, so every detector
// downstream can assume well-formed input.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

// ============================================================================
// TRANSACTION KIND
// ============================================================================

/// Credit/Debit label carried by the source statement.
///
/// Informational only: detectors decide direction from the amount sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl TransactionKind {
    pub fn name(&self) -> &str {
        match self {
            TransactionKind::Credit => "Credit",
            TransactionKind::Debit => "Debit",
        }
    }

    /// Label implied by an amount when the source does not carry one
    pub fn from_amount(amount: f64) -> Self {
        if amount < 0.0 {
            TransactionKind::Debit
        } else {
            TransactionKind::Credit
        }
    }

    fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "credit" | "cr" => Some(TransactionKind::Credit),
            "debit" | "dr" => Some(TransactionKind::Debit),
            _ => None,
        }
    }
}

// ============================================================================
// TRANSACTION
// ============================================================================

/// A single, already-validated statement line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,

    /// Signed amount: positive = incoming, negative = outgoing
    pub amount: f64,

    pub description: String,

    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl Transaction {
    pub fn new(id: &str, amount: f64, description: &str, date: NaiveDate) -> Self {
        Transaction {
            id: id.to_string(),
            amount,
            description: description.to_string(),
            date,
            category: None,
            kind: TransactionKind::from_amount(amount),
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Amount in whole cents (rounded half away from zero)
    pub fn cents(&self) -> i64 {
        to_cents(self.amount)
    }

    pub fn is_deposit(&self) -> bool {
        self.amount > 0.0
    }

    pub fn is_payment(&self) -> bool {
        self.amount < 0.0
    }
}

/// Round a decimal amount to whole cents.
///
/// All amount comparisons in the engine go through this so that
/// `10.005` vs `10.01` style float drift never decides a match.
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// True when two amounts differ by no more than `tolerance` (compared in cents)
pub fn amounts_within(a: f64, b: f64, tolerance: f64) -> bool {
    let diff = (to_cents(a) as i128 - to_cents(b) as i128).abs();
    diff <= to_cents(tolerance) as i128
}

/// True when the amount's cent value fits in an `i64` without saturating
pub fn fits_in_cents(amount: f64) -> bool {
    amount.is_finite() && (amount * 100.0).round().abs() < i64::MAX as f64
}

// ============================================================================
// RAW TRANSACTION (import boundary)
// ============================================================================

/// Record as it arrives from a caller: date still a string, type optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTransaction {
    pub id: String,
    pub amount: f64,
    pub description: String,
    pub date: String,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Parse a statement date (supports YYYY-MM-DD and MM/DD/YYYY)
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    let trimmed = date_str.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%m/%d/%Y") {
        return Some(date);
    }

    None
}

impl TryFrom<RawTransaction> for Transaction {
    type Error = ValidationError;

    fn try_from(raw: RawTransaction) -> std::result::Result<Self, Self::Error> {
        let id = raw.id.trim();
        if id.is_empty() {
            return Err(ValidationError::new("id", "must not be empty"));
        }

        if !raw.amount.is_finite() {
            return Err(ValidationError::new(
                "amount",
                format!("must be a finite number, got {}", raw.amount),
            ));
        }

        if !fits_in_cents(raw.amount) {
            return Err(ValidationError::new(
                "amount",
                format!("{} is too large to represent in cents", raw.amount),
            ));
        }

        if raw.description.trim().is_empty() {
            return Err(ValidationError::new("description", "must not be empty"));
        }

        let date = parse_date(&raw.date).ok_or_else(|| {
            ValidationError::new(
                "date",
                format!("'{}' is not YYYY-MM-DD or MM/DD/YYYY", raw.date),
            )
        })?;

        let kind = match raw.kind.as_deref().map(str::trim) {
            None | Some("") => TransactionKind::from_amount(raw.amount),
            Some(label) => TransactionKind::parse(label).ok_or_else(|| {
                ValidationError::new("type", format!("unknown label '{}'", label))
            })?,
        };

        let category = raw
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(Transaction {
            id: id.to_string(),
            amount: raw.amount,
            description: raw.description,
            date,
            category,
            kind,
        })
    }
}

/// Validate a batch of raw records, rejecting the first bad record or a repeated id.
///
/// `position` in the error is 1-based.
pub fn validate_all(raw: Vec<RawTransaction>) -> Result<Vec<Transaction>> {
    let mut seen_ids = HashSet::new();
    let mut transactions = Vec::with_capacity(raw.len());

    for (index, record) in raw.into_iter().enumerate() {
        let position = index + 1;
        let tx = Transaction::try_from(record)
            .with_context(|| format!("Invalid transaction at record {}", position))?;

        if !seen_ids.insert(tx.id.clone()) {
            bail!("Duplicate transaction id '{}' at record {}", tx.id, position);
        }

        transactions.push(tx);
    }

    Ok(transactions)
}

// ============================================================================
// LOADERS
// ============================================================================

/// Load canonical transactions from a `.csv` or `.json` file
///
/// CSV columns: id, amount, description, date, category, type
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let raw = match extension.as_str() {
        "csv" => read_csv(path)?,
        "json" => read_json(path)?,
        other => bail!(
            "Unsupported transaction file extension '{}' for {}",
            other,
            path.display()
        ),
    };

    validate_all(raw).with_context(|| format!("Failed to validate {}", path.display()))
}

fn read_csv(path: &Path) -> Result<Vec<RawTransaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let mut records = Vec::new();
    for (line_num, result) in rdr.deserialize().enumerate() {
        // +2: header row, then 1-based lines
        let record: RawTransaction = result
            .with_context(|| format!("Failed to parse CSV line {} in {}", line_num + 2, path.display()))?;
        records.push(record);
    }

    Ok(records)
}

fn read_json(path: &Path) -> Result<Vec<RawTransaction>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read transactions file: {}", path.display()))?;

    serde_json::from_str(&content).context("Failed to parse transactions JSON")
}

// ============================================================================
// TESTS
// ============================================================================
