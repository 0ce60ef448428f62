//! Short opaque identifiers for students, uploads, transactions and service requests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Source of identifiers for one collection.
pub trait IdentifierGenerator: Send + Sync {
    /// Produce the next identifier
    fn next(&self) -> String;
}

/// Random v4 UUID rendered as hex and cut to `length` characters.
///
/// Eight hex characters give 2^32 possible ids; the record store re-draws on
/// the rare collision, so uniqueness does not rest on randomness alone.
#[derive(Debug, Clone)]
pub struct UuidIdGenerator {
    length: usize,
}

impl UuidIdGenerator {
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(4, 32),
        }
    }
}

impl IdentifierGenerator for UuidIdGenerator {
    fn next(&self) -> String {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(self.length);
        id
    }
}

/// Deterministic ids of the form `{prefix}{n}` starting at 1, e.g. `S1`, `S2`.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdentifierGenerator for SequentialIdGenerator {
    fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}{}", self.prefix, n)
    }
}

/// One generator per collection held by the record store
#[derive(Clone)]
pub struct IdentifierGenerators {
    pub student: Arc<dyn IdentifierGenerator>,
    pub upload: Arc<dyn IdentifierGenerator>,
    pub transaction: Arc<dyn IdentifierGenerator>,
    pub request: Arc<dyn IdentifierGenerator>,
}

impl IdentifierGenerators {
    /// Random ids; `student_length` for students, `record_length` for everything else
    pub fn random(student_length: usize, record_length: usize) -> Self {
        Self {
            student: Arc::new(UuidIdGenerator::new(student_length)),
            upload: Arc::new(UuidIdGenerator::new(record_length)),
            transaction: Arc::new(UuidIdGenerator::new(record_length)),
            request: Arc::new(UuidIdGenerator::new(record_length)),
        }
    }

    /// Predictable ids (`S1`, `U1`, `T1`, `R1`) for tests and demos
    pub fn sequential() -> Self {
        Self {
            student: Arc::new(SequentialIdGenerator::new("S")),
            upload: Arc::new(SequentialIdGenerator::new("U")),
            transaction: Arc::new(SequentialIdGenerator::new("T")),
            request: Arc::new(SequentialIdGenerator::new("R")),
        }
    }
}

impl Default for IdentifierGenerators {
    fn default() -> Self {
        Self::random(8, 10)
    }
}
