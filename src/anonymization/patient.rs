//! Patient record anonymizer
//!
//! Rewrites one source record into an anonymized one: identifier replaced by
//! a salted pseudo-UUID, name replaced by a corpus-selected synthetic name,
//! dates truncated, the multiple-birth pair collapsed to a boolean, and
//! identifying fields that have no safe transform (identifiers, addresses,
//! telecoms, contacts, photos) dropped entirely. All remaining fields pass
//! through unchanged.

use crate::anonymization::identifier::AnonymizedIdGenerator;
use crate::anonymization::synthetic::SyntheticData;
use crate::domain::patient::PatientRecord;

/// The separator embedded in source identifiers (ICNs like
/// `1011537977V693883`).
const ID_SEPARATOR: char = 'V';

/// Anonymizes patient records. One instance per file build; all state is
/// immutable configuration.
pub struct PatientAnonymizer<G: AnonymizedIdGenerator> {
    synthetic_data: SyntheticData,
    id_generator: G,
}

impl<G: AnonymizedIdGenerator> PatientAnonymizer<G> {
    pub fn new(synthetic_data: SyntheticData, id_generator: G) -> Self {
        Self {
            synthetic_data,
            id_generator,
        }
    }

    /// Anonymize one patient record.
    pub fn anonymize(&self, record: PatientRecord) -> PatientRecord {
        let seed = seed_from_identifier(&record.id);
        let anonymized_id = self.id_generator.generate_id_from(&record.id);

        PatientRecord {
            id: anonymized_id,
            resource_type: record.resource_type,
            name: Some(self.synthetic_data.synthesize_name(seed)),
            gender: record.gender,
            birth_date: self
                .synthetic_data
                .synthesize_date(record.birth_date.as_deref()),
            deceased_boolean: record.deceased_boolean,
            deceased_date_time: self
                .synthetic_data
                .synthesize_date_time(record.deceased_date_time.as_deref()),
            multiple_birth_boolean: sanitize_multiple_birth(
                record.multiple_birth_boolean,
                record.multiple_birth_integer,
            ),
            multiple_birth_integer: None,
            marital_status: record.marital_status,
            managing_organization: record.managing_organization,
            care_provider: record.care_provider,
            communication: record.communication,
            language: record.language,
            link: record.link,
            // No safe transform exists for these; they are dropped.
            identifier: None,
            address: None,
            telecom: None,
            contact: None,
            photo: None,
            extra: record.extra,
        }
    }
}

/// Derive a repeatable seed from the source identifier so synthetic data is
/// replicable: strip the separator and use the resulting integer. If the
/// identifier cannot be parsed, fall back to a stable string hash.
fn seed_from_identifier(identifier: &str) -> u64 {
    let stripped: String = identifier.chars().filter(|c| *c != ID_SEPARATOR).collect();
    match stripped.parse::<u64>() {
        Ok(seed) => seed,
        Err(_) => string_hash(identifier),
    }
}

/// Stable 31-multiplier string hash, independent of the process and the
/// platform's default hasher.
fn string_hash(value: &str) -> u64 {
    let mut hash: i32 = 0;
    for c in value.chars() {
        hash = hash.wrapping_mul(31).wrapping_add(c as i32);
    }
    hash as u32 as u64
}

/// The multiple-birth indicator is a one-of choice between a boolean and an
/// ordinal. If the ordinal form is present it wins, collapsed to a boolean;
/// otherwise the boolean passes through unchanged (including absent).
fn sanitize_multiple_birth(boolean: Option<bool>, integer: Option<i64>) -> Option<bool> {
    match integer {
        Some(ordinal) => Some(ordinal > 0),
        None => boolean,
    }
}
