//! Test fixtures for ranking integration tests
//!
//! Snapshots and extracted values modeled on what the OCR pipeline produces
//! for passport and national ID numbers.

#![allow(dead_code)]

use cardmatch_core::{CandidateIdentity, EmployeeSnapshot, ExtractionRecord, ExtractionStatus};

/// A small site crew
pub fn crew_snapshot() -> EmployeeSnapshot {
    EmployeeSnapshot::new(vec![
        CandidateIdentity::new("emp-001", "Ana Lima", "A1234567"),
        CandidateIdentity::new("emp-002", "Bo Chen", "B9999999"),
        CandidateIdentity::new("emp-003", "Cy Park", "A1234568"),
        CandidateIdentity::new("emp-004", "Dev Rao", "P 0012 3456"),
        CandidateIdentity::new("emp-005", "Eli Noor", "X7"),
    ])
    .expect("fixture ids are unique")
}

/// Deterministic pseudo-random identity strings (linear congruential generator)
pub fn generated_identities(count: usize, seed: u64) -> Vec<String> {
    const ALPHABET: &[u8] = b"AB01O8";
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) as usize
    };

    (0..count)
        .map(|_| {
            let len = next() % 9;
            (0..len).map(|_| ALPHABET[next() % ALPHABET.len()] as char).collect()
        })
        .collect()
}

/// A large generated directory
pub fn large_snapshot(size: usize) -> EmployeeSnapshot {
    let employees = (0..size)
        .map(|i| {
            CandidateIdentity::new(
                format!("emp-{:05}", i),
                format!("Employee {}", i),
                format!("P{:07}", i * 7919 % 10_000_000),
            )
        })
        .collect();

    EmployeeSnapshot::new(employees).expect("generated ids are unique")
}

/// Records in every extraction state
pub fn mixed_records() -> Vec<ExtractionRecord> {
    vec![
        ExtractionRecord::done("card-1", Some("A1234567")).with_display_name("ANA LIMA"),
        ExtractionRecord::done("card-2", Some("P00123457")),
        ExtractionRecord {
            card_id: "card-3".to_string(),
            status: ExtractionStatus::Running,
            extracted_identity_string: None,
            extracted_display_name: None,
        },
        ExtractionRecord {
            card_id: "card-4".to_string(),
            status: ExtractionStatus::Failed,
            extracted_identity_string: None,
            extracted_display_name: None,
        },
        ExtractionRecord::done("card-5", Some("12")),
        ExtractionRecord::done("card-6", Some("QQQQQQQQ")),
        ExtractionRecord::done("card-7", None),
    ]
}
