//! The generation loop: reset once, then run and write every catalog case
//! in order. Any harness-level failure aborts the run; there is no partial
//! recovery, a rerun starts from a clean directory anyway.

use std::path::Path;

use prompt_parity_exec::BaselineEngine;

use crate::catalog;
use crate::collect::collect_expectations;
use crate::error::HarnessError;
use crate::fixture::Fixture;
use crate::runner::run_case;
use crate::writer;

pub struct GenerationSummary {
    pub written: usize,
}

pub fn generate_fixtures<E: BaselineEngine>(dir: &Path) -> Result<GenerationSummary, HarnessError> {
    writer::reset_fixture_dir(dir)?;
    let cases = catalog::cases();
    for case in &cases {
        let engine = run_case::<E>(case)?;
        let expectations = collect_expectations(&engine, &case.message_options);
        let fixture = Fixture::new(case.clone(), expectations);
        writer::write_fixture(dir, &fixture)?;
    }
    Ok(GenerationSummary {
        written: cases.len(),
    })
}
