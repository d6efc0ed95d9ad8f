use std::fs;
use std::path::Path;

use tracing::{debug, info, instrument};

use crate::error::{Result, ToolError};
use crate::io::{dian, lenex};
use crate::reconcile::{self, ReconcileReport};

/// Distributes the heats and lanes of a Lenex entry list into a Dian meet file
/// and writes the result to `output`.
#[instrument(
    level = "info",
    skip_all,
    fields(lenex = %lenex_path.display(), dian = %dian_path.display(), output = %output.display())
)]
pub fn lenex_to_dian(lenex_path: &Path, dian_path: &Path, output: &Path) -> Result<ReconcileReport> {
    for path in [lenex_path, dian_path] {
        if !path.exists() {
            return Err(ToolError::MissingInput(path.to_path_buf()));
        }
    }

    let lenex = lenex::read_lenex(lenex_path)?;
    info!(
        sessions = lenex.meet.sessions.len(),
        events = lenex.meet.events().count(),
        athletes = lenex.meet.athletes().count(),
        "parsed Lenex entry list"
    );
    let mut dian = dian::read_dian(dian_path)?;
    info!(events = dian.events.len(), "parsed Dian meet");

    let report = reconcile::reconcile(&mut dian, &lenex);

    dian::write_dian(output, &dian)?;
    debug!("Dian meet written");
    Ok(report)
}

/// Persists a reconciliation report as pretty-printed JSON.
#[instrument(level = "debug", skip(report), fields(output = %output.display()))]
pub fn write_report(report: &ReconcileReport, output: &Path) -> Result<()> {
    let json_string = serde_json::to_string_pretty(report)?;
    fs::write(output, json_string)?;
    Ok(())
}
