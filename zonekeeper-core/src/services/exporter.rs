//! Post-mutation zone export: structured snapshot, zone-file rendering,
//! and the manually-managed record subset.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use zonekeeper_aws::{RecordType, ZoneRecord, ZoneStore};

use crate::error::{CoreError, CoreResult};

/// File names written into the export directory.
const SNAPSHOT_FILE: &str = "zone.json";
const ZONE_FILE: &str = "zone.txt";
const MANUAL_RECORDS_FILE: &str = "manual-records.txt";

/// Paths of the files written by one export.
#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub snapshot: PathBuf,
    pub zone_file: PathBuf,
    pub manual_records: PathBuf,
}

/// Re-fetches the zone and serializes it to durable, human-readable forms.
pub struct ExportService {
    store: Arc<dyn ZoneStore>,
}

impl ExportService {
    #[must_use]
    pub fn new(store: Arc<dyn ZoneStore>) -> Self {
        Self { store }
    }

    /// Fetch the zone and write all export files into `out_dir`.
    pub async fn export(
        &self,
        zone_id: &str,
        zone_name: &str,
        out_dir: &Path,
    ) -> CoreResult<ExportPaths> {
        let records = self.store.list_records(zone_id).await.map_err(|e| {
            CoreError::ZoneReadFailed {
                zone_id: zone_id.to_string(),
                source: e,
            }
        })?;

        std::fs::create_dir_all(out_dir).map_err(|e| {
            CoreError::ExportError(format!("cannot create {}: {e}", out_dir.display()))
        })?;

        let paths = ExportPaths {
            snapshot: out_dir.join(SNAPSHOT_FILE),
            zone_file: out_dir.join(ZONE_FILE),
            manual_records: out_dir.join(MANUAL_RECORDS_FILE),
        };

        let snapshot = serde_json::to_string_pretty(&records)
            .map_err(|e| CoreError::ExportError(format!("snapshot serialization: {e}")))?;
        write_file(&paths.snapshot, &snapshot)?;
        write_file(&paths.zone_file, &render_zone_file(zone_name, &records))?;
        write_file(
            &paths.manual_records,
            &render_manual_records(zone_name, &records),
        )?;

        log::info!(
            "Exported {} record sets to {}",
            records.len(),
            out_dir.display()
        );
        Ok(paths)
    }
}

fn write_file(path: &Path, content: &str) -> CoreResult<()> {
    std::fs::write(path, content)
        .map_err(|e| CoreError::ExportError(format!("cannot write {}: {e}", path.display())))
}

/// Render the snapshot in a zone-file-style layout.
///
/// Alias records have no zone-file equivalent; they are rendered with an
/// `ALIAS` pseudo-type so the file stays line-per-record diffable.
#[must_use]
pub fn render_zone_file(zone_name: &str, records: &[ZoneRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!("; Zone export for {zone_name}\n"));
    out.push_str(&format!("; {} record sets\n\n", records.len()));

    for record in records {
        if let Some(alias) = &record.alias_target {
            out.push_str(&format!(
                "{}\tALIAS\t{}\t{}\n",
                record.name, record.record_type, alias.dns_name
            ));
        } else {
            let ttl = record.ttl.unwrap_or(0);
            for value in &record.values {
                out.push_str(&format!(
                    "{}\t{ttl}\tIN\t{}\t{value}\n",
                    record.name, record.record_type
                ));
            }
        }
    }
    out
}

/// Render only the manually-managed subset (email and verification records)
/// for operator awareness.
#[must_use]
pub fn render_manual_records(zone_name: &str, records: &[ZoneRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "; Manually managed records in {zone_name} (MX/TXT)\n"
    ));
    out.push_str("; These are never touched by cleanup.\n\n");

    for record in records {
        if matches!(record.record_type, RecordType::Mx | RecordType::Txt) {
            let ttl = record.ttl.unwrap_or(0);
            for value in &record.values {
                out.push_str(&format!(
                    "{}\t{ttl}\tIN\t{}\t{value}\n",
                    record.name, record.record_type
                ));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{alias_record, value_record, MockZoneStore};

    fn sample_zone() -> Vec<ZoneRecord> {
        vec![
            value_record("example.org.", RecordType::Ns, &["ns-1.awsdns.org."]),
            value_record(
                "example.org.",
                RecordType::Mx,
                &["10 mail.example.org.", "20 mail2.example.org."],
            ),
            value_record("example.org.", RecordType::Txt, &["\"v=spf1 -all\""]),
            alias_record("www.example.org.", "d111111abcdef8.cloudfront.net."),
        ]
    }

    #[test]
    fn zone_file_renders_alias_and_values() {
        let rendered = render_zone_file("example.org", &sample_zone());
        assert!(rendered.contains("; Zone export for example.org"));
        assert!(rendered
            .contains("www.example.org.\tALIAS\tA\td111111abcdef8.cloudfront.net."));
        assert!(rendered.contains("example.org.\t300\tIN\tMX\t10 mail.example.org."));
        assert!(rendered.contains("example.org.\t300\tIN\tMX\t20 mail2.example.org."));
    }

    #[test]
    fn manual_records_contains_only_mx_txt() {
        let rendered = render_manual_records("example.org", &sample_zone());
        assert!(rendered.contains("MX"));
        assert!(rendered.contains("TXT"));
        assert!(!rendered.contains("ALIAS"));
        assert!(!rendered.contains("NS\t"));
    }

    #[tokio::test]
    async fn export_writes_all_files() {
        let tmp = tempfile::tempdir();
        assert!(tmp.is_ok(), "tempdir failed: {tmp:?}");
        let Ok(tmp) = tmp else {
            return;
        };

        let store = Arc::new(MockZoneStore::new(sample_zone()));
        let service = ExportService::new(store);
        let result = service.export("Z123", "example.org", tmp.path()).await;
        assert!(result.is_ok(), "export failed: {result:?}");
        let Ok(paths) = result else {
            return;
        };

        assert!(paths.snapshot.exists());
        assert!(paths.zone_file.exists());
        assert!(paths.manual_records.exists());

        let snapshot = std::fs::read_to_string(&paths.snapshot).unwrap_or_default();
        assert!(snapshot.contains("www.example.org."));
        let parsed: serde_json::Result<Vec<ZoneRecord>> = serde_json::from_str(&snapshot);
        assert!(parsed.is_ok(), "snapshot is not valid JSON: {parsed:?}");
    }

    #[tokio::test]
    async fn export_fails_when_zone_unreadable() {
        let store = Arc::new(MockZoneStore::new(vec![]));
        store.set_list_error("gone").await;
        let service = ExportService::new(store);

        let tmp = tempfile::tempdir();
        assert!(tmp.is_ok());
        let Ok(tmp) = tmp else {
            return;
        };
        let result = service.export("Z123", "example.org", tmp.path()).await;
        assert!(
            matches!(&result, Err(CoreError::ZoneReadFailed { .. })),
            "unexpected result: {result:?}"
        );
    }
}
