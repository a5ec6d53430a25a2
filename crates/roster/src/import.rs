use crate::controller::RosterController;
use crate::error::Result;
use importer::{CanonicalField, ImportRow};
use rand::Rng;
use storage::{ATHLETES_TABLE, BackendAdapter, NewAthlete, PaymentStatus};
use tracing::{error, info};

/// Alphabet without the characters athletes misread on gym whiteboards
/// (0/O, 1/I/L).
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
const CODE_LEN: usize = 4;

/// Self-login code for imported athletes. Not guaranteed unique; the
/// roster tolerates collisions.
pub fn generate_access_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Fill the schema defaults a spreadsheet never carries: imported
/// athletes start as payment-pending and get a generated access code.
fn hydrate(row: &ImportRow) -> NewAthlete {
    let field = |f: CanonicalField| row.get(f).map(str::to_string);

    NewAthlete {
        name: row.name().unwrap_or_default().to_string(),
        avatar_url: None,
        payment_status: PaymentStatus::Pending,
        cut_day: field(CanonicalField::CutDay).unwrap_or_else(|| "01".to_string()),
        referral_source: field(CanonicalField::ReferralSource),
        back_squat: field(CanonicalField::BackSquat),
        bench_press: field(CanonicalField::BenchPress),
        deadlift: field(CanonicalField::Deadlift),
        shoulder_press: field(CanonicalField::ShoulderPress),
        front_squat: field(CanonicalField::FrontSquat),
        clean_rm: field(CanonicalField::CleanRm),
        push_press: field(CanonicalField::PushPress),
        snatch_rm: None,
        karen: field(CanonicalField::Karen),
        burpees_100: field(CanonicalField::Burpees100),
        access_code: Some(generate_access_code()),
    }
}

impl RosterController {
    /// Batch-insert validated import records, then re-fetch the
    /// authoritative roster whatever the insert outcome. Batches are too
    /// large to merge optimistically, so no temp-id reconciliation is
    /// attempted on this path. Returns the number of rows submitted.
    pub async fn import_athletes(&self, rows: Vec<ImportRow>) -> Result<usize> {
        let drafts: Vec<NewAthlete> = rows.iter().map(hydrate).collect();
        let count = drafts.len();

        if count > 0 {
            let payload = drafts
                .iter()
                .map(serde_json::to_value)
                .collect::<std::result::Result<Vec<_>, _>>()?;

            match self.adapter.insert(ATHLETES_TABLE, payload).await {
                Ok(stored) => info!(count = stored.len(), "batch import stored"),
                Err(err) => error!(%err, "batch import insert failed"),
            }
        }

        self.refresh().await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use importer::ImportSession;
    use std::sync::Arc;
    use storage::InMemoryAdapter;

    fn session(rows: &[&[&str]]) -> ImportSession {
        let grid = rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();
        ImportSession::from_grid(grid).unwrap()
    }

    #[test]
    fn test_generate_access_code_shape() {
        let code = generate_access_code();
        assert_eq!(code.len(), CODE_LEN);
        assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_hydrate_fills_defaults() {
        let rows = session(&[&["Nombre", "Peso Muerto"], &["Juan", "140"]]).rows();
        let draft = hydrate(&rows[0]);

        assert_eq!(draft.name, "Juan");
        assert_eq!(draft.deadlift.as_deref(), Some("140"));
        assert_eq!(draft.payment_status, PaymentStatus::Pending);
        assert_eq!(draft.cut_day, "01");
        assert!(draft.access_code.is_some());
    }

    #[tokio::test]
    async fn test_import_lands_in_roster_via_refetch() {
        let controller = RosterController::new(Arc::new(InMemoryAdapter::new()));

        let rows = session(&[
            &["Nombre", "Back Squat", "XYZ"],
            &["Juan", "100", "ignored"],
            &["", "90", ""],
        ])
        .rows();

        let submitted = controller.import_athletes(rows).await.unwrap();
        assert_eq!(submitted, 1);

        let roster = controller.roster();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].name, "Juan");
        assert_eq!(roster[0].back_squat.as_deref(), Some("100"));
        assert_eq!(roster[0].payment_status, PaymentStatus::Pending);
        assert!(roster[0].access_code.is_some());
    }

    #[tokio::test]
    async fn test_import_of_nothing_still_refreshes() {
        let controller = RosterController::new(Arc::new(InMemoryAdapter::with_demo_data()));

        let submitted = controller.import_athletes(Vec::new()).await.unwrap();

        assert_eq!(submitted, 0);
        assert_eq!(controller.roster().len(), 3);
    }
}
