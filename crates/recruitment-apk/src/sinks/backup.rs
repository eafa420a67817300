use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{BackupError, BackupStore};
use crate::intake::{LeadRecord, ANSWER_FIELD_COUNT};

/// Append-only CSV backup of every submission. The header row is written the
/// first time the file is created; every record lands as one row with the
/// raw points per question at the end.
#[derive(Debug)]
pub struct CsvBackupStore {
    path: PathBuf,
    // Serializes writers within this process so interleaved appends cannot
    // tear a row.
    guard: Mutex<()>,
}

impl CsvBackupStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    fn write_row(&self, lead: &LeadRecord) -> Result<(), BackupError> {
        let _lock = self.guard.lock().expect("backup mutex poisoned");

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let needs_header = match fs::metadata(&self.path) {
            Ok(metadata) => metadata.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::Writer::from_writer(file);

        if needs_header {
            writer.write_record(header_row())?;
        }
        writer.write_record(data_row(lead))?;
        writer.flush()?;

        Ok(())
    }
}

#[async_trait]
impl BackupStore for CsvBackupStore {
    async fn append(&self, lead: &LeadRecord) -> Result<(), BackupError> {
        self.write_row(lead)
    }
}

fn header_row() -> Vec<String> {
    let mut header: Vec<String> = [
        "Timestamp",
        "Naam",
        "Email",
        "Telefoon",
        "Bedrijf",
        "Sector",
        "Bedrijfsgrootte",
        "Assessment_Score",
        "Score_Categorie",
        "Urgentie_Level",
        "Lead_Score",
        "Pijn_Level",
    ]
    .into_iter()
    .map(str::to_string)
    .collect();

    for id in 1..=ANSWER_FIELD_COUNT {
        header.push(format!("Q{id:02}"));
    }
    header
}

fn data_row(lead: &LeadRecord) -> Vec<String> {
    let mut row = vec![
        lead.timestamp.clone(),
        lead.name.clone(),
        lead.email.clone(),
        lead.phone.clone(),
        lead.company.clone(),
        lead.sector.clone(),
        lead.company_size.clone(),
        lead.result.score_percent.to_string(),
        lead.result.category.label().to_string(),
        lead.result.urgency.label().to_string(),
        lead.result.lead_score.to_string(),
        lead.result.pain_level.label().to_string(),
    ];

    for id in 1..=ANSWER_FIELD_COUNT {
        row.push(lead.answer_points(id).to_string());
    }
    row
}
