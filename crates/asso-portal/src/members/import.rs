use super::{Member, MemberId, MemberRole};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum MemberImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    UnknownRole { line: u64, value: String },
}

impl std::fmt::Display for MemberImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberImportError::Io(err) => write!(f, "failed to read members file: {}", err),
            MemberImportError::Csv(err) => write!(f, "invalid members CSV data: {}", err),
            MemberImportError::UnknownRole { line, value } => {
                write!(f, "line {}: unknown member role '{}'", line, value)
            }
        }
    }
}

impl std::error::Error for MemberImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MemberImportError::Io(err) => Some(err),
            MemberImportError::Csv(err) => Some(err),
            MemberImportError::UnknownRole { .. } => None,
        }
    }
}

impl From<std::io::Error> for MemberImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for MemberImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct MemberRow {
    id: String,
    first_name: String,
    last_name: String,
    role: String,
}

/// Loads the members directory from a `id,first_name,last_name,role` CSV.
pub struct MemberImporter;

impl MemberImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Member>, MemberImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Member>, MemberImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut members = Vec::new();

        for (index, record) in csv_reader.deserialize::<MemberRow>().enumerate() {
            let row = record?;
            let line = index as u64 + 2;
            let role = MemberRole::parse(&row.role).ok_or_else(|| MemberImportError::UnknownRole {
                line,
                value: row.role.clone(),
            })?;

            members.push(Member {
                id: MemberId(row.id),
                first_name: row.first_name,
                last_name: row.last_name,
                role,
            });
        }

        Ok(members)
    }
}
