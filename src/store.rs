use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{DescriptionRecord, ThemeCatalog};

// store entries as written by the upload service; everything optional so a
// malformed entry can be rejected with a pointed error instead of a parse
// failure naming nothing
#[derive(Debug, Deserialize)]
struct RawRecord {
    user: Option<String>,
    description: Option<String>,
    #[serde(rename = "imagePath")]
    image_path: Option<String>,
    #[serde(default)]
    timestamp: i64,
}

/// Parse and validate the JSON record store. A record without a usable
/// `user` or `description` fails the whole parse with the offending index
/// and field name; records are never silently skipped.
pub fn parse_records(json: &str) -> Result<Vec<DescriptionRecord>> {
    let raw: Vec<RawRecord> = serde_json::from_str(json)?;

    raw.into_iter()
        .enumerate()
        .map(|(index, record)| {
            let user = match record.user {
                Some(user) if !user.trim().is_empty() => user,
                _ => return Err(Error::InvalidRecord { index, field: "user" }),
            };
            let description = match record.description {
                Some(description) if !description.trim().is_empty() => description,
                _ => {
                    return Err(Error::InvalidRecord {
                        index,
                        field: "description",
                    })
                }
            };

            Ok(DescriptionRecord {
                user,
                description,
                image_path: record.image_path,
                timestamp: record.timestamp,
            })
        })
        .collect()
}

/// Load the record store from disk. An absent file means nothing has been
/// uploaded yet and is not an error.
pub fn load_records(path: &Path) -> Result<Vec<DescriptionRecord>> {
    if !path.exists() {
        debug!("Record store not found at {} - starting empty", path.display());
        return Ok(Vec::new());
    }

    let data = std::fs::read_to_string(path)?;
    parse_records(&data)
}

/// Load the theme catalog, degrading to an empty catalog when the file is
/// unavailable or unparseable. Clustering proceeds without themes rather
/// than failing the run.
pub fn load_themes(path: &Path) -> ThemeCatalog {
    match std::fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str::<ThemeCatalog>(&data) {
            Ok(catalog) => {
                debug!(
                    "Loaded {} theme definitions from {}",
                    catalog.themes.len(),
                    path.display()
                );
                catalog
            }
            Err(e) => {
                warn!("Theme catalog unparseable ({}) - proceeding without themes", e);
                ThemeCatalog::default()
            }
        },
        Err(e) => {
            warn!("Theme catalog unavailable ({}) - proceeding without themes", e);
            ThemeCatalog::default()
        }
    }
}

/// All records for one user, in store order.
pub fn records_for_user<'a>(
    records: &'a [DescriptionRecord],
    user: &str,
) -> Vec<&'a DescriptionRecord> {
    records.iter().filter(|r| r.user == user).collect()
}
