use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Raw rectangular table of strings as returned by the sheet service.
/// First row is the header.
pub type Table = Vec<Vec<String>>;

/// Default spreadsheet range, mirroring the source sheet layout.
pub const DEFAULT_RANGE: &str = "Main!A:X";

/// Environment variable naming the credentials file. This is the only
/// environment variable the application reads.
pub const CREDENTIALS_ENV: &str = "SHEETS_CREDENTIALS";

const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";
#[cfg(feature = "web")]
const FETCH_TIMEOUT_SECS: u64 = 10;

/// Connection parameters for the spreadsheet service.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// Spreadsheet document id
    pub spreadsheet_id: String,

    /// Cell range to fetch, e.g. `Main!A:X`
    pub range: String,

    /// API key for the Sheets values endpoint
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
struct CredentialsFile {
    api_key: String,
}

/// Errors from the data-source adapter.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Credentials file missing or unreadable
    #[error("failed to read credentials file {path}: {source}")]
    Credentials {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Credentials file is not the expected JSON shape
    #[error("invalid credentials file {path}: {source}")]
    CredentialsFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Network-level failure after the retry was exhausted
    #[cfg(feature = "web")]
    #[error("sheet fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("sheet service returned status {0}")]
    Status(u16),

    /// Response body was not the expected values payload
    #[error("unexpected sheet payload: {0}")]
    Payload(String),
}

impl SheetsConfig {
    /// Build a config for a spreadsheet, reading the API key from the
    /// credentials file named by `SHEETS_CREDENTIALS` (default
    /// `credentials.json`).
    ///
    /// # Arguments
    /// * `spreadsheet_id` - Document id of the sheet
    /// * `range` - Cell range string, e.g. [`DEFAULT_RANGE`]
    ///
    /// # Returns
    /// * `Result<SheetsConfig, SheetsError>` - Config or credentials error
    pub fn from_env(spreadsheet_id: &str, range: &str) -> Result<Self, SheetsError> {
        let path =
            std::env::var(CREDENTIALS_ENV).unwrap_or_else(|_| DEFAULT_CREDENTIALS_FILE.to_string());
        let api_key = read_api_key(&path)?;
        Ok(SheetsConfig {
            spreadsheet_id: spreadsheet_id.to_string(),
            range: range.to_string(),
            api_key,
        })
    }
}

fn read_api_key(path: &str) -> Result<String, SheetsError> {
    let contents =
        std::fs::read_to_string(Path::new(path)).map_err(|source| SheetsError::Credentials {
            path: path.to_string(),
            source,
        })?;
    let creds: CredentialsFile =
        serde_json::from_str(&contents).map_err(|source| SheetsError::CredentialsFormat {
            path: path.to_string(),
            source,
        })?;
    Ok(creds.api_key)
}

/// Extract the raw table from a Sheets API values response body.
///
/// The endpoint answers `{"range": ..., "values": [[...], ...]}`. A missing
/// or empty `values` array means an empty sheet, which is an empty table
/// rather than an error. The API also omits trailing empty cells, so rows
/// are padded out to the widest row to keep the table rectangular.
///
/// # Arguments
/// * `body` - JSON response body
///
/// # Returns
/// * `Result<Table, SheetsError>` - The rectangular table, or a payload
///   error if the body is not valid JSON of the expected shape
pub fn parse_values_payload(body: &str) -> Result<Table, SheetsError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| SheetsError::Payload(e.to_string()))?;

    let values = match json.get("values") {
        Some(values) => values,
        None => return Ok(Vec::new()),
    };
    let rows = values
        .as_array()
        .ok_or_else(|| SheetsError::Payload("\"values\" is not an array".to_string()))?;

    let mut table: Table = Vec::with_capacity(rows.len());
    for row in rows {
        let cells = row
            .as_array()
            .ok_or_else(|| SheetsError::Payload("row is not an array".to_string()))?;
        table.push(
            cells
                .iter()
                .map(|cell| match cell {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        );
    }

    let width = table.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut table {
        row.resize(width, String::new());
    }

    Ok(table)
}

/// Fetch the raw table from the Google Sheets values endpoint.
///
/// One request with a 10 second timeout, retried once on a transient
/// (connect or timeout) failure. Any failure after that surfaces as a
/// recoverable [`SheetsError`] for the web layer to render; the upstream
/// behavior of crashing on connectivity problems is deliberately not kept.
///
/// # Arguments
/// * `config` - Spreadsheet id, range and API key
///
/// # Returns
/// * `Result<Table, SheetsError>` - The fetched table or a fetch error
#[cfg(feature = "web")]
pub async fn fetch_table(config: &SheetsConfig) -> Result<Table, SheetsError> {
    let url = format!(
        "https://sheets.googleapis.com/v4/spreadsheets/{}/values/{}",
        config.spreadsheet_id, config.range
    );
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()?;

    let response = match send_request(&client, &url, &config.api_key).await {
        Ok(response) => response,
        Err(e) if e.is_timeout() || e.is_connect() => {
            log::warn!("sheet fetch failed ({}), retrying once", e);
            send_request(&client, &url, &config.api_key).await?
        }
        Err(e) => return Err(e.into()),
    };

    let status = response.status();
    if !status.is_success() {
        return Err(SheetsError::Status(status.as_u16()));
    }

    let body = response.text().await?;
    parse_values_payload(&body)
}

#[cfg(feature = "web")]
async fn send_request(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
) -> Result<reqwest::Response, reqwest::Error> {
    client.get(url).query(&[("key", api_key)]).send().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_is_an_empty_table() {
        let table = parse_values_payload(r#"{"range": "Main!A:X"}"#).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn values_become_rows_of_strings() {
        let body = r#"{"values": [["Date", "Name"], ["05/01/2024", "Lan"]]}"#;
        let table = parse_values_payload(body).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[1], vec!["05/01/2024".to_string(), "Lan".to_string()]);
    }

    #[test]
    fn short_rows_are_padded_to_the_widest_row() {
        let body = r#"{"values": [["A", "B", "C"], ["1"]]}"#;
        let table = parse_values_payload(body).unwrap();
        assert_eq!(table[1], vec!["1".to_string(), String::new(), String::new()]);
    }

    #[test]
    fn garbage_body_is_a_payload_error() {
        assert!(matches!(
            parse_values_payload("not json"),
            Err(SheetsError::Payload(_))
        ));
        assert!(matches!(
            parse_values_payload(r#"{"values": 42}"#),
            Err(SheetsError::Payload(_))
        ));
    }

    #[test]
    fn credentials_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, r#"{"api_key": "test-key"}"#).unwrap();
        assert_eq!(read_api_key(path.to_str().unwrap()).unwrap(), "test-key");
    }

    #[test]
    fn missing_credentials_file_is_reported_with_its_path() {
        let err = read_api_key("/nonexistent/credentials.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/credentials.json"));
    }
}
