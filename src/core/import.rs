//! Bulk component import from CSV, and import templates.
//!
//! The file is parsed completely before anything is written, so a malformed file
//! produces one [`Error::Import`] and no new components.

use crate::{
    core::{
        component::{DEFAULT_CATEGORY, DEFAULT_UNIT, non_blank_or},
        remote::RemoteBackend,
        service::DataService,
    },
    errors::{Error, Result},
    models::{Component, generate_id},
};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{info, instrument};

/// Name used for rows without one.
pub const DEFAULT_COMPONENT_NAME: &str = "Unknown Component";

const COMPONENT_COLUMNS: [&str; 4] = ["name", "price", "unit", "category"];

/// Which template to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// `Name,Price,Unit,Category`
    Component,
    /// `Name,SKU,MakingCharges`
    Product,
}

/// Build a map from lowercased header name to column index
fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (i, h) in headers.iter().enumerate() {
        map.entry(h.trim().to_lowercase()).or_insert(i);
    }
    map
}

/// Get a non-empty field value from a CSV record
fn get_field<'r>(
    record: &'r StringRecord,
    header_map: &HashMap<String, usize>,
    field: &str,
) -> Option<&'r str> {
    header_map
        .get(field)
        .and_then(|&idx| record.get(idx))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn import_error(message: impl Into<String>) -> Error {
    Error::Import {
        message: message.into(),
    }
}

/// Parses components from CSV with a `Name,Price,Unit,Category` header.
///
/// Headers are matched case-insensitively. Empty cells default to
/// `Unknown Component`, `0`, `pcs` and `General`; every row gets a fresh id.
///
/// # Errors
/// Returns [`Error::Import`] if the header has none of the expected columns, a row has
/// the wrong number of cells, or a price is not a non-negative number.
pub fn parse_components<R: Read>(reader: R) -> Result<Vec<Component>> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(false)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| import_error(format!("Unreadable header row: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    if !COMPONENT_COLUMNS
        .iter()
        .any(|column| header_map.contains_key(*column))
    {
        return Err(import_error(
            "No Name, Price, Unit or Category column found. Please use the template.",
        ));
    }

    let mut components = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        // Header is line 1
        let line = index + 2;
        let record = record.map_err(|e| import_error(format!("Line {line}: {e}")))?;

        let price = match get_field(&record, &header_map, "price") {
            Some(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|p| p.is_finite() && *p >= 0.0)
                .ok_or_else(|| import_error(format!("Line {line}: invalid price '{raw}'")))?,
            None => 0.0,
        };

        components.push(Component {
            id: generate_id(),
            name: get_field(&record, &header_map, "name")
                .unwrap_or(DEFAULT_COMPONENT_NAME)
                .to_string(),
            price,
            unit: non_blank_or(
                get_field(&record, &header_map, "unit").unwrap_or_default(),
                DEFAULT_UNIT,
            ),
            category: non_blank_or(
                get_field(&record, &header_map, "category").unwrap_or_default(),
                DEFAULT_CATEGORY,
            ),
        });
    }

    Ok(components)
}

/// Parses components from a CSV file on disk.
pub fn parse_components_file<P: AsRef<Path>>(path: P) -> Result<Vec<Component>> {
    let file = std::fs::File::open(path.as_ref())
        .map_err(|e| import_error(format!("Cannot open {}: {e}", path.as_ref().display())))?;
    parse_components(file)
}

/// Imports every component in a CSV file through the data service.
///
/// Returns the components that were added, in file order.
#[instrument(skip(service, path), fields(path = %path.as_ref().display()))]
pub async fn import_components<B, P>(service: &DataService<B>, path: P) -> Result<Vec<Component>>
where
    B: RemoteBackend,
    P: AsRef<Path>,
{
    let parsed = parse_components_file(path)?;
    let mut imported = Vec::with_capacity(parsed.len());
    for component in parsed {
        imported.push(service.add_component(component).await?);
    }
    info!("Imported {} components", imported.len());
    Ok(imported)
}

/// Writes an import template (header plus one example row).
pub fn write_template<W: Write>(writer: W, kind: TemplateKind) -> Result<()> {
    let mut csv_writer = WriterBuilder::new().from_writer(writer);
    let rows: [&[&str]; 2] = match kind {
        TemplateKind::Component => [
            &["Name", "Price", "Unit", "Category"],
            &["Gold Chain 2mm", "15", "meter", "Chain"],
        ],
        TemplateKind::Product => [
            &["Name", "SKU", "MakingCharges"],
            &["Necklace Set A1", "NK-001", "50"],
        ],
    };
    for row in rows {
        csv_writer
            .write_record(row)
            .map_err(|e| import_error(format!("Failed to write template: {e}")))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Renders an import template as a string.
pub fn template(kind: TemplateKind) -> Result<String> {
    let mut buffer = Vec::new();
    write_template(&mut buffer, kind)?;
    String::from_utf8(buffer).map_err(|e| import_error(e.to_string()))
}
