use factura_core::error::FacturaError;
use factura_core::model::DocumentExtraction;

/// Pretty JSON of the extraction, with the document's grand total.
pub fn render(doc: &DocumentExtraction) -> Result<String, FacturaError> {
    let mut value = serde_json::to_value(doc)?;
    value["grandTotal"] = serde_json::Value::String(doc.grand_total().to_string());
    Ok(serde_json::to_string_pretty(&value)?)
}
