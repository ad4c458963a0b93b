use ::csv::WriterBuilder;
use factura_core::error::FacturaError;
use factura_core::model::DocumentExtraction;

const HEADERS: [&str; 6] = ["page", "quantity", "code", "description", "unit_price", "total"];

/// One CSV record per extracted row, in document order.
pub fn render(doc: &DocumentExtraction) -> Result<Vec<u8>, FacturaError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::<u8>::new());
    writer.write_record(HEADERS).map_err(std::io::Error::from)?;
    for (page, row) in doc.rows() {
        let page = page.to_string();
        writer
            .write_record([
                page.as_str(),
                row.quantity.as_str(),
                row.code.as_str(),
                row.description.as_str(),
                row.unit_price.as_str(),
                row.total.as_str(),
            ])
            .map_err(std::io::Error::from)?;
    }
    writer.flush()?;

    writer
        .into_inner()
        .map_err(|e| FacturaError::Io(e.into_error()))
}
