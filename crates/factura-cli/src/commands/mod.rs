pub mod extract;
pub mod templates;

/// How a successful command ended.
pub enum Outcome {
    Done,
    /// The document was read but no table rows were found.
    NoData,
}
