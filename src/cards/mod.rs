//! The name-editing cards. Each binds to one wfo id and keeps its own edit state.

mod authors;
mod form_header;
mod hybrid;
mod update_alert;

pub use authors::CardNameAuthors;
pub use form_header::CardFormHeader;
pub use hybrid::CardTaxonHybridStatus;
pub use update_alert::UpdateAlert;
