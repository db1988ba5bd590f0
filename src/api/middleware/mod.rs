// Request pipeline stages that run around the handlers

pub mod diagnostics;
pub mod validated_json;

pub use diagnostics::attach_diagnostics;
pub use validated_json::ValidatedJson;
