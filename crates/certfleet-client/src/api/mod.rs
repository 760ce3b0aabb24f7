//! API endpoint modules.

mod audit;
mod certificates;
mod objects;
mod topics;

pub use audit::AuditApi;
pub use certificates::CertificateApi;
pub use objects::ObjectApi;
pub use topics::TopicApi;
