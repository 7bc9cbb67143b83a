// src/services/mod.rs
//
// Clients for the external collaborators: the GraphQL data layer,
// the payment gateway and local image storage

pub mod graphql;
pub mod payment;
pub mod uploads;

// Re-export commonly used types for convenience
pub use graphql::{GraphqlService, GraphqlTransport, HttpTransport};
pub use payment::PaymentService;
pub use uploads::ImageStorage;
