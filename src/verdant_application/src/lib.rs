pub mod messages;
pub mod policy;
pub mod use_cases;

#[cfg(test)]
mod test_support;

pub use messages::DeliveryError;
pub use policy::VerificationPolicy;
pub use use_cases::*;
