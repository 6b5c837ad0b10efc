//! One borrowed facade per backend resource

mod auth;
mod bookings;
mod conversations;
mod coupons;
mod insights;
mod operations;
mod people;

pub use auth::Auth;
pub use bookings::{Bookings, PendingRequests};
pub use conversations::Conversations;
pub use coupons::Coupons;
pub use insights::{Analytics, Export, Reports};
pub use operations::{Dashboard, Monitoring, Notifications, Settings};
pub use people::{Customers, Therapists, Users};

/// Query for endpoints that take no parameters
const NO_QUERY: &[(&str, &str)] = &[];

/// Declare a facade struct borrowing the client
macro_rules! facade {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name<'a> {
            client: &'a $crate::client::ApiClient,
        }

        impl<'a> $name<'a> {
            pub(crate) const fn new(client: &'a $crate::client::ApiClient) -> Self {
                Self { client }
            }
        }
    };
}

pub(crate) use facade;
