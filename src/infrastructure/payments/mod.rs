mod stripe_checkout_gateway;

pub use stripe_checkout_gateway::{STRIPE_API_BASE, StripeCheckoutGateway};
