use std::borrow::Cow;

/// Errors raised while building a [`crate::SubscriptionsClient`].
///
/// Lookups themselves never fail with this type; their failures are carried in
/// [`ent_domain::subscriptions::SubscriptionLookupResult`].
#[ent_derive::ent_error]
pub enum SubscriptionsError {
    #[error("HTTP client error{}: {source}", format_context(.context))]
    Client { source: reqwest::Error, context: Option<Cow<'static, str>> },

    #[error("Client certificate unreadable{}: {source}", format_context(.context))]
    Certificate { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Invalid subscriptions configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
