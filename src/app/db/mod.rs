pub mod comments;
pub mod goals;
pub mod organizations;
pub mod preferences;
pub mod sessions;
pub mod users;

pub use users::{find_by_email, NewUser, User, UserChanges};

/// Map a stored id that fails to parse into a decode error, so corrupt rows
/// surface like any other database failure.
pub(crate) fn decode_id<T>(result: Result<T, ulid::DecodeError>) -> Result<T, sqlx::Error> {
    result.map_err(|e| sqlx::Error::Decode(Box::new(e)))
}
