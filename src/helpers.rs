//! Small string and resource helpers shared across the loader.

use crate::driver::DbConnection;

/// True when `value` is absent or only whitespace.
#[must_use]
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|s| s.trim().is_empty())
}

/// True when every value is present and not only whitespace. An empty slice is `false`.
#[must_use]
pub fn all_not_blank(values: &[Option<&str>]) -> bool {
    !values.is_empty() && values.iter().all(|v| !is_blank(*v))
}

/// Replace every character of a secret with `*`, keeping its length.
#[must_use]
pub fn mask_password(password: &str) -> String {
    mask_with(password, '*')
}

#[must_use]
pub fn mask_with(secret: &str, mask: char) -> String {
    std::iter::repeat_n(mask, secret.chars().count()).collect()
}

/// Close a connection and swallow any failure.
pub fn close_quietly(conn: Box<dyn DbConnection>) {
    if let Err(err) = conn.close() {
        tracing::debug!(error = %err, "ignoring failure while closing connection");
    }
}
