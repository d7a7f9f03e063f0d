use uuid::Uuid;

/// Generates a new collision-resistant identity for documents and collections.
///
/// Identities are random (v4) UUIDs in their hyphenated textual form. They are
/// opaque to the store: nothing parses them back.
#[inline]
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
