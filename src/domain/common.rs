use uuid::Uuid;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides access to a human-friendly entity name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Returns the first eight characters of an identifier, enough to pick a record
/// out of a household-sized list.
pub fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}
